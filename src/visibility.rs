use glam::DVec2;

use crate::{
  algebra::{angle_of, to_length},
  common::{
    drop_degenerate_walls, time_to_intersect_lines, Tolerances, EPSILON,
  },
  vertex::{build_vertices, Vertex},
  DebugSink, HintShape, Segment, VisibilityAmbiguityError,
};

/// A corner of the visible-area polygon.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct VisiblePoint {
  pub point: DVec2,
  /// False if the point is a vertex seen directly. True if it belongs to a
  /// ray that glanced past a vertex, either the glanced vertex itself or the
  /// point the extended ray hit.
  pub extended: bool,
}

/// Which sides of a ray the walls leaving a vertex head towards.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub(crate) struct Sides {
  pub(crate) clockwise: bool,
  pub(crate) counter_clockwise: bool,
}

impl Sides {
  /// A vertex with walls on both sides of the ray fully blocks it.
  pub(crate) fn is_clean(self) -> bool {
    self.clockwise && self.counter_clockwise
  }
}

/// What the previous sweep step ended on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Hint {
  Vertex(usize),
  Segment(usize),
}

/// The order in which a glancing ray's two points join the polygon.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum GlanceOrder {
  NearFirst,
  FarFirst,
}

/// Computes line-of-sight polygons against a fixed set of walls. Rebuild it
/// when the set of walls changes.
#[derive(Clone, Debug)]
pub struct VisibilityContext {
  segments: Vec<Segment>,
  vertices: Vec<Vertex>,
  tolerances: Tolerances,
}

impl VisibilityContext {
  /// Creates a context over `segments` plus `extra_segments` (walls that are
  /// always present, like a level's outer boundary).
  pub fn new(segments: &[Segment], extra_segments: &[Segment]) -> Self {
    Self::with_tolerances(segments, extra_segments, Tolerances::default())
  }

  pub fn with_tolerances(
    segments: &[Segment],
    extra_segments: &[Segment],
    tolerances: Tolerances,
  ) -> Self {
    let segments =
      drop_degenerate_walls(segments.iter().chain(extra_segments.iter()));
    let vertices = build_vertices(&segments);
    Self { segments, vertices, tolerances }
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn vertices(&self) -> &[Vertex] {
    &self.vertices
  }

  pub fn tolerances(&self) -> &Tolerances {
    &self.tolerances
  }

  /// The index of the first vertex within the visual tolerance of
  /// `position`.
  pub fn vertex_by_position(&self, position: DVec2) -> Option<usize> {
    self.vertices.iter().position(|vertex| {
      vertex.position().distance(position) <= self.tolerances.visual
    })
  }

  /// Computes the polygon visible from `eye`, as its corners in
  /// anticlockwise order.
  pub fn visible_polygon(
    &self,
    eye: DVec2,
  ) -> Result<Vec<VisiblePoint>, VisibilityAmbiguityError> {
    self.visible_polygon_with_debug(eye, &mut ())
  }

  /// Same as [`VisibilityContext::visible_polygon`], reporting each visible
  /// vertex and extended ray to `debug`.
  pub fn visible_polygon_with_debug(
    &self,
    eye: DVec2,
    debug: &mut dyn DebugSink,
  ) -> Result<Vec<VisiblePoint>, VisibilityAmbiguityError> {
    let mut candidates = self
      .unblocked_vertices(eye)
      .into_iter()
      .map(|vertex_index| {
        let vertex = &self.vertices[vertex_index];
        let ray = vertex.position() - eye;
        (angle_of(ray), vertex_index, self.connected_sides(ray, vertex))
      })
      .collect::<Vec<_>>();
    // Stable, so vertices at the same angle keep their build order.
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));

    // Starting on a clean vertex means the first glance has a real previous
    // step to order against.
    match candidates.iter().position(|(_, _, sides)| sides.is_clean()) {
      Some(start) => candidates.rotate_left(start),
      None if !candidates.is_empty() => {
        log::warn!(
          "No vertex visible from {eye} is blocked on both sides; sweeping \
           in raw angular order"
        );
      }
      None => {}
    }

    let mut polygon = Vec::with_capacity(candidates.len() * 2);
    let mut last_hint = None;
    for (_, vertex_index, sides) in candidates {
      let near = self.vertices[vertex_index].position();
      debug.visible_vertex(near, sides.is_clean());

      if sides.is_clean() {
        polygon.push(VisiblePoint { point: near, extended: false });
        last_hint = Some(Hint::Vertex(vertex_index));
        continue;
      }

      let (far, far_hint) = self.closest_ray_intersection(eye, near, sides);
      debug.extended_ray(near, far);

      match self.glance_order(eye, near, far, last_hint)? {
        GlanceOrder::NearFirst => {
          polygon.push(VisiblePoint { point: near, extended: true });
          polygon.push(VisiblePoint { point: far, extended: true });
          last_hint = far_hint;
        }
        GlanceOrder::FarFirst => {
          polygon.push(VisiblePoint { point: far, extended: true });
          polygon.push(VisiblePoint { point: near, extended: true });
          last_hint = Some(Hint::Vertex(vertex_index));
        }
      }
    }

    Ok(polygon)
  }

  /// Indices of the vertices that no wall hides from `eye`. A wall touching
  /// the ray within the visual tolerance of its end does not count, so walls
  /// meeting at the vertex never hide it. Vertices at the eye are skipped.
  fn unblocked_vertices(&self, eye: DVec2) -> Vec<usize> {
    let ray_end = 1.0 - self.tolerances.visual;
    (0..self.vertices.len())
      .filter(|&vertex_index| {
        let target = self.vertices[vertex_index].position();
        if target.distance(eye) <= EPSILON {
          return false;
        }
        !self.segments.iter().any(|wall| {
          let Some(times) =
            time_to_intersect_lines(eye, target, wall.start, wall.end)
          else {
            return false;
          };
          (0.0..=1.0).contains(&times.y) && 0.0 < times.x && times.x < ray_end
        })
      })
      .collect()
  }

  /// Finds which sides of a ray heading along `ray` the walls of `vertex`
  /// leave towards. Walls running along the ray count for neither side.
  fn connected_sides(&self, ray: DVec2, vertex: &Vertex) -> Sides {
    let normal = ray.perp().normalize_or_zero();
    let mut sides = Sides::default();
    for &neighbour in vertex.neighbours() {
      let offset = normal.dot(neighbour - vertex.position());
      if offset < -self.tolerances.side {
        sides.clockwise = true;
      } else if offset > self.tolerances.side {
        sides.counter_clockwise = true;
      }
    }
    sides
  }

  /// Extends the ray from `eye` through `target` and finds the closest point
  /// past `eye` that stops it. A vertex only stops the ray if its walls, along
  /// with the sides in `mask`, cover both sides of the ray; this lets the ray
  /// slip past the glanced vertex itself. Rays that escape end at the far
  /// distance with no hint.
  pub(crate) fn closest_ray_intersection(
    &self,
    eye: DVec2,
    target: DVec2,
    mask: Sides,
  ) -> (DVec2, Option<Hint>) {
    let ray = target - eye;
    let mut closest = eye + to_length(ray, self.tolerances.far_distance);
    let mut closest_distance = closest.distance(eye);
    let mut hint = None;

    for (segment_index, wall) in self.segments.iter().enumerate() {
      let Some(times) =
        time_to_intersect_lines(eye, target, wall.start, wall.end)
      else {
        continue;
      };
      if !(0.0..=1.0).contains(&times.y) || times.x <= 0.0 {
        continue;
      }

      let point = eye + ray * times.x;
      let distance = point.distance(eye);
      if distance >= closest_distance {
        continue;
      }

      let vertex_index = self.vertex_by_position(point);
      let stops_ray = match vertex_index {
        None => true,
        Some(vertex_index) => {
          let sides = self.connected_sides(ray, &self.vertices[vertex_index]);
          (sides.clockwise || mask.clockwise)
            && (sides.counter_clockwise || mask.counter_clockwise)
        }
      };
      if !stops_ray {
        continue;
      }

      closest = point;
      closest_distance = distance;
      hint = Some(match vertex_index {
        None => Hint::Segment(segment_index),
        Some(vertex_index) => Hint::Vertex(vertex_index),
      });
    }

    (closest, hint)
  }

  /// Decides whether the polygon continues from the previous step to the
  /// `near` point or to the `far` point, by checking which one touches what
  /// the previous step ended on.
  pub(crate) fn glance_order(
    &self,
    eye: DVec2,
    near: DVec2,
    far: DVec2,
    last_hint: Option<Hint>,
  ) -> Result<GlanceOrder, VisibilityAmbiguityError> {
    let visual = self.tolerances.visual;
    let (touches_near, touches_far, hint) = match last_hint {
      None => return Ok(GlanceOrder::NearFirst),
      Some(Hint::Vertex(vertex_index)) => {
        let vertex = &self.vertices[vertex_index];
        (
          vertex.between_any_neighbour(near, visual),
          vertex.between_any_neighbour(far, visual),
          HintShape::Vertex(vertex.position()),
        )
      }
      Some(Hint::Segment(segment_index)) => {
        let segment = &self.segments[segment_index];
        (
          segment.nearly_contains(near, visual),
          segment.nearly_contains(far, visual),
          HintShape::Segment(*segment),
        )
      }
    };

    if touches_near {
      Ok(GlanceOrder::NearFirst)
    } else if touches_far {
      Ok(GlanceOrder::FarFirst)
    } else {
      let error =
        VisibilityAmbiguityError { eye, vertex: near, hint, near, far };
      log::warn!("{error}");
      Err(error)
    }
  }
}

#[cfg(test)]
#[path = "visibility_test.rs"]
mod test;
