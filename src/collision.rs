use glam::DVec2;

use crate::{
  algebra::{angle_normalize, angle_of, solve_2, to_length, unit_vector_at},
  common::{drop_degenerate_walls, Tolerances, EPSILON},
  Circle, DebugSink, GeometryError, Line, Segment,
};

/// What part of a wall a moving circle ran into.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CollisionKind {
  /// The circle hit the wall between its endpoints. `to_contact` is the offset
  /// from the circle's centre to the point touching the wall.
  Edge { to_contact: DVec2 },
  /// The circle hit one of the wall's endpoints.
  Vertex { vertex: DVec2 },
}

/// The result of sweeping a circle from `start` towards `end` into `segment`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Collision {
  pub start: DVec2,
  pub end: DVec2,
  pub radius: f64,
  pub segment: Segment,
  /// Where the circle's centre is when it stops against the wall.
  pub centre: DVec2,
  pub kind: CollisionKind,
}

/// Sweeps the circle of `radius` at `start` towards `end` and finds where it
/// first touches the inside of `segment`. Moves that run along the wall
/// (rather than into it) are not collisions. A circle that already overlaps
/// the wall and keeps heading into it is pushed back out along the wall's
/// normal.
pub fn edge_collision(
  start: DVec2,
  end: DVec2,
  radius: f64,
  segment: &Segment,
  tolerances: &Tolerances,
) -> Option<Collision> {
  let contact =
    Circle::new(start, radius).closest_point_to_line(&segment.to_line())?;
  let path = end - start;
  let to_contact = contact - start;

  let foot = segment.closest_point_on_line(start);
  if radius - foot.distance(start) > EPSILON && segment.contains_on_line(foot)
  {
    if path.dot(to_contact) <= EPSILON * path.length() * radius {
      return None;
    }
    return Some(Collision {
      start,
      end,
      radius,
      segment: *segment,
      centre: foot - to_contact,
      kind: CollisionKind::Edge { to_contact },
    });
  }

  // Pull the contact point back against the direction of travel so a circle
  // already touching the wall still hits it.
  let mut sweep = path;
  if (start - contact).dot(sweep) > 0.0 {
    sweep = -sweep;
  }
  let contact_path = Segment::new(
    contact - to_length(sweep, tolerances.backoff),
    contact + path,
  );
  if segment.is_aligned(contact_path.start, EPSILON)
    && segment.is_aligned(contact_path.end, EPSILON)
  {
    return None;
  }

  let hit = segment.intersection(&contact_path)?;
  Some(Collision {
    start,
    end,
    radius,
    segment: *segment,
    centre: hit - to_contact,
    kind: CollisionKind::Edge { to_contact },
  })
}

/// Sweeps the circle of `radius` at `start` towards `end` and finds where it
/// first touches either endpoint of `segment`. Moves that only graze the
/// endpoint are not collisions. The circle stops `contact_gap` back along its
/// path from the first touch, but never behind `start`.
pub fn vertex_collision(
  start: DVec2,
  end: DVec2,
  radius: f64,
  segment: &Segment,
  tolerances: &Tolerances,
) -> Option<Collision> {
  let path = end - start;
  if path.length() <= EPSILON {
    return None;
  }

  let mut closest: Option<(f64, DVec2, DVec2)> = None;
  for vertex in [segment.start, segment.end] {
    let mut sweep = path;
    if (start - vertex).dot(sweep) > 0.0 {
      sweep = -sweep;
    }
    let backed_off_path =
      Segment::new(start - to_length(sweep, tolerances.backoff), end);
    for point in backed_off_path
      .circle_intersections_exclusive(&Circle::new(vertex, radius))
    {
      let distance = point.distance(start);
      if closest.map_or(true, |(closest_distance, _, _)| {
        distance < closest_distance
      }) {
        closest = Some((distance, point, vertex));
      }
    }
  }
  let (_, point, vertex) = closest?;

  let chord = Line::new(start, path)
    .circle_intersections_exclusive(&Circle::new(vertex, radius));
  if chord.len() != 2 || chord[0].distance(chord[1]) < tolerances.min_chord {
    return None;
  }

  // Back off along the path, never past `start`.
  let ahead = (point - start).dot(path) / path.length();
  let backoff = tolerances.contact_gap.min(ahead.max(0.0));
  Some(Collision {
    start,
    end,
    radius,
    segment: *segment,
    centre: point - to_length(path, backoff),
    kind: CollisionKind::Vertex { vertex },
  })
}

/// Resolves moves of circles against a fixed set of walls, sliding them along
/// and around any wall they run into.
#[derive(Clone, Debug)]
pub struct CollisionProcessor {
  segments: Vec<Segment>,
  tolerances: Tolerances,
}

impl CollisionProcessor {
  pub fn new(segments: &[Segment]) -> Self {
    Self::with_tolerances(segments, Tolerances::default())
  }

  pub fn with_tolerances(segments: &[Segment], tolerances: Tolerances) -> Self {
    Self { segments: drop_degenerate_walls(segments), tolerances }
  }

  pub fn segments(&self) -> &[Segment] {
    &self.segments
  }

  pub fn tolerances(&self) -> &Tolerances {
    &self.tolerances
  }

  /// Finds the collision that stops a circle moving from `start` to `end`
  /// soonest. Ties go to the first wall, and edge collisions win ties
  /// against vertex collisions.
  pub fn get_collision(
    &self,
    start: DVec2,
    end: DVec2,
    radius: f64,
  ) -> Option<Collision> {
    self.find_collision(start, end, radius, &mut ())
  }

  /// Moves a circle of `radius` from `start` towards `end`, returning where it
  /// ends up. If it runs into a wall, it slides along (or pivots around) the
  /// wall for the rest of the distance, unless another wall gets in the way.
  pub fn process(
    &self,
    start: DVec2,
    end: DVec2,
    radius: f64,
  ) -> Result<DVec2, GeometryError> {
    self.process_with_debug(start, end, radius, &mut ())
  }

  /// Same as [`CollisionProcessor::process`], reporting collisions and slide
  /// paths to `debug`.
  pub fn process_with_debug(
    &self,
    start: DVec2,
    end: DVec2,
    radius: f64,
    debug: &mut dyn DebugSink,
  ) -> Result<DVec2, GeometryError> {
    let Some(collision) = self.find_collision(start, end, radius, debug) else {
      return Ok(end);
    };
    log::trace!("Moving from {start} to {end} collides: {collision:?}");

    let path = self.slide(&collision)?;
    debug.slide_path(&path);
    Ok(
      self
        .check_slide_with_debug(&path, radius, debug)
        .unwrap_or(collision.centre),
    )
  }

  /// Like [`CollisionProcessor::process`], but stays at `start` if the
  /// geometry is degenerate.
  pub fn process_or_stay(
    &self,
    start: DVec2,
    end: DVec2,
    radius: f64,
  ) -> DVec2 {
    match self.process(start, end, radius) {
      Ok(position) => position,
      Err(error) => {
        log::warn!("Staying at {start} instead of moving to {end}: {error}");
        start
      }
    }
  }

  /// Walks `path`, stopping at the first collision along it. Returns the end
  /// of the path if nothing is hit, or None for an empty path.
  pub fn check_slide(&self, path: &[DVec2], radius: f64) -> Option<DVec2> {
    self.check_slide_with_debug(path, radius, &mut ())
  }

  fn check_slide_with_debug(
    &self,
    path: &[DVec2],
    radius: f64,
    debug: &mut dyn DebugSink,
  ) -> Option<DVec2> {
    for leg in path.windows(2) {
      if let Some(blocker) = self.find_collision(leg[0], leg[1], radius, debug)
      {
        log::debug!(
          "Slide from {} cut short at {}",
          path[0],
          blocker.centre
        );
        debug.slide_truncated(&blocker);
        return Some(blocker.centre);
      }
    }
    path.last().copied()
  }

  /// Computes the path a circle takes after `collision` for the rest of its
  /// move, starting at the collision's centre.
  pub fn slide(
    &self,
    collision: &Collision,
  ) -> Result<Vec<DVec2>, GeometryError> {
    let budget = collision.start.distance(collision.end)
      - collision.start.distance(collision.centre);

    match collision.kind {
      CollisionKind::Vertex { vertex } => {
        let mut path = pivot_slide(
          Pivot {
            radius: collision.radius,
            centre: collision.centre,
            vertex,
            direction: collision.end - collision.start,
            remaining: budget,
          },
          vec![collision.centre],
        )?;
        self.nudge_from_vertex(&mut path, collision, vertex);
        Ok(path)
      }
      CollisionKind::Edge { to_contact } => {
        let segment = collision.segment;
        let end_on_wall = segment.closest_point_on_line(collision.end);
        if segment.contains_on_line_exclusive(end_on_wall) {
          return Ok(vec![collision.centre, end_on_wall - to_contact]);
        }

        // The destination is past the end of the wall: slide to the corner,
        // then pivot around it with whatever distance is left.
        let mid = segment.mid();
        let corner = mid + to_length(end_on_wall - mid, segment.length() * 0.5);
        let corner_centre = corner - to_contact;
        let along = collision.centre.distance(corner_centre);
        if budget <= along {
          return Ok(vec![
            collision.centre,
            collision.centre
              + to_length(corner_centre - collision.centre, budget.max(0.0)),
          ]);
        }
        if corner_centre.distance(collision.end) <= EPSILON {
          return Ok(vec![collision.centre, corner_centre]);
        }

        let mut path = pivot_slide(
          Pivot {
            radius: collision.radius,
            centre: corner_centre,
            vertex: corner,
            direction: collision.end - corner_centre,
            remaining: budget - along,
          },
          vec![collision.centre, corner_centre],
        )?;
        self.nudge_from_vertex(&mut path, collision, corner);
        Ok(path)
      }
    }
  }

  /// Shifts `path` by the contact gap, away from `vertex` and towards where
  /// the collision happened. Points the shift would press into a nearby wall
  /// stay put.
  fn nudge_from_vertex(
    &self,
    path: &mut [DVec2],
    collision: &Collision,
    vertex: DVec2,
  ) {
    let gap = to_length(collision.centre - vertex, self.tolerances.contact_gap);
    for point in path.iter_mut() {
      let nudged = *point + gap;
      let presses_into_wall = self.segments.iter().any(|wall| {
        let distance = wall.distance_to(nudged);
        distance < collision.radius && distance < wall.distance_to(*point)
      });
      if !presses_into_wall {
        *point = nudged;
      }
    }
  }

  fn find_collision(
    &self,
    start: DVec2,
    end: DVec2,
    radius: f64,
    debug: &mut dyn DebugSink,
  ) -> Option<Collision> {
    if start.distance(end) <= EPSILON {
      return None;
    }

    let edges = self.segments.iter().filter_map(|segment| {
      edge_collision(start, end, radius, segment, &self.tolerances)
    });
    let vertices = self.segments.iter().filter_map(|segment| {
      vertex_collision(start, end, radius, segment, &self.tolerances)
    });

    let mut closest: Option<Collision> = None;
    for collision in edges.chain(vertices) {
      debug.collision_candidate(&collision);
      let distance = collision.centre.distance(start);
      if closest.map_or(true, |closest| {
        distance < closest.centre.distance(start)
      }) {
        closest = Some(collision);
      }
    }
    closest
  }
}

/// A circle pivoting around a vertex it is pressed against.
struct Pivot {
  radius: f64,
  centre: DVec2,
  vertex: DVec2,
  /// The direction the circle is trying to move in.
  direction: DVec2,
  /// How much further the circle may travel.
  remaining: f64,
}

/// Appends to `path` the points of a circle rolling around `pivot.vertex`
/// until either it can continue in its direction of travel or it runs out of
/// distance.
fn pivot_slide(
  pivot: Pivot,
  mut path: Vec<DVec2>,
) -> Result<Vec<DVec2>, GeometryError> {
  let Pivot { radius, centre, vertex, direction, .. } = pivot;
  let remaining = pivot.remaining.max(0.0);

  // The edge of the circle that will roll along the vertex.
  let to_vertex = vertex - centre;
  let mut normal = to_length(direction.perp(), radius);
  if normal.dot(to_vertex) < 0.0 {
    normal = -normal;
  }
  let edge = centre + normal;

  // Where the circle's edge (moving along `direction`) meets the line
  // tangent to the circle at the vertex.
  let tangent_at_vertex = Line::new(vertex, to_vertex.perp());
  let crossing = Line::new(edge, direction)
    .intersection(&tangent_at_vertex)
    .ok_or(GeometryError::ParallelTangents { vertex, direction })?;

  let around = vertex - crossing;
  let clear = crossing - edge;
  let around_point = centre + around;
  let clear_point = around_point + clear;
  let length = around.length() + clear.length();

  if length < remaining || length <= EPSILON {
    path.extend([
      around_point,
      clear_point,
      clear_point + to_length(direction, remaining - length),
    ]);
  } else {
    // Not enough distance to clear the vertex: stop part way around it.
    let ratio = remaining / length;
    let start_angle = angle_of(centre - vertex);
    let clear_angle = angle_of(clear_point - vertex);
    let angle = angle_normalize(
      start_angle + angle_normalize(clear_angle - start_angle) * ratio,
    );
    let destination = unit_vector_at(angle) * radius - (centre - vertex);
    let (x, y) = solve_2(around, clear, destination)
      .ok_or(GeometryError::SingularSlide { vertex })?;
    let around_point = centre + around * x;
    path.extend([around_point, around_point + clear * y]);
  }
  Ok(path)
}

#[cfg(test)]
#[path = "collision_test.rs"]
mod test;
