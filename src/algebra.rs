use std::f64::consts::{PI, TAU};

use glam::DVec2;

use crate::common::{
  determinant, time_to_intersect_lines, DISCRIMINANT_EPSILON, EPSILON,
};

/// A directed line segment. Walls are segments whose direction does not
/// matter.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
  pub start: DVec2,
  pub end: DVec2,
}

/// An infinite line, described by a point on it and its direction. The
/// direction need not be normalized.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
  pub point: DVec2,
  pub direction: DVec2,
}

/// A circle, used as the collision envelope of an agent.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
  pub centre: DVec2,
  pub radius: f64,
}

impl Segment {
  pub fn new(start: DVec2, end: DVec2) -> Self {
    Self { start, end }
  }

  pub fn direction(&self) -> DVec2 {
    self.end - self.start
  }

  pub fn length(&self) -> f64 {
    self.direction().length()
  }

  /// The same segment going the other way.
  pub fn flip(&self) -> Self {
    Self { start: self.end, end: self.start }
  }

  pub fn mid(&self) -> DVec2 {
    self.point_at(0.5)
  }

  pub fn to_line(&self) -> Line {
    Line { point: self.start, direction: self.direction() }
  }

  /// The point at `ratio` along the segment, where 0 is the start and 1 is
  /// the end.
  pub fn point_at(&self, ratio: f64) -> DVec2 {
    self.start + self.direction() * ratio
  }

  /// The aligned ratio of `point`: the inverse of [`Segment::point_at`] for
  /// points on the segment's line. Points off the line get the ratio of some
  /// nearby point on the line. For a zero-length segment this is not a
  /// number, which makes every containment test on it false.
  pub fn aligned_ratio(&self, point: DVec2) -> f64 {
    aligned_ratio(self.direction(), point - self.start)
  }

  /// The distance from `point` to the segment's infinite line, positive when
  /// `point` is to the left of the segment. For a zero-length segment this is
  /// the (unsigned) distance to its start.
  pub fn signed_distance_to_line(&self, point: DVec2) -> f64 {
    let length = self.length();
    if length == 0.0 {
      return point.distance(self.start);
    }
    determinant(self.direction(), point - self.start) / length
  }

  /// Whether `point` lies within `tolerance` of the segment's infinite line.
  pub fn is_aligned(&self, point: DVec2, tolerance: f64) -> bool {
    self.signed_distance_to_line(point).abs() <= tolerance
  }

  /// Whether `point`, assumed to be on the segment's line, lies within the
  /// segment's extent (endpoints included).
  pub fn contains_on_line(&self, point: DVec2) -> bool {
    (0.0..=1.0).contains(&self.aligned_ratio(point))
  }

  /// Like [`Segment::contains_on_line`], but excluding the endpoints.
  pub fn contains_on_line_exclusive(&self, point: DVec2) -> bool {
    let ratio = self.aligned_ratio(point);
    0.0 < ratio && ratio < 1.0
  }

  /// Whether `point` is within `tolerance` of the line and within the
  /// segment's extent.
  pub fn nearly_contains(&self, point: DVec2, tolerance: f64) -> bool {
    self.is_aligned(point, tolerance) && self.contains_on_line(point)
  }

  pub fn closest_point_on_line(&self, point: DVec2) -> DVec2 {
    self.to_line().closest_point(point)
  }

  /// The distance from `point` to the closest point of the segment itself
  /// (not its line).
  pub fn distance_to(&self, point: DVec2) -> f64 {
    let direction = self.direction();
    let length_squared = direction.length_squared();
    if length_squared == 0.0 {
      return point.distance(self.start);
    }
    let ratio =
      (direction.dot(point - self.start) / length_squared).clamp(0.0, 1.0);
    point.distance(self.point_at(ratio))
  }

  /// The endpoint opposite `point`. `point` is expected to be one of the
  /// endpoints; anything other than the start yields the start.
  pub fn other_end(&self, point: DVec2) -> DVec2 {
    if point == self.start {
      self.end
    } else {
      self.start
    }
  }

  /// Equality ignoring direction.
  pub fn unsigned_eq(&self, other: &Segment) -> bool {
    self == other || *self == other.flip()
  }

  /// The intersection of two segments, endpoints included. Collinear
  /// segments that overlap intersect at the middle of the overlap, so a
  /// segment intersects itself at its midpoint.
  pub fn intersection(&self, other: &Segment) -> Option<DVec2> {
    self.intersection_impl(other, /* exclusive= */ false)
  }

  /// Like [`Segment::intersection`], but touching at an endpoint does not
  /// count, and collinear overlaps need a positive length.
  pub fn intersection_exclusive(&self, other: &Segment) -> Option<DVec2> {
    self.intersection_impl(other, /* exclusive= */ true)
  }

  pub fn intersects(&self, other: &Segment) -> bool {
    self.intersection(other).is_some()
  }

  pub fn intersects_exclusive(&self, other: &Segment) -> bool {
    self.intersection_exclusive(other).is_some()
  }

  fn intersection_impl(
    &self,
    other: &Segment,
    exclusive: bool,
  ) -> Option<DVec2> {
    if self.length() <= EPSILON || other.length() <= EPSILON {
      return None;
    }

    let Some(point) = self.to_line().intersection(&other.to_line()) else {
      if !self.is_aligned(other.start, EPSILON) {
        return None;
      }
      let start_ratio = self.aligned_ratio(other.start);
      let end_ratio = self.aligned_ratio(other.end);
      let low = start_ratio.min(end_ratio).max(0.0);
      let high = start_ratio.max(end_ratio).min(1.0);
      if low > high || (exclusive && low >= high) {
        return None;
      }
      return Some(self.point_at((low + high) * 0.5));
    };

    let contained = if exclusive {
      self.contains_on_line_exclusive(point)
        && other.contains_on_line_exclusive(point)
    } else {
      self.contains_on_line(point) && other.contains_on_line(point)
    };
    contained.then_some(point)
  }

  /// The points where the segment crosses `circle`, endpoints included.
  pub fn circle_intersections(&self, circle: &Circle) -> Vec<DVec2> {
    let mut points = self.to_line().circle_intersections(circle);
    points.retain(|&point| self.contains_on_line(point));
    points
  }

  /// The points where the segment crosses `circle`, ignoring tangencies and
  /// the endpoints.
  pub fn circle_intersections_exclusive(&self, circle: &Circle) -> Vec<DVec2> {
    let mut points = self.to_line().circle_intersections_exclusive(circle);
    points.retain(|&point| self.contains_on_line_exclusive(point));
    points
  }
}

impl Line {
  pub fn new(point: DVec2, direction: DVec2) -> Self {
    Self { point, direction }
  }

  /// The line passing through `a` then `b`.
  pub fn through(a: DVec2, b: DVec2) -> Self {
    Self { point: a, direction: b - a }
  }

  pub fn point_at(&self, time: f64) -> DVec2 {
    self.point + self.direction * time
  }

  /// The point where two lines cross, or None if they are parallel.
  pub fn intersection(&self, other: &Line) -> Option<DVec2> {
    time_to_intersect_lines(
      self.point,
      self.point + self.direction,
      other.point,
      other.point + other.direction,
    )
    .map(|times| self.point_at(times.x))
  }

  /// The projection of `point` onto the line.
  pub fn closest_point(&self, point: DVec2) -> DVec2 {
    let length_squared = self.direction.length_squared();
    if length_squared == 0.0 {
      return self.point;
    }
    self.point_at(self.direction.dot(point - self.point) / length_squared)
  }

  /// The points where the line crosses `circle`: none, one for a tangency, or
  /// two.
  pub fn circle_intersections(&self, circle: &Circle) -> Vec<DVec2> {
    self
      .circle_times(circle)
      .into_iter()
      .map(|time| self.point_at(time))
      .collect()
  }

  /// Like [`Line::circle_intersections`], but a tangency yields no points.
  pub fn circle_intersections_exclusive(&self, circle: &Circle) -> Vec<DVec2> {
    let times = self.circle_times(circle);
    if times.len() == 1 {
      return Vec::new();
    }
    times.into_iter().map(|time| self.point_at(time)).collect()
  }

  fn circle_times(&self, circle: &Circle) -> Vec<f64> {
    let relative_centre = circle.centre - self.point;
    solve_quadratic(
      self.direction.length_squared(),
      -2.0 * self.direction.dot(relative_centre),
      relative_centre.length_squared() - circle.radius * circle.radius,
    )
  }
}

impl Circle {
  pub fn new(centre: DVec2, radius: f64) -> Self {
    Self { centre, radius }
  }

  /// Whether `point` is inside the circle or on its boundary.
  pub fn contains(&self, point: DVec2) -> bool {
    self.centre.distance_squared(point) <= self.radius * self.radius
  }

  /// The point on the circle closest to `line`, assuming the circle does not
  /// reach past it. None if the centre lies on the line, since every
  /// direction is then equally close.
  pub fn closest_point_to_line(&self, line: &Line) -> Option<DVec2> {
    self.closest_point_towards(line.closest_point(self.centre))
  }

  /// The point on the circle closest to `segment`. None if the centre lies on
  /// the segment.
  pub fn closest_point_to_segment(&self, segment: &Segment) -> Option<DVec2> {
    let direction = segment.direction();
    let length_squared = direction.length_squared();
    let target = if length_squared == 0.0 {
      segment.start
    } else {
      let ratio = (direction.dot(self.centre - segment.start)
        / length_squared)
        .clamp(0.0, 1.0);
      segment.point_at(ratio)
    };
    self.closest_point_towards(target)
  }

  pub fn translate(&self, offset: DVec2) -> Self {
    Self { centre: self.centre + offset, radius: self.radius }
  }

  fn closest_point_towards(&self, target: DVec2) -> Option<DVec2> {
    if target.distance(self.centre) <= EPSILON {
      return None;
    }
    Some(self.centre + to_length(target - self.centre, self.radius))
  }
}

/// The projection coefficient of `offset` along `direction`, taken from the
/// larger component of `direction` to keep the division well conditioned.
fn aligned_ratio(direction: DVec2, offset: DVec2) -> f64 {
  if direction.x.abs() >= direction.y.abs() {
    offset.x / direction.x
  } else {
    offset.y / direction.y
  }
}

/// Solves `a * x^2 + b * x + c = 0`. Returns no roots, one root for a
/// (near-)zero discriminant, or two roots. A zero `a` solves the linear
/// equation instead.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
  if a == 0.0 {
    return if b == 0.0 { Vec::new() } else { vec![-c / b] };
  }

  let mut discriminant = b * b - 4.0 * a * c;
  if -DISCRIMINANT_EPSILON < discriminant && discriminant < 0.0 {
    discriminant = 0.0;
  }

  if discriminant < 0.0 {
    Vec::new()
  } else if discriminant == 0.0 {
    vec![-b / (2.0 * a)]
  } else {
    let root = discriminant.sqrt();
    vec![(-b + root) / (2.0 * a), (-b - root) / (2.0 * a)]
  }
}

/// Solves `x * a + y * b = c` for `(x, y)`. None if `a` and `b` are parallel.
pub fn solve_2(a: DVec2, b: DVec2, c: DVec2) -> Option<(f64, f64)> {
  let matrix_determinant = determinant(a, b);
  if matrix_determinant.abs() <= EPSILON * a.length() * b.length() {
    return None;
  }
  Some((
    determinant(c, b) / matrix_determinant,
    determinant(a, c) / matrix_determinant,
  ))
}

/// Wraps `angle` into `(-PI, PI]`.
pub fn angle_normalize(angle: f64) -> f64 {
  let wrapped = (angle + PI).rem_euclid(TAU) - PI;
  if wrapped == -PI {
    PI
  } else {
    wrapped
  }
}

/// The angle of `vector` anticlockwise from +x, in `[-PI, PI]`.
pub fn angle_of(vector: DVec2) -> f64 {
  vector.y.atan2(vector.x)
}

/// The anticlockwise angle from `a` to `b`, in `[0, 2 * PI)`.
pub fn angle_between(a: DVec2, b: DVec2) -> f64 {
  let angle = angle_normalize(angle_of(b) - angle_of(a));
  if angle < 0.0 {
    angle + TAU
  } else {
    angle
  }
}

/// The unit vector pointing at `angle` radians anticlockwise from +x.
pub fn unit_vector_at(angle: f64) -> DVec2 {
  DVec2::from_angle(angle)
}

/// Scales `vector` to have `length`, keeping its direction. A zero vector
/// stays zero.
pub fn to_length(vector: DVec2, length: f64) -> DVec2 {
  let current = vector.length();
  if current == 0.0 {
    DVec2::ZERO
  } else {
    vector * (length / current)
  }
}

/// The closed ring of walls around `points`: each point connects to the
/// next, and the last to the first. Fewer than two points make no walls.
pub fn polygon_to_segments(points: &[DVec2]) -> Vec<Segment> {
  if points.len() < 2 {
    return Vec::new();
  }
  points
    .iter()
    .zip(points.iter().cycle().skip(1))
    .map(|(&start, &end)| Segment::new(start, end))
    .collect()
}

/// Whether `point` is inside the polygon with the given vertices, using the
/// even-odd rule.
pub fn polygon_contains(points: &[DVec2], point: DVec2) -> bool {
  let mut inside = false;
  for segment in polygon_to_segments(points) {
    let (a, b) = (segment.start, segment.end);
    if (a.y > point.y) != (b.y > point.y) {
      let crossing_x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
      if point.x < crossing_x {
        inside = !inside;
      }
    }
  }
  inside
}

#[cfg(test)]
#[path = "algebra_test.rs"]
mod test;
