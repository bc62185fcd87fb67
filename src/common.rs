use glam::DVec2;

use crate::Segment;

/// The tolerance used for algebraic zero checks: parallel lines, zero-length
/// segments and points lying on a line. Always compared against a sine or a
/// distance, never against a raw cross product.
pub const EPSILON: f64 = 1e-7;

/// Quadratic discriminants in `(-DISCRIMINANT_EPSILON, 0)` are treated as
/// exactly zero (a tangency).
pub const DISCRIMINANT_EPSILON: f64 = 1e-5;

/// Computes the 2D determinant of `a` and `b`, aka the 2D cross product.
pub fn determinant(a: DVec2, b: DVec2) -> f64 {
  a.x * b.y - a.y * b.x
}

/// Computes the "time" along both lines when the lines intersect. If the lines
/// are parallel (or either line has no length), the result is None. The lines
/// are not line segments; the time is allowed to be any number, even negative
/// or greater than one. The resulting DVec2 contains the time for line 1 in
/// the x component, and the time for line 2 in the y component.
pub fn time_to_intersect_lines(
  line_1_start: DVec2,
  line_1_end: DVec2,
  line_2_start: DVec2,
  line_2_end: DVec2,
) -> Option<DVec2> {
  let relative_line_1_start = line_1_start - line_2_start;
  let line_1_delta = line_1_end - line_1_start;
  let line_2_delta = line_2_end - line_2_start;

  let matrix_determinant = determinant(line_2_delta, line_1_delta);
  if matrix_determinant.abs()
    <= EPSILON * line_1_delta.length() * line_2_delta.length()
  {
    None
  } else {
    // Use some linear algebra to solve this (take the inverse of the line
    // equation matrix).
    Some(
      DVec2::new(
        determinant(relative_line_1_start, line_2_delta),
        determinant(relative_line_1_start, line_1_delta),
      ) / matrix_determinant,
    )
  }
}

pub const DEFAULT_VISUAL_TOLERANCE: f64 = 0.01;
pub const DEFAULT_SIDE_TOLERANCE: f64 = 1e-4;
pub const DEFAULT_FAR_DISTANCE: f64 = 10_000.0;
pub const DEFAULT_BACKOFF: f64 = 0.1;
pub const DEFAULT_CONTACT_GAP: f64 = 0.01;
pub const DEFAULT_MIN_CHORD: f64 = 0.01;

/// The fuzzy tolerances shared between building a wall set and querying it.
/// A [`crate::VisibilityContext`] or [`crate::CollisionProcessor`] keeps its
/// own copy so construction and queries always agree.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
  /// How close a point must be to a vertex or a wall to be considered "on"
  /// it during the visibility sweep. Also the fraction of a ray near its end
  /// that is ignored when testing whether a vertex is blocked.
  pub visual: f64,
  /// The perpendicular distance beyond which a vertex's neighbour counts as
  /// lying on one side of a ray.
  pub side: f64,
  /// How far a ray is extended when it escapes past every wall.
  pub far_distance: f64,
  /// How far a swept contact path is pulled back, so a circle already
  /// touching a wall still registers it.
  pub backoff: f64,
  /// The gap left between a circle and a vertex it slides around.
  pub contact_gap: f64,
  /// Chords through a vertex circle shorter than this are a graze, not a hit.
  pub min_chord: f64,
}

impl Default for Tolerances {
  fn default() -> Self {
    Self {
      visual: DEFAULT_VISUAL_TOLERANCE,
      side: DEFAULT_SIDE_TOLERANCE,
      far_distance: DEFAULT_FAR_DISTANCE,
      backoff: DEFAULT_BACKOFF,
      contact_gap: DEFAULT_CONTACT_GAP,
      min_chord: DEFAULT_MIN_CHORD,
    }
  }
}

/// Removes walls with no length, logging each one. Such walls have no
/// direction, so they can neither block a ray nor be slid along.
pub(crate) fn drop_degenerate_walls<'a>(
  walls: impl IntoIterator<Item = &'a Segment>,
) -> Vec<Segment> {
  walls
    .into_iter()
    .filter(|wall| {
      let proper = wall.length() > EPSILON;
      if !proper {
        log::warn!("Ignoring zero-length wall at {}", wall.start);
      }
      proper
    })
    .copied()
    .collect()
}

#[cfg(test)]
#[path = "common_test.rs"]
mod test;
