use glam::DVec2;

use crate::common::{
  determinant, drop_degenerate_walls, time_to_intersect_lines, Tolerances,
};
use crate::Segment;

#[test]
fn determinant_correct() {
  assert_eq!(determinant(DVec2::new(1.0, 2.0), DVec2::new(3.0, 4.0)), -2.0);
}

#[test]
fn intersecting_lines_get_correct_tti() {
  assert_eq!(
    time_to_intersect_lines(
      DVec2::new(0.0, 0.0),
      DVec2::new(4.0, 0.0),
      DVec2::new(1.0, 1.0),
      DVec2::new(1.0, 3.0)
    ),
    Some(DVec2::new(0.25, -0.5))
  );
}

#[test]
fn parallel_lines_get_none_tti() {
  assert_eq!(
    time_to_intersect_lines(
      DVec2::new(0.0, 0.0),
      DVec2::new(4.0, 0.0),
      DVec2::new(1.0, 1.0),
      DVec2::new(5.0, 1.0)
    ),
    None
  );

  assert_eq!(
    time_to_intersect_lines(
      DVec2::new(0.0, 0.0),
      DVec2::new(4.0, 0.0),
      DVec2::new(0.0, 0.0),
      DVec2::new(4.0, 0.0)
    ),
    None
  );
}

#[test]
fn nearly_parallel_long_lines_get_none_tti() {
  // The cross product here is large in absolute terms, but the lines are
  // within a 1e-9 angle of each other.
  assert_eq!(
    time_to_intersect_lines(
      DVec2::new(0.0, 0.0),
      DVec2::new(1e6, 0.0),
      DVec2::new(0.0, 1.0),
      DVec2::new(1e6, 1.0 + 1e-3)
    ),
    None
  );
}

#[test]
fn zero_length_line_gets_none_tti() {
  assert_eq!(
    time_to_intersect_lines(
      DVec2::new(1.0, 1.0),
      DVec2::new(1.0, 1.0),
      DVec2::new(0.0, 0.0),
      DVec2::new(0.0, 3.0)
    ),
    None
  );
}

#[test]
fn default_tolerances() {
  let tolerances = Tolerances::default();
  assert_eq!(tolerances.visual, 0.01);
  assert_eq!(tolerances.side, 1e-4);
  assert_eq!(tolerances.far_distance, 10_000.0);
  assert_eq!(tolerances.backoff, 0.1);
  assert_eq!(tolerances.contact_gap, 0.01);
  assert_eq!(tolerances.min_chord, 0.01);
}

#[test]
fn degenerate_walls_are_dropped() {
  let walls = [
    Segment::new(DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0)),
    Segment::new(DVec2::new(2.0, 2.0), DVec2::new(2.0, 2.0)),
    Segment::new(DVec2::new(1.0, 0.0), DVec2::new(1.0, 1.0)),
  ];
  assert_eq!(drop_degenerate_walls(&walls), vec![walls[0], walls[2]]);
}
