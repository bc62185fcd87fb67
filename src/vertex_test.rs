use glam::DVec2;

use super::*;

fn seg(start: (f64, f64), end: (f64, f64)) -> Segment {
  Segment::new(DVec2::new(start.0, start.1), DVec2::new(end.0, end.1))
}

#[test]
fn shared_endpoints_merge() {
  let segments = [
    seg((0.0, 0.0), (10.0, 0.0)),
    seg((10.0, 0.0), (10.0, 10.0)),
    seg((10.0, 10.0), (0.0, 0.0)),
  ];
  let vertices = build_vertices(&segments);

  assert_eq!(vertices.len(), 3);
  assert_eq!(vertices[0].position(), DVec2::new(0.0, 0.0));
  assert_eq!(
    vertices[0].neighbours(),
    &[DVec2::new(10.0, 0.0), DVec2::new(10.0, 10.0)]
  );
  assert_eq!(vertices[0].segments(), &[0, 2]);

  assert_eq!(vertices[1].position(), DVec2::new(10.0, 0.0));
  assert_eq!(
    vertices[1].neighbours(),
    &[DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0)]
  );
  assert_eq!(vertices[1].segments(), &[0, 1]);

  assert_eq!(vertices[2].position(), DVec2::new(10.0, 10.0));
  assert_eq!(vertices[2].segments(), &[1, 2]);
}

#[test]
fn negative_zero_merges_with_zero() {
  let vertices = build_vertices(&[
    seg((0.0, 0.0), (1.0, 0.0)),
    seg((-0.0, -0.0), (0.0, 1.0)),
  ]);
  assert_eq!(vertices.len(), 3);
  assert_eq!(vertices[0].segments(), &[0, 1]);
}

#[test]
fn nearby_endpoints_stay_separate() {
  let vertices = build_vertices(&[
    seg((0.0, 0.0), (1.0, 0.0)),
    seg((1.0 + 1e-12, 0.0), (1.0, 1.0)),
  ]);
  assert_eq!(vertices.len(), 4);
}

#[test]
fn every_vertex_has_a_neighbour() {
  let vertices = build_vertices(&[
    seg((0.0, 0.0), (1.0, 0.0)),
    seg((5.0, 5.0), (6.0, 7.0)),
  ]);
  assert_eq!(vertices.len(), 4);
  for vertex in &vertices {
    assert_eq!(vertex.neighbours().len(), 1);
    assert_eq!(vertex.segments().len(), 1);
  }
}

#[test]
fn between_any_neighbour_checks_each_wall() {
  let vertices = build_vertices(&[
    seg((0.0, 0.0), (10.0, 0.0)),
    seg((0.0, 0.0), (0.0, 10.0)),
  ]);
  let corner = &vertices[0];
  assert!(corner.between_any_neighbour(DVec2::new(5.0, 0.005), 0.01));
  assert!(corner.between_any_neighbour(DVec2::new(0.0, 7.0), 0.01));
  assert!(!corner.between_any_neighbour(DVec2::new(5.0, 5.0), 0.01));
  assert!(!corner.between_any_neighbour(DVec2::new(0.0, 11.0), 0.01));
}
