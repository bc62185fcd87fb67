use glam::DVec2;

use crate::Collision;

/// Receives the intermediate results of collision and visibility queries,
/// e.g. to draw them. Every method does nothing by default.
pub trait DebugSink {
  /// A collision was found while resolving a move, whether or not it ends up
  /// being the closest.
  fn collision_candidate(&mut self, _collision: &Collision) {}

  /// The slide path computed for the closest collision, before it is
  /// re-checked against the walls.
  fn slide_path(&mut self, _path: &[DVec2]) {}

  /// A leg of the slide path hit another wall, cutting the slide short.
  fn slide_truncated(&mut self, _collision: &Collision) {}

  /// A vertex survived the line-of-sight filter. `clean` is true when its
  /// walls lie on both sides of the ray from the eye.
  fn visible_vertex(&mut self, _position: DVec2, _clean: bool) {}

  /// A ray glanced past `near` and was extended to `far`.
  fn extended_ray(&mut self, _near: DVec2, _far: DVec2) {}
}

/// Ignores everything.
impl DebugSink for () {}

/// Internal data produced while resolving a query.
#[derive(Clone, PartialEq, Debug)]
pub enum DebugData {
  CollisionCandidate(Collision),
  SlidePath(Vec<DVec2>),
  SlideTruncated(Collision),
  VisibleVertex { position: DVec2, clean: bool },
  ExtendedRay { near: DVec2, far: DVec2 },
}

/// Records every event in order.
impl DebugSink for Vec<DebugData> {
  fn collision_candidate(&mut self, collision: &Collision) {
    self.push(DebugData::CollisionCandidate(*collision));
  }

  fn slide_path(&mut self, path: &[DVec2]) {
    self.push(DebugData::SlidePath(path.to_vec()));
  }

  fn slide_truncated(&mut self, collision: &Collision) {
    self.push(DebugData::SlideTruncated(*collision));
  }

  fn visible_vertex(&mut self, position: DVec2, clean: bool) {
    self.push(DebugData::VisibleVertex { position, clean });
  }

  fn extended_ray(&mut self, near: DVec2, far: DVec2) {
    self.push(DebugData::ExtendedRay { near, far });
  }
}
