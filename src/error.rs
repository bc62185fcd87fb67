use glam::DVec2;
use thiserror::Error;

use crate::Segment;

/// Geometry that should not occur in a well-formed wall set. Unlike a missed
/// intersection, which is a normal `None`, these signal a bug or broken
/// input.
#[derive(Error, Clone, Copy, PartialEq, Debug)]
pub enum GeometryError {
  #[error("wall from {} to {} has no length", .segment.start, .segment.end)]
  DegenerateSegment { segment: Segment },
  #[error(
    "tangent lines around vertex {vertex} do not meet when sliding along \
     {direction}"
  )]
  ParallelTangents { vertex: DVec2, direction: DVec2 },
  #[error("cannot place the sliding circle on the arc around vertex {vertex}")]
  SingularSlide { vertex: DVec2 },
}

/// What the visibility sweep last hit, as reported in errors.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum HintShape {
  Vertex(DVec2),
  Segment(Segment),
}

impl std::fmt::Display for HintShape {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      HintShape::Vertex(position) => write!(f, "vertex {position}"),
      HintShape::Segment(segment) => {
        write!(f, "wall from {} to {}", segment.start, segment.end)
      }
    }
  }
}

/// The visibility sweep glanced past `vertex` but could not tell whether the
/// polygon reaches the near point or the far point first, because neither
/// touches what the previous step hit.
#[derive(Error, Clone, Copy, PartialEq, Debug)]
#[error(
  "ambiguous visibility ordering from {eye} at vertex {vertex}: {hint} \
   touches neither {near} nor {far}"
)]
pub struct VisibilityAmbiguityError {
  pub eye: DVec2,
  pub vertex: DVec2,
  pub hint: HintShape,
  pub near: DVec2,
  pub far: DVec2,
}
