//! Line of sight and sliding movement for circles among static 2D walls.
//!
//! Walls are plain [`Segment`]s. A [`VisibilityContext`] computes the polygon
//! visible from an eye position, and a [`CollisionProcessor`] moves a circle
//! towards a destination, stopping at or sliding along the walls it runs
//! into. A [`RegionMap`] ties both together for levels split into rooms.

mod algebra;
mod collision;
mod common;
mod debug;
mod detector;
mod error;
mod region;
mod vertex;
mod visibility;

pub use algebra::{
  angle_between, angle_normalize, angle_of, polygon_contains,
  polygon_to_segments, solve_2, solve_quadratic, to_length, unit_vector_at,
  Circle, Line, Segment,
};
pub use collision::{
  edge_collision, vertex_collision, Collision, CollisionKind,
  CollisionProcessor,
};
pub use common::{
  determinant, time_to_intersect_lines, Tolerances, DISCRIMINANT_EPSILON,
  EPSILON,
};
pub use debug::{DebugData, DebugSink};
pub use detector::{Crossing, DetectorSegment};
pub use error::{GeometryError, HintShape, VisibilityAmbiguityError};
pub use region::{Agent, Region, RegionConfig, RegionId, RegionMap};
pub use vertex::{build_vertices, Vertex};
pub use visibility::{VisibilityContext, VisiblePoint};

#[cfg(test)]
#[path = "lib_test.rs"]
mod test;
