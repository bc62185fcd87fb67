use std::collections::HashMap;

use glam::DVec2;

use crate::Segment;

/// A position shared by the endpoints of one or more walls.
#[derive(Clone, PartialEq, Debug)]
pub struct Vertex {
  position: DVec2,
  /// The far end of each wall touching this vertex, in wall order.
  neighbours: Vec<DVec2>,
  /// Indices of the walls touching this vertex.
  segments: Vec<usize>,
}

impl Vertex {
  pub fn position(&self) -> DVec2 {
    self.position
  }

  pub fn neighbours(&self) -> &[DVec2] {
    &self.neighbours
  }

  pub fn segments(&self) -> &[usize] {
    &self.segments
  }

  /// Whether `point` lies (within `tolerance`) on one of the walls leaving
  /// this vertex.
  pub fn between_any_neighbour(&self, point: DVec2, tolerance: f64) -> bool {
    self.neighbours.iter().any(|&neighbour| {
      Segment::new(self.position, neighbour).nearly_contains(point, tolerance)
    })
  }
}

/// Merges the endpoints of `segments` into vertices. Endpoints merge only when
/// their coordinates are exactly equal (`-0.0` and `0.0` are the same). Every
/// segment is expected to have a non-zero length.
pub fn build_vertices(segments: &[Segment]) -> Vec<Vertex> {
  let mut vertices: Vec<Vertex> = Vec::new();
  let mut index_by_position = HashMap::new();

  for (segment_index, segment) in segments.iter().enumerate() {
    for (position, neighbour) in
      [(segment.start, segment.end), (segment.end, segment.start)]
    {
      let vertex_index =
        *index_by_position.entry(position_key(position)).or_insert_with(|| {
          vertices.push(Vertex {
            position,
            neighbours: Vec::new(),
            segments: Vec::new(),
          });
          vertices.len() - 1
        });

      let vertex = &mut vertices[vertex_index];
      vertex.neighbours.push(neighbour);
      vertex.segments.push(segment_index);
    }
  }

  vertices
}

fn position_key(position: DVec2) -> (u64, u64) {
  // Adding zero turns -0.0 into 0.0.
  ((position.x + 0.0).to_bits(), (position.y + 0.0).to_bits())
}

#[cfg(test)]
#[path = "vertex_test.rs"]
mod test;
