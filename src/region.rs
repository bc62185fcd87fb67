use glam::DVec2;

use crate::{
  algebra::polygon_to_segments,
  common::{Tolerances, EPSILON},
  CollisionProcessor, Crossing, DetectorSegment, GeometryError, Segment,
  VisibilityContext,
};

/// Identifies a region within a [`RegionMap`].
pub type RegionId = usize;

/// A named set of walls, such as a room.
#[derive(Clone, PartialEq, Debug)]
pub struct Region {
  name: String,
  walls: Vec<Segment>,
}

impl Region {
  /// Creates a region, rejecting walls with no length.
  pub fn new(
    name: impl Into<String>,
    walls: Vec<Segment>,
  ) -> Result<Self, GeometryError> {
    if let Some(&segment) = walls.iter().find(|wall| wall.length() <= EPSILON)
    {
      return Err(GeometryError::DegenerateSegment { segment });
    }
    Ok(Self { name: name.into(), walls })
  }

  /// Creates a region walled in by the closed polygon through `points`.
  pub fn from_polygon(
    name: impl Into<String>,
    points: &[DVec2],
  ) -> Result<Self, GeometryError> {
    Self::new(name, polygon_to_segments(points))
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn walls(&self) -> &[Segment] {
    &self.walls
  }
}

/// A region as it appears in level data.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionConfig {
  pub name: String,
  pub walls: Vec<Segment>,
}

impl TryFrom<RegionConfig> for Region {
  type Error = GeometryError;

  fn try_from(config: RegionConfig) -> Result<Self, Self::Error> {
    Region::new(config.name, config.walls)
  }
}

impl From<Region> for RegionConfig {
  fn from(region: Region) -> Self {
    RegionConfig { name: region.name, walls: region.walls }
  }
}

/// A circle moving between regions.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Agent {
  pub position: DVec2,
  pub radius: f64,
  pub region: RegionId,
  previous_position: DVec2,
}

impl Agent {
  pub fn new(position: DVec2, radius: f64, region: RegionId) -> Self {
    Self { position, radius, region, previous_position: position }
  }

  /// The path the agent took on its last move.
  pub fn last_move(&self) -> Segment {
    Segment::new(self.previous_position, self.position)
  }
}

struct Border {
  detector: DetectorSegment,
  /// The region entered by crossing to the right of the detector.
  right: RegionId,
  /// The region entered by crossing to the left of the detector.
  left: RegionId,
}

/// Shows and hides regions as agents cross it.
struct DisplayDetector {
  detector: DetectorSegment,
  /// Only agents inside this region trip the detector.
  owner: RegionId,
  /// Shown when crossing to the left, hidden when crossing to the right.
  left: Vec<RegionId>,
  /// Shown when crossing to the right, hidden when crossing to the left.
  right: Vec<RegionId>,
}

/// Regions connected by borders. An agent collides with the walls of its own
/// region and of the visible regions next to it.
pub struct RegionMap {
  regions: Vec<Region>,
  visible: Vec<bool>,
  borders: Vec<Border>,
  displays: Vec<DisplayDetector>,
  /// One processor per region, rebuilt whenever the map changes.
  processors: Vec<CollisionProcessor>,
  tolerances: Tolerances,
}

impl Default for RegionMap {
  fn default() -> Self {
    Self::new()
  }
}

impl RegionMap {
  pub fn new() -> Self {
    Self::with_tolerances(Tolerances::default())
  }

  pub fn with_tolerances(tolerances: Tolerances) -> Self {
    Self {
      regions: Vec::new(),
      visible: Vec::new(),
      borders: Vec::new(),
      displays: Vec::new(),
      processors: Vec::new(),
      tolerances,
    }
  }

  /// Adds a (visible) region to the map.
  pub fn add_region(&mut self, region: Region) -> RegionId {
    self.regions.push(region);
    self.visible.push(true);
    self.rebuild_processors();
    self.regions.len() - 1
  }

  pub fn region(&self, id: RegionId) -> &Region {
    &self.regions[id]
  }

  pub fn region_count(&self) -> usize {
    self.regions.len()
  }

  /// Joins regions `a` and `b` along `border`. `b` lies to the left of the
  /// border (standing at its start looking at its end), `a` to the right.
  pub fn connect(&mut self, a: RegionId, b: RegionId, border: Segment) {
    self.borders.push(Border {
      detector: DetectorSegment::new(border),
      right: a,
      left: b,
    });
    self.rebuild_processors();
  }

  /// Adds a detector to region `owner` that toggles which regions are
  /// visible. An agent in `owner` crossing `segment` to its left shows the
  /// `left` regions and hides the `right` ones; crossing to the right does the
  /// opposite.
  pub fn add_display_detector(
    &mut self,
    owner: RegionId,
    segment: Segment,
    left: Vec<RegionId>,
    right: Vec<RegionId>,
  ) {
    self.displays.push(DisplayDetector {
      detector: DetectorSegment::new(segment),
      owner,
      left,
      right,
    });
  }

  /// Shows or hides a region. Hidden regions neither block sight nor
  /// (unless the agent is inside them) movement.
  pub fn set_visible(&mut self, id: RegionId, visible: bool) {
    if self.visible[id] != visible {
      self.visible[id] = visible;
      self.rebuild_processors();
    }
  }

  pub fn is_visible(&self, id: RegionId) -> bool {
    self.visible[id]
  }

  /// The regions sharing a border with `id`, in border order.
  pub fn neighbours(
    &self,
    id: RegionId,
  ) -> impl Iterator<Item = RegionId> + '_ {
    self.borders.iter().filter_map(move |border| {
      if border.left == id {
        Some(border.right)
      } else if border.right == id {
        Some(border.left)
      } else {
        None
      }
    })
  }

  /// The walls of every visible region.
  pub fn visible_segments(&self) -> Vec<Segment> {
    self
      .regions
      .iter()
      .zip(self.visible.iter())
      .filter(|(_, &visible)| visible)
      .flat_map(|(region, _)| region.walls.iter().copied())
      .collect()
  }

  /// The processor for agents inside region `id`.
  pub fn collision_processor(&self, id: RegionId) -> &CollisionProcessor {
    &self.processors[id]
  }

  /// Builds a visibility context over every visible region plus
  /// `extra_segments`.
  pub fn visibility_context(
    &self,
    extra_segments: &[Segment],
  ) -> VisibilityContext {
    VisibilityContext::with_tolerances(
      &self.visible_segments(),
      extra_segments,
      self.tolerances,
    )
  }

  /// Moves `agent` towards `destination`, sliding against the walls around
  /// it. Degenerate geometry leaves the agent where it was. If the move
  /// crosses a border of the agent's region, the agent enters the region on
  /// the other side, which is returned. Display detectors of the region the
  /// agent ends up in then update which regions are visible.
  pub fn move_agent(
    &mut self,
    agent: &mut Agent,
    destination: DVec2,
  ) -> Option<RegionId> {
    let resolved = self.processors[agent.region].process_or_stay(
      agent.position,
      destination,
      agent.radius,
    );
    agent.previous_position = agent.position;
    agent.position = resolved;

    let path = agent.last_move();
    let mut entered = None;
    for border in self.borders.iter_mut() {
      if border.left != agent.region && border.right != agent.region {
        continue;
      }
      let target = match border.detector.detect(&path) {
        Some(Crossing::Left) => border.left,
        Some(Crossing::Right) => border.right,
        None => continue,
      };
      if target != agent.region {
        entered = Some(target);
      }
    }

    if let Some(region) = entered {
      log::debug!(
        "Agent at {} entered region {region} ({})",
        agent.position,
        self.regions[region].name
      );
      agent.region = region;
    }

    let mut changed = false;
    for display in self.displays.iter_mut() {
      if display.owner != agent.region {
        continue;
      }
      let (shown, hidden) = match display.detector.detect(&path) {
        Some(Crossing::Left) => (&display.left, &display.right),
        Some(Crossing::Right) => (&display.right, &display.left),
        None => continue,
      };
      for &id in hidden {
        changed |= std::mem::replace(&mut self.visible[id], false);
      }
      for &id in shown {
        changed |= !std::mem::replace(&mut self.visible[id], true);
      }
    }
    if changed {
      log::debug!("Agent at {} changed the visible regions", agent.position);
      self.rebuild_processors();
    }
    entered
  }

  fn rebuild_processors(&mut self) {
    self.processors = (0..self.regions.len())
      .map(|id| {
        let mut walls = self.regions[id].walls.clone();
        for neighbour in self.neighbours(id) {
          if self.visible[neighbour] {
            walls.extend_from_slice(&self.regions[neighbour].walls);
          }
        }
        CollisionProcessor::with_tolerances(&walls, self.tolerances)
      })
      .collect();
  }
}

#[cfg(test)]
#[path = "region_test.rs"]
mod test;
