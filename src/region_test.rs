use glam::DVec2;

use super::*;

fn seg(start: (f64, f64), end: (f64, f64)) -> Segment {
  Segment::new(DVec2::new(start.0, start.1), DVec2::new(end.0, end.1))
}

/// Two rooms side by side, joined by a doorway from (10, 4) to (10, 6).
fn two_rooms() -> (RegionMap, RegionId, RegionId) {
  let west = Region::new(
    "west",
    vec![
      seg((0.0, 0.0), (10.0, 0.0)),
      seg((10.0, 0.0), (10.0, 4.0)),
      seg((10.0, 6.0), (10.0, 10.0)),
      seg((10.0, 10.0), (0.0, 10.0)),
      seg((0.0, 10.0), (0.0, 0.0)),
    ],
  )
  .unwrap();
  let east = Region::new(
    "east",
    vec![
      seg((10.0, 0.0), (20.0, 0.0)),
      seg((20.0, 0.0), (20.0, 10.0)),
      seg((20.0, 10.0), (10.0, 10.0)),
    ],
  )
  .unwrap();

  let mut map = RegionMap::new();
  let west = map.add_region(west);
  let east = map.add_region(east);
  // Heading down the doorway, east is on the left.
  map.connect(west, east, seg((10.0, 6.0), (10.0, 4.0)));
  (map, west, east)
}

#[test]
fn degenerate_walls_are_rejected() {
  let wall = seg((1.0, 1.0), (1.0, 1.0));
  assert_eq!(
    Region::new("broken", vec![seg((0.0, 0.0), (1.0, 0.0)), wall]),
    Err(GeometryError::DegenerateSegment { segment: wall })
  );
}

#[test]
fn region_from_polygon() {
  let region = Region::from_polygon(
    "square",
    &[
      DVec2::new(0.0, 0.0),
      DVec2::new(1.0, 0.0),
      DVec2::new(1.0, 1.0),
      DVec2::new(0.0, 1.0),
    ],
  )
  .unwrap();
  assert_eq!(region.name(), "square");
  assert_eq!(region.walls().len(), 4);
  assert_eq!(region.walls()[3], seg((0.0, 1.0), (0.0, 0.0)));
}

#[test]
fn region_config_converts_both_ways() {
  let config = RegionConfig {
    name: "hall".into(),
    walls: vec![seg((0.0, 0.0), (5.0, 0.0))],
  };
  let region = Region::try_from(config.clone()).unwrap();
  assert_eq!(region.walls(), &config.walls[..]);
  assert_eq!(RegionConfig::from(region), config);

  let broken = RegionConfig {
    name: "broken".into(),
    walls: vec![seg((2.0, 2.0), (2.0, 2.0))],
  };
  assert!(Region::try_from(broken).is_err());
}

#[cfg(feature = "serde")]
#[test]
fn region_config_loads_from_json() {
  let config: RegionConfig = serde_json::from_str(
    r#"{
      "name": "hall",
      "walls": [{ "start": [0.0, 0.0], "end": [5.0, 0.0] }]
    }"#,
  )
  .unwrap();
  assert_eq!(
    config,
    RegionConfig {
      name: "hall".into(),
      walls: vec![seg((0.0, 0.0), (5.0, 0.0))],
    }
  );

  let json = serde_json::to_string(&config).unwrap();
  assert_eq!(serde_json::from_str::<RegionConfig>(&json).unwrap(), config);
}

#[test]
fn agent_last_move() {
  let agent = Agent::new(DVec2::new(1.0, 2.0), 0.5, 0);
  assert_eq!(
    agent.last_move(),
    Segment::new(DVec2::new(1.0, 2.0), DVec2::new(1.0, 2.0))
  );
}

#[test]
fn neighbours_are_symmetric() {
  let (map, west, east) = two_rooms();
  assert_eq!(map.region_count(), 2);
  assert_eq!(map.neighbours(west).collect::<Vec<_>>(), vec![east]);
  assert_eq!(map.neighbours(east).collect::<Vec<_>>(), vec![west]);
}

#[test]
fn processors_include_visible_neighbours() {
  let (mut map, west, east) = two_rooms();
  assert_eq!(map.collision_processor(west).segments().len(), 8);
  assert_eq!(map.collision_processor(east).segments().len(), 8);
  assert_eq!(map.visible_segments().len(), 8);

  map.set_visible(east, false);
  assert!(!map.is_visible(east));
  assert_eq!(map.collision_processor(west).segments().len(), 5);
  // The hidden region still collides with its own walls.
  assert_eq!(map.collision_processor(east).segments().len(), 8);
  assert_eq!(map.visible_segments().len(), 5);
  assert_eq!(map.visibility_context(&[]).segments().len(), 5);
  assert_eq!(
    map
      .visibility_context(&[seg((30.0, 0.0), (30.0, 10.0))])
      .segments()
      .len(),
    6
  );
}

#[test]
fn walking_through_doorway_changes_region() {
  let (mut map, west, east) = two_rooms();
  let mut agent = Agent::new(DVec2::new(8.0, 5.0), 0.5, west);

  assert_eq!(map.move_agent(&mut agent, DVec2::new(12.0, 5.0)), Some(east));
  assert_eq!(agent.position, DVec2::new(12.0, 5.0));
  assert_eq!(agent.region, east);
  assert_eq!(
    agent.last_move(),
    Segment::new(DVec2::new(8.0, 5.0), DVec2::new(12.0, 5.0))
  );

  assert_eq!(map.move_agent(&mut agent, DVec2::new(8.0, 5.5)), Some(west));
  assert_eq!(agent.region, west);
}

#[test]
fn walls_stop_agent_inside_region() {
  let (mut map, west, _) = two_rooms();
  let mut agent = Agent::new(DVec2::new(5.0, 5.0), 0.5, west);

  assert_eq!(map.move_agent(&mut agent, DVec2::new(5.0, 20.0)), None);
  assert!((agent.position - DVec2::new(5.0, 9.5)).length() < 1e-9);
  assert_eq!(agent.region, west);

  // The wall beside the doorway blocks too.
  let mut agent = Agent::new(DVec2::new(5.0, 5.0), 0.5, west);
  assert_eq!(map.move_agent(&mut agent, DVec2::new(15.0, 8.0)), None);
  assert!(agent.position.x < 10.0);
  assert_eq!(agent.region, west);
}

#[test]
fn stopping_in_doorway_enters_on_next_move() {
  let (mut map, west, east) = two_rooms();
  let mut agent = Agent::new(DVec2::new(8.0, 5.0), 0.5, west);

  assert_eq!(map.move_agent(&mut agent, DVec2::new(10.0, 5.0)), None);
  assert_eq!(agent.region, west);
  assert_eq!(map.move_agent(&mut agent, DVec2::new(11.0, 5.0)), Some(east));
  assert_eq!(agent.region, east);
}

#[test]
fn display_detectors_toggle_visible_regions() {
  let (mut map, west, east) = two_rooms();
  map.set_visible(east, false);
  // Heading down the middle of the west room, +x is on the left.
  let line = seg((5.0, 10.0), (5.0, 0.0));
  map.add_display_detector(west, line, vec![east], vec![]);
  // Owned by the other region, so agents in the west room never trip it.
  map.add_display_detector(east, line, vec![], vec![east]);

  let mut agent = Agent::new(DVec2::new(3.0, 5.0), 0.5, west);
  assert_eq!(map.move_agent(&mut agent, DVec2::new(7.0, 5.0)), None);
  assert!(map.is_visible(east));
  assert_eq!(map.collision_processor(west).segments().len(), 8);

  assert_eq!(map.move_agent(&mut agent, DVec2::new(3.0, 5.0)), None);
  assert!(!map.is_visible(east));
  assert_eq!(map.collision_processor(west).segments().len(), 5);

  // Moves that stay on one side change nothing.
  assert_eq!(map.move_agent(&mut agent, DVec2::new(2.0, 6.0)), None);
  assert!(!map.is_visible(east));
}
