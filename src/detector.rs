use crate::{common::EPSILON, Segment};

/// The side of a detector segment a path heads towards, as seen standing at
/// the segment's start looking at its end.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Crossing {
  Left,
  Right,
}

/// An invisible segment that reports paths crossing it, e.g. the border
/// between two regions.
#[derive(Clone, Debug)]
pub struct DetectorSegment {
  segment: Segment,
  /// The side a previous path was heading towards when it stopped exactly on
  /// the segment.
  pending: Option<Crossing>,
}

impl DetectorSegment {
  pub fn new(segment: Segment) -> Self {
    Self { segment, pending: None }
  }

  pub fn segment(&self) -> Segment {
    self.segment
  }

  /// Checks whether `path` crosses the segment and which way. A path ending
  /// exactly on the segment does not count yet; the crossing is reported by
  /// the next path leaving the segment, as long as it keeps heading to the
  /// same side. Paths lying along the segment are ignored.
  pub fn detect(&mut self, path: &Segment) -> Option<Crossing> {
    let starts_on = self.segment.is_aligned(path.start, EPSILON);
    let ends_on = self.segment.is_aligned(path.end, EPSILON);
    if (starts_on && ends_on) || !self.segment.intersects(path) {
      return None;
    }

    let side = if self.segment.direction().perp().dot(path.direction()) > 0.0
    {
      Crossing::Left
    } else {
      Crossing::Right
    };

    if starts_on {
      self.pending.take().filter(|&pending| pending == side)
    } else if ends_on {
      self.pending = Some(side);
      None
    } else {
      Some(side)
    }
  }
}

#[cfg(test)]
#[path = "detector_test.rs"]
mod test;
