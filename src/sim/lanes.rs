//! Lane grid geometry
//!
//! The track is split into equal-width vertical corridors. Positions are fixed
//! for the life of a run.

use serde::{Deserialize, Serialize};

use crate::consts::{LANE_COUNT, TRACK_WIDTH};

/// Static lane layout across the track width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneGrid {
    lane_width: f32,
    centers: Vec<f32>,
}

impl Default for LaneGrid {
    fn default() -> Self {
        Self::new(TRACK_WIDTH, LANE_COUNT)
    }
}

impl LaneGrid {
    pub fn new(track_width: f32, lane_count: usize) -> Self {
        let lane_count = lane_count.max(1);
        let lane_width = track_width / lane_count as f32;
        let centers = (0..lane_count)
            .map(|i| i as f32 * lane_width + lane_width / 2.0)
            .collect();
        Self {
            lane_width,
            centers,
        }
    }

    pub fn lane_count(&self) -> usize {
        self.centers.len()
    }

    pub fn lane_width(&self) -> f32 {
        self.lane_width
    }

    /// Track width covered by all lanes
    pub fn track_width(&self) -> f32 {
        self.lane_width * self.lane_count() as f32
    }

    /// Center x of lane `i` (clamped to the last lane)
    pub fn lane_center(&self, lane: usize) -> f32 {
        self.centers[lane.min(self.centers.len() - 1)]
    }

    /// Highest start lane an entity `width_in_lanes` wide may occupy
    pub fn max_start_lane(&self, width_in_lanes: usize) -> usize {
        self.lane_count().saturating_sub(width_in_lanes.max(1))
    }

    /// Midpoint of the span starting at `start_lane`
    pub fn span_center(&self, start_lane: usize, width_in_lanes: usize) -> f32 {
        let last = start_lane + width_in_lanes.max(1) - 1;
        (self.lane_center(start_lane) + self.lane_center(last)) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centers() {
        let grid = LaneGrid::new(360.0, 6);
        assert_eq!(grid.lane_width(), 60.0);
        assert_eq!(grid.lane_center(0), 30.0);
        assert_eq!(grid.lane_center(5), 330.0);
    }

    #[test]
    fn test_max_start_lane() {
        let grid = LaneGrid::new(360.0, 6);
        assert_eq!(grid.max_start_lane(1), 5);
        assert_eq!(grid.max_start_lane(3), 3);
        assert_eq!(grid.max_start_lane(9), 0);
    }

    #[test]
    fn test_span_center() {
        let grid = LaneGrid::new(360.0, 6);
        // Lanes 2..=4 -> centers 150 and 270
        assert_eq!(grid.span_center(2, 3), 210.0);
        assert_eq!(grid.span_center(1, 1), grid.lane_center(1));
    }
}
