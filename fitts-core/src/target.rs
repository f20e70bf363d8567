use crate::geometry::{Point, distance, is_hit};
use serde::{Deserialize, Serialize};

/// A circular target presented to the participant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub radius: f64,
    pub center: Point,
}

impl Target {
    pub fn new(radius: f64, center: Point) -> Self {
        Self { radius, center }
    }

    pub fn contains(&self, point: Point) -> bool {
        is_hit(self.center, self.radius, point)
    }

    /// Distance from the click to the target center.
    pub fn click_distance(&self, point: Point) -> f64 {
        distance(point, self.center)
    }
}
