use crate::geometry::Point;
use serde::{Deserialize, Deserializer, Serialize};

/// One successfully acquired target, as persisted in the trial log.
///
/// Field order is the column order of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: u32,
    pub participant: String,
    pub circle_radius: f64,
    pub circle_center_x: f64,
    pub circle_center_y: f64,
    /// Seconds from the latest presentation of the target to the hit.
    pub time_taken: f64,
    /// Click-to-center distance of the final click.
    pub distance: f64,
    pub errors: u32,
    pub direction: String,
    #[serde(deserialize_with = "flexible_bool")]
    pub success: bool,
    /// Epoch seconds.
    pub start_time: f64,
}

impl TrialRecord {
    pub fn center(&self) -> Point {
        Point::new(self.circle_center_x, self.circle_center_y)
    }
}

// Some logs spell booleans `True`/`False`.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean value: {other:?}"
        ))),
    }
}
