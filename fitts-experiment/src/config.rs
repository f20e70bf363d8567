use crate::error::ConfigError;
use fitts_core::Bounds;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub participant: String,
    /// Target radii in pixels.
    pub target_sizes: Vec<f64>,
    /// Nominal distances; they only size the plan.
    pub target_distances: Vec<f64>,
    pub directions: Vec<String>,
    pub repetitions_per_config: usize,
    /// Direction written to every record.
    pub direction_label: String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            participant: String::new(),
            target_sizes: vec![10.0, 20.0, 30.0, 40.0],
            target_distances: vec![100.0, 200.0, 300.0, 400.0],
            directions: vec!["left".to_string(), "right".to_string()],
            repetitions_per_config: 10,
            direction_label: "random".to_string(),
        }
    }
}

impl ExperimentConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn with_participant(mut self, participant: impl Into<String>) -> Self {
        self.participant = participant.into();
        self
    }

    /// |sizes| x |distances| x |directions| x repetitions, saturating at `usize::MAX`.
    pub fn total_trials(&self) -> usize {
        self.target_sizes
            .len()
            .saturating_mul(self.target_distances.len())
            .saturating_mul(self.directions.len())
            .saturating_mul(self.repetitions_per_config)
    }

    pub fn max_radius(&self) -> Option<f64> {
        self.target_sizes.iter().copied().reduce(f64::max)
    }

    /// Checks the configuration against the canvas it will run on.
    pub fn validate(&self, bounds: Bounds) -> Result<(), ConfigError> {
        if self.participant.trim().is_empty() {
            return Err(ConfigError::EmptyParticipant);
        }
        validate_sizes(&self.target_sizes)?;
        if self.target_distances.is_empty() {
            return Err(ConfigError::NoDistances);
        }
        if self.directions.is_empty() {
            return Err(ConfigError::NoDirections);
        }
        if self.repetitions_per_config == 0 {
            return Err(ConfigError::NoRepetitions);
        }
        let total = self.total_trials();
        if u32::try_from(total).is_err() {
            return Err(ConfigError::TooManyTrials(total));
        }
        if let Some(radius) = self.max_radius() {
            if !bounds.fits_radius(radius) {
                return Err(ConfigError::CanvasTooSmall {
                    radius,
                    width: bounds.width,
                    height: bounds.height,
                });
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_sizes(sizes: &[f64]) -> Result<(), ConfigError> {
    if sizes.is_empty() {
        return Err(ConfigError::NoTargetSizes);
    }
    // `!(s > 0.0)` also rejects NaN
    if let Some(&bad) = sizes.iter().find(|s| !(**s > 0.0)) {
        return Err(ConfigError::NonPositiveSize(bad));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Bounds {
        Bounds::new(1920.0, 1080.0)
    }

    #[test]
    fn test_default_plan_size() {
        let config = ExperimentConfig::default();
        assert_eq!(config.total_trials(), 320);
        assert_eq!(config.max_radius(), Some(40.0));
    }

    #[test]
    fn test_validation_errors() {
        let ok = ExperimentConfig::default().with_participant("P1");
        assert!(ok.validate(canvas()).is_ok());

        let c = ExperimentConfig::default();
        assert!(matches!(c.validate(canvas()), Err(ConfigError::EmptyParticipant)));

        let mut c = ok.clone();
        c.target_sizes.clear();
        assert!(matches!(c.validate(canvas()), Err(ConfigError::NoTargetSizes)));

        let mut c = ok.clone();
        c.target_sizes = vec![10.0, 0.0];
        assert!(matches!(c.validate(canvas()), Err(ConfigError::NonPositiveSize(s)) if s == 0.0));

        let mut c = ok.clone();
        c.target_sizes = vec![-5.0];
        assert!(matches!(c.validate(canvas()), Err(ConfigError::NonPositiveSize(_))));

        let mut c = ok.clone();
        c.target_distances.clear();
        assert!(matches!(c.validate(canvas()), Err(ConfigError::NoDistances)));

        let mut c = ok.clone();
        c.directions.clear();
        assert!(matches!(c.validate(canvas()), Err(ConfigError::NoDirections)));

        let mut c = ok.clone();
        c.repetitions_per_config = 0;
        assert!(matches!(c.validate(canvas()), Err(ConfigError::NoRepetitions)));

        // trial numbers are stored as u32
        let mut c = ok.clone();
        c.repetitions_per_config = usize::MAX;
        assert_eq!(c.total_trials(), usize::MAX);
        assert!(matches!(
            c.validate(canvas()),
            Err(ConfigError::TooManyTrials(n)) if n == usize::MAX
        ));

        assert!(matches!(
            ok.validate(Bounds::new(79.0, 500.0)),
            Err(ConfigError::CanvasTooSmall { radius, .. }) if radius == 40.0
        ));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c: ExperimentConfig =
            serde_json::from_str(r#"{"participant": "Person A", "repetitions_per_config": 2}"#)
                .unwrap();
        assert_eq!(c.participant, "Person A");
        assert_eq!(c.total_trials(), 64);
        assert_eq!(c.direction_label, "random");
    }

    #[test]
    fn test_load_reports_missing_file() {
        let err = ExperimentConfig::load(Path::new("/nonexistent/fitts.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
