use crate::config::ExperimentConfig;
use rand::Rng;
use rand::seq::SliceRandom;

/// One cell of the size x distance x direction cross product.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialCondition {
    pub size: f64,
    pub distance: f64,
    pub direction: String,
}

/// Shuffled presentation order of the configured conditions.
///
/// The plan determines how many trials a session runs. Target placement does
/// not consult the distance or direction of a condition.
#[derive(Debug, Clone)]
pub struct TrialPlan {
    pub conditions: Vec<TrialCondition>,
    pub repetitions: usize,
}

impl TrialPlan {
    pub fn new<R: Rng>(config: &ExperimentConfig, rng: &mut R) -> Self {
        let mut conditions = Vec::with_capacity(
            config.target_sizes.len() * config.target_distances.len() * config.directions.len(),
        );
        for &size in &config.target_sizes {
            for &distance in &config.target_distances {
                for direction in &config.directions {
                    conditions.push(TrialCondition {
                        size,
                        distance,
                        direction: direction.clone(),
                    });
                }
            }
        }
        conditions.shuffle(rng);

        Self {
            conditions,
            repetitions: config.repetitions_per_config,
        }
    }

    pub fn total_trials(&self) -> usize {
        self.conditions.len() * self.repetitions
    }
}
