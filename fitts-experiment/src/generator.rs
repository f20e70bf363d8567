use crate::config::validate_sizes;
use crate::error::ConfigError;
use fitts_core::{Bounds, Point, Target};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Produces targets fully visible on the canvas.
pub struct TargetGenerator<R: Rng> {
    rng: R,
}

impl<R: Rng> TargetGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Picks a radius from `sizes` and a pixel-grid center inset by that radius.
    pub fn next_target(&mut self, sizes: &[f64], bounds: Bounds) -> Result<Target, ConfigError> {
        validate_sizes(sizes)?;
        let radius = *sizes.choose(&mut self.rng).ok_or(ConfigError::NoTargetSizes)?;

        let x = self.coordinate(radius, bounds.width).ok_or_else(|| too_small(radius, bounds))?;
        let y = self.coordinate(radius, bounds.height).ok_or_else(|| too_small(radius, bounds))?;

        Ok(Target::new(radius, Point::new(x, y)))
    }

    fn coordinate(&mut self, radius: f64, extent: f64) -> Option<f64> {
        let lo = radius.ceil() as i64;
        let hi = (extent - radius).floor() as i64;
        if hi < lo {
            return None;
        }
        Some(self.rng.random_range(lo..=hi) as f64)
    }
}

fn too_small(radius: f64, bounds: Bounds) -> ConfigError {
    ConfigError::CanvasTooSmall {
        radius,
        width: bounds.width,
        height: bounds.height,
    }
}
