pub mod confetti;
pub mod render;

pub use confetti::{Confetti, Particle};
pub use render::{FrameStats, Scene, SkiaRenderer, continue_button};
