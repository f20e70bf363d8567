//! End-screen particles. Purely cosmetic; nothing here feeds back into a session.

use rand::Rng;
use rand::seq::IndexedRandom;
use std::time::Duration;

const PALETTE: [[u8; 4]; 6] = [
    [230, 57, 70, 255],
    [255, 183, 3, 255],
    [42, 157, 143, 255],
    [69, 123, 157, 255],
    [155, 93, 229, 255],
    [241, 91, 181, 255],
];

/// px/s^2
const GRAVITY: f32 = 240.0;
const TERMINAL_VELOCITY: f32 = 320.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub size: f32,
    pub color: [u8; 4],
}

#[derive(Debug, Default)]
pub struct Confetti {
    particles: Vec<Particle>,
    width: f32,
    height: f32,
    active: bool,
}

impl Confetti {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scatters `count` particles above the top edge of a `width` x `height` area.
    pub fn start<R: Rng + ?Sized>(&mut self, width: f32, height: f32, count: usize, rng: &mut R) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
        self.particles = (0..count)
            .map(|_| {
                let size = rng.random_range(4.0..10.0);
                Particle {
                    x: rng.random_range(0.0..self.width),
                    y: -rng.random_range(0.0..self.height),
                    vx: rng.random_range(-40.0..40.0),
                    vy: rng.random_range(20.0..120.0),
                    size,
                    color: *PALETTE.choose(rng).unwrap_or(&PALETTE[0]),
                }
            })
            .collect();
        self.active = true;
    }

    /// Advances every particle by `dt`. Particles leaving the bottom re-enter at the top.
    pub fn step(&mut self, dt: Duration) {
        if !self.active {
            return;
        }
        let dt = dt.as_secs_f32();
        for p in &mut self.particles {
            p.vy = (p.vy + GRAVITY * dt).min(TERMINAL_VELOCITY);
            p.x = (p.x + p.vx * dt).rem_euclid(self.width);
            p.y += p.vy * dt;
            if p.y > self.height {
                p.y = -p.size;
            }
        }
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.particles.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
