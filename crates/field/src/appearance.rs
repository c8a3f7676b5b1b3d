//! Depth-derived rendering attributes.
//!
//! The renderer is external, but the mapping from depth to size and opacity
//! is part of the contract: near particles (z = 0) are large and opaque, far
//! ones (z = 1) small and faint.

use particle_glyph_core::Srgb;
use serde::Serialize;

use crate::particle::Particle;

pub const MAX_SIZE: f64 = 4.0;
pub const MIN_SIZE: f64 = 1.0;
pub const MAX_OPACITY: f64 = 0.9;
pub const MIN_OPACITY: f64 = 0.2;

/// `MAX_SIZE - (MAX_SIZE - MIN_SIZE) * z`
pub fn size_scale(z: f64) -> f64 {
    MAX_SIZE - (MAX_SIZE - MIN_SIZE) * z
}

/// `MAX_OPACITY - (MAX_OPACITY - MIN_OPACITY) * z`
pub fn opacity(z: f64) -> f64 {
    MAX_OPACITY - (MAX_OPACITY - MIN_OPACITY) * z
}

/// What a renderer needs to paint one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Appearance {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub opacity: f64,
    pub color: Srgb,
}

impl From<&Particle> for Appearance {
    fn from(p: &Particle) -> Self {
        Self {
            x: p.x,
            y: p.y,
            size: size_scale(p.z),
            opacity: opacity(p.z),
            color: p.color,
        }
    }
}
