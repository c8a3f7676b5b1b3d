#![deny(unsafe_code)]
//! Core types shared by the particle-glyph sampler and simulator.
//!
//! Provides `ParticleError`, the `Srgb` color type, RGBA8 `PixelBuffer`s and
//! the `Rasterize` capability, the injectable `RandomSource` with its default
//! `Xorshift64`, session configuration, and JSON parameter helpers.

pub mod color;
pub mod config;
pub mod error;
pub mod params;
pub mod pixel;
pub mod prng;

pub use color::Srgb;
pub use config::FieldConfig;
pub use error::ParticleError;
pub use pixel::{AlphaMode, PixelBuffer, Raster, Rasterize};
pub use prng::{RandomSource, Xorshift64};
