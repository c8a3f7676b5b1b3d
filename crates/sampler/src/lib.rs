#![deny(unsafe_code)]
//! Image sampler: turns a rasterized glyph, icon, or drawable into target
//! points for the particle field.
//!
//! Each target is drawn uniformly from the pixels whose alpha reaches the
//! threshold (128 by default). Its world position is the pixel coordinate
//! plus the raster's placement offset, its color is the un-premultiplied
//! pixel color, and its depth comes from brightness: dark ink reads as
//! nearer, so `depth = min(1, (1 - brightness) * multiplier)`.
//!
//! Sampling counts the opaque pixels first, draws a rank in that count for
//! each target, then resolves all ranks to coordinates in one more scan.
//! That gives the same distribution as rejection sampling over the whole
//! buffer, needs memory only for the targets, and always terminates: a
//! buffer with no opaque pixel fails with [`ParticleError::EmptySource`]
//! instead of spinning.

use std::fmt;
use std::str::FromStr;

use log::debug;
use particle_glyph_core::error::ParticleError;
use particle_glyph_core::pixel::{PixelBuffer, Raster};
use particle_glyph_core::prng::RandomSource;
use particle_glyph_core::Srgb;
use serde::{Deserialize, Serialize};

/// Minimum alpha for a pixel to be sampled.
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;
/// Depth exaggeration for text and symbol content.
pub const TEXT_DEPTH_MULTIPLIER: f64 = 1.5;
/// Depth multiplier for everything else.
pub const DEFAULT_DEPTH_MULTIPLIER: f64 = 1.0;

/// What kind of content a raster was produced from.
///
/// Only used to pick the depth multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Text,
    Symbol,
    Drawable,
}

impl ContentCategory {
    /// Text and symbols get exaggerated depth separation.
    pub fn is_text_like(self) -> bool {
        matches!(self, ContentCategory::Text | ContentCategory::Symbol)
    }

    pub fn name(self) -> &'static str {
        match self {
            ContentCategory::Text => "text",
            ContentCategory::Symbol => "symbol",
            ContentCategory::Drawable => "drawable",
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentCategory {
    type Err = ParticleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ContentCategory::Text),
            "symbol" => Ok(ContentCategory::Symbol),
            "drawable" => Ok(ContentCategory::Drawable),
            other => Err(ParticleError::InvalidConfig(format!(
                "unknown content category '{other}' (expected text, symbol, or drawable)"
            ))),
        }
    }
}

/// A point a particle is pulled toward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub x: f64,
    pub y: f64,
    /// Nearness proxy in [0, 1]; 0 is nearest.
    pub depth: f64,
    pub color: Srgb,
}

/// Sampling tunables. Defaults reproduce the reference look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub alpha_threshold: u8,
    pub text_depth_multiplier: f64,
    pub default_depth_multiplier: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            text_depth_multiplier: TEXT_DEPTH_MULTIPLIER,
            default_depth_multiplier: DEFAULT_DEPTH_MULTIPLIER,
        }
    }
}

impl SamplerConfig {
    pub fn depth_multiplier(&self, category: ContentCategory) -> f64 {
        if category.is_text_like() {
            self.text_depth_multiplier
        } else {
            self.default_depth_multiplier
        }
    }
}

/// Draws target points from rasters.
#[derive(Debug, Clone, Default)]
pub struct ImageSampler {
    config: SamplerConfig,
}

impl ImageSampler {
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Draws `count` targets from the opaque pixels of `raster`.
    ///
    /// Duplicates are expected for small glyphs. Returns
    /// `InvalidParticleCount` for a zero count, `InvalidDimensions` for an
    /// empty buffer, and `EmptySource` when no pixel reaches the alpha
    /// threshold.
    pub fn sample<R: RandomSource + ?Sized>(
        &self,
        raster: &Raster,
        count: usize,
        category: ContentCategory,
        rng: &mut R,
    ) -> Result<Vec<Target>, ParticleError> {
        if count == 0 {
            return Err(ParticleError::InvalidParticleCount);
        }
        let pixels = &raster.pixels;
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(ParticleError::InvalidDimensions);
        }

        let threshold = self.config.alpha_threshold;
        let opaque = pixels.data().chunks_exact(4).filter(|px| px[3] >= threshold).count();
        if opaque == 0 {
            return Err(ParticleError::EmptySource);
        }
        debug!(
            "sampling {count} targets from {opaque} opaque of {} pixels ({category})",
            pixels.width() * pixels.height()
        );

        let ranks: Vec<usize> = (0..count).map(|_| rng.next_usize(opaque)).collect();
        let multiplier = self.config.depth_multiplier(category);
        let (ox, oy) = raster.offset;
        let targets = locate_ranks(pixels, threshold, &ranks)
            .into_iter()
            .map(|(px, py)| {
                let color = pixels.color(px, py);
                Target {
                    x: px as f64 + ox,
                    y: py as f64 + oy,
                    depth: depth_for(color, multiplier),
                    color,
                }
            })
            .collect();
        Ok(targets)
    }
}

/// Depth from brightness: `min(1, (1 - brightness) * multiplier)`.
pub fn depth_for(color: Srgb, multiplier: f64) -> f64 {
    ((1.0 - color.brightness()) * multiplier).clamp(0.0, 1.0)
}

/// Maps each rank to the coordinates of the opaque pixel at that position in
/// row-major order. Output order follows `ranks`.
fn locate_ranks(pixels: &PixelBuffer, threshold: u8, ranks: &[usize]) -> Vec<(usize, usize)> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_unstable_by_key(|&slot| ranks[slot]);

    let w = pixels.width();
    let mut located = vec![(0, 0); ranks.len()];
    let mut pending = order.iter().peekable();
    let opaque = pixels
        .data()
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[3] >= threshold)
        .map(|(i, _)| i)
        .enumerate();
    for (rank, i) in opaque {
        while let Some(&&slot) = pending.peek() {
            if ranks[slot] != rank {
                break;
            }
            located[slot] = (i % w, i / w);
            pending.next();
        }
        if pending.peek().is_none() {
            break;
        }
    }
    located
}
