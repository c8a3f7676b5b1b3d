//! A particle session: sampler, field, configuration, and random source.
//!
//! `Swarm` is what the windowing layer drives. Content changes go through
//! [`Swarm::set_content`], which rasterizes, samples, and only then touches
//! the field; a failure at any stage leaves the previous shape in place.
//! Ticks go through [`Swarm::tick`], which picks first-appearance damping
//! automatically for the configured number of ticks after creation.

use glam::DVec2;
use log::warn;
use particle_glyph_core::config::FieldConfig;
use particle_glyph_core::error::ParticleError;
use particle_glyph_core::pixel::{Raster, Rasterize};
use particle_glyph_core::prng::{RandomSource, Xorshift64};
use particle_glyph_sampler::{ContentCategory, ImageSampler, Target};

use crate::appearance::Appearance;
use crate::field::{ParticleField, Placement, TickInput};
use crate::particle::Drag;

/// A particle session.
#[derive(Debug, Clone)]
pub struct Swarm<R: RandomSource = Xorshift64> {
    config: FieldConfig,
    sampler: ImageSampler,
    field: ParticleField,
    canvas: DVec2,
    rng: R,
    ticks_since_creation: usize,
}

impl Swarm<Xorshift64> {
    /// Creates a session seeded from `config.seed`.
    pub fn new(config: FieldConfig, canvas: DVec2) -> Result<Self, ParticleError> {
        let rng = Xorshift64::new(config.seed);
        Self::with_rng(config, ImageSampler::default(), canvas, rng)
    }
}

impl<R: RandomSource> Swarm<R> {
    /// Creates a session with an explicit sampler and random source.
    pub fn with_rng(
        config: FieldConfig,
        sampler: ImageSampler,
        canvas: DVec2,
        rng: R,
    ) -> Result<Self, ParticleError> {
        config.validate()?;
        Ok(Self {
            config,
            sampler,
            field: ParticleField::new(),
            canvas,
            rng,
            ticks_since_creation: 0,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn sampler(&self) -> &ImageSampler {
        &self.sampler
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn canvas(&self) -> DVec2 {
        self.canvas
    }

    /// Updates the canvas size used to scatter particles on creation.
    pub fn set_canvas(&mut self, canvas: DVec2) {
        self.canvas = canvas;
    }

    /// Rasterizes `source`, samples it, and applies the targets.
    ///
    /// On error the particles keep their previous targets.
    pub fn set_content(
        &mut self,
        source: &dyn Rasterize,
        category: ContentCategory,
    ) -> Result<Placement, ParticleError> {
        let result = source
            .rasterize()
            .and_then(|raster| self.sample(&raster, category))
            .and_then(|targets| self.apply(&targets));
        if let Err(e) = &result {
            warn!("content change failed, keeping previous shape: {e}");
        }
        result
    }

    /// Samples `config.particle_count` targets from `raster`.
    pub fn sample(
        &mut self,
        raster: &Raster,
        category: ContentCategory,
    ) -> Result<Vec<Target>, ParticleError> {
        self.sampler
            .sample(raster, self.config.particle_count, category, &mut self.rng)
    }

    /// Initializes the field on first use, re-targets it afterwards.
    pub fn apply(&mut self, targets: &[Target]) -> Result<Placement, ParticleError> {
        let placement = self.field.initialize(targets, self.canvas, &mut self.rng)?;
        if placement == Placement::Initialized {
            self.ticks_since_creation = 0;
        }
        Ok(placement)
    }

    /// Whether the next automatic tick uses first-appearance damping.
    pub fn is_first_appearance(&self) -> bool {
        self.config.settle_on_first_appearance
            && self.field.is_initialized()
            && self.ticks_since_creation < self.config.first_appearance_ticks
    }

    /// Advances one tick, choosing the damping regime automatically.
    pub fn tick(&mut self, drag: Option<Drag>) {
        let input = TickInput {
            drag,
            first_frame: self.is_first_appearance(),
        };
        self.tick_with(&input);
    }

    /// Advances one tick with explicit input.
    pub fn tick_with(&mut self, input: &TickInput) {
        self.field.tick(input, &mut self.rng);
        if self.field.is_initialized() {
            self.ticks_since_creation = self.ticks_since_creation.saturating_add(1);
        }
    }

    /// Render attributes for every particle.
    pub fn appearances(&self) -> Vec<Appearance> {
        self.field.appearances().collect()
    }
}
