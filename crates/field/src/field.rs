//! The particle collection and its three operations: initialize, retarget,
//! and tick.
//!
//! The particle count is fixed by the first `initialize` and never changes.
//! Re-targeting only overwrites `base_x`, `base_y`, `z`, and `color`, so
//! motion carries over smoothly when the content changes.

use glam::DVec2;
use log::debug;
use particle_glyph_core::error::ParticleError;
use particle_glyph_core::prng::RandomSource;
use particle_glyph_sampler::Target;

use crate::appearance::Appearance;
use crate::particle::{Drag, Particle, MAX_DENSITY, MIN_DENSITY};

/// Per-tick input from the event layer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub drag: Option<Drag>,
    /// Use first-appearance damping for this tick.
    pub first_frame: bool,
}

/// How a set of targets was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Particles were created and scattered.
    Initialized,
    /// Existing particles got new targets.
    Retargeted,
}

/// Fixed-size particle collection.
#[derive(Debug, Clone, Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// An empty field awaiting its first targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// A field with pre-built particles, e.g. a restored snapshot.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    pub fn is_initialized(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to particle state. The slice cannot change the count.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Render attributes for every particle, in index order.
    pub fn appearances(&self) -> impl Iterator<Item = Appearance> + '_ {
        self.particles.iter().map(Appearance::from)
    }

    /// Creates one particle per target, scattered so they visibly fly in.
    ///
    /// Start positions are uniform in `[-w, 2w] x [0, 2h]` for a canvas of
    /// `w x h`; density is uniform in [5, 20); velocity starts at zero. If
    /// the field already has particles this re-targets them instead.
    pub fn initialize<R: RandomSource + ?Sized>(
        &mut self,
        targets: &[Target],
        canvas: DVec2,
        rng: &mut R,
    ) -> Result<Placement, ParticleError> {
        if targets.is_empty() {
            return Err(ParticleError::NoTargets);
        }
        if self.is_initialized() {
            self.retarget(targets)?;
            return Ok(Placement::Retargeted);
        }

        self.particles = targets
            .iter()
            .map(|t| {
                let density = rng.next_range(MIN_DENSITY, MAX_DENSITY);
                let x = rng.next_range(-canvas.x, 2.0 * canvas.x);
                let y = rng.next_range(0.0, 2.0 * canvas.y);
                Particle {
                    x,
                    y,
                    base_x: t.x,
                    base_y: t.y,
                    density,
                    z: t.depth,
                    color: t.color,
                    velocity_x: 0.0,
                    velocity_y: 0.0,
                }
            })
            .collect();
        debug!(
            "initialized {} particles on a {}x{} canvas",
            self.particles.len(),
            canvas.x,
            canvas.y
        );
        Ok(Placement::Initialized)
    }

    /// Points every particle at `targets[i % targets.len()]`.
    ///
    /// Position and velocity are left untouched.
    pub fn retarget(&mut self, targets: &[Target]) -> Result<(), ParticleError> {
        if targets.is_empty() {
            return Err(ParticleError::NoTargets);
        }
        for (p, t) in self.particles.iter_mut().zip(targets.iter().cycle()) {
            p.base_x = t.x;
            p.base_y = t.y;
            p.z = t.depth;
            p.color = t.color;
        }
        debug!(
            "retargeted {} particles from {} targets",
            self.particles.len(),
            targets.len()
        );
        Ok(())
    }

    /// Advances every particle by one tick.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, input: &TickInput, rng: &mut R) {
        let drag = input.drag.as_ref();
        for p in &mut self.particles {
            p.update(drag, input.first_frame, rng);
        }
    }
}
