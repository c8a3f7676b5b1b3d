//! Thread-safe session for setups that tick on one thread and sample on another.
//!
//! Sampling is CPU-bound, so it runs outside the lock on a per-ticket random
//! stream. The finished targets are committed under the lock in one step, so a
//! tick never observes a half-applied retarget. Every content change draws a
//! ticket from a monotonic counter; a commit carrying an older ticket than the
//! last applied one is dropped, so the newest content always wins. A change
//! that fails still claims its ticket, so an older change finishing later
//! cannot resurrect stale content.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::DVec2;
use log::{debug, warn};
use parking_lot::Mutex;
use particle_glyph_core::config::FieldConfig;
use particle_glyph_core::error::ParticleError;
use particle_glyph_core::pixel::{Raster, Rasterize};
use particle_glyph_core::prng::Xorshift64;
use particle_glyph_sampler::{ContentCategory, ImageSampler, Target};

use crate::field::Placement;
use crate::particle::{Drag, Particle};
use crate::swarm::Swarm;

/// Identifies one content change. Later tickets win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContentTicket(u64);

/// Outcome of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    Applied(Placement),
    /// A newer content change was already applied.
    Stale,
}

struct Guarded {
    swarm: Swarm,
    committed: u64,
}

struct Inner {
    state: Mutex<Guarded>,
    issued: AtomicU64,
    sampler: ImageSampler,
    particle_count: usize,
    seed: u64,
}

/// Cloneable handle to a [`Swarm`] shared between threads.
#[derive(Clone)]
pub struct SharedSwarm {
    inner: Arc<Inner>,
}

impl SharedSwarm {
    pub fn new(config: FieldConfig, canvas: DVec2) -> Result<Self, ParticleError> {
        let swarm = Swarm::new(config, canvas)?;
        let config = swarm.config().clone();
        Ok(Self {
            inner: Arc::new(Inner {
                sampler: swarm.sampler().clone(),
                particle_count: config.particle_count,
                seed: config.seed,
                issued: AtomicU64::new(0),
                state: Mutex::new(Guarded {
                    swarm,
                    committed: 0,
                }),
            }),
        })
    }

    /// Starts a content change.
    pub fn issue_ticket(&self) -> ContentTicket {
        ContentTicket(self.inner.issued.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Samples targets for `ticket` without holding the lock.
    ///
    /// Each ticket gets its own random stream derived from the session seed,
    /// so concurrent sampling stays reproducible. A failure retires the
    /// ticket.
    pub fn sample(
        &self,
        ticket: ContentTicket,
        raster: &Raster,
        category: ContentCategory,
    ) -> Result<Vec<Target>, ParticleError> {
        let mut rng = Xorshift64::new(self.inner.seed).fork(ticket.0);
        let result = self
            .inner
            .sampler
            .sample(raster, self.inner.particle_count, category, &mut rng);
        if result.is_err() {
            self.retire(ticket);
        }
        result
    }

    /// Marks `ticket` as the newest content change without touching the
    /// particles. Older tickets committed afterwards are dropped.
    pub fn retire(&self, ticket: ContentTicket) {
        let mut state = self.inner.state.lock();
        state.committed = state.committed.max(ticket.0);
    }

    /// Applies `targets` unless a newer ticket was already committed.
    pub fn commit(&self, ticket: ContentTicket, targets: &[Target]) -> Result<Commit, ParticleError> {
        let mut state = self.inner.state.lock();
        if ticket.0 <= state.committed {
            debug!(
                "dropping stale content {} (already at {})",
                ticket.0, state.committed
            );
            return Ok(Commit::Stale);
        }
        state.committed = ticket.0;
        let placement = state.swarm.apply(targets)?;
        Ok(Commit::Applied(placement))
    }

    /// Rasterizes, samples, and commits in one call.
    ///
    /// On error the particles keep their previous targets.
    pub fn set_content(
        &self,
        source: &dyn Rasterize,
        category: ContentCategory,
    ) -> Result<Commit, ParticleError> {
        let ticket = self.issue_ticket();
        let result = source
            .rasterize()
            .and_then(|raster| self.sample(ticket, &raster, category))
            .and_then(|targets| self.commit(ticket, &targets));
        if let Err(e) = &result {
            self.retire(ticket);
            warn!("content change failed, keeping previous shape: {e}");
        }
        result
    }

    /// Advances one tick under the lock.
    pub fn tick(&self, drag: Option<Drag>) {
        self.inner.state.lock().swarm.tick(drag);
    }

    /// Copies the current particle state.
    pub fn snapshot(&self) -> Vec<Particle> {
        self.inner.state.lock().swarm.field().particles().to_vec()
    }

    /// Runs `f` with read access to the session.
    pub fn with<T>(&self, f: impl FnOnce(&Swarm) -> T) -> T {
        f(&self.inner.state.lock().swarm)
    }
}
