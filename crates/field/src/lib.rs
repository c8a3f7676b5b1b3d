#![deny(unsafe_code)]
//! Particle field simulator.
//!
//! A fixed-size set of particles settles into sampled target points under a
//! spring-damper update, reacts to pointer drag, and keeps a faint living
//! jitter from per-tick noise. New content re-targets the existing particles
//! without resetting their motion.
//!
//! [`ParticleField`] holds the raw operations (initialize, retarget, tick),
//! [`Swarm`] ties sampling and simulation into one session, and
//! [`SharedSwarm`] shares a session between a physics thread and a sampling
//! thread.

pub mod appearance;
pub mod field;
pub mod particle;
pub mod shared;
pub mod swarm;

pub use appearance::Appearance;
pub use field::{ParticleField, Placement, TickInput};
pub use particle::{drag_force, Drag, Particle};
pub use shared::{Commit, ContentTicket, SharedSwarm};
pub use swarm::Swarm;
