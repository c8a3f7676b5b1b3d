//! Error types for the particle-glyph core.

use thiserror::Error;

/// Errors produced by sampling, field, and configuration operations.
///
/// Every variant is fatal only to the call that returned it. A failed
/// sampling pass never reaches the particle field, so the last valid shape
/// stays on screen.
#[derive(Debug, Error)]
pub enum ParticleError {
    /// The source buffer has no pixel opaque enough to sample.
    #[error("empty source: no pixel at or above the alpha threshold")]
    EmptySource,

    /// Width or height was zero, or the buffer size overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The RGBA byte buffer length disagrees with `width * height * 4`.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch { expected: usize, got: usize },

    /// A sampling pass was asked for zero targets.
    #[error("invalid particle count: at least one sample is required")]
    InvalidParticleCount,

    /// `initialize` or `retarget` received an empty target slice.
    #[error("no targets: cannot place particles without at least one target")]
    NoTargets,

    /// A configuration value failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// An external rasterizer could not produce a pixel buffer.
    #[error("rasterization failed: {0}")]
    Raster(String),

    /// File I/O failed (snapshot writing, image loading).
    #[error("I/O error: {0}")]
    Io(String),
}
