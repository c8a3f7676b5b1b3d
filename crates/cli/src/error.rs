//! CLI errors with distinct exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: simulation error (empty source, bad config, bad dimensions)
//! - 11: I/O error (image load, snapshot write)
//! - 12: input error (bad params JSON, bad color, undecodable image)
//! - 13: serialization error

use particle_glyph_core::ParticleError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A simulation-level error (empty source, bad config, bad dimensions).
    Simulation(ParticleError),
    /// An I/O error (image load, snapshot or JSON write).
    Io(String),
    /// A user input error (bad params JSON, bad color, undecodable image).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Simulation(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Simulation(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<ParticleError> for CliError {
    fn from(e: ParticleError) -> Self {
        match e {
            ParticleError::Io(msg) => CliError::Io(msg),
            other => CliError::Simulation(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<image::ImageError> for CliError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => CliError::Io(io.to_string()),
            other => CliError::Input(other.to_string()),
        }
    }
}
