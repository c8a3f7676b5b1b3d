//! Configuration for a particle field session.
//!
//! A [`FieldConfig`] captures everything needed to reproduce a session given
//! the same content: particle count, tick rate, PRNG seed, and how the first
//! appearance is damped.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ParticleError;
use crate::params::{param_bool, param_f64, param_u64, param_usize};

pub const DEFAULT_PARTICLE_COUNT: usize = 800;
/// Physics constants are tuned for this rate.
pub const DEFAULT_TICK_RATE_HZ: f64 = 120.0;
pub const DEFAULT_SEED: u64 = 42;
/// One second at the default tick rate.
pub const DEFAULT_FIRST_APPEARANCE_TICKS: usize = 120;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles, fixed once the field is created.
    pub particle_count: usize,
    /// Informational tick rate. Changing it changes apparent speed, not the
    /// per-tick physics.
    pub tick_rate_hz: f64,
    /// Seed for every random draw of the session.
    pub seed: u64,
    /// Use the looser first-appearance damping right after creation.
    pub settle_on_first_appearance: bool,
    /// How many ticks after creation count as the first appearance.
    pub first_appearance_ticks: usize,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            seed: DEFAULT_SEED,
            settle_on_first_appearance: true,
            first_appearance_ticks: DEFAULT_FIRST_APPEARANCE_TICKS,
        }
    }
}

impl FieldConfig {
    /// Reads overrides from a JSON object, falling back to defaults.
    pub fn from_json(params: &Value) -> Self {
        Self {
            particle_count: param_usize(params, "particle_count", DEFAULT_PARTICLE_COUNT),
            tick_rate_hz: param_f64(params, "tick_rate_hz", DEFAULT_TICK_RATE_HZ),
            seed: param_u64(params, "seed", DEFAULT_SEED),
            settle_on_first_appearance: param_bool(params, "settle_on_first_appearance", true),
            first_appearance_ticks: param_usize(
                params,
                "first_appearance_ticks",
                DEFAULT_FIRST_APPEARANCE_TICKS,
            ),
        }
    }

    /// Rejects a zero particle count and a non-positive or non-finite tick rate.
    pub fn validate(&self) -> Result<(), ParticleError> {
        if self.particle_count == 0 {
            return Err(ParticleError::InvalidConfig(
                "particle_count must be greater than zero".into(),
            ));
        }
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(ParticleError::InvalidConfig(format!(
                "tick_rate_hz must be a positive finite number, got {}",
                self.tick_rate_hz
            )));
        }
        Ok(())
    }

    /// Period between ticks at the configured rate.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_rate_hz)
    }

    /// Schema describing every parameter, its type, and its default.
    pub fn param_schema() -> Value {
        json!({
            "particle_count": {
                "type": "integer",
                "default": DEFAULT_PARTICLE_COUNT,
                "min": 1,
                "description": "Number of particles; fixed after the field is created"
            },
            "tick_rate_hz": {
                "type": "number",
                "default": DEFAULT_TICK_RATE_HZ,
                "description": "Tick rate the physics constants are tuned for (informational)"
            },
            "seed": {
                "type": "integer",
                "default": DEFAULT_SEED,
                "description": "PRNG seed for sampling, scatter, and noise"
            },
            "settle_on_first_appearance": {
                "type": "boolean",
                "default": true,
                "description": "Use first-appearance damping right after the field is created"
            },
            "first_appearance_ticks": {
                "type": "integer",
                "default": DEFAULT_FIRST_APPEARANCE_TICKS,
                "min": 0,
                "description": "Ticks after creation that use first-appearance damping"
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let c = FieldConfig::default();
        assert_eq!(c.particle_count, 800);
        assert!((c.tick_rate_hz - 120.0).abs() < f64::EPSILON);
        assert!(c.settle_on_first_appearance);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn from_json_uses_defaults_for_empty_object() {
        assert_eq!(FieldConfig::from_json(&json!({})), FieldConfig::default());
    }

    #[test]
    fn from_json_extracts_overrides() {
        let c = FieldConfig::from_json(&json!({
            "particle_count": 250,
            "tick_rate_hz": 60,
            "seed": 7,
            "settle_on_first_appearance": false,
            "first_appearance_ticks": 30
        }));
        assert_eq!(c.particle_count, 250);
        assert!((c.tick_rate_hz - 60.0).abs() < f64::EPSILON);
        assert_eq!(c.seed, 7);
        assert!(!c.settle_on_first_appearance);
        assert_eq!(c.first_appearance_ticks, 30);
    }

    #[test]
    fn validate_rejects_zero_particles() {
        let c = FieldConfig {
            particle_count: 0,
            ..FieldConfig::default()
        };
        assert!(matches!(c.validate(), Err(ParticleError::InvalidConfig(_))));
    }

    #[test]
    fn validate_rejects_bad_tick_rate() {
        for rate in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = FieldConfig {
                tick_rate_hz: rate,
                ..FieldConfig::default()
            };
            assert!(c.validate().is_err(), "rate {rate} should be rejected");
        }
    }

    #[test]
    fn tick_interval_at_120hz() {
        let interval = FieldConfig::default().tick_interval();
        assert!((interval.as_secs_f64() - 1.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let c = FieldConfig {
            particle_count: 64,
            seed: 8_675_309,
            ..FieldConfig::default()
        };
        let json = serde_json::to_string(&c).unwrap();
        let restored: FieldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, restored);
    }

    #[test]
    fn serde_fills_missing_fields_with_defaults() {
        let c: FieldConfig = serde_json::from_str(r#"{"seed": 3}"#).unwrap();
        assert_eq!(c.seed, 3);
        assert_eq!(c.particle_count, DEFAULT_PARTICLE_COUNT);
    }

    #[test]
    fn param_schema_lists_every_field() {
        let schema = FieldConfig::param_schema();
        for key in [
            "particle_count",
            "tick_rate_hz",
            "seed",
            "settle_on_first_appearance",
            "first_appearance_ticks",
        ] {
            assert!(schema.get(key).is_some(), "schema missing {key}");
            assert!(schema[key].get("default").is_some(), "{key} missing default");
        }
    }
}
