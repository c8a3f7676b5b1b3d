//! A single particle and its per-tick spring-damper update.
//!
//! Each tick, in this order:
//! 1. displacement to the base position,
//! 2. spring acceleration `displacement * SPRING_CONSTANT * density`,
//! 3. `velocity = (velocity + acceleration) * damping` (integrate, then damp),
//! 4. position advances by the new velocity,
//! 5. optional drag forcing toward the pointer,
//! 6. uniform noise on both velocity components, so particles never fully rest.
//!
//! Stability comes from damping below 1 with a small spring constant; there
//! is no runtime clamping.

use glam::DVec2;
use particle_glyph_core::prng::RandomSource;
use particle_glyph_core::Srgb;
use serde::{Deserialize, Serialize};

/// Spring constant. Not configurable; tuned for 120 Hz.
pub const SPRING_CONSTANT: f64 = 0.002;
/// Damping on the very first appearance of a field.
pub const FIRST_FRAME_DAMPING: f64 = 0.55;
/// Damping in steady state.
pub const STEADY_DAMPING: f64 = 0.7;
/// Lower bound (inclusive) of per-particle density.
pub const MIN_DENSITY: f64 = 5.0;
/// Upper bound (exclusive) of per-particle density.
pub const MAX_DENSITY: f64 = 20.0;
/// Distance beyond which drag has no positional pull.
pub const DRAG_RADIUS: f64 = 200.0;
/// Gain applied to the drag speed term.
pub const DRAG_SPEED_GAIN: f64 = 0.00005;
/// Scale applied to the drag vector before it reaches velocity.
pub const DRAG_STRENGTH: f64 = 0.005;
/// Half-width of the per-tick velocity noise.
pub const NOISE_AMPLITUDE: f64 = 0.1;

/// Pointer drag sample, written by the event layer and read at tick time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drag {
    pub position: DVec2,
    pub velocity: Option<DVec2>,
}

impl Drag {
    pub fn at(position: DVec2) -> Self {
        Self {
            position,
            velocity: None,
        }
    }

    pub fn with_velocity(position: DVec2, velocity: DVec2) -> Self {
        Self {
            position,
            velocity: Some(velocity),
        }
    }
}

/// Drag force factor for a particle `distance` away from the pointer.
///
/// `(200 - min(distance, 200)) / 200 + max(|vx|, |vy|) * 0.00005`. The
/// divisor is fixed, so a particle sitting on the pointer is fine.
pub fn drag_force(distance: f64, drag_velocity: Option<DVec2>) -> f64 {
    let speed = drag_velocity.map_or(0.0, |v| v.x.abs().max(v.y.abs()));
    (DRAG_RADIUS - distance.min(DRAG_RADIUS)) / DRAG_RADIUS + speed * DRAG_SPEED_GAIN
}

/// Damping for the given regime.
pub fn damping(first_frame: bool) -> f64 {
    if first_frame {
        FIRST_FRAME_DAMPING
    } else {
        STEADY_DAMPING
    }
}

/// One particle of the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub base_x: f64,
    pub base_y: f64,
    /// Spring strength multiplier in [5, 20), fixed at creation.
    pub density: f64,
    /// Depth in [0, 1]; 0 is nearest.
    pub z: f64,
    pub color: Srgb,
    pub velocity_x: f64,
    pub velocity_y: f64,
}

impl Particle {
    /// Distance from the current position to the base position.
    pub fn displacement(&self) -> f64 {
        DVec2::new(self.base_x - self.x, self.base_y - self.y).length()
    }

    /// Advances this particle by one tick. Reads no other particle.
    pub fn update<R: RandomSource + ?Sized>(
        &mut self,
        drag: Option<&Drag>,
        first_frame: bool,
        rng: &mut R,
    ) {
        let dx = self.base_x - self.x;
        let dy = self.base_y - self.y;

        let ax = dx * SPRING_CONSTANT * self.density;
        let ay = dy * SPRING_CONSTANT * self.density;

        let damping = damping(first_frame);
        self.velocity_x = (self.velocity_x + ax) * damping;
        self.velocity_y = (self.velocity_y + ay) * damping;

        self.x += self.velocity_x;
        self.y += self.velocity_y;

        if let Some(drag) = drag {
            let to_pointer = drag.position - DVec2::new(self.x, self.y);
            let push = to_pointer * drag_force(to_pointer.length(), drag.velocity) * DRAG_STRENGTH;
            self.velocity_x += push.x;
            self.velocity_y += push.y;
        }

        self.velocity_x += rng.next_range(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
        self.velocity_y += rng.next_range(-NOISE_AMPLITUDE, NOISE_AMPLITUDE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use particle_glyph_core::Xorshift64;

    /// Source yielding 0.5, which maps every noise draw to exactly zero.
    struct Quiet;

    impl RandomSource for Quiet {
        fn next_f64(&mut self) -> f64 {
            0.5
        }
    }

    fn at_rest(x: f64, y: f64, density: f64) -> Particle {
        Particle {
            x,
            y,
            base_x: x,
            base_y: y,
            density,
            z: 0.0,
            color: Srgb::new(0.0, 0.0, 0.0),
            velocity_x: 0.0,
            velocity_y: 0.0,
        }
    }

    // ---- Spring-damper ----

    #[test]
    fn integrates_then_damps() {
        let mut p = at_rest(0.0, 0.0, 10.0);
        p.base_x = 100.0;
        p.velocity_x = 2.0;
        p.update(None, false, &mut Quiet);
        // (2 + 100 * 0.002 * 10) * 0.7 = 2.8, not 2 * 0.7 + 2 = 3.4
        assert!((p.velocity_x - 2.8).abs() < 1e-9, "vx = {}", p.velocity_x);
        assert!((p.x - 2.8).abs() < 1e-9, "x = {}", p.x);
        assert_eq!(p.velocity_y, 0.0);
    }

    #[test]
    fn first_frame_uses_looser_damping_constant() {
        let mut steady = at_rest(0.0, 0.0, 10.0);
        steady.velocity_x = 1.0;
        let mut first = steady;
        steady.update(None, false, &mut Quiet);
        first.update(None, true, &mut Quiet);
        assert!((steady.velocity_x - 0.7).abs() < 1e-12);
        assert!((first.velocity_x - 0.55).abs() < 1e-12);
    }

    #[test]
    fn particle_at_rest_stays_at_rest_without_noise() {
        let mut p = at_rest(12.0, -4.0, 7.0);
        for _ in 0..100 {
            p.update(None, false, &mut Quiet);
        }
        assert_eq!((p.x, p.y), (12.0, -4.0));
    }

    #[test]
    fn noise_stays_within_amplitude() {
        let mut rng = Xorshift64::new(3);
        for _ in 0..1000 {
            let mut p = at_rest(0.0, 0.0, 10.0);
            p.update(None, false, &mut rng);
            assert!(p.velocity_x.abs() <= NOISE_AMPLITUDE);
            assert!(p.velocity_y.abs() <= NOISE_AMPLITUDE);
        }
    }

    #[test]
    fn noise_keeps_particles_from_fully_settling() {
        let mut rng = Xorshift64::new(11);
        let mut p = at_rest(0.0, 0.0, 10.0);
        let mut moved = 0;
        for _ in 0..200 {
            p.update(None, false, &mut rng);
            if p.velocity_x != 0.0 || p.velocity_y != 0.0 {
                moved += 1;
            }
        }
        assert_eq!(moved, 200);
    }

    // ---- Drag ----

    #[test]
    fn drag_force_decreases_with_distance_inside_radius() {
        let mut previous = drag_force(0.0, None);
        assert!((previous - 1.0).abs() < f64::EPSILON);
        for step in 1..=200 {
            let f = drag_force(step as f64, None);
            assert!(f < previous, "force not decreasing at distance {step}");
            previous = f;
        }
        assert_eq!(drag_force(200.0, None), 0.0);
    }

    #[test]
    fn drag_force_is_flat_beyond_radius() {
        let v = Some(DVec2::new(-300.0, 40.0));
        let floor = 300.0 * DRAG_SPEED_GAIN;
        for d in [200.0, 250.0, 1e6] {
            assert!((drag_force(d, v) - floor).abs() < 1e-15);
            assert_eq!(drag_force(d, None), 0.0);
        }
    }

    #[test]
    fn drag_speed_uses_larger_component() {
        let a = drag_force(50.0, Some(DVec2::new(10.0, -400.0)));
        let b = drag_force(50.0, Some(DVec2::new(400.0, 0.0)));
        assert!((a - b).abs() < 1e-15);
        assert!(a > drag_force(50.0, None));
    }

    #[test]
    fn drag_pulls_toward_pointer_inside_radius() {
        let mut p = at_rest(0.0, 0.0, 10.0);
        p.update(Some(&Drag::at(DVec2::new(100.0, 0.0))), false, &mut Quiet);
        // force = 0.5, push = 100 * 0.5 * 0.005
        assert!((p.velocity_x - 0.25).abs() < 1e-12, "vx = {}", p.velocity_x);
        assert_eq!(p.velocity_y, 0.0);
        assert_eq!(p.x, 0.0, "drag affects velocity, position moves next tick");
    }

    #[test]
    fn drag_beyond_radius_without_speed_has_no_effect() {
        let mut p = at_rest(0.0, 0.0, 10.0);
        p.update(Some(&Drag::at(DVec2::new(0.0, 300.0))), false, &mut Quiet);
        assert_eq!((p.velocity_x, p.velocity_y), (0.0, 0.0));
    }

    #[test]
    fn drag_on_particle_position_is_finite() {
        let mut p = at_rest(5.0, 5.0, 10.0);
        p.update(
            Some(&Drag::with_velocity(DVec2::new(5.0, 5.0), DVec2::new(1e3, 1e3))),
            false,
            &mut Quiet,
        );
        assert!(p.velocity_x.is_finite() && p.velocity_y.is_finite());
    }

    #[test]
    fn serde_round_trip_keeps_fields() {
        let mut p = at_rest(1.5, 2.5, 9.0);
        p.color = Srgb::from_rgb8(255, 128, 0);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"velocity_x\""));
        let back: Particle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
