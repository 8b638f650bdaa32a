//! The simulated body shared by every particle effect.

use glam::Vec2;

use crate::api::types::Seconds;

/// A single particle. Physics reads and writes only `position` and `velocity`;
/// everything else is fixed at creation and only shapes how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    /// Units per second.
    pub velocity: Vec2,
    /// Frame timestamp at creation, from the same clock that ages it.
    pub birth_time: Seconds,
    /// Seconds this particle may live. `f32::INFINITY` for ambient populations.
    pub lifespan: f32,
    pub radius: f32,
    /// Degrees, `[0, 360)`.
    pub hue: f32,
    pub opacity: f32,
    /// Streak length drawn behind the particle along its velocity.
    pub length: f32,
    /// Rotation at birth, radians.
    pub rotation: f32,
    /// Rotation speed, rad/s.
    pub spin: f32,
}

impl Particle {
    /// Seconds since birth. Never negative.
    #[inline]
    pub fn age(&self, now: Seconds) -> f32 {
        ((now - self.birth_time) as f32).max(0.0)
    }

    /// Expired once age is strictly greater than lifespan.
    #[inline]
    pub fn is_expired(&self, now: Seconds) -> bool {
        self.age(now) > self.lifespan
    }

    /// Age as a fraction of lifespan, clamped to [0, 1]. Always 0 for immortal particles.
    pub fn age_fraction(&self, now: Seconds) -> f32 {
        if !self.lifespan.is_finite() {
            return 0.0;
        }
        if self.lifespan <= 0.0 {
            return 1.0;
        }
        (self.age(now) / self.lifespan).clamp(0.0, 1.0)
    }

    /// Current rotation derived from birth rotation and spin.
    pub fn rotation_at(&self, now: Seconds) -> f32 {
        self.rotation + self.spin * self.age(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spark(birth_time: Seconds, lifespan: f32) -> Particle {
        Particle {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            birth_time,
            lifespan,
            radius: 2.0,
            hue: 0.0,
            opacity: 1.0,
            length: 0.0,
            rotation: 0.0,
            spin: 1.0,
        }
    }

    #[test]
    fn expiry_is_strict() {
        let p = spark(0.0, 1.0);
        assert!(!p.is_expired(1.0), "age == lifespan is still alive");
        assert!(p.is_expired(1.001));
    }

    #[test]
    fn age_fraction_clamps() {
        let p = spark(10.0, 2.0);
        assert_eq!(p.age_fraction(9.0), 0.0);
        assert!((p.age_fraction(11.0) - 0.5).abs() < 1e-6);
        assert_eq!(p.age_fraction(20.0), 1.0);
    }

    #[test]
    fn immortal_particles_never_age_out() {
        let p = spark(0.0, f32::INFINITY);
        assert!(!p.is_expired(1.0e6));
        assert_eq!(p.age_fraction(1.0e6), 0.0);
    }

    #[test]
    fn rotation_follows_spin() {
        let p = spark(0.0, 5.0);
        assert!((p.rotation_at(2.0) - 2.0).abs() < 1e-6);
    }
}
