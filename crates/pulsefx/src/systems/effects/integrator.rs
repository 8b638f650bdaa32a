//! Per-frame motion and boundary handling.
//!
//! Constant accelerations use the exact kinematic step, so integrating over
//! `[t0, t1]` then `[t1, t2]` lands where a single `[t0, t2]` step would.

use glam::Vec2;

use crate::api::types::{Extent, Seconds};
use super::particle::Particle;
use super::rng::RandomSource;
use super::spawner::AmbientSeeder;

/// Advance one particle by `dt` under constant acceleration `accel`.
#[inline]
pub fn step_ballistic(p: &mut Particle, accel: Vec2, dt: f32) {
    p.position += p.velocity * dt + 0.5 * accel * dt * dt;
    p.velocity += accel * dt;
}

/// Vertical speed multiplier for ambient effects. Never negative, so a wild
/// audio value can exaggerate the fall but not reverse it.
#[inline]
pub fn audio_fall_multiplier(audio_level: f32, audio_boost: f32) -> f32 {
    (1.0 + audio_level * audio_boost).max(0.0)
}

/// Drop every expired burst particle, then integrate the survivors under gravity.
/// `dt` is `None` on frames that must not integrate. Returns how many were culled.
///
/// Culling runs every frame, before any spawning, so the set never carries
/// dead particles into the next frame.
pub fn advance_bursts(
    particles: &mut Vec<Particle>,
    now: Seconds,
    dt: Option<f32>,
    gravity: f32,
) -> usize {
    let before = particles.len();
    let accel = Vec2::new(0.0, gravity);
    particles.retain_mut(|p| {
        if p.is_expired(now) {
            return false;
        }
        if let Some(dt) = dt {
            step_ballistic(p, accel, dt);
        }
        true
    });
    before - particles.len()
}

/// Wrap `x` horizontally into `[0, width)`. Leaves it alone for a degenerate width.
#[inline]
pub fn wrap_x(x: f32, width: f32) -> f32 {
    if width <= 0.0 || (0.0..width).contains(&x) {
        return x;
    }
    let wrapped = x.rem_euclid(width);
    // rem_euclid can round to exactly `width` for tiny negative x
    if wrapped >= width { 0.0 } else { wrapped }
}

/// Integrate an ambient population: wind, audio-boosted fall, horizontal wrap,
/// and recycling past the bottom edge. Population size never changes.
/// Returns how many particles were recycled.
pub fn advance_ambient<R: RandomSource>(
    particles: &mut [Particle],
    now: Seconds,
    dt: f32,
    audio_level: f32,
    extent: Extent,
    seeder: &AmbientSeeder,
    rng: &mut R,
) -> usize {
    let config = seeder.config();
    let accel = Vec2::new(config.wind, 0.0);
    let fall = audio_fall_multiplier(audio_level, config.audio_boost);
    let mut recycled = 0;

    for p in particles.iter_mut() {
        let mut displacement = p.velocity * dt + 0.5 * accel * dt * dt;
        displacement.y *= fall;
        p.position += displacement;
        p.velocity += accel * dt;

        p.position.x = wrap_x(p.position.x, extent.width);

        if p.position.y > extent.height + p.radius + p.length {
            seeder.recycle(p, extent.width, now, rng);
            recycled += 1;
        }
    }
    recycled
}
