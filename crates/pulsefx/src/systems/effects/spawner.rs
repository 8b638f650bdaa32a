//! Particle creation: when bursts fire and what they contain, and how ambient
//! populations are seeded and recycled.

use glam::Vec2;

use crate::api::config::{AmbientConfig, BurstConfig};
use crate::api::types::{Extent, Seconds};
use super::color::{jitter_hue, wrap_hue};
use super::particle::Particle;
use super::rng::RandomSource;

/// Which trigger policies fired on a frame. Each policy emits at most one burst per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Triggers {
    pub scheduled: bool,
    pub audio: bool,
}

impl Triggers {
    pub fn bursts(&self) -> u32 {
        self.scheduled as u32 + self.audio as u32
    }
}

/// Decides when bursts fire (timer and audio rising edge) and composes them.
#[derive(Debug, Clone)]
pub struct BurstSpawner {
    config: BurstConfig,
    next_launch: Option<Seconds>,
}

impl BurstSpawner {
    pub fn new(config: BurstConfig) -> Self {
        Self { config, next_launch: None }
    }

    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    /// When the timer fires next, if scheduling is enabled and primed.
    pub fn next_launch(&self) -> Option<Seconds> {
        self.next_launch
    }

    /// Start the launch timer from `now`. Called on the first frame.
    pub fn prime<R: RandomSource>(&mut self, now: Seconds, rng: &mut R) {
        self.next_launch = self
            .config
            .launch_interval
            .map(|interval| now + interval.sample(rng) as Seconds);
    }

    /// Run both trigger policies for this frame and append any bursts to `out`.
    ///
    /// Against an unmeasured extent nothing fires and the timer is left untouched,
    /// so a due launch happens on the first frame with real geometry.
    pub fn maybe_spawn<R: RandomSource>(
        &mut self,
        now: Seconds,
        audio_level: f32,
        previous_audio_level: f32,
        extent: Extent,
        rng: &mut R,
        out: &mut Vec<Particle>,
    ) -> Triggers {
        let mut fired = Triggers::default();
        if !extent.is_measured() {
            return fired;
        }

        if let Some(interval) = self.config.launch_interval {
            let due = match self.next_launch {
                Some(next) => now >= next,
                None => true,
            };
            if due {
                let origin = self.random_origin(extent, rng);
                self.compose_burst(origin, now, audio_level, rng, out);
                self.next_launch = Some(now + interval.sample(rng) as Seconds);
                fired.scheduled = true;
            }
        }

        if let Some(threshold) = self.config.audio_threshold {
            // Rising edge only: a sustained level produces a zero delta.
            if audio_level - previous_audio_level >= threshold {
                let origin = self.random_origin(extent, rng);
                self.compose_burst(origin, now, audio_level, rng, out);
                fired.audio = true;
            }
        }

        if fired.bursts() > 0 {
            log::trace!(
                "burst at t={now:.3}: scheduled={} audio={} level={audio_level:.2}",
                fired.scheduled,
                fired.audio
            );
        }
        fired
    }

    /// Spawn origin inside the configured band of the canvas.
    pub fn random_origin<R: RandomSource>(&self, extent: Extent, rng: &mut R) -> Vec2 {
        Vec2::new(
            self.config.origin_x.sample(rng) * extent.width,
            self.config.origin_y.sample(rng) * extent.height,
        )
    }

    /// Append one burst of `particles_per_firework` particles at `origin`.
    /// All particles share a base hue, jittered per particle.
    pub fn compose_burst<R: RandomSource>(
        &self,
        origin: Vec2,
        now: Seconds,
        audio_level: f32,
        rng: &mut R,
        out: &mut Vec<Particle>,
    ) {
        let c = &self.config;
        let base_hue = c.color_mode.pick(rng);
        // max() also maps a NaN level to a standstill instead of NaN velocities
        let speed_scale = (1.0 + audio_level * c.audio_speed_boost).max(0.0);
        out.reserve(c.particles_per_firework as usize);
        for _ in 0..c.particles_per_firework {
            let dir = rng.direction(c.angle.min, c.angle.max);
            let speed = c.speed.sample(rng) * speed_scale;
            out.push(Particle {
                position: origin,
                velocity: dir * speed,
                birth_time: now,
                lifespan: c.lifespan.sample(rng),
                radius: c.radius.sample(rng),
                hue: jitter_hue(base_hue, c.hue_jitter, rng),
                opacity: c.opacity.sample(rng),
                length: 0.0,
                rotation: rng.range(0.0, std::f32::consts::TAU),
                spin: c.spin.sample(rng),
            });
        }
    }
}

/// Creates ambient particles: the initial population and top-edge replacements.
#[derive(Debug, Clone)]
pub struct AmbientSeeder {
    config: AmbientConfig,
}

impl AmbientSeeder {
    pub fn new(config: AmbientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AmbientConfig {
        &self.config
    }

    /// One fresh particle at `position`.
    pub fn spawn_at<R: RandomSource>(&self, position: Vec2, now: Seconds, rng: &mut R) -> Particle {
        let c = &self.config;
        Particle {
            position,
            velocity: Vec2::new(c.drift.sample(rng), c.fall_speed.sample(rng)),
            birth_time: now,
            lifespan: f32::INFINITY,
            radius: c.radius.sample(rng),
            hue: wrap_hue(c.hue),
            opacity: c.opacity.sample(rng),
            length: c.length.sample(rng),
            rotation: rng.range(0.0, std::f32::consts::TAU),
            spin: c.spin.sample(rng),
        }
    }

    /// Replace `out` with a full population spread uniformly over `extent`.
    pub fn seed<R: RandomSource>(
        &self,
        extent: Extent,
        now: Seconds,
        rng: &mut R,
        out: &mut Vec<Particle>,
    ) {
        out.clear();
        out.reserve(self.config.count as usize);
        for _ in 0..self.config.count {
            let position = Vec2::new(rng.range(0.0, extent.width), rng.range(0.0, extent.height));
            out.push(self.spawn_at(position, now, rng));
        }
    }

    /// Replace a particle that fell past the bottom with a new one just above the top edge.
    pub fn recycle<R: RandomSource>(
        &self,
        particle: &mut Particle,
        width: f32,
        now: Seconds,
        rng: &mut R,
    ) {
        let x = rng.range(0.0, width);
        let mut fresh = self.spawn_at(Vec2::new(x, 0.0), now, rng);
        fresh.position.y = -(fresh.radius + fresh.length);
        *particle = fresh;
    }
}
