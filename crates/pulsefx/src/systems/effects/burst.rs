//! Fireworks: bursts fired by a launch timer and by rising audio, falling under
//! gravity and expiring by lifespan.

use glam::Vec2;

use crate::api::config::BurstConfig;
use crate::api::error::ConfigError;
use crate::api::types::{Extent, Seconds};
use crate::core::clock::{ClockPhase, FrameClock, Tick};
use super::integrator::advance_bursts;
use super::particle::Particle;
use super::rng::{RandomSource, Rng};
use super::simulation::{FrameReport, Simulation};
use super::spawner::BurstSpawner;

/// Simulation state for a burst effect.
///
/// Resizing the canvas never touches live particles; the current extent only
/// places new bursts.
pub struct BurstSimulation<R: RandomSource = Rng> {
    spawner: BurstSpawner,
    particles: Vec<Particle>,
    clock: FrameClock,
    extent: Extent,
    previous_audio_level: f32,
    rng: R,
}

impl<R: RandomSource> BurstSimulation<R> {
    /// Validates `config` and builds an uninitialized simulation.
    pub fn new(config: BurstConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            spawner: BurstSpawner::new(config),
            particles: Vec::new(),
            clock: FrameClock::new(),
            extent: Extent::UNMEASURED,
            previous_audio_level: 0.0,
            rng,
        })
    }

    pub fn config(&self) -> &BurstConfig {
        self.spawner.config()
    }

    /// Fire one burst at an explicit origin (e.g. a pointer click).
    /// Returns the number of particles added.
    pub fn launch_at(&mut self, now: Seconds, origin: Vec2) -> usize {
        let before = self.particles.len();
        self.spawner.compose_burst(
            origin,
            now,
            self.previous_audio_level,
            &mut self.rng,
            &mut self.particles,
        );
        self.particles.len() - before
    }

    /// When the launch timer fires next.
    pub fn next_launch(&self) -> Option<Seconds> {
        self.spawner.next_launch()
    }

    pub fn previous_audio_level(&self) -> f32 {
        self.previous_audio_level
    }
}

impl<R: RandomSource> Simulation for BurstSimulation<R> {
    fn update(&mut self, now: Seconds, audio_level: f32, extent: Extent) -> FrameReport {
        let mut report = FrameReport::default();
        self.extent = extent;

        match self.clock.tick(now) {
            Tick::First => {
                self.spawner.prime(now, &mut self.rng);
                self.previous_audio_level = audio_level;
                log::debug!(
                    "fireworks initialized at t={now:.3}, extent {}x{}",
                    extent.width,
                    extent.height
                );
                return report;
            }
            Tick::Step(dt) => report.dt = Some(dt),
            Tick::Stall => {}
        }
        // A stalled frame ages particles against the last accepted time, never an earlier one.
        let now = self.clock.last_update().unwrap_or(now);

        let gravity = self.spawner.config().gravity;
        report.culled = advance_bursts(&mut self.particles, now, report.dt, gravity);

        let fired = self.spawner.maybe_spawn(
            now,
            audio_level,
            self.previous_audio_level,
            extent,
            &mut self.rng,
            &mut self.particles,
        );
        report.scheduled_bursts = fired.scheduled as u32;
        report.audio_bursts = fired.audio as u32;

        self.previous_audio_level = audio_level;
        report
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }

    fn phase(&self) -> ClockPhase {
        self.clock.phase()
    }

    fn extent(&self) -> Extent {
        self.extent
    }
}
