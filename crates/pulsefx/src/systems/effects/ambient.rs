//! Falling precipitation: a fixed-size population that drifts, wraps horizontally
//! and is recycled at the top once it falls past the bottom.

use crate::api::config::AmbientConfig;
use crate::api::error::ConfigError;
use crate::api::types::{Extent, Seconds};
use crate::core::clock::{ClockPhase, FrameClock, Tick};
use super::integrator::advance_ambient;
use super::particle::Particle;
use super::rng::{RandomSource, Rng};
use super::simulation::{FrameReport, Simulation};
use super::spawner::AmbientSeeder;

/// Simulation state for an ambient effect.
///
/// The population is generated against a measured extent and regenerated whenever
/// the extent changes. Until the canvas is measured, nothing is seeded.
pub struct AmbientSimulation<R: RandomSource = Rng> {
    seeder: AmbientSeeder,
    particles: Vec<Particle>,
    clock: FrameClock,
    extent: Extent,
    /// Extent the current population was generated for.
    seeded_extent: Option<Extent>,
    rng: R,
}

impl<R: RandomSource> AmbientSimulation<R> {
    /// Validates `config` and builds an uninitialized simulation.
    pub fn new(config: AmbientConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            particles: Vec::with_capacity(config.count as usize),
            seeder: AmbientSeeder::new(config),
            clock: FrameClock::new(),
            extent: Extent::UNMEASURED,
            seeded_extent: None,
            rng,
        })
    }

    pub fn config(&self) -> &AmbientConfig {
        self.seeder.config()
    }

    /// Whether a population exists for the current extent.
    pub fn is_seeded(&self) -> bool {
        self.seeded_extent.is_some()
    }

    fn reseed(&mut self, now: Seconds, extent: Extent) {
        if self.seeded_extent.is_some() {
            log::debug!(
                "{:?} reseeding for extent {}x{}",
                self.seeder.config().kind,
                extent.width,
                extent.height
            );
        }
        self.seeder.seed(extent, now, &mut self.rng, &mut self.particles);
        self.seeded_extent = Some(extent);
    }
}

impl<R: RandomSource> Simulation for AmbientSimulation<R> {
    fn update(&mut self, now: Seconds, audio_level: f32, extent: Extent) -> FrameReport {
        let mut report = FrameReport::default();
        let tick = self.clock.tick(now);
        let now = self.clock.last_update().unwrap_or(now);
        self.extent = extent;

        if !extent.is_measured() {
            // Keep whatever population exists; wait for real geometry.
            return report;
        }

        if self.seeded_extent != Some(extent) {
            // Fresh particles are not integrated on the frame they are created.
            self.reseed(now, extent);
            report.reseeded = true;
            return report;
        }

        if let Tick::Step(dt) = tick {
            report.dt = Some(dt);
            report.recycled = advance_ambient(
                &mut self.particles,
                now,
                dt,
                audio_level,
                extent,
                &self.seeder,
                &mut self.rng,
            );
        }
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
