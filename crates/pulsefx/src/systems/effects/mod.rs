//! Visual effects: fireworks, precipitation, beams, rings and spotlights.
//!
//! This module provides the `EffectsState` facade that owns one instance of every
//! enabled effect and packs their output for the presenter, plus the individual
//! pieces, which can be used directly.

mod rng;
mod color;
mod particle;
mod spawner;
mod integrator;
mod simulation;
mod burst;
mod ambient;
mod procedural;
mod geometry;

// Re-export public types
pub use rng::{RandomSource, Rng};
pub use color::{ColorMode, jitter_hue, wrap_hue};
pub use particle::Particle;
pub use spawner::{AmbientSeeder, BurstSpawner, Triggers};
pub use integrator::{
    advance_ambient, advance_bursts, audio_fall_multiplier, step_ballistic, wrap_x,
};
pub use simulation::{FrameReport, Simulation};
pub use burst::BurstSimulation;
pub use ambient::AmbientSimulation;
pub use procedural::{Beam, BeamField, Ring, RingField, Spotlight, SpotlightField};
pub use geometry::{
    build_strip_vertices, segment_frame, strip_to_triangles, MIN_SEGMENT_LENGTH, VERTEX_FLOATS,
};

use glam::Vec2;

use crate::api::config::{AmbientKind, EffectsConfig};
use crate::api::error::ConfigError;
use crate::api::types::{Extent, Seconds};
use crate::renderer::instance::{InstanceBuffer, InstanceKind, ParticleInstance};

/// Per-frame reports from the stateful effects. `None` for disabled effects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectsReport {
    pub fireworks: Option<FrameReport>,
    pub precipitation: Option<FrameReport>,
}

/// Container for every effect the host enabled, plus the buffers the presenter reads.
///
/// The effects never interact: each owns its particles, clock and random stream.
/// `tick` mutates, `rebuild_buffers` snapshots; call them in that order on the same
/// frame and the presenter always sees a complete frame.
pub struct EffectsState {
    pub fireworks: Option<BurstSimulation>,
    pub precipitation: Option<AmbientSimulation>,
    pub beams: Option<BeamField>,
    pub rings: Option<RingField>,
    pub spotlights: Option<SpotlightField>,
    pub instances: InstanceBuffer,
    /// Beam triangles, `VERTEX_FLOATS` per vertex.
    pub vertex_buffer: Vec<f32>,
    max_vertices: usize,
    now: Seconds,
    audio_level: f32,
    extent: Extent,
    beam_scratch: Vec<Beam>,
    ring_scratch: Vec<Ring>,
    spotlight_scratch: Vec<Spotlight>,
    strip_scratch: Vec<f32>,
    overflow_reported: bool,
}

impl EffectsState {
    /// Build every enabled effect. Invalid configuration is rejected here, before
    /// any frame runs.
    pub fn new(config: &EffectsConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut root = Rng::new(seed.wrapping_add(7919));

        let fireworks = match &config.fireworks {
            Some(c) => Some(BurstSimulation::new(c.clone(), root.fork(1))?),
            None => None,
        };
        let precipitation = match &config.precipitation {
            Some(c) => Some(AmbientSimulation::new(c.clone(), root.fork(2))?),
            None => None,
        };
        let beams = config.beams.clone().map(BeamField::new).transpose()?;
        let rings = config.rings.clone().map(RingField::new).transpose()?;
        let spotlights = config.spotlights.clone().map(SpotlightField::new).transpose()?;

        Ok(EffectsState {
            fireworks,
            precipitation,
            beams,
            rings,
            spotlights,
            instances: InstanceBuffer::with_capacity(config.max_instances),
            vertex_buffer: Vec::with_capacity(config.max_vertices * VERTEX_FLOATS),
            max_vertices: config.max_vertices,
            now: 0.0,
            audio_level: 0.0,
            extent: Extent::UNMEASURED,
            beam_scratch: Vec::new(),
            ring_scratch: Vec::new(),
            spotlight_scratch: Vec::new(),
            strip_scratch: Vec::new(),
            overflow_reported: false,
        })
    }

    /// Advance every stateful effect to `now`.
    pub fn tick(&mut self, now: Seconds, audio_level: f32, extent: Extent) -> EffectsReport {
        self.now = self.now.max(now);
        self.audio_level = audio_level;
        self.extent = extent;
        EffectsReport {
            fireworks: self.fireworks.as_mut().map(|s| s.update(now, audio_level, extent)),
            precipitation: self.precipitation.as_mut().map(|s| s.update(now, audio_level, extent)),
        }
    }

    /// Fire a burst at `origin` at the current frame time. Returns particles added
    /// (0 when fireworks are disabled).
    pub fn launch_at(&mut self, origin: Vec2) -> usize {
        let now = self.now;
        self.fireworks.as_mut().map_or(0, |s| s.launch_at(now, origin))
    }

    pub fn now(&self) -> Seconds {
        self.now
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Rebuild the presenter snapshot from the state left by the last `tick`.
    pub fn rebuild_buffers(&mut self) {
        self.instances.clear();
        self.vertex_buffer.clear();
        let now = self.now;

        if let Some(spotlights) = &self.spotlights {
            self.spotlight_scratch.clear();
            spotlights.spotlights(now, self.audio_level, self.extent, &mut self.spotlight_scratch);
            for s in &self.spotlight_scratch {
                self.instances.push(ParticleInstance {
                    x: s.center.x,
                    y: s.center.y,
                    radius: s.radius,
                    rotation: 0.0,
                    hue: s.hue,
                    alpha: s.alpha,
                    length: 0.0,
                    kind: InstanceKind::Spotlight as u8 as f32,
                });
            }
        }

        if let Some(rings) = &self.rings {
            self.ring_scratch.clear();
            rings.rings(now, self.audio_level, self.extent, &mut self.ring_scratch);
            for r in &self.ring_scratch {
                self.instances.push(ParticleInstance {
                    x: r.center.x,
                    y: r.center.y,
                    radius: r.radius,
                    rotation: 0.0,
                    hue: r.hue,
                    alpha: r.alpha,
                    length: r.line_width,
                    kind: InstanceKind::Ring as u8 as f32,
                });
            }
        }

        if let Some(sim) = &self.precipitation {
            let kind = match sim.config().kind {
                AmbientKind::Snow => InstanceKind::Snowflake,
                AmbientKind::Rain => InstanceKind::Raindrop,
            };
            for p in sim.particles() {
                let rotation = match kind {
                    InstanceKind::Raindrop => p.velocity.y.atan2(p.velocity.x),
                    _ => p.rotation_at(now),
                };
                self.instances.push(ParticleInstance {
                    x: p.position.x,
                    y: p.position.y,
                    radius: p.radius,
                    rotation,
                    hue: p.hue,
                    alpha: p.opacity,
                    length: p.length,
                    kind: kind as u8 as f32,
                });
            }
        }

        if let Some(sim) = &self.fireworks {
            let fade = sim.config().fade;
            for p in sim.particles() {
                self.instances.push(ParticleInstance {
                    x: p.position.x,
                    y: p.position.y,
                    radius: p.radius,
                    rotation: p.rotation_at(now),
                    hue: p.hue,
                    alpha: p.opacity * fade.fade_out(p.age_fraction(now)),
                    length: p.length,
                    kind: InstanceKind::Spark as u8 as f32,
                });
            }
        }

        if let Some(beams) = &self.beams {
            self.beam_scratch.clear();
            beams.beams(now, self.audio_level, self.extent, &mut self.beam_scratch);
            let limit = self.max_vertices * VERTEX_FLOATS;
            for b in &self.beam_scratch {
                self.strip_scratch.clear();
                build_strip_vertices(
                    &[b.origin, b.tip],
                    b.width,
                    b.hue,
                    b.alpha,
                    &mut self.strip_scratch,
                );
                let before = self.vertex_buffer.len();
                strip_to_triangles(&self.strip_scratch, VERTEX_FLOATS, &mut self.vertex_buffer);
                if self.vertex_buffer.len() > limit {
                    self.vertex_buffer.truncate(before);
                    break;
                }
            }
        }

        if self.instances.dropped() > 0 && !self.overflow_reported {
            log::warn!(
                "instance buffer full ({}); dropped {} this frame",
                self.instances.capacity(),
                self.instances.dropped()
            );
            self.overflow_reported = true;
        }
    }

    /// Number of live particles across all particle effects.
    pub fn particle_count(&self) -> usize {
        self.fireworks.as_ref().map_or(0, |s| s.particles().len())
            + self.precipitation.as_ref().map_or(0, |s| s.particles().len())
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.instance_count()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_buffer.len() / VERTEX_FLOATS
    }

    pub fn max_instances(&self) -> usize {
        self.instances.capacity()
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.instances_ptr()
    }

    pub fn vertex_buffer_ptr(&self) -> *const f32 {
        self.vertex_buffer.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{AmbientConfig, BurstConfig, FloatRange, RingConfig};

    const EXTENT: Extent = Extent { width: 640.0, height: 480.0 };

    #[test]
    fn effects_state_runs_all_effects() {
        let mut effects = EffectsState::new(&EffectsConfig::default(), 42).unwrap();
        effects.tick(0.0, 0.0, EXTENT);
        for frame in 1..=120 {
            effects.tick(frame as f64 / 60.0, 0.3, EXTENT);
        }
        effects.rebuild_buffers();
        assert!(effects.instance_count() >= 150, "snow alone is 150 instances");
        assert!(effects.vertex_count() > 0, "beams produce geometry");
    }

    #[test]
    fn disabled_effects_report_none() {
        let config = EffectsConfig {
            fireworks: None,
            precipitation: None,
            beams: None,
            ..EffectsConfig::default()
        };
        let mut effects = EffectsState::new(&config, 1).unwrap();
        let report = effects.tick(0.0, 0.0, EXTENT);
        assert_eq!(report, EffectsReport::default());
        assert_eq!(effects.launch_at(Vec2::new(1.0, 1.0)), 0);
        effects.rebuild_buffers();
        assert_eq!(effects.instance_count(), 0);
        assert_eq!(effects.vertex_count(), 0);
    }

    #[test]
    fn invalid_nested_config_rejected() {
        let config = EffectsConfig {
            precipitation: Some(AmbientConfig {
                opacity: FloatRange::new(1.0, 0.2),
                ..AmbientConfig::snowfall()
            }),
            ..EffectsConfig::default()
        };
        assert!(EffectsState::new(&config, 1).is_err());
    }

    #[test]
    fn oversized_capacity_rejected_before_allocating() {
        let config = EffectsConfig { max_vertices: usize::MAX, ..EffectsConfig::default() };
        assert!(matches!(
            EffectsState::new(&config, 1),
            Err(ConfigError::TooLarge { field: "max_vertices", .. })
        ));
    }

    #[test]
    fn launch_at_produces_fading_sparks() {
        let config = EffectsConfig {
            fireworks: Some(BurstConfig {
                particles_per_firework: 8,
                launch_interval: None,
                audio_threshold: None,
                lifespan: FloatRange::fixed(2.0),
                opacity: FloatRange::fixed(1.0),
                ..BurstConfig::fireworks()
            }),
            precipitation: None,
            beams: None,
            ..EffectsConfig::default()
        };
        let mut effects = EffectsState::new(&config, 9).unwrap();
        effects.tick(0.0, 0.0, EXTENT);
        assert_eq!(effects.launch_at(Vec2::new(320.0, 200.0)), 8);

        effects.rebuild_buffers();
        let fresh: Vec<f32> = effects.instances.instances.iter().map(|i| i.alpha).collect();
        assert!(fresh.iter().all(|a| (*a - 1.0).abs() < 1e-5));

        effects.tick(1.5, 0.0, EXTENT);
        effects.rebuild_buffers();
        assert_eq!(effects.instance_count(), 8);
        for inst in &effects.instances.instances {
            assert!(inst.alpha < 1.0);
            assert_eq!(inst.kind, InstanceKind::Spark as u8 as f32);
        }
    }

    #[test]
    fn rings_and_spotlights_become_instances() {
        let config = EffectsConfig {
            fireworks: None,
            precipitation: None,
            beams: None,
            rings: Some(RingConfig::default()),
            spotlights: Some(Default::default()),
            ..EffectsConfig::default()
        };
        let mut effects = EffectsState::new(&config, 3).unwrap();
        effects.tick(0.7, 0.2, EXTENT);
        effects.rebuild_buffers();
        assert_eq!(effects.instance_count(), 6);
    }

    #[test]
    fn buffers_respect_capacities() {
        let config = EffectsConfig {
            max_instances: 10,
            max_vertices: 6,
            ..EffectsConfig::default()
        };
        let mut effects = EffectsState::new(&config, 5).unwrap();
        effects.tick(0.0, 0.0, EXTENT);
        effects.rebuild_buffers();
        assert_eq!(effects.instance_count(), 10);
        // One beam is two triangles = 6 vertices; the rest are refused.
        assert_eq!(effects.vertex_count(), 6);
    }

    #[test]
    fn same_seed_same_frames() {
        let run = || {
            let mut effects = EffectsState::new(&EffectsConfig::default(), 77).unwrap();
            for frame in 0..90 {
                effects.tick(frame as f64 / 30.0, ((frame % 7) as f32) / 7.0, EXTENT);
            }
            effects.rebuild_buffers();
            effects.instances.instances.clone()
        };
        assert_eq!(run(), run());
    }
}
