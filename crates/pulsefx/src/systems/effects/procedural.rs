//! Stateless procedural effects: beams, rings and spotlights.
//!
//! Each shape is a pure function of the timestamp, the audio level and the canvas
//! extent. There is nothing to integrate and nothing to seed, so these effects
//! have no clock and no lifecycle.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use crate::api::config::{BeamConfig, RingConfig, SpotlightConfig};
use crate::api::error::ConfigError;
use crate::api::types::{Extent, Seconds};
use super::color::wrap_hue;

/// One light beam from an anchor on the bottom edge to its tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    pub origin: Vec2,
    pub tip: Vec2,
    /// Half-width in units.
    pub width: f32,
    pub hue: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct BeamField {
    config: BeamConfig,
}

impl BeamField {
    pub fn new(config: BeamConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BeamConfig {
        &self.config
    }

    /// Append this frame's beams to `out`. Nothing is produced for an unmeasured canvas.
    pub fn beams(&self, now: Seconds, audio_level: f32, extent: Extent, out: &mut Vec<Beam>) {
        if !extent.is_measured() || self.config.count == 0 {
            return;
        }
        let c = &self.config;
        let t = now as f32;
        let n = c.count as f32;
        let level = audio_level.max(0.0);
        let length = c.length * extent.height * (1.0 + level * c.audio_length_boost);
        let width = c.width * (1.0 + level * c.audio_width_boost);

        for i in 0..c.count {
            let fi = i as f32;
            let origin = Vec2::new((fi + 0.5) / n * extent.width, extent.height);
            // Screen y points down, so straight up is -π/2.
            let angle = -FRAC_PI_2 + c.sweep_amplitude * (t * c.sweep_speed + fi * TAU / n).sin();
            out.push(Beam {
                origin,
                tip: origin + Vec2::from_angle(angle) * length,
                width,
                hue: wrap_hue(c.hue + c.hue_speed * t + fi * 360.0 / n),
                alpha: c.opacity,
            });
        }
    }
}

/// One expanding ring around the canvas center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ring {
    pub center: Vec2,
    pub radius: f32,
    pub line_width: f32,
    pub hue: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct RingField {
    config: RingConfig,
}

impl RingField {
    pub fn new(config: RingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Growth phase in [0, 1) of ring `index` at `now`.
    pub fn phase(&self, now: Seconds, index: u32) -> f32 {
        let c = &self.config;
        let offset = index as f64 / c.count.max(1) as f64;
        (now / c.period as f64 + offset).rem_euclid(1.0) as f32
    }

    pub fn rings(&self, now: Seconds, audio_level: f32, extent: Extent, out: &mut Vec<Ring>) {
        if !extent.is_measured() {
            return;
        }
        let c = &self.config;
        let full = c.max_radius * extent.min_side() * (1.0 + audio_level.max(0.0) * c.audio_boost);
        for i in 0..c.count {
            let phase = self.phase(now, i);
            out.push(Ring {
                center: extent.center(),
                radius: phase * full,
                line_width: c.line_width,
                hue: wrap_hue(c.hue),
                alpha: c.opacity * c.fade.fade_out(phase),
            });
        }
    }
}

/// A soft disc drifting over the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spotlight {
    pub center: Vec2,
    pub radius: f32,
    pub hue: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone)]
pub struct SpotlightField {
    config: SpotlightConfig,
}

impl SpotlightField {
    pub fn new(config: SpotlightConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SpotlightConfig {
        &self.config
    }

    pub fn spotlights(
        &self,
        now: Seconds,
        audio_level: f32,
        extent: Extent,
        out: &mut Vec<Spotlight>,
    ) {
        if !extent.is_measured() {
            return;
        }
        let c = &self.config;
        let t = now as f32;
        let reach = Vec2::new(extent.width, extent.height) * 0.35;
        let radius = c.radius * extent.min_side() * (1.0 + audio_level.max(0.0) * c.audio_boost);
        for i in 0..c.count {
            let fi = i as f32;
            // Lissajous path; the per-index factors keep the discs from moving in lockstep.
            let fx = c.drift_speed * (1.0 + 0.37 * fi);
            let fy = c.drift_speed * 0.83 * (1.0 + 0.21 * fi);
            let phase = fi * 2.1;
            let offset = Vec2::new((t * fx + phase).sin(), (t * fy + phase * 0.7).cos());
            out.push(Spotlight {
                center: extent.center() + offset * reach,
                radius,
                hue: wrap_hue(c.hue + c.hue_step * fi),
                alpha: c.opacity,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::effects::{build_strip_vertices, segment_frame};

    const EXTENT: Extent = Extent { width: 800.0, height: 600.0 };

    #[test]
    fn beams_anchor_on_bottom_edge() {
        let field = BeamField::new(BeamConfig::default()).unwrap();
        let mut out = Vec::new();
        field.beams(1.5, 0.0, EXTENT, &mut out);
        assert_eq!(out.len(), 4);
        for b in &out {
            assert_eq!(b.origin.y, 600.0);
            assert!(b.tip.y < b.origin.y, "beams point up");
        }
    }

    #[test]
    fn audio_widens_beams() {
        let field = BeamField::new(BeamConfig::default()).unwrap();
        let (mut quiet, mut loud) = (Vec::new(), Vec::new());
        field.beams(0.0, 0.0, EXTENT, &mut quiet);
        field.beams(0.0, 1.0, EXTENT, &mut loud);
        assert!(loud[0].width > quiet[0].width);
    }

    #[test]
    fn zero_length_beam_geometry_stays_finite() {
        let config = BeamConfig { length: 0.0, ..BeamConfig::default() };
        let field = BeamField::new(config).unwrap();
        let mut out = Vec::new();
        field.beams(0.0, 0.0, EXTENT, &mut out);
        for b in &out {
            assert_eq!(b.origin, b.tip);
            let (dir, lateral) = segment_frame(b.origin, b.tip);
            assert!(dir.is_finite() && lateral.is_finite());
            let mut verts = Vec::new();
            build_strip_vertices(&[b.origin, b.tip], b.width, b.hue, b.alpha, &mut verts);
            assert!(verts.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn nothing_on_unmeasured_canvas() {
        let mut beams = Vec::new();
        BeamField::new(BeamConfig::default())
            .unwrap()
            .beams(0.0, 0.0, Extent::UNMEASURED, &mut beams);
        let mut rings = Vec::new();
        RingField::new(RingConfig::default())
            .unwrap()
            .rings(0.0, 0.0, Extent::UNMEASURED, &mut rings);
        let mut spots = Vec::new();
        SpotlightField::new(SpotlightConfig::default())
            .unwrap()
            .spotlights(0.0, 0.0, Extent::UNMEASURED, &mut spots);
        assert!(beams.is_empty() && rings.is_empty() && spots.is_empty());
    }

    #[test]
    fn rings_are_staggered_and_fade() {
        let field = RingField::new(RingConfig::default()).unwrap();
        let mut out = Vec::new();
        field.rings(0.0, 0.0, EXTENT, &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].radius, 0.0);
        assert!(out[1].radius > out[0].radius);
        assert!(out[2].alpha < out[1].alpha);
    }

    #[test]
    fn ring_phase_wraps_with_period() {
        let field = RingField::new(RingConfig::default()).unwrap();
        let a = field.phase(0.5, 0);
        let b = field.phase(0.5 + 2.5, 0);
        assert!((a - b).abs() < 1e-5);
    }

    #[test]
    fn spotlights_stay_near_canvas() {
        let field = SpotlightField::new(SpotlightConfig::default()).unwrap();
        for step in 0..100 {
            let mut out = Vec::new();
            field.spotlights(step as f64 * 0.37, 0.5, EXTENT, &mut out);
            for s in &out {
                assert!(EXTENT.contains(s.center));
            }
        }
    }

    #[test]
    fn invalid_ring_period_rejected() {
        assert!(RingField::new(RingConfig { period: -1.0, ..RingConfig::default() }).is_err());
    }
}
