//! Effect configuration.
//!
//! Every knob is a named numeric parameter with a default. Configs are plain serde
//! structs so a host can ship them as JSON; partial documents fall back to defaults.
//! Nothing is checked at runtime: [`validate`](EffectsConfig::validate) runs once, when
//! the simulations are constructed.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::api::error::ConfigError;
use crate::extensions::easing::Easing;
use crate::systems::effects::{ColorMode, RandomSource};

/// Closed interval a value is drawn from uniformly. Serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct FloatRange {
    pub min: f32,
    pub max: f32,
}

impl FloatRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    pub const fn fixed(value: f32) -> Self {
        Self { min: value, max: value }
    }

    pub fn sample<R: RandomSource>(&self, rng: &mut R) -> f32 {
        rng.range(self.min, self.max)
    }

    /// Both ends finite and `min <= max`.
    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        check_finite(field, self.min)?;
        check_finite(field, self.max)?;
        if self.min > self.max {
            return Err(ConfigError::InvalidRange { field, min: self.min, max: self.max });
        }
        Ok(())
    }

    /// As [`validate`](Self::validate), and the range must not reach below zero.
    pub fn validate_non_negative(&self, field: &'static str) -> Result<(), ConfigError> {
        self.validate(field)?;
        check_non_negative(field, self.min)
    }
}

impl From<(f32, f32)> for FloatRange {
    fn from((min, max): (f32, f32)) -> Self {
        Self { min, max }
    }
}

impl From<FloatRange> for (f32, f32) {
    fn from(r: FloatRange) -> Self {
        (r.min, r.max)
    }
}

/// Upper bound for `max_instances` and `max_vertices`.
pub const MAX_CAPACITY: usize = 1 << 20;
/// Upper bound for ambient population size and particles per burst.
pub const MAX_POPULATION: u32 = 100_000;
/// Upper bound for beam, ring and spotlight counts.
pub const MAX_SHAPES: u32 = 1024;

fn check_at_most(field: &'static str, value: u64, max: u64) -> Result<(), ConfigError> {
    if value > max {
        return Err(ConfigError::TooLarge { field, value, max });
    }
    Ok(())
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    check_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

// ---- Burst effects ----

/// Fireworks: discrete bursts that fall under gravity and expire by lifespan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Particles per burst.
    pub particles_per_firework: u32,
    /// Downward acceleration in units/s² (screen y grows downward).
    pub gravity: f32,
    /// Seconds between scheduled launches. `None` disables the timer.
    pub launch_interval: Option<FloatRange>,
    /// Minimum frame-to-frame rise in audio level that fires a burst. `None` disables it.
    pub audio_threshold: Option<f32>,
    /// Initial speed magnitude in units/s.
    pub speed: FloatRange,
    /// Extra launch speed per unit of audio level at spawn time.
    pub audio_speed_boost: f32,
    /// Particle lifespan in seconds.
    pub lifespan: FloatRange,
    /// Launch direction range in radians. `[0, τ]` is a full circle.
    pub angle: FloatRange,
    pub radius: FloatRange,
    pub opacity: FloatRange,
    /// Rotation speed in rad/s (sign picks the direction).
    pub spin: FloatRange,
    /// Per-particle hue offset around the burst's base hue, in degrees.
    pub hue_jitter: f32,
    pub color_mode: ColorMode,
    /// Horizontal spawn band as fractions of the canvas width.
    pub origin_x: FloatRange,
    /// Vertical spawn band as fractions of the canvas height.
    pub origin_y: FloatRange,
    /// Opacity curve over the particle's age fraction.
    pub fade: Easing,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self::fireworks()
    }
}

impl BurstConfig {
    pub fn fireworks() -> Self {
        Self {
            particles_per_firework: 60,
            gravity: 120.0,
            launch_interval: Some(FloatRange::new(0.8, 2.0)),
            audio_threshold: Some(0.08),
            speed: FloatRange::new(60.0, 220.0),
            audio_speed_boost: 0.6,
            lifespan: FloatRange::new(0.9, 1.8),
            angle: FloatRange::new(0.0, TAU),
            radius: FloatRange::new(1.2, 3.0),
            opacity: FloatRange::new(0.7, 1.0),
            spin: FloatRange::new(-6.0, 6.0),
            hue_jitter: 18.0,
            color_mode: ColorMode::Random,
            origin_x: FloatRange::new(0.15, 0.85),
            origin_y: FloatRange::new(0.15, 0.5),
            fade: Easing::CubicIn,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_at_most(
            "particles_per_firework",
            self.particles_per_firework.into(),
            MAX_POPULATION.into(),
        )?;
        check_non_negative("gravity", self.gravity)?;
        if let Some(interval) = &self.launch_interval {
            interval.validate_non_negative("launch_interval")?;
        }
        if let Some(threshold) = self.audio_threshold {
            check_non_negative("audio_threshold", threshold)?;
        }
        self.speed.validate_non_negative("speed")?;
        check_non_negative("audio_speed_boost", self.audio_speed_boost)?;
        self.lifespan.validate_non_negative("lifespan")?;
        self.angle.validate("angle")?;
        self.radius.validate_non_negative("radius")?;
        self.opacity.validate_non_negative("opacity")?;
        self.spin.validate("spin")?;
        check_non_negative("hue_jitter", self.hue_jitter)?;
        validate_color_mode("color_mode", &self.color_mode)?;
        self.origin_x.validate_non_negative("origin_x")?;
        self.origin_y.validate_non_negative("origin_y")?;
        Ok(())
    }
}

fn validate_color_mode(field: &'static str, mode: &ColorMode) -> Result<(), ConfigError> {
    match mode {
        ColorMode::Random => Ok(()),
        ColorMode::Fixed(hue) => check_finite(field, *hue),
        ColorMode::Palette(hues) => {
            if hues.is_empty() {
                return Err(ConfigError::EmptyPalette { field });
            }
            hues.iter().try_for_each(|h| check_finite(field, *h))
        }
    }
}

// ---- Ambient effects ----

/// What an ambient population looks like to the presenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientKind {
    #[default]
    Snow,
    Rain,
}

/// Falling precipitation: a constant population that wraps and recycles forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub kind: AmbientKind,
    /// Population size, held exactly on every frame after seeding.
    pub count: u32,
    /// Initial downward speed in units/s.
    pub fall_speed: FloatRange,
    /// Initial horizontal speed in units/s (negative drifts left).
    pub drift: FloatRange,
    /// Constant horizontal acceleration in units/s².
    pub wind: f32,
    /// Vertical speed multiplier per unit of audio level: `1 + audio * audio_boost`.
    pub audio_boost: f32,
    pub radius: FloatRange,
    pub opacity: FloatRange,
    /// Streak length drawn behind the particle (0 for round flakes).
    pub length: FloatRange,
    pub spin: FloatRange,
    pub hue: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self::snowfall()
    }
}

impl AmbientConfig {
    pub fn snowfall() -> Self {
        Self {
            kind: AmbientKind::Snow,
            count: 150,
            fall_speed: FloatRange::new(30.0, 80.0),
            drift: FloatRange::new(-15.0, 15.0),
            wind: 4.0,
            audio_boost: 1.5,
            radius: FloatRange::new(1.5, 4.0),
            opacity: FloatRange::new(0.5, 1.0),
            length: FloatRange::fixed(0.0),
            spin: FloatRange::new(-1.0, 1.0),
            hue: 210.0,
        }
    }

    pub fn rainfall() -> Self {
        Self {
            kind: AmbientKind::Rain,
            count: 220,
            fall_speed: FloatRange::new(450.0, 750.0),
            drift: FloatRange::new(-40.0, -20.0),
            wind: -10.0,
            audio_boost: 1.2,
            radius: FloatRange::new(0.6, 1.2),
            opacity: FloatRange::new(0.25, 0.6),
            length: FloatRange::new(8.0, 18.0),
            spin: FloatRange::fixed(0.0),
            hue: 205.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_at_most("count", self.count.into(), MAX_POPULATION.into())?;
        self.fall_speed.validate_non_negative("fall_speed")?;
        self.drift.validate("drift")?;
        check_finite("wind", self.wind)?;
        check_non_negative("audio_boost", self.audio_boost)?;
        self.radius.validate_non_negative("radius")?;
        self.opacity.validate_non_negative("opacity")?;
        self.length.validate_non_negative("length")?;
        self.spin.validate("spin")?;
        check_finite("hue", self.hue)?;
        Ok(())
    }
}

// ---- Stateless procedural effects ----

/// Light beams anchored along the bottom edge, sweeping side to side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamConfig {
    pub count: u32,
    /// Base beam width in units.
    pub width: f32,
    pub audio_width_boost: f32,
    /// Beam length as a fraction of the canvas height.
    pub length: f32,
    pub audio_length_boost: f32,
    /// Sweep angular frequency in rad/s.
    pub sweep_speed: f32,
    /// Maximum deviation from vertical in radians.
    pub sweep_amplitude: f32,
    pub hue: f32,
    /// Hue rotation in degrees per second.
    pub hue_speed: f32,
    pub opacity: f32,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            count: 4,
            width: 6.0,
            audio_width_boost: 2.0,
            length: 0.9,
            audio_length_boost: 0.2,
            sweep_speed: 0.6,
            sweep_amplitude: 0.6,
            hue: 280.0,
            hue_speed: 20.0,
            opacity: 0.35,
        }
    }
}

impl BeamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_at_most("beam count", self.count.into(), MAX_SHAPES.into())?;
        check_non_negative("beam width", self.width)?;
        check_non_negative("audio_width_boost", self.audio_width_boost)?;
        check_non_negative("beam length", self.length)?;
        check_non_negative("audio_length_boost", self.audio_length_boost)?;
        check_finite("sweep_speed", self.sweep_speed)?;
        check_non_negative("sweep_amplitude", self.sweep_amplitude)?;
        check_finite("beam hue", self.hue)?;
        check_finite("hue_speed", self.hue_speed)?;
        check_non_negative("beam opacity", self.opacity)?;
        Ok(())
    }
}

/// Rings expanding from the canvas center on a fixed period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Rings in flight at once, evenly staggered over one period.
    pub count: u32,
    /// Seconds for one ring to grow from zero to full radius.
    pub period: f32,
    /// Full radius as a fraction of the canvas's shorter side.
    pub max_radius: f32,
    pub line_width: f32,
    pub audio_boost: f32,
    pub hue: f32,
    pub opacity: f32,
    pub fade: Easing,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            count: 3,
            period: 2.5,
            max_radius: 0.45,
            line_width: 3.0,
            audio_boost: 0.5,
            hue: 190.0,
            opacity: 0.8,
            fade: Easing::QuadOut,
        }
    }
}

impl RingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_at_most("ring count", self.count.into(), MAX_SHAPES.into())?;
        check_positive("ring period", self.period)?;
        check_non_negative("max_radius", self.max_radius)?;
        check_non_negative("line_width", self.line_width)?;
        check_non_negative("ring audio_boost", self.audio_boost)?;
        check_finite("ring hue", self.hue)?;
        check_non_negative("ring opacity", self.opacity)?;
        Ok(())
    }
}

/// Soft discs drifting over the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotlightConfig {
    pub count: u32,
    /// Radius as a fraction of the canvas's shorter side.
    pub radius: f32,
    /// Angular frequency of the drift path in rad/s.
    pub drift_speed: f32,
    pub audio_boost: f32,
    pub hue: f32,
    /// Hue offset between consecutive spotlights, in degrees.
    pub hue_step: f32,
    pub opacity: f32,
}

impl Default for SpotlightConfig {
    fn default() -> Self {
        Self {
            count: 3,
            radius: 0.18,
            drift_speed: 0.25,
            audio_boost: 0.6,
            hue: 45.0,
            hue_step: 90.0,
            opacity: 0.25,
        }
    }
}

impl SpotlightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_at_most("spotlight count", self.count.into(), MAX_SHAPES.into())?;
        check_non_negative("spotlight radius", self.radius)?;
        check_finite("drift_speed", self.drift_speed)?;
        check_non_negative("spotlight audio_boost", self.audio_boost)?;
        check_finite("spotlight hue", self.hue)?;
        check_finite("hue_step", self.hue_step)?;
        check_non_negative("spotlight opacity", self.opacity)?;
        Ok(())
    }
}

// ---- Top level ----

/// Which effects run and how. Absent (`null`) entries are disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub fireworks: Option<BurstConfig>,
    pub precipitation: Option<AmbientConfig>,
    pub beams: Option<BeamConfig>,
    pub rings: Option<RingConfig>,
    pub spotlights: Option<SpotlightConfig>,
    /// Capacity of the particle instance snapshot.
    pub max_instances: usize,
    /// Capacity of the beam vertex snapshot.
    pub max_vertices: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            fireworks: Some(BurstConfig::fireworks()),
            precipitation: Some(AmbientConfig::snowfall()),
            beams: Some(BeamConfig::default()),
            rings: None,
            spotlights: None,
            max_instances: 4096,
            max_vertices: 8192,
        }
    }
}

impl EffectsConfig {
    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EffectsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(c) = &self.fireworks {
            c.validate()?;
        }
        if let Some(c) = &self.precipitation {
            c.validate()?;
        }
        if let Some(c) = &self.beams {
            c.validate()?;
        }
        if let Some(c) = &self.rings {
            c.validate()?;
        }
        if let Some(c) = &self.spotlights {
            c.validate()?;
        }
        if self.max_instances == 0 {
            return Err(ConfigError::ZeroCapacity { field: "max_instances" });
        }
        if self.max_vertices == 0 {
            return Err(ConfigError::ZeroCapacity { field: "max_vertices" });
        }
        check_at_most("max_instances", self.max_instances as u64, MAX_CAPACITY as u64)?;
        check_at_most("max_vertices", self.max_vertices as u64, MAX_CAPACITY as u64)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EffectsConfig::default().validate().unwrap();
        AmbientConfig::rainfall().validate().unwrap();
        RingConfig::default().validate().unwrap();
        SpotlightConfig::default().validate().unwrap();
    }

    #[test]
    fn inverted_range_rejected() {
        let config = BurstConfig {
            launch_interval: Some(FloatRange::new(2.0, 1.0)),
            ..BurstConfig::fireworks()
        };
        match config.validate() {
            Err(ConfigError::InvalidRange { field, .. }) => assert_eq!(field, "launch_interval"),
            other => panic!("expected InvalidRange, got {other:?}"),
        }
    }

    #[test]
    fn negative_gravity_rejected() {
        let config = BurstConfig { gravity: -1.0, ..BurstConfig::fireworks() };
        assert!(matches!(config.validate(), Err(ConfigError::Negative { field: "gravity", .. })));
    }

    #[test]
    fn negative_fall_speed_rejected() {
        let config = AmbientConfig {
            fall_speed: FloatRange::new(-5.0, 10.0),
            ..AmbientConfig::snowfall()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Negative { .. })));
    }

    #[test]
    fn nan_rejected() {
        let config = AmbientConfig { wind: f32::NAN, ..AmbientConfig::snowfall() };
        assert!(matches!(config.validate(), Err(ConfigError::NonFinite { field: "wind", .. })));
    }

    #[test]
    fn empty_palette_rejected() {
        let config = BurstConfig {
            color_mode: ColorMode::Palette(Vec::new()),
            ..BurstConfig::fireworks()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPalette { .. })));
    }

    #[test]
    fn zero_ring_period_rejected() {
        let config = RingConfig { period: 0.0, ..RingConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));
    }

    #[test]
    fn parse_partial_json() {
        let json = r#"{
            "fireworks": { "particles_per_firework": 10, "launch_interval": [1.0, 1.0] },
            "precipitation": null,
            "rings": { "period": 4.0 }
        }"#;
        let config = EffectsConfig::from_json(json).unwrap();
        let fireworks = config.fireworks.unwrap();
        assert_eq!(fireworks.particles_per_firework, 10);
        assert_eq!(fireworks.launch_interval, Some(FloatRange::fixed(1.0)));
        assert_eq!(fireworks.gravity, BurstConfig::fireworks().gravity);
        assert!(config.precipitation.is_none());
        assert_eq!(config.rings.unwrap().period, 4.0);
        assert!(config.beams.is_some());
    }

    #[test]
    fn negative_count_is_a_json_error() {
        let json = r#"{ "precipitation": { "count": -3 } }"#;
        assert!(matches!(EffectsConfig::from_json(json), Err(ConfigError::Json(_))));
    }

    #[test]
    fn invalid_json_config_fails_fast() {
        let json = r#"{ "fireworks": { "lifespan": [2.0, 0.5] } }"#;
        assert!(matches!(
            EffectsConfig::from_json(json),
            Err(ConfigError::InvalidRange { field: "lifespan", .. })
        ));
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = EffectsConfig { max_instances: 0, ..EffectsConfig::default() };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroCapacity { .. })));
    }

    #[test]
    fn huge_capacity_rejected() {
        let json = r#"{ "max_vertices": 18446744073709551615 }"#;
        assert!(matches!(
            EffectsConfig::from_json(json),
            Err(ConfigError::TooLarge { field: "max_vertices", .. })
        ));
        let config = EffectsConfig { max_instances: MAX_CAPACITY + 1, ..EffectsConfig::default() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { field: "max_instances", .. })
        ));
        let at_limit = EffectsConfig {
            max_instances: MAX_CAPACITY,
            max_vertices: MAX_CAPACITY,
            ..EffectsConfig::default()
        };
        at_limit.validate().unwrap();
    }

    #[test]
    fn huge_populations_rejected() {
        let json = r#"{ "precipitation": { "count": 4294967295 } }"#;
        assert!(matches!(
            EffectsConfig::from_json(json),
            Err(ConfigError::TooLarge { field: "count", .. })
        ));
        let json = r#"{ "fireworks": { "particles_per_firework": 4294967295 } }"#;
        assert!(matches!(
            EffectsConfig::from_json(json),
            Err(ConfigError::TooLarge { field: "particles_per_firework", .. })
        ));
        let beams = BeamConfig { count: MAX_SHAPES + 1, ..BeamConfig::default() };
        assert!(matches!(beams.validate(), Err(ConfigError::TooLarge { .. })));
    }
}
