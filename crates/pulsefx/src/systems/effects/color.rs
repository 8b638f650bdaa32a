//! Hue selection for particles and procedural shapes.
//! Hues are in degrees, `[0, 360)`; the presenter turns them into actual colors.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;

/// How the base hue of a burst is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Any hue on the wheel.
    #[default]
    Random,
    /// Every burst uses the same hue.
    Fixed(f32),
    /// Pick randomly from a palette of hues.
    Palette(Vec<f32>),
}

impl ColorMode {
    /// Draw a base hue for one burst.
    pub fn pick<R: RandomSource>(&self, rng: &mut R) -> f32 {
        match self {
            ColorMode::Random => rng.range(0.0, 360.0),
            ColorMode::Fixed(hue) => wrap_hue(*hue),
            ColorMode::Palette(hues) => {
                if hues.is_empty() {
                    return 0.0;
                }
                wrap_hue(hues[rng.next_int(hues.len() as u32) as usize])
            }
        }
    }
}

/// Normalize any hue into `[0, 360)`.
pub fn wrap_hue(hue: f32) -> f32 {
    let h = hue.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if h >= 360.0 { 0.0 } else { h }
}

/// Offset `base` by a uniform amount in `[-spread, spread)`.
pub fn jitter_hue<R: RandomSource>(base: f32, spread: f32, rng: &mut R) -> f32 {
    if spread <= 0.0 {
        return wrap_hue(base);
    }
    wrap_hue(base + rng.range(-spread, spread))
}
