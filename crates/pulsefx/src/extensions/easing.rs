// extensions/easing.rs
//
// Fade curves for presenters. Pure math over a normalized age fraction;
// nothing here touches simulation state.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Shape of a fade over a particle's (or ring's) normalized lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant rate.
    Linear,
    /// Slow start.
    QuadIn,
    /// Slow end.
    #[default]
    QuadOut,
    /// Stronger slow start: sparks stay bright, then vanish late.
    CubicIn,
    /// Stronger slow end.
    CubicOut,
    /// Smooth at both ends.
    SineInOut,
    /// Holds almost fully, then drops off a cliff.
    ExpoIn,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1]. Output is also in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,
            Easing::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * t - 10.0)
                }
            }
        }
    }

    /// Remaining visibility at age fraction `t`: 1 at birth, 0 at end of life.
    #[inline]
    pub fn fade_out(self, t: f32) -> f32 {
        1.0 - self.apply(t)
    }
}
