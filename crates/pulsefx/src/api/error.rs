//! Construction-time configuration errors.
//!
//! The simulation itself never fails at runtime; every invalid input that can be
//! rejected is rejected here, before any effect is built.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid range for `{field}`: min {min} is greater than max {max}")]
    InvalidRange { field: &'static str, min: f32, max: f32 },

    #[error("`{field}` must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("`{field}` must be strictly positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("`{field}` palette must contain at least one hue")]
    EmptyPalette { field: &'static str },

    #[error("`{field}` capacity must be greater than zero")]
    ZeroCapacity { field: &'static str },

    #[error("`{field}` is {value}, above the limit of {max}")]
    TooLarge { field: &'static str, value: u64, max: u64 },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
