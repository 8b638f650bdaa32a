//! Audio-reactive overlay effects.
//!
//! Time-stepped particle simulations (fireworks, snowfall, rainfall) and stateless
//! procedural shapes (beams, rings, spotlights), driven once per animation frame by
//! a host timestamp, an audio level in [0, 1] and the measured canvas size.

pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{
    AmbientConfig, AmbientKind, BeamConfig, BurstConfig, EffectsConfig, FloatRange,
    RingConfig, SpotlightConfig,
};
pub use api::error::ConfigError;
pub use api::types::{Extent, Seconds};
pub use core::clock::{ClockPhase, FrameClock, Tick};
pub use renderer::instance::{InstanceBuffer, InstanceKind, ParticleInstance};
pub use bridge::protocol::ProtocolLayout;
pub use systems::effects::{
    AmbientSimulation, Beam, BeamField, BurstSimulation, ColorMode, EffectsReport, EffectsState,
    FrameReport, Particle, RandomSource, Ring, RingField, Rng, Simulation, Spotlight,
    SpotlightField,
};
pub use extensions::Easing;
