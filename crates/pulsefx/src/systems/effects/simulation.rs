//! The per-frame contract shared by every stateful effect.

use crate::api::types::{Extent, Seconds};
use crate::core::clock::ClockPhase;
use super::particle::Particle;

/// Summary of what one `update` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// The step integrated this frame, if any.
    pub dt: Option<f32>,
    pub scheduled_bursts: u32,
    pub audio_bursts: u32,
    pub culled: usize,
    pub recycled: usize,
    /// The whole population was regenerated this frame.
    pub reseeded: bool,
}

/// A particle effect driven once per animation frame.
///
/// `update` is the only mutation path. Callers read [`particles`](Simulation::particles)
/// after `update` returns, so a drawn frame never observes a half-updated set.
pub trait Simulation {
    /// Advance to `now` with the current audio level and canvas extent.
    ///
    /// The first call only initializes. Later calls integrate by the time elapsed
    /// since the previous accepted timestamp.
    fn update(&mut self, now: Seconds, audio_level: f32, extent: Extent) -> FrameReport;

    /// Live particles, in a stable order for this frame.
    fn particles(&self) -> &[Particle];

    fn phase(&self) -> ClockPhase;

    /// Canvas extent observed on the most recent frame.
    fn extent(&self) -> Extent;
}
