use crate::api::types::Seconds;

/// Where a simulation is in its lifecycle. There is no terminal phase:
/// a simulation stays `Steady` until its owner drops it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockPhase {
    Uninitialized,
    Steady { last_update: Seconds },
}

/// What a frame timestamp means for integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// First frame observed: record state, integrate nothing.
    First,
    /// Time advanced by a strictly positive `dt` seconds.
    Step(f32),
    /// Timestamp did not advance (repeated or went backwards). Integrate nothing.
    Stall,
}

/// Derives per-frame `dt` from the host's wall-clock timestamps.
///
/// `dt` is always the difference between consecutive accepted timestamps and is never
/// zero or negative. A timestamp that fails to advance is reported as [`Tick::Stall`]
/// and does not move the recorded time backwards.
#[derive(Debug, Clone)]
pub struct FrameClock {
    phase: ClockPhase,
}

impl FrameClock {
    pub fn new() -> Self {
        Self { phase: ClockPhase::Uninitialized }
    }

    /// Feed the current frame's timestamp.
    pub fn tick(&mut self, now: Seconds) -> Tick {
        match self.phase {
            ClockPhase::Uninitialized => {
                self.phase = ClockPhase::Steady { last_update: now };
                Tick::First
            }
            ClockPhase::Steady { last_update } => {
                let dt = (now - last_update) as f32;
                if dt > 0.0 {
                    self.phase = ClockPhase::Steady { last_update: now };
                    Tick::Step(dt)
                } else {
                    if now < last_update {
                        log::warn!("frame clock went backwards ({now} < {last_update}); holding");
                    }
                    Tick::Stall
                }
            }
        }
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    /// Timestamp of the last accepted frame, if any.
    pub fn last_update(&self) -> Option<Seconds> {
        match self.phase {
            ClockPhase::Uninitialized => None,
            ClockPhase::Steady { last_update } => Some(last_update),
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
