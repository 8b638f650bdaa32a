// extensions/mod.rs
//
// Presentation helpers layered on top of the simulation.
// Nothing in here feeds back into particle physics.

pub mod easing;

pub use easing::Easing;
