use glam::Vec2;
use pulsefx::{
    ConfigError, EffectsConfig, EffectsReport, EffectsState, Extent, ProtocolLayout, Seconds,
};

/// Drives the effects from the host's animation loop.
///
/// Each `frame` call updates the simulation and then rebuilds the snapshot, in that
/// order, so whatever the host reads between two calls is one complete frame.
pub struct EffectsRunner {
    effects: EffectsState,
    layout: ProtocolLayout,
    frame_counter: u64,
    /// Flat frame buffer in the `ProtocolLayout` format.
    shared: Vec<f32>,
    last_report: EffectsReport,
}

impl EffectsRunner {
    pub fn new(config: &EffectsConfig, seed: u64) -> Result<Self, ConfigError> {
        let effects = EffectsState::new(config, seed)?;
        let layout = ProtocolLayout::from_config(config)?;
        let shared = vec![0.0; layout.buffer_total_floats];
        Ok(Self {
            effects,
            layout,
            frame_counter: 0,
            shared,
            last_report: EffectsReport::default(),
        })
    }

    /// Build from a JSON config. An empty string means all defaults.
    pub fn from_json(json: &str, seed: u64) -> Result<Self, ConfigError> {
        let config = if json.trim().is_empty() {
            EffectsConfig::default()
        } else {
            EffectsConfig::from_json(json)?
        };
        Self::new(&config, seed)
    }

    /// Run one animation frame. `now` is in seconds on the host's monotonic clock.
    pub fn frame(&mut self, now: Seconds, audio_level: f32, width: f32, height: f32) {
        self.last_report = self.effects.tick(now, audio_level, Extent::new(width, height));
        self.effects.rebuild_buffers();
        self.layout.pack(self.frame_counter, &self.effects, &mut self.shared);
        self.frame_counter += 1;
    }

    /// Fire a burst at a canvas position (e.g. a click). Shows up on the next frame.
    pub fn launch(&mut self, x: f32, y: f32) -> u32 {
        self.effects.launch_at(Vec2::new(x, y)) as u32
    }

    pub fn last_report(&self) -> &EffectsReport {
        &self.last_report
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }

    // ---- Pointer accessors for shared-memory reads ----

    pub fn frame_buffer_ptr(&self) -> *const f32 {
        self.shared.as_ptr()
    }

    pub fn frame_buffer_len(&self) -> u32 {
        self.shared.len() as u32
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.effects.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.effects.instance_count()
    }

    pub fn vertices_ptr(&self) -> *const f32 {
        self.effects.vertex_buffer_ptr()
    }

    pub fn vertex_count(&self) -> u32 {
        self.effects.vertex_count() as u32
    }

    pub fn particle_count(&self) -> u32 {
        self.effects.particle_count() as u32
    }

    // ---- Capacity accessors ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_vertices(&self) -> u32 {
        self.layout.max_vertices as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsefx::bridge::protocol::{HEADER_FRAME_COUNTER, HEADER_INSTANCE_COUNT};

    #[test]
    fn frame_packs_shared_buffer() {
        let mut runner = EffectsRunner::from_json("", 1).unwrap();
        runner.frame(0.0, 0.0, 640.0, 480.0);
        runner.frame(1.0 / 60.0, 0.1, 640.0, 480.0);
        assert_eq!(runner.frame_counter(), 2);
        assert_eq!(runner.frame_buffer_len(), runner.buffer_total_floats());
        assert!(runner.instance_count() > 0);

        let header = unsafe { std::slice::from_raw_parts(runner.frame_buffer_ptr(), 16) };
        assert_eq!(header[HEADER_FRAME_COUNTER], 1.0);
        assert_eq!(header[HEADER_INSTANCE_COUNT], runner.instance_count() as f32);
    }

    #[test]
    fn launch_adds_particles() {
        let mut runner = EffectsRunner::from_json(r#"{ "precipitation": null }"#, 2).unwrap();
        runner.frame(0.0, 0.0, 640.0, 480.0);
        let added = runner.launch(100.0, 100.0);
        assert_eq!(added, 60);
        runner.frame(0.016, 0.0, 640.0, 480.0);
        assert!(runner.particle_count() >= 60);
    }

    #[test]
    fn bad_json_is_rejected() {
        assert!(EffectsRunner::from_json("{ not json", 3).is_err());
        assert!(EffectsRunner::from_json(r#"{ "max_vertices": 0 }"#, 3).is_err());
        let huge = r#"{ "max_vertices": 18446744073709551615 }"#;
        assert!(matches!(
            EffectsRunner::from_json(huge, 3),
            Err(ConfigError::TooLarge { field: "max_vertices", .. })
        ));
    }

    #[test]
    fn last_report_tracks_latest_frame() {
        let json = r#"{ "fireworks": null, "precipitation": { "count": 12 } }"#;
        let mut runner = EffectsRunner::from_json(json, 5).unwrap();
        assert_eq!(*runner.last_report(), EffectsReport::default());

        runner.frame(0.0, 0.0, 640.0, 480.0);
        let seeded = runner.last_report().precipitation.unwrap();
        assert!(seeded.reseeded);
        assert!(runner.last_report().fireworks.is_none());

        runner.frame(0.5, 0.0, 640.0, 480.0);
        let stepped = runner.last_report().precipitation.unwrap();
        assert!(!stepped.reseeded);
        assert_eq!(stepped.dt, Some(0.5));
    }

    #[test]
    fn unmeasured_canvas_draws_nothing() {
        let mut runner = EffectsRunner::from_json("", 4).unwrap();
        runner.frame(0.0, 0.0, 0.0, 0.0);
        runner.frame(0.5, 0.9, 0.0, 0.0);
        assert_eq!(runner.instance_count(), 0);
        assert_eq!(runner.vertex_count(), 0);
    }
}
