//! Shared frame buffer layout.
//! Must stay in sync with the host's reader.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 16 floats]
//! [Instances: max_instances × 8 floats]
//! [Beam vertices: max_vertices × 5 floats]
//! ```
//!
//! Capacities are written into the header on every frame.
//! The host reads them from the header to compute offsets dynamically.

use crate::api::config::EffectsConfig;
use crate::api::error::ConfigError;
use crate::renderer::instance::ParticleInstance;
use crate::systems::effects::{EffectsState, VERTEX_FLOATS};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_TIME: usize = 2;
pub const HEADER_CANVAS_WIDTH: usize = 3;
pub const HEADER_CANVAS_HEIGHT: usize = 4;
pub const HEADER_MAX_INSTANCES: usize = 5;
pub const HEADER_INSTANCE_COUNT: usize = 6;
pub const HEADER_MAX_VERTICES: usize = 7;
pub const HEADER_VERTEX_COUNT: usize = 8;
pub const HEADER_PARTICLE_COUNT: usize = 9;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum particle instances.
    pub max_instances: usize,
    /// Maximum beam vertices.
    pub max_vertices: usize,

    /// Size of instance data section in floats.
    pub instance_data_floats: usize,
    /// Size of vertex data section in floats.
    pub vertex_data_floats: usize,

    /// Offset (in floats) where instance data begins.
    pub instance_data_offset: usize,
    /// Offset (in floats) where vertex data begins.
    pub vertex_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values. Fails if the buffer size overflows `usize`.
    pub fn new(max_instances: usize, max_vertices: usize) -> Result<Self, ConfigError> {
        let overflow = |field: &'static str| ConfigError::TooLarge {
            field,
            value: max_instances.max(max_vertices) as u64,
            max: usize::MAX as u64,
        };
        let instance_data_floats = max_instances
            .checked_mul(ParticleInstance::FLOATS)
            .ok_or_else(|| overflow("max_instances"))?;
        let vertex_data_floats = max_vertices
            .checked_mul(VERTEX_FLOATS)
            .ok_or_else(|| overflow("max_vertices"))?;

        let instance_data_offset = HEADER_FLOATS;
        let vertex_data_offset = instance_data_offset
            .checked_add(instance_data_floats)
            .ok_or_else(|| overflow("max_instances"))?;

        let buffer_total_floats = vertex_data_offset
            .checked_add(vertex_data_floats)
            .ok_or_else(|| overflow("max_vertices"))?;
        let buffer_total_bytes = buffer_total_floats
            .checked_mul(4)
            .ok_or_else(|| overflow("max_vertices"))?;

        Ok(Self {
            max_instances,
            max_vertices,
            instance_data_floats,
            vertex_data_floats,
            instance_data_offset,
            vertex_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        })
    }

    /// Compute layout from an EffectsConfig.
    pub fn from_config(config: &EffectsConfig) -> Result<Self, ConfigError> {
        Self::new(config.max_instances, config.max_vertices)
    }

    /// Write one complete frame (header + both sections) into `out`,
    /// resizing it to `buffer_total_floats`. Counts are clamped to capacity.
    pub fn pack(&self, frame: u64, effects: &EffectsState, out: &mut Vec<f32>) {
        out.resize(self.buffer_total_floats, 0.0);

        let instances = effects.instances.as_floats();
        let instance_floats = instances.len().min(self.instance_data_floats);
        out[self.instance_data_offset..self.instance_data_offset + instance_floats]
            .copy_from_slice(&instances[..instance_floats]);

        let vertices = &effects.vertex_buffer;
        let vertex_floats = vertices.len().min(self.vertex_data_floats);
        out[self.vertex_data_offset..self.vertex_data_offset + vertex_floats]
            .copy_from_slice(&vertices[..vertex_floats]);

        let extent = effects.extent();
        let header = &mut out[..HEADER_FLOATS];
        header.fill(0.0);
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_FRAME_COUNTER] = frame as f32;
        header[HEADER_TIME] = effects.now() as f32;
        header[HEADER_CANVAS_WIDTH] = extent.width;
        header[HEADER_CANVAS_HEIGHT] = extent.height;
        header[HEADER_MAX_INSTANCES] = self.max_instances as f32;
        header[HEADER_INSTANCE_COUNT] = (instance_floats / ParticleInstance::FLOATS) as f32;
        header[HEADER_MAX_VERTICES] = self.max_vertices as f32;
        header[HEADER_VERTEX_COUNT] = (vertex_floats / VERTEX_FLOATS) as f32;
        header[HEADER_PARTICLE_COUNT] = effects.particle_count() as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Extent;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let layout = ProtocolLayout::from_config(&EffectsConfig::default()).unwrap();
        assert_eq!(layout.max_instances, 4096);
        assert_eq!(layout.max_vertices, 8192);
        assert_eq!(layout.instance_data_floats, 4096 * 8);
        assert_eq!(layout.vertex_data_floats, 8192 * 5);
        assert_eq!(layout.buffer_total_floats, HEADER_FLOATS + 4096 * 8 + 8192 * 5);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 200).unwrap();
        assert_eq!(layout.instance_data_offset, HEADER_FLOATS);
        assert_eq!(
            layout.vertex_data_offset,
            layout.instance_data_offset + layout.instance_data_floats
        );
        assert_eq!(
            layout.buffer_total_floats,
            layout.vertex_data_offset + layout.vertex_data_floats
        );
    }

    #[test]
    fn pack_writes_header_and_sections() {
        let config = EffectsConfig::default();
        let mut effects = EffectsState::new(&config, 11).unwrap();
        effects.tick(0.0, 0.0, Extent::new(320.0, 200.0));
        effects.rebuild_buffers();

        let layout = ProtocolLayout::from_config(&config).unwrap();
        let mut out = Vec::new();
        layout.pack(3, &effects, &mut out);

        assert_eq!(out.len(), layout.buffer_total_floats);
        assert_eq!(out[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(out[HEADER_FRAME_COUNTER], 3.0);
        assert_eq!(out[HEADER_CANVAS_WIDTH], 320.0);
        assert_eq!(out[HEADER_INSTANCE_COUNT], effects.instance_count() as f32);
        assert_eq!(out[HEADER_VERTEX_COUNT], effects.vertex_count() as f32);

        let first = &effects.instances.instances[0];
        assert_eq!(out[layout.instance_data_offset], first.x);
        assert_eq!(out[layout.vertex_data_offset], effects.vertex_buffer[0]);
    }

    #[test]
    fn pack_clamps_to_smaller_layout() {
        let config = EffectsConfig::default();
        let mut effects = EffectsState::new(&config, 11).unwrap();
        effects.tick(0.0, 0.0, Extent::new(320.0, 200.0));
        effects.rebuild_buffers();

        let layout = ProtocolLayout::new(4, 3).unwrap();
        let mut out = Vec::new();
        layout.pack(0, &effects, &mut out);
        assert_eq!(out[HEADER_INSTANCE_COUNT], 4.0);
        assert_eq!(out[HEADER_VERTEX_COUNT], 3.0);
    }

    #[test]
    fn overflowing_capacity_is_an_error() {
        assert!(matches!(
            ProtocolLayout::new(usize::MAX, 1),
            Err(ConfigError::TooLarge { field: "max_instances", .. })
        ));
        assert!(matches!(
            ProtocolLayout::new(1, usize::MAX / 2),
            Err(ConfigError::TooLarge { field: "max_vertices", .. })
        ));
    }
}
