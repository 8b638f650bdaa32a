use bytemuck::{Pod, Zeroable};

/// What the presenter should draw for an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum InstanceKind {
    Spark = 0,
    Snowflake = 1,
    Raindrop = 2,
    Ring = 3,
    Spotlight = 4,
}

/// Per-instance draw data read by the presenter.
/// Must match the host protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub x: f32,
    pub y: f32,
    /// Disc radius, or ring radius for `Ring`.
    pub radius: f32,
    /// Radians. For rain, the streak direction instead.
    pub rotation: f32,
    /// Degrees, [0, 360).
    pub hue: f32,
    /// Final opacity after fading.
    pub alpha: f32,
    /// Streak length for rain, stroke width for rings, 0 otherwise.
    pub length: f32,
    /// `InstanceKind` as a float.
    pub kind: f32,
}

impl ParticleInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Snapshot of everything to draw this frame, capped at a fixed capacity.
pub struct InstanceBuffer {
    pub instances: Vec<ParticleInstance>,
    capacity: usize,
    /// Instances refused this frame because the buffer was full.
    dropped: usize,
}

impl InstanceBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.dropped = 0;
    }

    /// Append an instance. Returns false (and counts a drop) once full.
    pub fn push(&mut self, instance: ParticleInstance) -> bool {
        if self.instances.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for shared-memory reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}
