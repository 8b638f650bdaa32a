use glam::Vec2;

/// Frame timestamp in seconds, as delivered by the host timeline.
pub type Seconds = f64;

/// Drawable area of the canvas, as last measured by the presentation layer.
/// `(0, 0)` means the surface has not been measured yet.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    /// The "not yet measured" sentinel.
    pub const UNMEASURED: Extent = Extent { width: 0.0, height: 0.0 };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether the extent describes a real surface that geometry can be built against.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// The shorter side, used to scale effects that must fit in either orientation.
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }

    /// Whether a point lies inside `[0, width] x [0, height]`.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}
