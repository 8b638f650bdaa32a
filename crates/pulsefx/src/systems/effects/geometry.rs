//! Triangle mesh generation for line-like shapes (beams).
//!
//! Vertex layout: `[x, y, u, hue, alpha]`, 5 floats. `u` runs 0..1 across the
//! width so the presenter can soften the edges.

use glam::Vec2;

/// Floats per emitted vertex.
pub const VERTEX_FLOATS: usize = 5;

/// Lengths below this are treated as this, so normalizing never divides by zero.
pub const MIN_SEGMENT_LENGTH: f32 = 0.001;

/// Unit direction from `a` to `b` and its left-hand perpendicular.
/// A degenerate segment yields zero vectors instead of NaN.
#[inline]
pub fn segment_frame(a: Vec2, b: Vec2) -> (Vec2, Vec2) {
    let d = b - a;
    let len = d.length().max(MIN_SEGMENT_LENGTH);
    let dir = d / len;
    (dir, dir.perp())
}

/// Append triangle-strip vertices for a polyline of half-width `width`.
/// Interior joints use the averaged normal of their two segments.
pub fn build_strip_vertices(points: &[Vec2], width: f32, hue: f32, alpha: f32, out: &mut Vec<f32>) {
    if points.len() < 2 {
        return;
    }
    let n = points.len();
    out.reserve(n * 2 * VERTEX_FLOATS);

    let mut push_pair = |center: Vec2, perp: Vec2| {
        let left = center + perp * width;
        let right = center - perp * width;
        out.extend_from_slice(&[left.x, left.y, 0.0, hue, alpha]);
        out.extend_from_slice(&[right.x, right.y, 1.0, hue, alpha]);
    };

    let (_, p0) = segment_frame(points[0], points[1]);
    push_pair(points[0], p0);

    for i in 1..n - 1 {
        let (_, p_prev) = segment_frame(points[i - 1], points[i]);
        let (_, p_next) = segment_frame(points[i], points[i + 1]);
        let avg = p_prev + p_next;
        let perp = avg / avg.length().max(MIN_SEGMENT_LENGTH);
        push_pair(points[i], perp);
    }

    let (_, p_last) = segment_frame(points[n - 2], points[n - 1]);
    push_pair(points[n - 1], p_last);
}

/// Convert triangle strip vertices to a triangle list (for WebGPU/Canvas compatibility).
pub fn strip_to_triangles(strip_verts: &[f32], floats_per_vert: usize, out: &mut Vec<f32>) {
    let num_verts = strip_verts.len() / floats_per_vert;
    if num_verts < 3 {
        return;
    }
    let num_tris = num_verts - 2;
    out.reserve(num_tris * 3 * floats_per_vert);
    for i in 0..num_tris {
        let (a, b, c) = if i % 2 == 0 {
            (i, i + 1, i + 2)
        } else {
            (i + 1, i, i + 2)
        };
        for v in [a, b, c] {
            let base = v * floats_per_vert;
            out.extend_from_slice(&strip_verts[base..base + floats_per_vert]);
        }
    }
}
