use glam::Vec3;

/// Values a keyframe schedule can sample between two keys.
pub trait Interpolatable: Copy + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for f32 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start + (end - start) * t
    }
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

// Visibility is a hard cut: the earlier key holds until the next one.
impl Interpolatable for bool {
    fn interpolate_linear(start: Self, _end: Self, _t: f32) -> Self {
        start
    }
}
