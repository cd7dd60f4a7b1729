use glam::Quat;

pub trait Interpolatable: Copy + Clone + Sized {
    /// Blends from `start` (`t = 0`) to `end` (`t = 1`). `t` outside `[0, 1]`
    /// is clamped.
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        slerp_shortest_arc(start, end, t)
    }
}

/// Spherical interpolation along the shorter of the two arcs.
///
/// `end` is negated when the inputs lie in opposite hemispheres. The endpoints
/// are returned unchanged: `t <= 0` yields `start` and `t >= 1` yields `end`
/// bit-for-bit.
#[must_use]
pub fn slerp_shortest_arc(start: Quat, end: Quat, t: f32) -> Quat {
    if t <= 0.0 {
        return start;
    }
    if t >= 1.0 {
        return end;
    }

    let end = if start.dot(end) < 0.0 { -end } else { end };
    start.slerp(end, t)
}

/// Blends two index-aligned poses into `out`, reusing its allocation.
///
/// Both poses must have the same length.
pub fn interpolate_pose(start: &[Quat], end: &[Quat], t: f32, out: &mut Vec<Quat>) {
    debug_assert_eq!(start.len(), end.len());
    out.clear();
    out.extend(
        start
            .iter()
            .zip(end)
            .map(|(&from, &to)| Quat::interpolate_linear(from, to, t)),
    );
}
