//! Vision and steering geometry.
//!
//! Pure helpers for angles, ranges, cones and ground-plane yaw. The world is
//! Y-up and a yaw of zero faces `+Z`. None of these functions panic or emit
//! NaN for degenerate input: a zero-length direction has no defined angle, so
//! cone tests against it report `false`.
use glam::Vec3;

/// Returns the unit vector in the direction of `vector`.
///
/// Non-finite and zero-length input yields [`Vec3::ZERO`].
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use stalker::geometry::vec_normalize;
/// let unit = vec_normalize(Vec3::new(3.0, 0.0, 4.0));
/// assert!((unit.x - 0.6).abs() < 1e-6);
/// assert!((unit.z - 0.8).abs() < 1e-6);
///
/// assert_eq!(vec_normalize(Vec3::ZERO), Vec3::ZERO);
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec3) -> Vec3 {
    if !vector.is_finite() {
        return Vec3::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec3::ZERO)
}

/// Unsigned angle between two directions in degrees, in `[0, 180]`.
///
/// Returns `None` when either vector is zero-length or non-finite.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use stalker::geometry::angle_between_deg;
/// let angle = angle_between_deg(Vec3::Z, Vec3::X).unwrap_or_default();
/// assert!((angle - 90.0).abs() < 1e-4);
/// assert!(angle_between_deg(Vec3::Z, Vec3::ZERO).is_none());
/// ```
#[must_use]
pub fn angle_between_deg(a: Vec3, b: Vec3) -> Option<f32> {
    let lhs = a.try_normalize()?;
    let rhs = b.try_normalize()?;
    let cos = lhs.dot(rhs).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Angle in degrees between the viewer's forward and the direction to `target`.
#[must_use]
pub fn angle_to_deg(viewer_pos: Vec3, viewer_forward: Vec3, target_pos: Vec3) -> Option<f32> {
    angle_between_deg(viewer_forward, target_pos - viewer_pos)
}

/// True when `target_pos` lies strictly inside the cone of `half_angle_deg`
/// around `viewer_forward`.
#[must_use]
pub fn in_cone(viewer_pos: Vec3, viewer_forward: Vec3, target_pos: Vec3, half_angle_deg: f32) -> bool {
    angle_to_deg(viewer_pos, viewer_forward, target_pos)
        .is_some_and(|angle| angle < half_angle_deg)
}

/// True when `target_pos` is no further than `radius` from `viewer_pos`.
#[must_use]
pub fn within_range(viewer_pos: Vec3, target_pos: Vec3, radius: f32) -> bool {
    viewer_pos.distance(target_pos) <= radius
}

/// Line-of-sight test delegating occlusion to `path_is_clear`.
///
/// The closure receives the segment endpoints and returns whether nothing
/// blocks it.
pub fn has_line_of_sight<F>(viewer_pos: Vec3, target_pos: Vec3, path_is_clear: F) -> bool
where
    F: FnOnce(Vec3, Vec3) -> bool,
{
    if !viewer_pos.is_finite() || !target_pos.is_finite() {
        return false;
    }
    path_is_clear(viewer_pos, target_pos)
}

/// Ground-plane yaw of `forward` in degrees, `None` when it has no planar
/// component.
#[must_use]
pub fn yaw_deg(forward: Vec3) -> Option<f32> {
    let planar = Vec3::new(forward.x, 0.0, forward.z).try_normalize()?;
    Some(planar.x.atan2(planar.z).to_degrees())
}

/// Unit forward vector on the ground plane for a yaw in degrees.
#[must_use]
pub fn forward_from_yaw(yaw_deg: f32) -> Vec3 {
    let radians = yaw_deg.to_radians();
    Vec3::new(radians.sin(), 0.0, radians.cos())
}

/// Wraps an angle in degrees into `(-180, 180]`.
#[must_use]
pub fn wrap_deg(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Turns `current` towards `desired` on the ground plane by at most
/// `max_step_deg`.
///
/// Returns `current` unchanged when `desired` has no planar direction. A
/// degenerate `current` snaps straight to `desired`.
#[must_use]
pub fn rotate_towards(current: Vec3, desired: Vec3, max_step_deg: f32) -> Vec3 {
    let Some(target_yaw) = yaw_deg(desired) else {
        return current;
    };
    let Some(current_yaw) = yaw_deg(current) else {
        return forward_from_yaw(target_yaw);
    };
    let delta = wrap_deg(target_yaw - current_yaw);
    let step = max_step_deg.max(0.0);
    let turned = if delta.abs() <= step {
        target_yaw
    } else {
        current_yaw + step.copysign(delta)
    };
    forward_from_yaw(turned)
}
