use bevy::prelude::*;

/// Constant upward bias folded into every preview step. The arc this
/// produces is an approximation tuned for readability, not an exact
/// ballistic solution.
pub const ARC_LIFT: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Maps the current pointer position to a candidate ball position,
/// relative to where the pointer and ball were when the drag started.
pub fn drag_candidate(
    pointer: Vec2,
    initial_pointer: Vec2,
    initial_object_pos: Vec3,
    sensitivity: f32,
) -> Vec3 {
    let diff = (pointer - initial_pointer) * sensitivity;
    initial_object_pos + Vec3::new(diff.x, diff.y, 0.0)
}

/// Clamps a candidate position so it never leaves the stretch sphere
/// around the anchor.
pub fn clamp_stretch(candidate: Vec3, anchor: Vec3, max_stretch: f32) -> Vec3 {
    let to_candidate = candidate - anchor;
    if to_candidate.length_squared() <= max_stretch * max_stretch {
        return candidate;
    }
    match to_candidate.try_normalize() {
        Some(dir) => anchor + dir * max_stretch,
        // Degenerate offset, keep the ball at the anchor.
        None => anchor,
    }
}

/// Screen-drag values land in world space with the y and z components
/// swapped; a candidate at or above y = 0 is pinned to the drag plane.
pub fn remap_drag_axes(pos: Vec3) -> Vec3 {
    if pos.y < 0.0 {
        Vec3::new(pos.x, pos.z, pos.y)
    } else {
        Vec3::new(pos.x, pos.z, 0.0)
    }
}

/// Launch velocity for a ball held at `ball`: aimed at the anchor, with
/// speed growing with the *squared* separation so long pulls hit much
/// harder than short ones. Zero separation yields zero velocity.
pub fn launch_velocity(anchor: Vec3, ball: Vec3, speed_scale: f32) -> Vec3 {
    let separation = anchor - ball;
    match separation.try_normalize() {
        Some(dir) => dir * (separation.length_squared() * speed_scale),
        None => Vec3::ZERO,
    }
}

/// Forward-simulated preview of the flight path.
///
/// The step velocity is derived once from the launch velocity and held
/// constant for every sample, including the gravity contribution and
/// [`ARC_LIFT`]. The first point is always `start`.
pub fn trajectory(
    start: Vec3,
    launch_velocity: Vec3,
    gravity: Vec3,
    timestep: f32,
    samples: usize,
) -> Vec<Vec3> {
    let step = (launch_velocity + gravity * timestep + ARC_LIFT) * timestep;
    let mut points = Vec::with_capacity(samples);
    let mut pos = start;
    for _ in 0..samples {
        points.push(pos);
        pos += step;
    }
    points
}

/// Point where both belts visually attach to the ball: on the ray from
/// the anchor through the ball, half a ball radius past its surface
/// distance.
pub fn belt_attach_point(anchor: Vec3, ball: Vec3, ball_radius: f32) -> Vec3 {
    let offset = ball - anchor;
    match offset.try_normalize() {
        Some(dir) => anchor + dir * (offset.length() + ball_radius / 2.0),
        None => anchor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn approx_eq_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < TOLERANCE
    }

    #[test]
    fn drag_candidate_scales_pointer_offset() {
        let candidate = drag_candidate(
            Vec2::new(130.0, 110.0),
            Vec2::new(100.0, 100.0),
            Vec3::new(1.0, 2.0, 3.0),
            0.1,
        );
        assert!(approx_eq_vec(candidate, Vec3::new(4.0, 3.0, 3.0)));
    }

    #[test]
    fn drag_candidate_identity_at_start() {
        let start = Vec3::new(-1.0, 0.5, -6.0);
        let pointer = Vec2::new(320.0, 240.0);
        let candidate = drag_candidate(pointer, pointer, start, 0.1);
        assert!(approx_eq_vec(candidate, start));
    }

    #[test]
    fn clamp_never_exceeds_max_stretch() {
        let anchor = Vec3::new(1.0, -2.0, 3.0);
        for x in -10..=10 {
            for y in -10..=10 {
                let candidate = Vec3::new(x as f32 * 1.7, y as f32 * 2.3, -4.0);
                let clamped = clamp_stretch(candidate, anchor, 5.0);
                assert!((clamped - anchor).length() <= 5.0 + TOLERANCE);
            }
        }
    }

    #[test]
    fn clamp_leaves_interior_points_alone() {
        let candidate = Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(clamp_stretch(candidate, Vec3::ZERO, 5.0), candidate);
    }

    #[test]
    fn clamp_keeps_point_already_on_boundary() {
        // Distance 5 from the origin with a max stretch of 5: exactly
        // on the boundary, so the point passes through unchanged.
        let candidate = Vec3::new(3.0, 0.0, 4.0);
        let clamped = clamp_stretch(candidate, Vec3::ZERO, 5.0);
        assert!(approx_eq_vec(clamped, candidate));
    }

    #[test]
    fn clamp_projects_along_original_direction() {
        let anchor = Vec3::ZERO;
        let candidate = Vec3::new(6.0, 0.0, 8.0);
        let clamped = clamp_stretch(candidate, anchor, 5.0);
        assert!(approx_eq((clamped - anchor).length(), 5.0));
        assert!(approx_eq_vec(
            (clamped - anchor).normalize(),
            (candidate - anchor).normalize()
        ));
    }

    #[test]
    fn remap_swaps_y_and_z_below_plane() {
        let pos = remap_drag_axes(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(pos, Vec3::new(1.0, 3.0, -2.0));
    }

    #[test]
    fn remap_pins_to_plane_at_or_above_zero() {
        assert_eq!(
            remap_drag_axes(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 3.0, 0.0)
        );
        assert_eq!(
            remap_drag_axes(Vec3::new(1.0, 0.0, 3.0)),
            Vec3::new(1.0, 3.0, 0.0)
        );
    }

    #[test]
    fn launch_velocity_points_at_anchor() {
        let anchor = Vec3::new(0.0, 1.0, -6.0);
        let ball = Vec3::new(2.0, -1.0, -8.0);
        let velocity = launch_velocity(anchor, ball, 10.0);
        assert!(approx_eq_vec(
            velocity.normalize(),
            (anchor - ball).normalize()
        ));
    }

    #[test]
    fn launch_speed_follows_squared_distance() {
        let anchor = Vec3::ZERO;
        let near = launch_velocity(anchor, Vec3::new(0.0, 0.0, 2.0), 10.0);
        let far = launch_velocity(anchor, Vec3::new(0.0, 0.0, 4.0), 10.0);
        // Doubling the separation quadruples the speed.
        assert!(approx_eq(far.length(), 4.0 * near.length()));
    }

    #[test]
    fn launch_velocity_zero_at_zero_separation() {
        assert_eq!(launch_velocity(Vec3::ONE, Vec3::ONE, 10.0), Vec3::ZERO);
    }

    #[test]
    fn trajectory_sample_count_and_first_point() {
        let start = Vec3::new(1.0, 2.0, -5.0);
        let points = trajectory(start, Vec3::new(0.0, 5.0, 10.0), Vec3::NEG_Y * 9.81, 0.02, 5);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], start);
    }

    #[test]
    fn trajectory_steps_are_constant() {
        let points = trajectory(
            Vec3::ZERO,
            Vec3::new(3.0, 8.0, 12.0),
            Vec3::NEG_Y * 9.81,
            0.02,
            8,
        );
        let step = points[1] - points[0];
        for pair in points.windows(2) {
            assert!(approx_eq_vec(pair[1] - pair[0], step));
        }
    }

    #[test]
    fn trajectory_step_includes_gravity_and_lift() {
        let timestep = 0.02;
        let launch = Vec3::new(0.0, 5.0, 10.0);
        let gravity = Vec3::NEG_Y * 9.81;
        let points = trajectory(Vec3::ZERO, launch, gravity, timestep, 2);
        let expected = (launch + gravity * timestep + ARC_LIFT) * timestep;
        assert!(approx_eq_vec(points[1], expected));
    }

    #[test]
    fn belt_attach_sits_past_the_ball() {
        let anchor = Vec3::ZERO;
        let ball = Vec3::new(0.0, 0.0, -4.0);
        let attach = belt_attach_point(anchor, ball, 0.5);
        assert!(approx_eq((attach - anchor).length(), 4.25));
        assert!(approx_eq_vec(
            (attach - anchor).normalize(),
            (ball - anchor).normalize()
        ));
    }

    #[test]
    fn belt_attach_degenerates_to_anchor() {
        assert_eq!(belt_attach_point(Vec3::ONE, Vec3::ONE, 0.5), Vec3::ONE);
    }
}
