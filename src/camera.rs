use bevy::prelude::*;

use crate::config::SlingConfig;

/// Camera that trails a tracked entity. The target is handed over
/// explicitly when the camera is spawned; there is no "main camera"
/// lookup anywhere.
#[derive(Component)]
pub struct FollowCam {
    pub target: Entity,
}

/// Offset of the camera resting point relative to the tracked ball:
/// slightly above and behind it.
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 0.75, -3.0);

pub fn follow_target(tracked: Vec3) -> Vec3 {
    tracked + FOLLOW_OFFSET
}

/// Component-wise exponential smoothing step. The factor is left
/// unclamped, so values above 1.0 overshoot.
pub fn smooth_toward(current: Vec3, target: Vec3, factor: f32) -> Vec3 {
    current.lerp(target, factor)
}

/// Eases the camera toward its offset point behind the tracked ball
/// every frame. Orientation is not touched here; the one-shot look-at
/// happens when the camera is spawned.
pub fn follow_camera(
    time: Res<Time>,
    config: Res<SlingConfig>,
    mut cameras: Query<(&FollowCam, &mut Transform)>,
    tracked: Query<&Transform, Without<FollowCam>>,
) {
    let factor = config.follow_speed * time.delta_secs();
    for (cam, mut transform) in &mut cameras {
        let Ok(target) = tracked.get(cam.target) else {
            continue;
        };
        transform.translation = smooth_toward(
            transform.translation,
            follow_target(target.translation),
            factor,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_target_applies_offset() {
        let target = follow_target(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(target, Vec3::new(1.0, 2.75, 0.0));
    }

    #[test]
    fn smoothing_converges_on_fixed_target() {
        let target = Vec3::new(4.0, -1.0, 7.0);
        let factor = 2.0 * (1.0 / 60.0);
        let mut pos = Vec3::new(-20.0, 35.0, 0.0);
        for _ in 0..600 {
            pos = smooth_toward(pos, target, factor);
        }
        assert!((pos - target).length() < 1e-3);
    }

    #[test]
    fn smoothing_moves_monotonically_closer() {
        let target = Vec3::splat(10.0);
        let factor = 0.5 * (1.0 / 60.0);
        let mut pos = Vec3::ZERO;
        let mut last = (pos - target).length();
        for _ in 0..100 {
            pos = smooth_toward(pos, target, factor);
            let dist = (pos - target).length();
            assert!(dist < last);
            last = dist;
        }
    }
}
