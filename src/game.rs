use avian3d::prelude::*;
use bevy::prelude::*;

use crate::camera::{FollowCam, FOLLOW_OFFSET};
use crate::config::SlingConfig;
use crate::sling::{AimState, Anchor, BallState, BeltPost, PlayerBall};

/// Anchor position, which doubles as the ball's rest pose. It must be
/// a fixed point of `aim::remap_drag_axes` (y == z, both negative) so
/// the first drag frame leaves an untouched ball where it rests.
pub const ANCHOR_POS: Vec3 = Vec3::new(0.0, -2.0, -2.0);

/// Spawns the whole scene: the ground slab, the catapult frame, the
/// ball at its pouch, lighting, and the trailing camera. The ground
/// carries the configured tag as its `Name`; landing detection matches
/// on it.
pub fn setup(
    mut commands: Commands,
    config: Res<SlingConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // Ground
    commands.spawn((
        Name::new(config.ground_tag.clone()),
        Mesh3d(meshes.add(Cuboid::new(60.0, 1.0, 60.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::from_xyz(0.0, -4.0, 12.0),
        RigidBody::Static,
        Collider::cuboid(60.0, 1.0, 60.0),
    ));

    // Catapult frame, just behind the launch plane.
    let anchor_pos = ANCHOR_POS;
    commands.spawn((
        Anchor,
        Mesh3d(meshes.add(Cuboid::new(0.4, 0.4, 0.4))),
        MeshMaterial3d(materials.add(Color::srgb(0.4, 0.25, 0.1))),
        Transform::from_translation(anchor_pos),
    ));
    for x in [-1.2, 1.2] {
        commands.spawn((
            BeltPost,
            Mesh3d(meshes.add(Cuboid::new(0.2, 2.4, 0.2))),
            MeshMaterial3d(materials.add(Color::srgb(0.35, 0.2, 0.1))),
            Transform::from_xyz(x, anchor_pos.y + 0.6, anchor_pos.z),
        ));
    }

    // Player ball, kinematic until launched. Resting in the pouch
    // means resting at the anchor: a click released without a real
    // pull stays inside the launch threshold and snaps back.
    let rest_pos = anchor_pos;
    let ball = commands
        .spawn((
            PlayerBall,
            BallState::default(),
            AimState {
                rest_pos,
                ..default()
            },
            Mesh3d(meshes.add(Sphere::new(config.ball_radius))),
            MeshMaterial3d(materials.add(Color::srgb(0.9, 0.1, 0.1))),
            Transform::from_translation(rest_pos),
            RigidBody::Kinematic,
            Collider::sphere(config.ball_radius),
            LinearVelocity::default(),
        ))
        .id();

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(6.0, 12.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Camera: orientation is set once here; afterwards only its
    // position trails the ball.
    commands.spawn((
        Camera3d::default(),
        FollowCam { target: ball },
        Transform::from_translation(rest_pos + FOLLOW_OFFSET).looking_at(rest_pos, Vec3::Y),
    ));
}
