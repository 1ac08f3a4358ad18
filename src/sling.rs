use avian3d::prelude::*;
use bevy::prelude::*;

use crate::aim;
use crate::camera::{follow_camera, follow_target, FollowCam};
use crate::config::SlingConfig;
use crate::input::{pointer_input, pointer_position};

/// Squared anchor distance below which a release snaps the ball back
/// instead of launching it. The boundary itself counts as "too close".
pub const LAUNCH_THRESHOLD_SQ: f32 = 1.0;

const BELT_COLOR: Color = Color::srgb(0.55, 0.35, 0.2);
const ARC_COLOR: Color = Color::srgb(0.9, 0.9, 0.3);

pub struct SlingshotPlugin;

impl Plugin for SlingshotPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SlingAction>().add_systems(
            Update,
            (
                pointer_input,
                detect_landing,
                apply_actions,
                drag_ball,
                update_catapult_visuals,
                tick_reset_timers,
                follow_camera,
            )
                .chain(),
        );
    }
}

// An event feeding the slingshot state machine: pointer edges from the
// input system, landings from the physics collision stream.
#[derive(Event, Debug)]
pub enum SlingAction {
    Grab { pointer: Vec2 },
    Release,
    Landed,
}

// A marker component for the ball the slingshot fires.
#[derive(Component)]
pub struct PlayerBall;

// A marker component for the catapult holder the ball is stretched
// away from.
#[derive(Component)]
pub struct Anchor;

// A marker component for the posts the belts hang from.
#[derive(Component)]
pub struct BeltPost;

/// Where the ball is in the grab-stretch-fly cycle.
#[derive(Component, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum BallState {
    #[default]
    Resting,
    Dragging,
    Launched,
}

/// Captured at grab time; drives the per-frame drag mapping.
#[derive(Component, Default)]
pub struct AimState {
    pub initial_pointer: Vec2,
    pub initial_object_pos: Vec3,
    /// Where the ball (and the camera, offset) snap back to.
    pub rest_pos: Vec3,
}

/// Pending snap-back after a landing. One per ball; removing the
/// component cancels the reset.
#[derive(Component)]
pub struct ResetTimer(pub Timer);

/// What `transition` asks the ECS layer to do besides switching state.
#[derive(Debug, PartialEq)]
pub enum SlingEffect {
    None,
    BeginDrag { pointer: Vec2 },
    Launch,
    SnapBack,
    ScheduleReset,
}

/// State machine for the slingshot cycle. Pure: callers supply the
/// squared ball-to-anchor distance and carry out the returned effect.
/// Unmatched state/action pairs are no-ops.
pub fn transition(
    state: BallState,
    action: &SlingAction,
    sq_dist_to_anchor: f32,
) -> (BallState, SlingEffect) {
    match (state, action) {
        (BallState::Resting, SlingAction::Grab { pointer }) => (
            BallState::Dragging,
            SlingEffect::BeginDrag { pointer: *pointer },
        ),
        (BallState::Dragging, SlingAction::Release) => {
            if sq_dist_to_anchor > LAUNCH_THRESHOLD_SQ {
                (BallState::Launched, SlingEffect::Launch)
            } else {
                (BallState::Resting, SlingEffect::SnapBack)
            }
        }
        (BallState::Launched, SlingAction::Landed) => {
            (BallState::Resting, SlingEffect::ScheduleReset)
        }
        (state, _) => (state, SlingEffect::None),
    }
}

/// Rest pose for the ball and the camera. Snapping back twice in a row
/// lands on the same pose as snapping once.
pub fn rest_pose(rest: Vec3) -> (Vec3, Vec3) {
    (rest, follow_target(rest))
}

/// Turns avian collision-start events into `Landed` actions. Only the
/// collider named with the configured ground tag counts; everything
/// else is ignored.
fn detect_landing(
    config: Res<SlingConfig>,
    mut collisions: EventReader<CollisionStarted>,
    mut actions: EventWriter<SlingAction>,
    balls: Query<(), With<PlayerBall>>,
    names: Query<&Name>,
) {
    for event in collisions.read() {
        let (a, b) = (event.0, event.1);
        let other = if balls.get(a).is_ok() {
            b
        } else if balls.get(b).is_ok() {
            a
        } else {
            continue;
        };
        let is_ground = names
            .get(other)
            .map(|name| name.as_str() == config.ground_tag)
            .unwrap_or(false);
        if is_ground {
            debug!("ball touched {:?}", config.ground_tag);
            actions.send(SlingAction::Landed);
        }
    }
}

/// Runs the state machine over this frame's actions and applies the
/// resulting effects to the ball, its rigid body, and the camera.
fn apply_actions(
    mut commands: Commands,
    config: Res<SlingConfig>,
    mut actions: EventReader<SlingAction>,
    anchors: Query<&Transform, (With<Anchor>, Without<PlayerBall>)>,
    mut balls: Query<
        (
            Entity,
            &mut Transform,
            &mut BallState,
            &mut AimState,
            &mut LinearVelocity,
        ),
        With<PlayerBall>,
    >,
    mut cameras: Query<
        &mut Transform,
        (
            With<FollowCam>,
            Without<PlayerBall>,
            Without<Anchor>,
        ),
    >,
) {
    let Ok(anchor) = anchors.get_single() else {
        return;
    };
    let Ok((entity, mut transform, mut state, mut aim, mut velocity)) = balls.get_single_mut()
    else {
        return;
    };

    for action in actions.read() {
        let sq_dist = (transform.translation - anchor.translation).length_squared();
        let (next, effect) = transition(*state, action, sq_dist);
        match effect {
            SlingEffect::BeginDrag { pointer } => {
                aim.initial_pointer = pointer;
                aim.initial_object_pos = transform.translation;
                velocity.0 = Vec3::ZERO;
                // Grabbing cancels a still-pending reset from the
                // previous flight.
                commands
                    .entity(entity)
                    .insert(RigidBody::Kinematic)
                    .remove::<ResetTimer>();
            }
            SlingEffect::Launch => {
                let launch = aim::launch_velocity(
                    anchor.translation,
                    transform.translation,
                    config.speed_scale,
                );
                if launch == Vec3::ZERO {
                    debug!("degenerate launch, ball overlaps the anchor");
                }
                commands.entity(entity).insert(RigidBody::Dynamic);
                velocity.0 = launch;
                info!("launched at {:.2} units/s", launch.length());
            }
            SlingEffect::SnapBack => {
                let (ball_pos, cam_pos) = rest_pose(aim.rest_pos);
                transform.translation = ball_pos;
                velocity.0 = Vec3::ZERO;
                if let Ok(mut cam) = cameras.get_single_mut() {
                    cam.translation = cam_pos;
                }
                commands.entity(entity).insert(RigidBody::Kinematic);
            }
            SlingEffect::ScheduleReset => {
                commands.entity(entity).insert(ResetTimer(Timer::from_seconds(
                    config.reset_delay_secs,
                    TimerMode::Once,
                )));
            }
            SlingEffect::None => {}
        }
        *state = next;
    }
}

/// Moves the ball under the pointer while it is being dragged: offset
/// from the grab point, clamped to the stretch sphere, then written
/// back through the drag-plane axis remap.
fn drag_ball(
    config: Res<SlingConfig>,
    windows: Query<&Window>,
    anchors: Query<&Transform, (With<Anchor>, Without<PlayerBall>)>,
    mut balls: Query<(&BallState, &AimState, &mut Transform), With<PlayerBall>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Some(pointer) = pointer_position(window) else {
        return;
    };
    let Ok(anchor) = anchors.get_single() else {
        return;
    };
    for (state, aim_state, mut transform) in &mut balls {
        if *state != BallState::Dragging {
            continue;
        }
        let candidate = aim::drag_candidate(
            pointer,
            aim_state.initial_pointer,
            aim_state.initial_object_pos,
            config.sensitivity,
        );
        let clamped = aim::clamp_stretch(candidate, anchor.translation, config.max_stretch);
        transform.translation = aim::remap_drag_axes(clamped);
    }
}

/// Draws the belts and the trajectory preview whenever the ball is in
/// the near zone (negative z, behind the launch plane). Gizmos are
/// immediate-mode, so skipping the draw hides them.
fn update_catapult_visuals(
    mut gizmos: Gizmos,
    config: Res<SlingConfig>,
    gravity: Res<Gravity>,
    anchors: Query<&Transform, With<Anchor>>,
    posts: Query<&Transform, With<BeltPost>>,
    balls: Query<&Transform, With<PlayerBall>>,
) {
    let Ok(anchor) = anchors.get_single() else {
        return;
    };
    for ball in &balls {
        if ball.translation.z >= 0.0 {
            continue;
        }
        let attach =
            aim::belt_attach_point(anchor.translation, ball.translation, config.ball_radius);
        for post in &posts {
            gizmos.line(post.translation, attach, BELT_COLOR);
        }
        let launch =
            aim::launch_velocity(anchor.translation, ball.translation, config.speed_scale);
        let points = aim::trajectory(
            ball.translation,
            launch,
            gravity.0,
            config.preview_timestep,
            config.preview_samples,
        );
        gizmos.linestrip(points, ARC_COLOR);
    }
}

/// Ticks pending reset timers and snaps the ball and camera back to
/// the rest pose once one expires.
fn tick_reset_timers(
    time: Res<Time>,
    mut commands: Commands,
    mut balls: Query<
        (
            Entity,
            &mut Transform,
            &AimState,
            &mut ResetTimer,
            &mut LinearVelocity,
        ),
        With<PlayerBall>,
    >,
    mut cameras: Query<&mut Transform, (With<FollowCam>, Without<PlayerBall>)>,
) {
    for (entity, mut transform, aim_state, mut timer, mut velocity) in &mut balls {
        timer.0.tick(time.delta());
        if !timer.0.just_finished() {
            continue;
        }
        let (ball_pos, cam_pos) = rest_pose(aim_state.rest_pos);
        transform.translation = ball_pos;
        velocity.0 = Vec3::ZERO;
        if let Ok(mut cam) = cameras.get_single_mut() {
            cam.translation = cam_pos;
        }
        commands
            .entity(entity)
            .insert(RigidBody::Kinematic)
            .remove::<ResetTimer>();
        info!("ball reset to rest position");
    }
}
