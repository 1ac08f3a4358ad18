//! A slingshot ball toy: drag the ball away from the catapult, watch
//! the predicted arc, release to launch, and the ball snaps back to
//! its pouch a moment after it lands.
//!
//! The interaction logic lives in the `sling` module as a plugin; the
//! physics (rigid bodies, gravity, collision events) comes from Avian.

use avian3d::prelude::*;
use bevy::prelude::*;

mod aim;
mod camera;
mod config;
mod game;
mod input;
mod sling;

use config::SlingConfig;
use game::setup;
use sling::SlingshotPlugin;

const CONFIG_PATH: &str = "slingball.toml";

fn main() {
    let config = match SlingConfig::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("slingball: {err}");
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins((DefaultPlugins, PhysicsPlugins::default(), SlingshotPlugin))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.1)))
        .insert_resource(Gravity(Vec3::NEG_Y * 9.81))
        .insert_resource(config)
        .add_systems(Startup, setup)
        .run();
}
