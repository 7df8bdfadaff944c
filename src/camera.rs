use bevy::prelude::*;

use crate::{prelude::GRID_LINE_COLOR, state::SimState};

pub struct CamPlugin;

impl Plugin for CamPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(GRID_LINE_COLOR))
            .add_systems(OnEnter(SimState::Loading), spawn_cam);
    }
}

// Init
fn spawn_cam(mut commands: Commands) {
    // one world unit per logical pixel, so cells line up with the cursor
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: bevy::render::camera::ScalingMode::WindowSize,
            scale: 1.0,
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_2d()
        },
        Msaa::Off,
    ));
}
