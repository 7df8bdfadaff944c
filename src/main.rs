use bevy::{
    diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin},
    prelude::*,
    window::WindowResolution,
};
use conway_gol_editor::{
    camera::CamPlugin, life::LifePlugin, prelude::WINDOW_SIZE_PX, state::SimState,
};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Game of Life".into(),
                        resizable: true,
                        focused: true,
                        present_mode: bevy::window::PresentMode::AutoNoVsync,
                        mode: bevy::window::WindowMode::Windowed,
                        resolution: WindowResolution::new(WINDOW_SIZE_PX.x, WINDOW_SIZE_PX.y),
                        ..default()
                    }),
                    ..default()
                }),
        )
        .add_plugins((FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin::default()))
        .init_state::<SimState>()
        .add_plugins((CamPlugin, LifePlugin))
        .run();
}
