pub mod camera;
pub mod engine;
pub mod life;
pub mod state;

pub mod prelude {
    use bevy::{color::Color, math::Vec2};

    pub const UPDATE_INTERVAL_MS: u64 = 2500;
    pub const BG_COLOR: Color = Color::srgb(0.0, 0.1, 0.3);

    pub const WINDOW_SIZE_PX: Vec2 = Vec2::splat(1000.0);

    pub const CELL_SIZE_PX: f32 = 100.0;
    pub const CELL_SIZE_STEP_PX: f32 = 10.0;
    /// fraction of a cell covered by its quad, the rest shows the grid lines
    pub const CELL_SCALE: f32 = 0.94;
    pub const GRID_LINE_COLOR: Color = Color::srgb(0.25, 0.3, 0.45);
    pub const CELL_ALIVE_COLOR: Color = Color::srgb(0.2, 1.0, 0.2);
    pub const CELL_BORN_COLOR: Color = Color::srgb(1.0, 1.0, 0.0);
    pub const CELL_DEAD_COLOR: Color = BG_COLOR;
    pub const LABEL_ALIVE_COLOR: Color = Color::srgb(0.0, 0.0, 0.0);
    pub const LABEL_DEAD_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
}
