#![allow(clippy::type_complexity)]

use std::time::Duration;

use bevy::{
    input::common_conditions::input_just_pressed,
    math::vec2,
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};

use crate::{
    engine::{CellCoord, EditKind, Grid, GridConfig, LifeState},
    prelude::*,
    state::SimState,
};

pub struct LifePlugin;

impl Plugin for LifePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Board::default())
            .init_resource::<NeighbourOverlay>()
            .insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(
                UPDATE_INTERVAL_MS,
            )))
            .add_systems(OnEnter(SimState::Loading), load_board)
            .add_systems(
                FixedUpdate,
                step_board.run_if(in_state(SimState::Running)),
            )
            .add_systems(
                Update,
                (
                    (
                        resize_board,
                        handle_board_kbd,
                        handle_editing_kbd.run_if(in_state(SimState::Editing)),
                        handle_mouse_edit,
                        toggle_editing_and_running.run_if(input_just_pressed(KeyCode::Space)),
                    ),
                    (
                        respawn_cells,
                        paint_cells.run_if(
                            resource_changed::<Board>.or(resource_changed::<NeighbourOverlay>),
                        ),
                        update_window_title.run_if(resource_changed::<Board>),
                    )
                        .chain(),
                )
                    .chain()
                    .run_if(not(in_state(SimState::Loading))),
            );
    }
}

// ——> SYSTEMS

/// fit the board to the window and create the shared cell assets
fn load_board(
    mut commands: Commands,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut board: ResMut<Board>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    if let Ok(window) = window_query.get_single() {
        let config = board
            .grid()
            .config()
            .with_dimensions(window.width(), window.height());
        reconfigure_board(&mut board, config);
    }

    commands.insert_resource(CellAssets {
        cell_mesh: meshes.add(cell_rectangle(board.grid())),
        alive: materials.add(ColorMaterial::from_color(CELL_ALIVE_COLOR)),
        born: materials.add(ColorMaterial::from_color(CELL_BORN_COLOR)),
        dead: materials.add(ColorMaterial::from_color(CELL_DEAD_COLOR)),
    });

    next_state.set(SimState::Editing);
}

fn step_board(mut board: ResMut<Board>) {
    board.step();
}

/// every resize rebuilds the lattice from the new window size
fn resize_board(mut resized_events: EventReader<WindowResized>, mut board: ResMut<Board>) {
    let Some(resized) = resized_events.read().last() else {
        return;
    };
    let config = board
        .grid()
        .config()
        .with_dimensions(resized.width, resized.height);
    if config != board.grid().config() {
        reconfigure_board(&mut board, config);
    }
}

fn handle_board_kbd(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut board: ResMut<Board>,
    mut overlay: ResMut<NeighbourOverlay>,
) {
    let cell_size = board.grid().cell_size();
    if keyboard_input.just_pressed(KeyCode::ArrowUp) {
        let config = board.grid().config().with_cell_size(cell_size + CELL_SIZE_STEP_PX);
        reconfigure_board(&mut board, config);
    }
    if keyboard_input.just_pressed(KeyCode::ArrowDown) {
        let config = board.grid().config().with_cell_size(cell_size - CELL_SIZE_STEP_PX);
        reconfigure_board(&mut board, config);
    }
    if keyboard_input.just_pressed(KeyCode::KeyC) {
        board.clear();
    }
    if keyboard_input.just_pressed(KeyCode::KeyX) {
        overlay.0 = !overlay.0;
    }
}

fn handle_editing_kbd(keyboard_input: Res<ButtonInput<KeyCode>>, mut board: ResMut<Board>) {
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        board.randomize(&mut fastrand::Rng::new());
    }
    if keyboard_input.just_pressed(KeyCode::KeyN) {
        board.step();
    }
}

/// left click brings the cell under the cursor to life, any other button kills it
fn handle_mouse_edit(
    mouse_input: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut board: ResMut<Board>,
) {
    let kind = if mouse_input.just_pressed(MouseButton::Left) {
        EditKind::SetAlive
    } else if mouse_input.get_just_pressed().next().is_some() {
        EditKind::SetDead
    } else {
        return;
    };
    let Some(cursor) = window_query
        .get_single()
        .ok()
        .and_then(Window::cursor_position)
    else {
        return;
    };

    match board.edit_at(cursor, kind) {
        Ok(coord) => debug!(?coord, ?kind, "cell edited"),
        Err(err) => warn!("ignoring edit: {err}"),
    }
}

fn toggle_editing_and_running(
    state: Res<State<SimState>>,
    mut next_state: ResMut<NextState<SimState>>,
) {
    if let Some(next) = state.get().toggled() {
        info!(?next, "switching simulation state");
        next_state.set(next);
    }
}

/// spawn a fresh set of cell entities whenever the lattice changed shape
fn respawn_cells(
    mut commands: Commands,
    board: Res<Board>,
    overlay: Res<NeighbourOverlay>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut cell_assets: ResMut<CellAssets>,
    cell_query: Query<Entity, With<Cell>>,
    mut spawned_grid: Local<Option<Grid>>,
) {
    let grid = *board.grid();
    if *spawned_grid == Some(grid) {
        return;
    }
    *spawned_grid = Some(grid);

    for entity in cell_query.iter() {
        commands.entity(entity).despawn_recursive();
    }

    cell_assets.cell_mesh = meshes.add(cell_rectangle(&grid));
    let label_font = TextFont {
        font_size: grid.cell_size() * 0.5,
        ..default()
    };

    for coord in grid.all_cells() {
        let alive = board.is_alive(coord);
        commands
            .spawn((
                Cell(coord),
                Mesh2d(cell_assets.cell_mesh.clone()),
                MeshMaterial2d(cell_assets.material_for(&board, coord)),
                Transform::from_translation(cell_translation(&grid, coord, 0.0)),
            ))
            .with_children(|parent| {
                parent.spawn((
                    NeighbourLabel(coord),
                    Text2d::new(board.neighbour_count(coord).to_string()),
                    label_font.clone(),
                    TextColor(label_color(alive)),
                    Transform::from_xyz(0.0, 0.0, 1.0),
                    overlay.visibility(),
                ));
            });
    }
    debug!(cells = grid.cell_count(), "spawned cell entities");
}

fn paint_cells(
    board: Res<Board>,
    overlay: Res<NeighbourOverlay>,
    cell_assets: Res<CellAssets>,
    mut cell_query: Query<(&Cell, &mut MeshMaterial2d<ColorMaterial>)>,
    mut label_query: Query<(
        &NeighbourLabel,
        &mut Text2d,
        &mut TextColor,
        &mut Visibility,
    )>,
) {
    for (cell, mut material) in cell_query.iter_mut() {
        let wanted = cell_assets.material_for(&board, **cell);
        if material.0 != wanted {
            material.0 = wanted;
        }
    }

    for (label, mut text, mut color, mut visibility) in label_query.iter_mut() {
        visibility.set_if_neq(overlay.visibility());
        if !overlay.0 {
            continue;
        }
        // labels of a lattice that is about to be despawned
        let Ok(info) = board.inspect(**label) else {
            continue;
        };
        text.0 = info.neighbours.to_string();
        color.0 = label_color(info.alive);
    }
}

fn update_window_title(board: Res<Board>, mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.title = format!(
            "Game of Life | generation {} | population {}",
            board.generation(),
            board.population()
        );
    }
}

// ——> HELPERS

/// Rebuilds the board, keeping the old one when the new shape is rejected.
fn reconfigure_board(board: &mut LifeState, config: GridConfig) {
    match board.reconfigure(config) {
        Ok(()) => info!(
            columns = board.grid().columns(),
            rows = board.grid().rows(),
            cell_size = config.cell_size,
            "board rebuilt"
        ),
        Err(err) => warn!("keeping the current board: {err}"),
    }
}

#[inline]
fn cell_rectangle(grid: &Grid) -> Rectangle {
    Rectangle::from_size(Vec2::splat(grid.cell_size() * CELL_SCALE))
}

/// Maps a top-left based pixel position to world space, where the window
/// center is the origin and y points up.
#[inline]
fn pixel_to_world(grid: &Grid, pixel: Vec2) -> Vec2 {
    let config = grid.config();
    vec2(pixel.x - config.width * 0.5, config.height * 0.5 - pixel.y)
}

#[inline]
fn cell_translation(grid: &Grid, coord: CellCoord, z: f32) -> Vec3 {
    pixel_to_world(grid, grid.bounding_box(coord).center()).extend(z)
}

#[inline]
fn label_color(alive: bool) -> Color {
    if alive {
        LABEL_ALIVE_COLOR
    } else {
        LABEL_DEAD_COLOR
    }
}

// ——> COMPONENTS

#[derive(Component, Debug, Deref)]
#[require(Mesh2d)]
struct Cell(CellCoord);

#[derive(Component, Debug, Deref)]
struct NeighbourLabel(CellCoord);

// ——> RESOURCES

/// the simulation, owned by the ECS
#[derive(Resource, Debug, Default, Deref, DerefMut)]
pub struct Board(LifeState);

/// whether every cell shows its live neighbour count
#[derive(Resource, Debug, Default)]
struct NeighbourOverlay(bool);

impl NeighbourOverlay {
    #[inline]
    fn visibility(&self) -> Visibility {
        if self.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        }
    }
}

/// hold handles for the cell mesh and materials
#[derive(Resource, Clone)]
struct CellAssets {
    cell_mesh: Handle<Mesh>,
    alive: Handle<ColorMaterial>,
    born: Handle<ColorMaterial>,
    dead: Handle<ColorMaterial>,
}

impl CellAssets {
    fn material_for(&self, board: &LifeState, coord: CellCoord) -> Handle<ColorMaterial> {
        if board.is_newborn(coord) {
            self.born.clone()
        } else if board.is_alive(coord) {
            self.alive.clone()
        } else {
            self.dead.clone()
        }
    }
}
