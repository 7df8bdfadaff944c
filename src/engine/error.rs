use std::fmt;

use bevy::math::IVec2;

/// Everything the engine can refuse to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifeError {
    /// cell size must be positive, dimensions must be non-negative, all must be finite
    InvalidConfiguration {
        width: f32,
        height: f32,
        cell_size: f32,
    },
    /// the coordinate lies outside `[0, columns) x [0, rows)`
    OutOfRangeCoordinate { coord: IVec2, columns: u32, rows: u32 },
}

impl fmt::Display for LifeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration {
                width,
                height,
                cell_size,
            } => write!(
                f,
                "invalid grid configuration: {width}x{height} with cell size {cell_size}"
            ),
            Self::OutOfRangeCoordinate {
                coord,
                columns,
                rows,
            } => write!(
                f,
                "cell ({}, {}) is outside the {columns}x{rows} lattice",
                coord.x, coord.y
            ),
        }
    }
}

impl std::error::Error for LifeError {}
