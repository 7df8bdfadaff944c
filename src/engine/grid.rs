use bevy::math::{ivec2, vec2, IVec2, Rect, Vec2};

use super::LifeError;
use crate::prelude::{CELL_SIZE_PX, WINDOW_SIZE_PX};

/// Column/row position of a cell on the lattice.
pub type CellCoord = IVec2;

/// Requested shape of the lattice in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    pub width: f32,
    pub height: f32,
    pub cell_size: f32,
}

impl GridConfig {
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    /// Rejects shapes a [`Grid`] can't be built from.
    pub fn validate(&self) -> Result<(), LifeError> {
        let dims_ok = self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0;
        let cell_ok = self.cell_size.is_finite() && self.cell_size > 0.0;
        // coordinates are i32, so the lattice must stay addressable by them
        let max_cells = i32::MAX as f32;
        let size_ok = cell_ok
            && (self.width / self.cell_size).floor() < max_cells
            && (self.height / self.cell_size).floor() < max_cells;

        if dims_ok && cell_ok && size_ok {
            Ok(())
        } else {
            Err(LifeError::InvalidConfiguration {
                width: self.width,
                height: self.height,
                cell_size: self.cell_size,
            })
        }
    }

    #[inline]
    pub fn with_dimensions(self, width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    #[inline]
    pub fn with_cell_size(self, cell_size: f32) -> Self {
        Self { cell_size, ..self }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::new(WINDOW_SIZE_PX.x, WINDOW_SIZE_PX.y, CELL_SIZE_PX)
    }
}

/// A finite rectangular lattice. Knows only shape, never which cells live.
///
/// Pixel space has its origin in the top left corner with y growing downwards,
/// which matches window cursor positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    config: GridConfig,
    columns: u32,
    rows: u32,
}

impl Grid {
    pub fn new(config: GridConfig) -> Result<Self, LifeError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: GridConfig) -> Self {
        Self {
            config,
            columns: (config.width / config.cell_size).floor() as u32,
            rows: (config.height / config.cell_size).floor() as u32,
        }
    }

    #[inline]
    pub fn config(&self) -> GridConfig {
        self.config
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.config.cell_size
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// size of the area covered by whole cells, in pixels
    #[inline]
    pub fn pixel_size(&self) -> Vec2 {
        vec2(self.columns as f32, self.rows as f32) * self.config.cell_size
    }

    #[inline]
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.x >= 0 && coord.y >= 0 && coord.x < self.columns as i32 && coord.y < self.rows as i32
    }

    /// Cell containing the pixel `position`. Positions past the edges map to
    /// coordinates outside the lattice; use [`Grid::contains`] to check.
    #[inline]
    pub fn cell_at(&self, position: Vec2) -> CellCoord {
        (position / self.config.cell_size).floor().as_ivec2()
    }

    /// Every coordinate of the lattice, column by column.
    pub fn all_cells(&self) -> impl Iterator<Item = CellCoord> + Clone {
        let (columns, rows) = (self.columns as i32, self.rows as i32);
        (0..columns).flat_map(move |x| (0..rows).map(move |y| ivec2(x, y)))
    }

    /// Pixel rectangle covered by `coord`.
    #[inline]
    pub fn bounding_box(&self, coord: CellCoord) -> Rect {
        let min = coord.as_vec2() * self.config.cell_size;
        Rect::from_corners(min, min + Vec2::splat(self.config.cell_size))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::from_valid(GridConfig::default())
    }
}
