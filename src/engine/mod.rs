//! The simulation core: lattice geometry and the life rule.
//!
//! Nothing in here depends on the ECS, the shell in [`crate::life`] drives it.

mod error;
mod grid;
mod life_state;

pub use error::LifeError;
pub use grid::{CellCoord, Grid, GridConfig};
pub use life_state::{CellInfo, EditKind, LifeState};
