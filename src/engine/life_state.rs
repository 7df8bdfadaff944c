use bevy::{
    log::debug,
    math::{ivec2, Vec2},
    utils::HashSet,
};

use super::{CellCoord, Grid, GridConfig, LifeError};

/// Offsets of the Moore neighbourhood.
const NEIGHBOUR_OFFSETS: [CellCoord; 8] = [
    ivec2(-1, -1),
    ivec2(0, -1),
    ivec2(1, -1),
    ivec2(-1, 0),
    ivec2(1, 0),
    ivec2(-1, 1),
    ivec2(0, 1),
    ivec2(1, 1),
];

/// How a manual edit changes the cell under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    SetAlive,
    SetDead,
    Toggle,
}

/// Snapshot of a single cell, used by the neighbour overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellInfo {
    pub alive: bool,
    pub neighbours: u8,
}

/// The alive cells of a [`Grid`] and the rule that advances them.
///
/// Membership in `alive` is the only notion of life; every coordinate in it
/// lies inside `grid`.
#[derive(Debug, Clone, Default)]
pub struct LifeState {
    grid: Grid,
    alive: HashSet<CellCoord>,
    /// cells born by the last `step`
    newborns: HashSet<CellCoord>,
    generation: u64,
}

impl LifeState {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            alive: HashSet::default(),
            newborns: HashSet::default(),
            generation: 0,
        }
    }

    /// Builds a fresh grid from `config` and drops every live cell.
    ///
    /// An invalid `config` leaves the current grid and cells untouched.
    /// Resetting on every resize mirrors how the editor has always behaved,
    /// even though keeping in-bounds cells would arguably be friendlier.
    pub fn reconfigure(&mut self, config: GridConfig) -> Result<(), LifeError> {
        let grid = Grid::new(config)?;
        debug!(
            columns = grid.columns(),
            rows = grid.rows(),
            cell_size = grid.cell_size(),
            "grid reconfigured"
        );
        self.grid = grid;
        self.clear();
        Ok(())
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.alive.len()
    }

    #[inline]
    pub fn live_cells(&self) -> &HashSet<CellCoord> {
        &self.alive
    }

    #[inline]
    pub fn newborns(&self) -> &HashSet<CellCoord> {
        &self.newborns
    }

    #[inline]
    pub fn is_alive(&self, coord: CellCoord) -> bool {
        self.alive.contains(&coord)
    }

    #[inline]
    pub fn is_newborn(&self, coord: CellCoord) -> bool {
        self.newborns.contains(&coord)
    }

    fn check_bounds(&self, coord: CellCoord) -> Result<(), LifeError> {
        if self.grid.contains(coord) {
            Ok(())
        } else {
            Err(LifeError::OutOfRangeCoordinate {
                coord,
                columns: self.grid.columns(),
                rows: self.grid.rows(),
            })
        }
    }

    /// Flips `coord` and returns whether it is alive afterwards.
    pub fn toggle_alive(&mut self, coord: CellCoord) -> Result<bool, LifeError> {
        self.check_bounds(coord)?;
        self.newborns.remove(&coord);
        if self.alive.remove(&coord) {
            Ok(false)
        } else {
            self.alive.insert(coord);
            Ok(true)
        }
    }

    /// Makes `coord` alive or dead, returning `true` if that changed anything.
    pub fn set_alive(&mut self, coord: CellCoord, alive: bool) -> Result<bool, LifeError> {
        self.check_bounds(coord)?;
        self.newborns.remove(&coord);
        if alive {
            Ok(self.alive.insert(coord))
        } else {
            Ok(self.alive.remove(&coord))
        }
    }

    /// Applies a pointer edit at pixel `position` to the single cell under it.
    pub fn edit_at(&mut self, position: Vec2, kind: EditKind) -> Result<CellCoord, LifeError> {
        let coord = self.grid.cell_at(position);
        match kind {
            EditKind::SetAlive => self.set_alive(coord, true)?,
            EditKind::SetDead => self.set_alive(coord, false)?,
            EditKind::Toggle => self.toggle_alive(coord)?,
        };
        Ok(coord)
    }

    pub fn inspect(&self, coord: CellCoord) -> Result<CellInfo, LifeError> {
        self.check_bounds(coord)?;
        Ok(CellInfo {
            alive: self.is_alive(coord),
            neighbours: self.neighbour_count(coord),
        })
    }

    /// Number of live cells among the 8 surrounding coordinates.
    ///
    /// Wrapped neighbours of extreme coordinates lie far off the lattice and
    /// are never alive.
    pub fn neighbour_count(&self, coord: CellCoord) -> u8 {
        NEIGHBOUR_OFFSETS
            .iter()
            .filter(|&&offs| self.alive.contains(&coord.wrapping_add(offs)))
            .count() as u8
    }

    /// Whether `coord` is alive in the generation after this one.
    #[inline]
    fn lives_on(&self, coord: CellCoord) -> bool {
        match self.neighbour_count(coord) {
            3 => true,
            2 => self.is_alive(coord),
            _ => false,
        }
    }

    /// Computes the next generation from this one without touching it.
    #[cfg(not(feature = "parallel"))]
    pub fn next_generation(&self) -> HashSet<CellCoord> {
        self.grid
            .all_cells()
            .filter(|&coord| self.lives_on(coord))
            .collect()
    }

    /// Computes the next generation from this one without touching it.
    #[cfg(feature = "parallel")]
    pub fn next_generation(&self) -> HashSet<CellCoord> {
        use rayon::prelude::*;

        let cells: Vec<_> = self.grid.all_cells().collect();
        cells
            .into_par_iter()
            .filter(|&coord| self.lives_on(coord))
            .collect::<Vec<_>>()
            .into_iter()
            .collect()
    }

    /// Advances one generation and returns the new live set.
    pub fn step(&mut self) -> &HashSet<CellCoord> {
        let next = self.next_generation();
        let died = self.alive.difference(&next).count();
        self.newborns = next.difference(&self.alive).copied().collect();
        self.alive = next;
        self.generation += 1;

        debug!(
            generation = self.generation,
            population = self.alive.len(),
            born = self.newborns.len(),
            died,
            "advanced generation"
        );
        &self.alive
    }

    /// Kills every cell and restarts the generation count.
    pub fn clear(&mut self) {
        self.alive.clear();
        self.newborns.clear();
        self.generation = 0;
    }

    /// Replaces the board with a random fill, each cell alive with even odds.
    pub fn randomize(&mut self, rng: &mut fastrand::Rng) {
        self.clear();
        self.alive = self.grid.all_cells().filter(|_| rng.bool()).collect();
    }
}

#[cfg(test)]
mod test {
    use bevy::math::vec2;

    use super::*;

    fn life(columns: u32, rows: u32) -> LifeState {
        let grid = Grid::new(GridConfig::new(columns as f32 * 10., rows as f32 * 10., 10.)).unwrap();
        LifeState::new(grid)
    }

    fn with_cells(mut life: LifeState, cells: &[CellCoord]) -> LifeState {
        for &c in cells {
            life.set_alive(c, true).unwrap();
        }
        life
    }

    fn set_of(cells: &[CellCoord]) -> HashSet<CellCoord> {
        cells.iter().copied().collect()
    }

    #[test]
    fn no_neighbours_away_from_live_cells() {
        let life = with_cells(life(10, 10), &[ivec2(1, 1), ivec2(2, 1), ivec2(8, 8)]);
        for coord in life.grid().all_cells() {
            let adjacent = life
                .live_cells()
                .iter()
                .any(|c| *c != coord && (*c - coord).abs().max_element() <= 1);
            if !adjacent {
                assert_eq!(0, life.neighbour_count(coord), "{coord}");
            }
        }
        assert_eq!(2, life.neighbour_count(ivec2(1, 2)));
        assert_eq!(1, life.neighbour_count(ivec2(1, 1)));
    }

    #[test]
    fn neighbour_count_covers_moore_neighbourhood() {
        let around: Vec<_> = NEIGHBOUR_OFFSETS.iter().map(|o| ivec2(5, 5) + *o).collect();
        let life = with_cells(life(10, 10), &around);
        assert_eq!(8, life.neighbour_count(ivec2(5, 5)));
        assert_eq!(2, life.neighbour_count(ivec2(4, 4)));
        assert_eq!(0, life.neighbour_count(ivec2(8, 8)));
    }

    #[test]
    fn neighbour_count_of_extreme_coordinates() {
        let life = with_cells(life(10, 10), &[ivec2(0, 0), ivec2(9, 9)]);
        for coord in [
            ivec2(i32::MAX, 0),
            ivec2(i32::MIN, 0),
            ivec2(0, i32::MAX),
            ivec2(i32::MIN, i32::MIN),
            ivec2(i32::MAX, i32::MAX),
        ] {
            assert_eq!(0, life.neighbour_count(coord), "{coord}");
            assert!(life.inspect(coord).is_err());
        }
    }

    #[test]
    fn double_toggle_restores_state() {
        let mut life = with_cells(life(10, 10), &[ivec2(3, 3), ivec2(4, 4)]);
        let before = life.live_cells().clone();

        assert!(life.toggle_alive(ivec2(3, 4)).unwrap());
        assert!(life.is_alive(ivec2(3, 4)));
        assert!(!life.toggle_alive(ivec2(3, 4)).unwrap());
        assert_eq!(&before, life.live_cells());

        assert!(!life.toggle_alive(ivec2(3, 3)).unwrap());
        assert!(life.toggle_alive(ivec2(3, 3)).unwrap());
        assert_eq!(&before, life.live_cells());
    }

    #[test]
    fn set_alive_reports_changes() {
        let mut life = life(4, 4);
        assert!(life.set_alive(ivec2(1, 1), true).unwrap());
        assert!(!life.set_alive(ivec2(1, 1), true).unwrap());
        assert_eq!(1, life.population());
        assert!(life.set_alive(ivec2(1, 1), false).unwrap());
        assert!(!life.set_alive(ivec2(1, 1), false).unwrap());
        assert_eq!(0, life.population());
    }

    #[test]
    fn out_of_range_edits_are_rejected() {
        let mut life = with_cells(life(10, 10), &[ivec2(0, 0)]);
        for coord in [ivec2(-1, 0), ivec2(0, -1), ivec2(10, 0), ivec2(0, 10)] {
            assert_eq!(
                Err(LifeError::OutOfRangeCoordinate {
                    coord,
                    columns: 10,
                    rows: 10
                }),
                life.toggle_alive(coord)
            );
            assert!(life.set_alive(coord, true).is_err());
            assert!(life.inspect(coord).is_err());
        }
        assert!(life.edit_at(vec2(-5., 5.), EditKind::SetAlive).is_err());
        assert!(life.edit_at(vec2(150., 5.), EditKind::Toggle).is_err());
        assert_eq!(&set_of(&[ivec2(0, 0)]), life.live_cells());
    }

    #[test]
    fn block_is_still_life() {
        let block = [ivec2(4, 4), ivec2(5, 4), ivec2(4, 5), ivec2(5, 5)];
        let mut life = with_cells(life(10, 10), &block);
        assert_eq!(&set_of(&block), life.step());
        assert_eq!(&set_of(&block), life.step());
        assert!(life.newborns().is_empty());
        assert_eq!(2, life.generation());
    }

    #[test]
    fn isolated_cell_dies() {
        let mut life = with_cells(life(10, 10), &[ivec2(5, 5)]);
        assert!(life.step().is_empty());
        assert!(!life.is_alive(ivec2(5, 5)));
    }

    #[test]
    fn birth_needs_exactly_three() {
        // L triomino, (1, 1) is the missing corner
        let mut three = with_cells(life(10, 10), &[ivec2(0, 0), ivec2(1, 0), ivec2(0, 1)]);
        assert_eq!(3, three.neighbour_count(ivec2(1, 1)));
        three.step();
        assert!(three.is_alive(ivec2(1, 1)));
        assert!(three.is_newborn(ivec2(1, 1)));
        assert!(!three.is_newborn(ivec2(0, 0)));

        let mut two = with_cells(life(10, 10), &[ivec2(4, 4), ivec2(6, 4)]);
        assert_eq!(2, two.neighbour_count(ivec2(5, 5)));
        two.step();
        assert!(!two.is_alive(ivec2(5, 5)));

        let mut four = with_cells(
            life(10, 10),
            &[ivec2(4, 4), ivec2(6, 4), ivec2(4, 6), ivec2(6, 6)],
        );
        assert_eq!(4, four.neighbour_count(ivec2(5, 5)));
        four.step();
        assert!(!four.is_alive(ivec2(5, 5)));
    }

    #[test]
    fn overcrowded_cell_dies() {
        let plus = [ivec2(5, 5), ivec2(4, 5), ivec2(6, 5), ivec2(5, 4), ivec2(5, 6)];
        let mut life = with_cells(life(10, 10), &plus);
        assert_eq!(4, life.neighbour_count(ivec2(5, 5)));
        life.step();
        assert!(!life.is_alive(ivec2(5, 5)));
    }

    #[test]
    fn blinker_oscillates() {
        let horizontal = [ivec2(3, 4), ivec2(4, 4), ivec2(5, 4)];
        let vertical = [ivec2(4, 3), ivec2(4, 4), ivec2(4, 5)];
        let mut life = with_cells(life(10, 10), &horizontal);

        assert_eq!(&set_of(&vertical), life.step());
        assert_eq!(&set_of(&[ivec2(4, 3), ivec2(4, 5)]), life.newborns());
        assert_eq!(&set_of(&horizontal), life.step());
        assert_eq!(2, life.generation());
    }

    #[test]
    fn next_generation_reads_a_frozen_snapshot() {
        let mut life = with_cells(life(10, 10), &[ivec2(3, 4), ivec2(4, 4), ivec2(5, 4)]);
        let before = life.live_cells().clone();
        let next = life.next_generation();
        assert_eq!(&before, life.live_cells());
        assert_eq!(&next, life.step());
    }

    #[test]
    fn corner_ignores_negative_coordinates() {
        let mut life = with_cells(life(10, 10), &[ivec2(0, 0), ivec2(1, 0), ivec2(0, 1), ivec2(1, 1)]);
        assert_eq!(3, life.neighbour_count(ivec2(0, 0)));
        assert_eq!(
            CellInfo {
                alive: true,
                neighbours: 3
            },
            life.inspect(ivec2(0, 0)).unwrap()
        );
        // a block in the corner is still stable, nothing is born off-lattice
        let before = life.live_cells().clone();
        assert_eq!(&before, life.step());
    }

    #[test]
    fn births_stay_on_the_lattice() {
        // vertical blinker on the left edge would grow into column -1
        let mut life = with_cells(life(3, 3), &[ivec2(0, 0), ivec2(0, 1), ivec2(0, 2)]);
        life.step();
        assert_eq!(&set_of(&[ivec2(0, 1), ivec2(1, 1)]), life.live_cells());
        assert!(life.live_cells().iter().all(|c| life.grid().contains(*c)));
    }

    #[test]
    fn edit_at_resolves_one_cell() {
        let mut life = life(10, 10);
        assert_eq!(Ok(ivec2(2, 7)), life.edit_at(vec2(25., 79.), EditKind::SetAlive));
        assert_eq!(&set_of(&[ivec2(2, 7)]), life.live_cells());

        // painting an alive cell again keeps it alive
        life.edit_at(vec2(21., 71.), EditKind::SetAlive).unwrap();
        assert_eq!(1, life.population());

        life.edit_at(vec2(29., 70.), EditKind::Toggle).unwrap();
        assert!(life.live_cells().is_empty());

        life.edit_at(vec2(0., 0.), EditKind::Toggle).unwrap();
        life.edit_at(vec2(5., 5.), EditKind::SetDead).unwrap();
        assert!(life.live_cells().is_empty());
    }

    #[test]
    fn edits_clear_newborn_marks() {
        let mut life = with_cells(life(10, 10), &[ivec2(0, 0), ivec2(1, 0), ivec2(0, 1)]);
        life.step();
        assert!(life.is_newborn(ivec2(1, 1)));
        life.toggle_alive(ivec2(1, 1)).unwrap();
        assert!(!life.is_newborn(ivec2(1, 1)));
    }

    #[test]
    fn reconfigure_resets_the_board() {
        let mut life = with_cells(life(10, 10), &[ivec2(1, 1), ivec2(2, 1), ivec2(3, 1)]);
        life.step();

        life.reconfigure(GridConfig::new(200., 100., 20.)).unwrap();
        assert_eq!((10, 5), (life.grid().columns(), life.grid().rows()));
        assert!(life.live_cells().is_empty());
        assert!(life.newborns().is_empty());
        assert_eq!(0, life.generation());
    }

    #[test]
    fn invalid_reconfigure_keeps_prior_state() {
        let mut life = with_cells(life(10, 10), &[ivec2(1, 1)]);
        let grid = *life.grid();

        let err = life.reconfigure(GridConfig::new(100., 100., 0.)).unwrap_err();
        assert!(matches!(err, LifeError::InvalidConfiguration { .. }));
        assert_eq!(&grid, life.grid());
        assert!(life.is_alive(ivec2(1, 1)));
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_generation_matches_sequential() {
        let mut life = life(40, 30);
        life.randomize(&mut fastrand::Rng::with_seed(42));

        for _ in 0..5 {
            let sequential: HashSet<CellCoord> = life
                .grid()
                .all_cells()
                .filter(|&coord| life.lives_on(coord))
                .collect();
            assert_eq!(sequential, life.next_generation());
            assert_eq!(&sequential, life.step());
        }
    }

    #[test]
    fn randomize_is_seeded_and_in_bounds() {
        let mut a = life(16, 12);
        let mut b = life(16, 12);
        a.randomize(&mut fastrand::Rng::with_seed(7));
        b.randomize(&mut fastrand::Rng::with_seed(7));

        assert_eq!(a.live_cells(), b.live_cells());
        assert!(a.population() > 0 && a.population() < a.grid().cell_count());
        assert!(a.live_cells().iter().all(|c| a.grid().contains(*c)));
        assert_eq!(0, a.generation());
    }
}
