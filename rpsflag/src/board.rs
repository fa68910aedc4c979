//! Types that make up the game board.

use std::collections::HashSet;

use crate::units::{Unit, UnitKind};

use self::grid::Grid;
pub use self::{
    coordinate::{Coordinate, Direction},
    dimensions::{RectDimensions, RectNeighbors},
    errors::{CellError, CellErrorReason, InvalidTerrainReason, TerrainError},
};

mod coordinate;
mod dimensions;
mod errors;
mod grid;

/// Size of the square home corner in which no mountain may be placed.
pub const DEFAULT_SAFE_SPAN: usize = 7;

/// Reference to a particular cell in the grid.
#[derive(Debug, Copy, Clone)]
pub struct CellRef<'a> {
    /// Coordinate of this cell.
    coord: Coordinate,

    /// The unit on this cell, if any.
    unit: Option<&'a Unit>,
}

impl<'a> CellRef<'a> {
    /// The grid coordinate of this cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }

    /// The unit that occupies this cell, if any.
    pub fn unit(&self) -> Option<&'a Unit> {
        self.unit
    }
}

/// The shared board: dimensions, which unit stands on which cell, and the set of
/// mountain cells.
#[derive(Debug, Clone)]
pub struct Board {
    /// Occupancy of every cell.
    grid: Grid,

    /// Coordinates of every mountain. Always equal to the set of cells in `grid` holding
    /// a mountain.
    terrain: HashSet<Coordinate>,

    /// Edge length of the home corners where mountains are forbidden.
    safe_span: usize,
}

impl Board {
    /// Construct an empty board with the default safe zone.
    pub fn new(dim: RectDimensions) -> Self {
        Self::with_safe_span(dim, DEFAULT_SAFE_SPAN)
    }

    /// Construct an empty board whose home corners are `safe_span` cells wide.
    pub fn with_safe_span(dim: RectDimensions, safe_span: usize) -> Self {
        Self {
            grid: Grid::new(dim),
            terrain: HashSet::new(),
            safe_span,
        }
    }

    /// Get the [`RectDimensions`] of this [`Board`].
    pub fn dimensions(&self) -> &RectDimensions {
        &self.grid.dim
    }

    /// Edge length of the home corners.
    pub fn safe_span(&self) -> usize {
        self.safe_span
    }

    /// The set of mountain coordinates.
    pub fn terrain(&self) -> &HashSet<Coordinate> {
        &self.terrain
    }

    /// Get the unit at the given coordinate, if any.
    pub fn unit_at(&self, coord: Coordinate) -> Result<Option<&Unit>, CellError> {
        self.grid
            .get(coord)
            .map(Option::as_ref)
            .ok_or_else(|| CellError::new(CellErrorReason::OutOfBounds, coord))
    }

    /// Put a unit on an empty cell.
    pub fn place_unit(&mut self, coord: Coordinate, unit: Unit) -> Result<(), CellError> {
        let cell = self.cell_mut(coord)?;
        if cell.is_some() {
            return Err(CellError::new(CellErrorReason::CellOccupied, coord));
        }
        *cell = Some(unit);
        if unit.kind() == UnitKind::Mountain {
            self.terrain.insert(coord);
        }
        Ok(())
    }

    /// Take the unit off the given cell, returning it if there was one.
    pub fn remove_unit(&mut self, coord: Coordinate) -> Result<Option<Unit>, CellError> {
        let unit = self.cell_mut(coord)?.take();
        if let Some(u) = &unit {
            if u.kind() == UnitKind::Mountain {
                self.terrain.remove(&coord);
            }
        }
        Ok(unit)
    }

    /// Relocate the unit at `from` to the empty cell `to`. Collisions are never resolved
    /// here: an occupied destination is an error. Bounds are checked for both cells
    /// before anything else.
    pub fn move_unit(&mut self, from: Coordinate, to: Coordinate) -> Result<(), CellError> {
        for &coord in [from, to].iter() {
            if !self.dimensions().contains(coord) {
                return Err(CellError::new(CellErrorReason::OutOfBounds, coord));
            }
        }
        if self.grid[to].is_some() {
            return Err(CellError::new(CellErrorReason::CellOccupied, to));
        }
        let unit = self
            .remove_unit(from)?
            .ok_or_else(|| CellError::new(CellErrorReason::NoUnitAtSource, from))?;
        // Destination was checked above, so this cannot fail.
        self.place_unit(to, unit)
    }

    /// Returns true if `coord` is inside either player's home corner.
    ///
    /// Player 0's corner is `x < S && y < S` and player 1's is
    /// `x > width - S && y > height - S`, where `S` is the safe span.
    pub fn in_safe_zone(&self, coord: Coordinate) -> bool {
        let span = self.safe_span;
        let dim = self.dimensions();
        (coord.x < span && coord.y < span)
            || (coord.x + span > dim.width() && coord.y + span > dim.height())
    }

    /// Check whether a mountain could be placed on `coord` without placing it.
    pub fn check_mountain(&self, coord: Coordinate) -> Result<(), TerrainError> {
        let reason = match self.grid.get(coord) {
            None => InvalidTerrainReason::OutOfBounds,
            Some(_) if self.in_safe_zone(coord) => InvalidTerrainReason::SafeZone,
            Some(_) if self.terrain.contains(&coord) => InvalidTerrainReason::AlreadyMountain,
            Some(Some(_)) => InvalidTerrainReason::Occupied,
            Some(None) => return Ok(()),
        };
        Err(TerrainError::new(reason, coord))
    }

    /// Place a mountain, refusing safe-zone cells, duplicates and occupied cells.
    pub fn place_mountain(&mut self, coord: Coordinate) -> Result<(), TerrainError> {
        self.check_mountain(coord)?;
        self.grid[coord] = Some(Unit::mountain());
        self.terrain.insert(coord);
        Ok(())
    }

    /// Iterate over every occupied cell and its unit.
    pub fn iter_units(&self) -> impl '_ + Iterator<Item = (Coordinate, &Unit)> {
        self.grid.occupied()
    }

    /// Count the units matching the predicate.
    pub fn count_units<F>(&self, mut pred: F) -> usize
    where
        F: FnMut(&Unit) -> bool,
    {
        self.iter_units().filter(|(_, unit)| pred(unit)).count()
    }

    /// Get an iterator over the board. The iterator's item is another iterator that
    /// iterates over a single row.
    pub fn iter_rows<'a>(
        &'a self,
    ) -> impl 'a + Iterator<Item = impl 'a + Iterator<Item = CellRef<'a>>> {
        let grid = &self.grid;
        grid.dim.iter_coordinates().map(move |row| {
            row.map(move |coord| CellRef {
                coord,
                unit: grid[coord].as_ref(),
            })
        })
    }

    fn cell_mut(&mut self, coord: Coordinate) -> Result<&mut Option<Unit>, CellError> {
        self.grid
            .get_mut(coord)
            .ok_or_else(|| CellError::new(CellErrorReason::OutOfBounds, coord))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Player;

    fn board() -> Board {
        Board::new(RectDimensions::new(12, 12))
    }

    fn rock(owner: Player) -> Unit {
        Unit::soldier(UnitKind::Rock, owner)
    }

    #[test]
    fn unit_at_out_of_bounds() {
        let b = board();
        let err = b.unit_at(Coordinate::new(12, 0)).unwrap_err();
        assert_eq!(err.reason(), CellErrorReason::OutOfBounds);
        assert_eq!(b.unit_at(Coordinate::new(11, 11)).unwrap(), None);
    }

    #[test]
    fn place_unit_refuses_stacking() {
        let mut b = board();
        let c = Coordinate::new(3, 3);
        b.place_unit(c, rock(Player::P0)).unwrap();
        let err = b.place_unit(c, rock(Player::P1)).unwrap_err();
        assert_eq!(err.reason(), CellErrorReason::CellOccupied);
        assert_eq!(b.unit_at(c).unwrap(), Some(&rock(Player::P0)));
    }

    #[test]
    fn move_unit_relocates() {
        let mut b = board();
        let (from, to) = (Coordinate::new(3, 3), Coordinate::new(3, 4));
        b.place_unit(from, rock(Player::P0)).unwrap();
        b.move_unit(from, to).unwrap();
        assert_eq!(b.unit_at(from).unwrap(), None);
        assert_eq!(b.unit_at(to).unwrap(), Some(&rock(Player::P0)));
    }

    #[test]
    fn move_unit_errors_leave_board_untouched() {
        let mut b = board();
        let (a, c) = (Coordinate::new(3, 3), Coordinate::new(3, 4));
        assert_eq!(
            b.move_unit(a, c).unwrap_err().reason(),
            CellErrorReason::NoUnitAtSource
        );
        b.place_unit(a, rock(Player::P0)).unwrap();
        b.place_unit(c, rock(Player::P1)).unwrap();
        assert_eq!(
            b.move_unit(a, c).unwrap_err().reason(),
            CellErrorReason::CellOccupied
        );
        assert_eq!(
            b.move_unit(a, Coordinate::new(30, 3)).unwrap_err().reason(),
            CellErrorReason::OutOfBounds
        );
        assert_eq!(
            b.move_unit(Coordinate::new(30, 3), a).unwrap_err().reason(),
            CellErrorReason::OutOfBounds
        );
        assert_eq!(b.unit_at(a).unwrap(), Some(&rock(Player::P0)));
        assert_eq!(b.unit_at(c).unwrap(), Some(&rock(Player::P1)));
    }

    #[test]
    fn move_unit_checks_bounds_before_occupancy() {
        let mut b = board();
        let occupied = Coordinate::new(3, 3);
        b.place_unit(occupied, rock(Player::P0)).unwrap();

        let err = b.move_unit(Coordinate::new(30, 3), occupied).unwrap_err();
        assert_eq!(err.reason(), CellErrorReason::OutOfBounds);
        assert_eq!(err.coord(), Coordinate::new(30, 3));

        let err = b
            .move_unit(Coordinate::new(12, 12), Coordinate::new(40, 0))
            .unwrap_err();
        assert_eq!(err.reason(), CellErrorReason::OutOfBounds);
        assert_eq!(err.coord(), Coordinate::new(12, 12));
        assert_eq!(b.unit_at(occupied).unwrap(), Some(&rock(Player::P0)));
    }

    #[test]
    fn safe_zone_boundaries() {
        let b = board();
        // Player 0's corner: x < 7 && y < 7.
        assert!(b.in_safe_zone(Coordinate::new(0, 0)));
        assert!(b.in_safe_zone(Coordinate::new(6, 6)));
        assert!(!b.in_safe_zone(Coordinate::new(7, 0)));
        assert!(!b.in_safe_zone(Coordinate::new(0, 7)));
        // Player 1's corner: x > 5 && y > 5 on a 12x12 board.
        assert!(b.in_safe_zone(Coordinate::new(11, 11)));
        assert!(b.in_safe_zone(Coordinate::new(6, 11)));
        assert!(!b.in_safe_zone(Coordinate::new(5, 11)));
        assert!(!b.in_safe_zone(Coordinate::new(11, 5)));
    }

    #[test]
    fn place_mountain_rules() {
        let mut b = board();
        let reason = |b: &mut Board, x, y| {
            b.place_mountain(Coordinate::new(x, y))
                .unwrap_err()
                .reason()
        };

        assert_eq!(reason(&mut b, 2, 2), InvalidTerrainReason::SafeZone);
        assert_eq!(reason(&mut b, 10, 10), InvalidTerrainReason::SafeZone);
        assert_eq!(reason(&mut b, 12, 0), InvalidTerrainReason::OutOfBounds);

        b.place_mountain(Coordinate::new(8, 1)).unwrap();
        assert_eq!(reason(&mut b, 8, 1), InvalidTerrainReason::AlreadyMountain);

        b.place_unit(Coordinate::new(1, 9), rock(Player::P1)).unwrap();
        assert_eq!(reason(&mut b, 1, 9), InvalidTerrainReason::Occupied);

        assert_eq!(b.terrain().len(), 1);
        assert!(b.terrain().contains(&Coordinate::new(8, 1)));
        assert_eq!(
            b.unit_at(Coordinate::new(8, 1)).unwrap().map(Unit::kind),
            Some(UnitKind::Mountain)
        );
    }

    #[test]
    fn terrain_tracks_mountain_units() {
        let mut b = board();
        let c = Coordinate::new(0, 0);
        b.place_unit(c, Unit::mountain()).unwrap();
        assert!(b.terrain().contains(&c));
        assert_eq!(b.remove_unit(c).unwrap(), Some(Unit::mountain()));
        assert!(b.terrain().is_empty());
    }

    #[test]
    fn rows_cover_the_board() {
        let mut b = board();
        b.place_unit(Coordinate::new(4, 2), rock(Player::P0)).unwrap();
        let rows: Vec<Vec<_>> = b.iter_rows().map(|row| row.collect()).collect();
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|row| row.len() == 12));
        assert_eq!(rows[2][4].unit(), Some(&rock(Player::P0)));
        assert_eq!(rows[2][4].coord(), Coordinate::new(4, 2));
        assert_eq!(b.count_units(|_| true), 1);
    }
}
