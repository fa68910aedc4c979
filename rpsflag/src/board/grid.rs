//! Storage for the cells of the board.

use std::{
    borrow::Borrow,
    ops::{Index, IndexMut},
};

use crate::{
    board::{Coordinate, RectDimensions},
    units::Unit,
};

/// A single cell in the grid, holding the unit that occupies it if any.
pub(super) type GridCell = Option<Unit>;

/// Linearized grid of cells. Every coordinate maps to exactly one slot, so the grid is
/// the sole owner of the units on the board and a cell can never hold two of them.
#[derive(Debug, Clone)]
pub(super) struct Grid {
    /// Dimensions of this board.
    pub(super) dim: RectDimensions,
    /// Cells that make up this board.
    pub(super) cells: Box<[GridCell]>,
}

impl Grid {
    pub(super) fn new(dim: RectDimensions) -> Self {
        let cells = (0..dim.total_size()).map(|_| None).collect();
        Self { dim, cells }
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(super) fn get<B: Borrow<Coordinate>>(&self, coord: B) -> Option<&GridCell> {
        self.dim
            .try_linearize(coord.borrow())
            .and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(super) fn get_mut<B: Borrow<Coordinate>>(&mut self, coord: B) -> Option<&mut GridCell> {
        self.dim
            .try_linearize(coord.borrow())
            .and_then(move |i| self.cells.get_mut(i))
    }

    /// Iterate over the occupied cells along with their coordinates.
    pub(super) fn occupied(&self) -> impl '_ + Iterator<Item = (Coordinate, &Unit)> {
        let dim = self.dim;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|unit| (dim.un_linearize(i), unit)))
    }
}

impl<B: Borrow<Coordinate>> Index<B> for Grid {
    type Output = GridCell;

    fn index(&self, coord: B) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}

impl<B: Borrow<Coordinate>> IndexMut<B> for Grid {
    fn index_mut(&mut self, coord: B) -> &mut Self::Output {
        self.get_mut(coord).expect("coordinate out of bounds")
    }
}
