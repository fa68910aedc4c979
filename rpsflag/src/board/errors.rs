//! Errors used by the [`Board`][crate::board::Board].

use thiserror::Error;

use crate::board::Coordinate;

/// Reason why a cell could not be read or written.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CellErrorReason {
    /// The coordinate lies outside the board.
    #[error("coordinate is out of bounds")]
    OutOfBounds,
    /// The cell already holds a unit.
    #[error("cell is already occupied")]
    CellOccupied,
    /// There is no unit to move out of the cell.
    #[error("no unit at the source cell")]
    NoUnitAtSource,
}

/// Error returned when a board operation on a cell fails.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("cell {coord}: {reason}")]
pub struct CellError {
    /// Reason the operation failed.
    reason: CellErrorReason,

    /// The coordinate of the offending cell.
    coord: Coordinate,
}

impl CellError {
    /// Construct a cell error with the given reason for the specified cell.
    pub(super) fn new(reason: CellErrorReason, coord: Coordinate) -> Self {
        Self { reason, coord }
    }

    /// Get the reason the operation failed.
    pub fn reason(&self) -> CellErrorReason {
        self.reason
    }

    /// Get the coordinate of the offending cell.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}

/// Reason why a mountain cannot go on a given cell.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum InvalidTerrainReason {
    /// The coordinate lies outside the board.
    #[error("coordinate is out of bounds")]
    OutOfBounds,
    /// The coordinate is inside one of the players' home corners.
    #[error("coordinate is inside a safe zone")]
    SafeZone,
    /// There is already a mountain on the cell.
    #[error("cell already holds a mountain")]
    AlreadyMountain,
    /// A unit already stands on the cell.
    #[error("cell is occupied by a unit")]
    Occupied,
}

/// Error returned when a mountain is placed on an invalid terrain position.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("invalid terrain position {coord}: {reason}")]
pub struct TerrainError {
    #[source]
    reason: InvalidTerrainReason,
    coord: Coordinate,
}

impl TerrainError {
    pub(super) fn new(reason: InvalidTerrainReason, coord: Coordinate) -> Self {
        Self { reason, coord }
    }

    /// Get the reason the position was rejected.
    pub fn reason(&self) -> InvalidTerrainReason {
        self.reason
    }

    /// Get the rejected coordinate.
    pub fn coord(&self) -> Coordinate {
        self.coord
    }
}
