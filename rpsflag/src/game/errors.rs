use thiserror::Error;

use crate::board::{CellError, CellErrorReason, Coordinate};

/// Reason why a move was rejected. A rejected move never changes the board.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum CannotMoveReason {
    /// The game already has a winner.
    #[error("the game is already over")]
    GameOver,
    /// The player tried to act out of turn.
    #[error("it is not this player's turn")]
    NotYourTurn,
    /// The source coordinate is outside the board.
    #[error("the source coordinate is out of bounds")]
    OutOfBounds,
    /// The source cell is empty.
    #[error("there is no unit at the source cell")]
    NoUnitAtSource,
    /// The unit belongs to someone else.
    #[error("the unit does not belong to this player")]
    NotOwner,
    /// The unit can't move at all.
    #[error("the unit cannot move")]
    Immovable,
    /// The destination is off the board or not a single orthogonal step away.
    #[error("the destination is not one step away on the board")]
    IllegalDestination,
}

/// Error returned when a move is rejected.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
#[error("cannot move {from} -> {to}: {reason}")]
pub struct MoveError {
    /// Reason why the move was rejected.
    reason: CannotMoveReason,
    /// Source cell of the move.
    from: Coordinate,
    /// Destination cell of the move.
    to: Coordinate,
}

impl MoveError {
    pub(super) fn new(reason: CannotMoveReason, from: Coordinate, to: Coordinate) -> Self {
        Self { reason, from, to }
    }

    /// Translate a board error raised while applying an already validated move.
    pub(super) fn from_cell(err: CellError, from: Coordinate, to: Coordinate) -> Self {
        let reason = match err.reason() {
            CellErrorReason::OutOfBounds if err.coord() == from => CannotMoveReason::OutOfBounds,
            CellErrorReason::NoUnitAtSource => CannotMoveReason::NoUnitAtSource,
            CellErrorReason::OutOfBounds | CellErrorReason::CellOccupied => {
                CannotMoveReason::IllegalDestination
            }
        };
        Self::new(reason, from, to)
    }

    /// Get the reason the move was rejected.
    pub fn reason(&self) -> CannotMoveReason {
        self.reason
    }

    /// Source cell of the rejected move.
    pub fn from(&self) -> Coordinate {
        self.from
    }

    /// Destination cell of the rejected move.
    pub fn to(&self) -> Coordinate {
        self.to
    }
}
