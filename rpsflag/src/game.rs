//! Turn handling: applies moves to the board and decides when the game is won.
//!
//! A [`Game`] owns the [`Board`] and is its only writer once setup is done. Each call to
//! [`Game::apply_move`] validates one move, resolves any collision with
//! [`collision::resolve`], mutates the board and reports what happened. Rejected moves
//! leave the board and the turn untouched so the caller can simply ask again.
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::{
    board::{Board, Coordinate},
    collision::{self, BattleResult, Collision},
    setup::{PlacementError, PlacementGenerator, SetupConfig},
    units::{Player, UnitKind},
};

pub use self::errors::{CannotMoveReason, MoveError};

mod errors;

/// Default wall-clock budget for a single turn.
pub const DEFAULT_TURN_TIME_LIMIT: Duration = Duration::from_secs(400);

/// Settings for a game that don't affect the starting board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GameConfig {
    /// The player who moves first.
    pub first_player: Player,
    /// Time budget for a single turn. The game never checks the clock itself; whoever
    /// drives it is expected to call [`Game::forfeit_turn`] when the budget runs out.
    /// `None` means turns are untimed.
    pub turn_time_limit: Option<Duration>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            first_player: Player::P0,
            turn_time_limit: Some(DEFAULT_TURN_TIME_LIMIT),
        }
    }
}

/// What happened in a battle.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BattleReport {
    attacker: UnitKind,
    defender: UnitKind,
    result: BattleResult,
}

impl BattleReport {
    /// Kind of the unit that moved.
    pub fn attacker(&self) -> UnitKind {
        self.attacker
    }

    /// Kind of the unit that was attacked.
    pub fn defender(&self) -> UnitKind {
        self.defender
    }

    /// How the battle ended.
    pub fn result(&self) -> BattleResult {
        self.result
    }

    /// Whether both units were destroyed.
    pub fn tie(&self) -> bool {
        self.result == BattleResult::Tie
    }

    /// Kind of the winning unit. On a tie both kinds are equal and that kind is returned.
    pub fn winner_kind(&self) -> UnitKind {
        match self.result {
            BattleResult::MoverWins | BattleResult::Tie => self.attacker,
            BattleResult::DefenderWins => self.defender,
        }
    }
}

/// Result of a successfully applied move.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MoveOutcome {
    /// The unit stepped into an empty cell.
    Moved,
    /// The unit attacked an enemy soldier.
    Battled(BattleReport),
    /// The move bumped into a mountain or a friendly unit and nothing changed. The turn
    /// is still spent.
    RolledBack,
    /// The move ended the game with the given winner.
    GameOver(Player),
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    config: GameConfig,
    /// The player whose turn it is.
    current: Player,
    winner: Option<Player>,
}

impl Game {
    /// Start a game on an already built board.
    pub fn new(board: Board, config: GameConfig) -> Self {
        Self {
            board,
            current: config.first_player,
            config,
            winner: None,
        }
    }

    /// Generate a starting board from `setup` and start a game on it.
    pub fn setup<R: Rng + ?Sized>(
        setup: SetupConfig,
        config: GameConfig,
        rng: &mut R,
    ) -> Result<Self, PlacementError> {
        let board = PlacementGenerator::new(setup)?.generate(rng)?;
        Ok(Self::new(board, config))
    }

    /// Read-only view of the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Settings this game was started with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get the player whose turn it currently is.
    pub fn current(&self) -> Player {
        self.current
    }

    /// Returns `None` while the game is in progress, otherwise the winner.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Whether the game has a winner.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Number of units the player can still move.
    pub fn movable_units(&self, player: Player) -> usize {
        self.board.count_units(|u| u.movable() && u.is_owned_by(player))
    }

    /// Move `player`'s unit at `from` one step to `to`.
    #[instrument(skip(self))]
    pub fn apply_move(
        &mut self,
        player: Player,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<MoveOutcome, MoveError> {
        let reject = |reason| MoveError::new(reason, from, to);
        self.check_turn(player).map_err(reject)?;

        let mover = match self.board.unit_at(from) {
            Err(_) => return Err(reject(CannotMoveReason::OutOfBounds)),
            Ok(None) => return Err(reject(CannotMoveReason::NoUnitAtSource)),
            Ok(Some(unit)) => *unit,
        };
        if !mover.is_owned_by(player) {
            return Err(reject(CannotMoveReason::NotOwner));
        }
        if !mover.movable() {
            return Err(reject(CannotMoveReason::Immovable));
        }
        if !self.board.dimensions().is_neighbor(from, to) {
            return Err(reject(CannotMoveReason::IllegalDestination));
        }

        let defender = self
            .board
            .unit_at(to)
            .map_err(|_| reject(CannotMoveReason::IllegalDestination))?
            .copied();
        let cell_err = |err| MoveError::from_cell(err, from, to);
        let outcome = match defender {
            None => {
                self.board.move_unit(from, to).map_err(cell_err)?;
                MoveOutcome::Moved
            }
            Some(defender) => match collision::resolve(&mover, &defender) {
                Collision::Rollback => MoveOutcome::RolledBack,
                Collision::Win => {
                    self.board.remove_unit(to).map_err(cell_err)?;
                    self.board.move_unit(from, to).map_err(cell_err)?;
                    self.winner = Some(player);
                    MoveOutcome::GameOver(player)
                }
                Collision::Battle(result) => {
                    match result {
                        BattleResult::MoverWins => {
                            self.board.remove_unit(to).map_err(cell_err)?;
                            self.board.move_unit(from, to).map_err(cell_err)?;
                        }
                        BattleResult::DefenderWins => {
                            self.board.remove_unit(from).map_err(cell_err)?;
                        }
                        BattleResult::Tie => {
                            self.board.remove_unit(from).map_err(cell_err)?;
                            self.board.remove_unit(to).map_err(cell_err)?;
                        }
                    }
                    MoveOutcome::Battled(BattleReport {
                        attacker: mover.kind(),
                        defender: defender.kind(),
                        result,
                    })
                }
            },
        };
        debug!(%player, ?outcome, "move applied");

        let outcome = match (outcome, self.exhausted_winner(player)) {
            (MoveOutcome::GameOver(_), _) => outcome,
            (_, Some(winner)) => {
                self.winner = Some(winner);
                MoveOutcome::GameOver(winner)
            }
            (_, None) => outcome,
        };
        if let Some(winner) = self.winner {
            info!(%winner, "game over");
        } else {
            self.current = player.opponent();
        }
        Ok(outcome)
    }

    /// Give up `player`'s turn, typically because its time budget ran out. The board is
    /// not touched.
    pub fn forfeit_turn(&mut self, player: Player) -> Result<(), CannotMoveReason> {
        self.check_turn(player)?;
        warn!(%player, "turn forfeited");
        self.current = player.opponent();
        Ok(())
    }

    fn check_turn(&self, player: Player) -> Result<(), CannotMoveReason> {
        if self.winner.is_some() {
            Err(CannotMoveReason::GameOver)
        } else if player != self.current {
            Err(CannotMoveReason::NotYourTurn)
        } else {
            Ok(())
        }
    }

    /// Winner by exhaustion after `mover` moved: a player with no movable units left
    /// loses. If both ran out at once, the mover wins.
    fn exhausted_winner(&self, mover: Player) -> Option<Player> {
        if self.movable_units(mover.opponent()) == 0 {
            Some(mover)
        } else if self.movable_units(mover) == 0 {
            Some(mover.opponent())
        } else {
            None
        }
    }
}
