//! Decides what happens when a unit moves into an occupied cell.
//!
//! The decision depends only on the defender's kind and on whether both units share an
//! owner, so it is a plain lookup rather than behavior attached to each unit:
//!
//! | mover           | defender              | owners    | outcome  |
//! |-----------------|-----------------------|-----------|----------|
//! | immovable       | any                   | any       | rollback |
//! | movable         | mountain              | any       | rollback |
//! | movable         | flag                  | different | win      |
//! | movable         | flag                  | same      | rollback |
//! | movable         | rock/paper/scissors   | same      | rollback |
//! | movable         | rock/paper/scissors   | different | battle   |
use crate::units::{Unit, UnitKind};

/// How a battle between two soldiers ends.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BattleResult {
    /// The moving unit wins and takes the cell. The defender is destroyed.
    MoverWins,
    /// The defender wins and stays put. The mover is destroyed.
    DefenderWins,
    /// Both units are destroyed and the cell is left empty.
    Tie,
}

/// Outcome of a unit moving into an occupied cell.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Collision {
    /// The mover captured the enemy flag.
    Win,
    /// The move is rejected and nothing changes.
    Rollback,
    /// The two units fight.
    Battle(BattleResult),
}

/// Resolve `mover` moving onto the cell held by `defender`. Has no side effects; the
/// caller applies the outcome to the board.
pub fn resolve(mover: &Unit, defender: &Unit) -> Collision {
    if !mover.movable() {
        return Collision::Rollback;
    }
    let same_owner = defender.kind().is_owned() && mover.owner() == defender.owner();
    match (defender.kind(), same_owner) {
        (UnitKind::Mountain, _) => Collision::Rollback,
        (UnitKind::Flag, false) => Collision::Win,
        (UnitKind::Flag, true) => Collision::Rollback,
        (UnitKind::Rock, true) | (UnitKind::Paper, true) | (UnitKind::Scissors, true) => {
            Collision::Rollback
        }
        (UnitKind::Rock, false) | (UnitKind::Paper, false) | (UnitKind::Scissors, false) => {
            Collision::Battle(battle(mover.kind(), defender.kind()))
        }
    }
}

/// Fight `attacker` against `defender` using the rock-paper-scissors cycle. Equal
/// kinds tie.
pub fn battle(attacker: UnitKind, defender: UnitKind) -> BattleResult {
    if attacker.beats(defender) {
        BattleResult::MoverWins
    } else if defender.beats(attacker) {
        BattleResult::DefenderWins
    } else {
        BattleResult::Tie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Player;

    const SOLDIERS: [UnitKind; 3] = [UnitKind::Rock, UnitKind::Paper, UnitKind::Scissors];

    fn unit(kind: UnitKind, owner: Player) -> Unit {
        match kind {
            UnitKind::Mountain => Unit::mountain(),
            UnitKind::Flag => Unit::flag(owner),
            soldier => Unit::soldier(soldier, owner),
        }
    }

    /// Expected outcome for every combination, written out independently of `resolve`.
    fn expected(mover: UnitKind, defender: UnitKind, same_owner: bool) -> Collision {
        use UnitKind::*;
        if !SOLDIERS.contains(&mover) {
            return Collision::Rollback;
        }
        match defender {
            Mountain => Collision::Rollback,
            Flag if same_owner => Collision::Rollback,
            Flag => Collision::Win,
            _ if same_owner => Collision::Rollback,
            _ if mover == defender => Collision::Battle(BattleResult::Tie),
            _ => match (mover, defender) {
                (Rock, Scissors) | (Scissors, Paper) | (Paper, Rock) => {
                    Collision::Battle(BattleResult::MoverWins)
                }
                _ => Collision::Battle(BattleResult::DefenderWins),
            },
        }
    }

    #[test]
    fn table_is_exhaustive() {
        for &mover in UnitKind::ALL.iter() {
            for &defender in UnitKind::ALL.iter() {
                for &same_owner in [true, false].iter() {
                    let m = unit(mover, Player::P0);
                    let owner = if same_owner { Player::P0 } else { Player::P1 };
                    let d = unit(defender, owner);
                    assert_eq!(
                        resolve(&m, &d),
                        expected(mover, defender, same_owner),
                        "{} onto {} (same owner: {})",
                        mover,
                        defender,
                        same_owner
                    );
                }
            }
        }
    }

    #[test]
    fn rock_crushes_scissors() {
        let rock = Unit::soldier(UnitKind::Rock, Player::P0);
        let scissors = Unit::soldier(UnitKind::Scissors, Player::P1);
        assert_eq!(
            resolve(&rock, &scissors),
            Collision::Battle(BattleResult::MoverWins)
        );
        assert_eq!(
            resolve(&scissors, &rock),
            Collision::Battle(BattleResult::DefenderWins)
        );
    }

    #[test]
    fn equal_kinds_tie() {
        for &kind in SOLDIERS.iter() {
            let a = Unit::soldier(kind, Player::P0);
            let b = Unit::soldier(kind, Player::P1);
            assert_eq!(resolve(&a, &b), Collision::Battle(BattleResult::Tie));
        }
    }

    #[test]
    fn mountains_always_roll_back() {
        for &kind in SOLDIERS.iter() {
            for &owner in Player::ALL.iter() {
                let mover = Unit::soldier(kind, owner);
                assert_eq!(resolve(&mover, &Unit::mountain()), Collision::Rollback);
            }
        }
    }

    #[test]
    fn enemy_flag_wins_own_flag_rolls_back() {
        let paper = Unit::soldier(UnitKind::Paper, Player::P1);
        assert_eq!(resolve(&paper, &Unit::flag(Player::P0)), Collision::Win);
        assert_eq!(resolve(&paper, &Unit::flag(Player::P1)), Collision::Rollback);
    }
}
