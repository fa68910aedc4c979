//! Players and the units they command.
use std::fmt;

use enumflags2::BitFlags;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

/// Player ID. The game always has exactly two players.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Player {
    /// Player 0, whose home corner is the top-left of the board.
    P0,
    /// Player 1, whose home corner is the bottom-right of the board.
    P1,
}

impl Player {
    /// Both players in turn order.
    pub const ALL: [Player; 2] = [Player::P0, Player::P1];

    /// Get the opponent of this player.
    pub fn opponent(self) -> Self {
        match self {
            Player::P0 => Player::P1,
            Player::P1 => Player::P0,
        }
    }

    /// Numeric id of this player, `0` or `1`.
    pub fn index(self) -> usize {
        match self {
            Player::P0 => 0,
            Player::P1 => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "player {}", self.index())
    }
}

/// Picks either player with equal probability.
impl Distribution<Player> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Player {
        if rng.gen() {
            Player::P0
        } else {
            Player::P1
        }
    }
}

/// Facts that hold for every unit of a given kind.
#[derive(BitFlags, Debug, Copy, Clone, Eq, PartialEq)]
#[repr(u8)]
pub enum UnitTrait {
    /// The unit belongs to a player.
    Owned = 0b01,
    /// The unit can be moved by its owner.
    Movable = 0b10,
}

/// The closed set of unit kinds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UnitKind {
    Rock,
    Paper,
    Scissors,
    /// Impassable terrain.
    Mountain,
    /// Captured to win the game.
    Flag,
}

impl UnitKind {
    /// Every kind of unit.
    pub const ALL: [UnitKind; 5] = [
        UnitKind::Rock,
        UnitKind::Paper,
        UnitKind::Scissors,
        UnitKind::Mountain,
        UnitKind::Flag,
    ];

    /// Ownership and mobility facts for this kind.
    pub fn traits(self) -> BitFlags<UnitTrait> {
        match self {
            UnitKind::Rock | UnitKind::Paper | UnitKind::Scissors => {
                UnitTrait::Owned | UnitTrait::Movable
            }
            UnitKind::Flag => UnitTrait::Owned.into(),
            UnitKind::Mountain => BitFlags::empty(),
        }
    }

    /// Whether units of this kind always have an owner.
    pub fn is_owned(self) -> bool {
        self.traits().contains(UnitTrait::Owned)
    }

    /// Whether units of this kind can move.
    pub fn is_movable(self) -> bool {
        self.traits().contains(UnitTrait::Movable)
    }

    /// Returns true if this kind wins a battle against `other`. Rock beats scissors,
    /// scissors beats paper and paper beats rock. Nothing else beats anything.
    pub fn beats(self, other: UnitKind) -> bool {
        match (self, other) {
            (UnitKind::Rock, UnitKind::Scissors)
            | (UnitKind::Scissors, UnitKind::Paper)
            | (UnitKind::Paper, UnitKind::Rock) => true,
            _ => false,
        }
    }

    /// Lowercase name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            UnitKind::Rock => "rock",
            UnitKind::Paper => "paper",
            UnitKind::Scissors => "scissors",
            UnitKind::Mountain => "mountain",
            UnitKind::Flag => "flag",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A single piece on the board.
///
/// Units can only be built through [`Unit::soldier`], [`Unit::flag`] and
/// [`Unit::mountain`], so the owner is always present exactly when the kind says it
/// should be.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Unit {
    kind: UnitKind,
    owner: Option<Player>,
}

impl Unit {
    /// A rock, paper or scissors unit belonging to `owner`. Panics for any other kind.
    pub fn soldier(kind: UnitKind, owner: Player) -> Self {
        assert!(kind.is_movable(), "{} is not a soldier kind", kind);
        Self {
            kind,
            owner: Some(owner),
        }
    }

    /// The flag of `owner`.
    pub fn flag(owner: Player) -> Self {
        Self {
            kind: UnitKind::Flag,
            owner: Some(owner),
        }
    }

    /// An unowned mountain.
    pub fn mountain() -> Self {
        Self {
            kind: UnitKind::Mountain,
            owner: None,
        }
    }

    /// Kind of this unit.
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Owner of this unit. `None` only for mountains.
    pub fn owner(&self) -> Option<Player> {
        self.owner
    }

    /// Whether this unit belongs to `player`.
    pub fn is_owned_by(&self, player: Player) -> bool {
        self.owner == Some(player)
    }

    /// Whether this unit can be moved.
    pub fn movable(&self) -> bool {
        self.kind.is_movable()
    }

    /// Character used to draw this unit. Player 0 is drawn in lowercase and player 1 in
    /// uppercase.
    pub fn symbol(&self) -> char {
        let symbol = match self.kind {
            UnitKind::Rock => 'r',
            UnitKind::Paper => 'p',
            UnitKind::Scissors => 's',
            UnitKind::Flag => 'f',
            UnitKind::Mountain => return 'M',
        };
        match self.owner {
            Some(Player::P1) => symbol.to_ascii_uppercase(),
            _ => symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_soldiers_move() {
        for &kind in UnitKind::ALL.iter() {
            let expected = matches!(kind, UnitKind::Rock | UnitKind::Paper | UnitKind::Scissors);
            assert_eq!(kind.is_movable(), expected, "{}", kind);
        }
    }

    #[test]
    fn mountains_are_never_owned() {
        assert!(!UnitKind::Mountain.is_owned());
        assert_eq!(Unit::mountain().owner(), None);
        assert!(!Unit::mountain().movable());
        assert!(Unit::flag(Player::P1).is_owned_by(Player::P1));
        assert!(!Unit::flag(Player::P1).movable());
    }

    #[test]
    fn dominance_is_a_cycle() {
        use UnitKind::*;
        assert!(Rock.beats(Scissors));
        assert!(Scissors.beats(Paper));
        assert!(Paper.beats(Rock));
        for &a in [Rock, Paper, Scissors].iter() {
            assert!(!a.beats(a));
            for &b in [Rock, Paper, Scissors].iter() {
                assert!(!(a.beats(b) && b.beats(a)));
            }
        }
    }

    #[test]
    fn symbols_follow_owner_case() {
        assert_eq!(Unit::soldier(UnitKind::Rock, Player::P0).symbol(), 'r');
        assert_eq!(Unit::soldier(UnitKind::Scissors, Player::P1).symbol(), 'S');
        assert_eq!(Unit::flag(Player::P0).symbol(), 'f');
        assert_eq!(Unit::flag(Player::P1).symbol(), 'F');
        assert_eq!(Unit::mountain().symbol(), 'M');
    }

    #[test]
    #[should_panic]
    fn flags_are_not_soldiers() {
        Unit::soldier(UnitKind::Flag, Player::P0);
    }

    #[test]
    fn opponent_swaps() {
        assert_eq!(Player::P0.opponent(), Player::P1);
        assert_eq!(Player::P1.opponent().opponent(), Player::P1);
    }
}
