//! Builds the starting board: both players' units, their flags and the mountains.
use std::ops::Range;

use rand::{distributions::Distribution, seq::SliceRandom, Rng};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::{
    board::{Board, CellError, Coordinate, RectDimensions, DEFAULT_SAFE_SPAN},
    units::{Player, Unit, UnitKind},
};

/// Random cells tried for a single mountain before picking directly among the cells that
/// are still free.
const MAX_SAMPLES_PER_MOUNTAIN: usize = 64;

/// Largest number of cells a generated board may have.
pub const MAX_BOARD_CELLS: usize = 1 << 20;

/// Unit kinds by `y % 3` for player 0.
const P0_CYCLE: [UnitKind; 3] = [UnitKind::Rock, UnitKind::Paper, UnitKind::Scissors];
/// Unit kinds by `y % 3` for player 1, mirrored so facing rows present complementary
/// matchups.
const P1_CYCLE: [UnitKind; 3] = [UnitKind::Scissors, UnitKind::Paper, UnitKind::Rock];

/// Geometry of the starting zones.
///
/// Player 0's zone spans columns `[inset, inset + zone_width)` and rows
/// `[0, zone_height)`. Player 1's zone is the mirror image at the opposite corner:
/// columns `[width - inset - zone_width, width - inset)` and rows
/// `[height - zone_height, height)`. Flags sit in the extreme corners, which the inset
/// keeps free.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ZoneLayout {
    /// Columns left free between the board edge and the zone.
    pub inset: usize,
    /// Number of columns in each zone.
    pub zone_width: usize,
    /// Number of rows in each zone.
    pub zone_height: usize,
    /// Edge length of the home corners where mountains are forbidden.
    pub safe_span: usize,
}

impl Default for ZoneLayout {
    /// Player 0 on columns `[1, 6)` and rows `[0, 6)`, with a safe span of 7.
    fn default() -> Self {
        Self {
            inset: 1,
            zone_width: 5,
            zone_height: 6,
            safe_span: DEFAULT_SAFE_SPAN,
        }
    }
}

impl ZoneLayout {
    /// Smallest `(width, height)` that fits both zones without overlap.
    pub fn min_dimensions(&self) -> (usize, usize) {
        (2 * (self.inset + self.zone_width), 2 * self.zone_height)
    }

    /// Columns of the given player's zone.
    pub fn columns(&self, player: Player, dim: &RectDimensions) -> Range<usize> {
        match player {
            Player::P0 => self.inset..self.inset + self.zone_width,
            Player::P1 => {
                let end = dim.width().saturating_sub(self.inset);
                end.saturating_sub(self.zone_width)..end
            }
        }
    }

    /// Rows of the given player's zone.
    pub fn rows(&self, player: Player, dim: &RectDimensions) -> Range<usize> {
        match player {
            Player::P0 => 0..self.zone_height,
            Player::P1 => dim.height().saturating_sub(self.zone_height)..dim.height(),
        }
    }

    /// Returns true if `coord` lies in the given player's zone.
    pub fn contains(&self, player: Player, dim: &RectDimensions, coord: Coordinate) -> bool {
        self.columns(player, dim).contains(&coord.x) && self.rows(player, dim).contains(&coord.y)
    }

    /// Where the given player's flag goes: the top-left corner for player 0 and the
    /// bottom-right corner for player 1.
    pub fn flag_position(player: Player, dim: &RectDimensions) -> Coordinate {
        match player {
            Player::P0 => Coordinate::new(0, 0),
            Player::P1 => Coordinate::new(dim.width() - 1, dim.height() - 1),
        }
    }

    /// Kind of the unit the given player starts with on row `y`.
    pub fn kind_for_row(player: Player, y: usize) -> UnitKind {
        match player {
            Player::P0 => P0_CYCLE[y % 3],
            Player::P1 => P1_CYCLE[y % 3],
        }
    }
}

/// How much of the board is covered in mountains.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Difficulty {
    /// 10% of tiles are mountains.
    Easy,
    /// 30% of tiles are mountains.
    Medium,
    /// 50% of tiles are mountains.
    Hard,
}

impl Difficulty {
    /// Percentage of all tiles that become mountains.
    pub fn mountain_percent(self) -> usize {
        match self {
            Difficulty::Easy => 10,
            Difficulty::Medium => 30,
            Difficulty::Hard => 50,
        }
    }

    /// Number of mountains for a `width` x `height` board.
    pub fn mountain_count(self, width: usize, height: usize) -> usize {
        width.saturating_mul(height).saturating_mul(self.mountain_percent()) / 100
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

/// Everything needed to generate a starting board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SetupConfig {
    pub width: usize,
    pub height: usize,
    /// Number of mountains to scatter.
    pub mountains: usize,
    pub layout: ZoneLayout,
}

impl SetupConfig {
    /// Setup for a board of the given size and mountain count with the default layout.
    pub fn new(width: usize, height: usize, mountains: usize) -> Self {
        Self {
            width,
            height,
            mountains,
            layout: ZoneLayout::default(),
        }
    }

    /// Setup whose mountain count is derived from the difficulty.
    pub fn with_difficulty(width: usize, height: usize, difficulty: Difficulty) -> Self {
        Self::new(width, height, difficulty.mountain_count(width, height))
    }

    /// Replace the zone layout.
    pub fn with_layout(mut self, layout: ZoneLayout) -> Self {
        self.layout = layout;
        self
    }
}

impl Default for SetupConfig {
    /// A 20x20 board on easy difficulty.
    fn default() -> Self {
        Self::with_difficulty(20, 20, Difficulty::default())
    }
}

/// Reason why a starting board could not be generated.
#[derive(Debug, Error, Copy, Clone, Eq, PartialEq)]
pub enum PlacementError {
    /// The board cannot fit both zones without overlap.
    #[error("a {width}x{height} board is too small, need at least {min_width}x{min_height}")]
    BoardTooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
    /// The board has more cells than [`MAX_BOARD_CELLS`].
    #[error("a {width}x{height} board is too large, at most {max_cells} cells are allowed")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max_cells: usize,
    },
    /// The layout has empty zones or puts a flag inside a zone.
    #[error("zone layout leaves no room for units and flags")]
    InvalidLayout,
    /// More mountains were requested than there are eligible cells.
    #[error("cannot place {requested} mountains, only {available} cells are eligible")]
    TooManyMountains { requested: usize, available: usize },
    /// A unit could not be put on its starting cell.
    #[error("could not place starting unit: {0}")]
    UnitPlacement(#[from] CellError),
}

/// Generates starting boards for a validated [`SetupConfig`].
#[derive(Debug, Clone)]
pub struct PlacementGenerator {
    config: SetupConfig,
    dim: RectDimensions,
}

impl PlacementGenerator {
    /// Validate the config, failing if the layout is degenerate or the zones don't fit.
    pub fn new(config: SetupConfig) -> Result<Self, PlacementError> {
        let layout = config.layout;
        if layout.inset == 0 || layout.zone_width == 0 || layout.zone_height == 0 {
            return Err(PlacementError::InvalidLayout);
        }
        let (min_width, min_height) = layout.min_dimensions();
        let too_small = PlacementError::BoardTooSmall {
            width: config.width,
            height: config.height,
            min_width,
            min_height,
        };
        if config.width < min_width || config.height < min_height {
            return Err(too_small);
        }
        let dim = RectDimensions::try_new(config.width, config.height)
            .filter(|dim| dim.total_size() <= MAX_BOARD_CELLS)
            .ok_or(PlacementError::BoardTooLarge {
                width: config.width,
                height: config.height,
                max_cells: MAX_BOARD_CELLS,
            })?;
        Ok(Self { config, dim })
    }

    /// The config this generator was built from.
    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// Dimensions of the boards this generator builds.
    pub fn dimensions(&self) -> &RectDimensions {
        &self.dim
    }

    /// Number of cells that could hold a mountain once all units are placed.
    pub fn terrain_capacity(&self) -> Result<usize, PlacementError> {
        Ok(eligible_cells(&self.unit_board()?).len())
    }

    /// Generate a complete board. Either every unit, flag and mountain is placed or an
    /// error is returned; a partially built board never escapes.
    #[instrument(
        skip(self, rng),
        fields(width = self.dim.width(), height = self.dim.height(), mountains = self.config.mountains)
    )]
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Board, PlacementError> {
        let mut board = self.unit_board()?;
        self.place_mountains(&mut board, rng)?;
        info!(
            units = board.count_units(|u| u.movable()),
            mountains = board.terrain().len(),
            "board generated"
        );
        Ok(board)
    }

    /// Board holding both players' units and flags but no mountains yet.
    fn unit_board(&self) -> Result<Board, PlacementError> {
        let mut board = Board::with_safe_span(self.dim, self.config.layout.safe_span);
        for &player in Player::ALL.iter() {
            self.place_player_units(&mut board, player)?;
        }
        Ok(board)
    }

    fn place_player_units(&self, board: &mut Board, player: Player) -> Result<(), PlacementError> {
        let layout = &self.config.layout;
        for x in layout.columns(player, &self.dim) {
            for y in layout.rows(player, &self.dim) {
                let kind = ZoneLayout::kind_for_row(player, y);
                board.place_unit(Coordinate::new(x, y), Unit::soldier(kind, player))?;
            }
        }
        board.place_unit(
            ZoneLayout::flag_position(player, &self.dim),
            Unit::flag(player),
        )?;
        Ok(())
    }

    /// Rejection-sample mountain positions. Feasibility is decided up front by counting
    /// eligible cells, and each mountain gets a bounded number of random draws before
    /// falling back to a uniform pick among the cells that are still free, so this
    /// always terminates.
    fn place_mountains<R: Rng + ?Sized>(
        &self,
        board: &mut Board,
        rng: &mut R,
    ) -> Result<(), PlacementError> {
        let requested = self.config.mountains;
        let eligible = eligible_cells(board);
        if requested > eligible.len() {
            return Err(PlacementError::TooManyMountains {
                requested,
                available: eligible.len(),
            });
        }

        let mut rejected = 0;
        let mut fallbacks = 0;
        for placed in 0..requested {
            let mut sampled = false;
            for _ in 0..MAX_SAMPLES_PER_MOUNTAIN {
                let coord = self.dim.sample(rng);
                if board.place_mountain(coord).is_ok() {
                    sampled = true;
                    break;
                }
                rejected += 1;
            }
            if sampled {
                continue;
            }

            let exhausted = PlacementError::TooManyMountains {
                requested,
                available: placed,
            };
            let remaining: Vec<Coordinate> = eligible
                .iter()
                .copied()
                .filter(|&coord| board.check_mountain(coord).is_ok())
                .collect();
            let coord = *remaining.choose(rng).ok_or(exhausted)?;
            board.place_mountain(coord).map_err(|_| exhausted)?;
            fallbacks += 1;
        }
        debug!(rejected, fallbacks, "mountains placed");
        Ok(())
    }
}

/// Every cell of the board where a mountain may currently go.
fn eligible_cells(board: &Board) -> Vec<Coordinate> {
    board
        .dimensions()
        .iter_coordinates()
        .flatten()
        .filter(|&coord| board.check_mountain(coord).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn generate(width: usize, height: usize, mountains: usize, seed: u64) -> Board {
        PlacementGenerator::new(SetupConfig::new(width, height, mountains))
            .unwrap()
            .generate(&mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn default_layout_zones() {
        let layout = ZoneLayout::default();
        let dim = RectDimensions::new(12, 12);
        assert_eq!(layout.columns(Player::P0, &dim), 1..6);
        assert_eq!(layout.rows(Player::P0, &dim), 0..6);
        assert_eq!(layout.columns(Player::P1, &dim), 6..11);
        assert_eq!(layout.rows(Player::P1, &dim), 6..12);
        assert_eq!(layout.min_dimensions(), (12, 12));
    }

    #[test]
    fn one_flag_per_player_in_its_corner() {
        let board = generate(12, 12, 5, 1);
        for &player in Player::ALL.iter() {
            let flags: Vec<_> = board
                .iter_units()
                .filter(|(_, u)| u.kind() == UnitKind::Flag && u.is_owned_by(player))
                .map(|(c, _)| c)
                .collect();
            assert_eq!(
                flags,
                vec![ZoneLayout::flag_position(player, board.dimensions())]
            );
        }
        assert_eq!(
            board.unit_at(Coordinate::new(11, 11)).unwrap(),
            Some(&Unit::flag(Player::P1))
        );
    }

    #[test]
    fn rows_cycle_through_kinds() {
        let board = generate(14, 13, 5, 2);
        let layout = ZoneLayout::default();
        let dim = *board.dimensions();
        for &player in Player::ALL.iter() {
            let mut count = 0;
            for (coord, unit) in board.iter_units() {
                if !layout.contains(player, &dim, coord) {
                    continue;
                }
                count += 1;
                assert!(unit.is_owned_by(player));
                let expected = match (player, coord.y % 3) {
                    (Player::P0, 0) | (Player::P1, 2) => UnitKind::Rock,
                    (_, 1) => UnitKind::Paper,
                    _ => UnitKind::Scissors,
                };
                assert_eq!(unit.kind(), expected, "{} at {}", player, coord);
            }
            assert_eq!(count, 30);
        }
    }

    #[test]
    fn mountains_avoid_safe_zones() {
        let board = generate(20, 16, 40, 3);
        assert_eq!(board.terrain().len(), 40);
        assert_eq!(board.count_units(|u| u.kind() == UnitKind::Mountain), 40);
        for coord in board.terrain() {
            assert!(!board.in_safe_zone(*coord), "mountain in safe zone at {}", coord);
        }
    }

    #[test]
    fn every_eligible_cell_can_be_filled() {
        // 144 cells minus the two overlapping safe corners (49 + 36 - 1).
        let generator = PlacementGenerator::new(SetupConfig::new(12, 12, 60)).unwrap();
        assert_eq!(generator.terrain_capacity(), Ok(60));
        let board = generator.generate(&mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(board.terrain().len(), 60);
    }

    #[test]
    fn infeasible_mountain_count_fails() {
        let generator = PlacementGenerator::new(SetupConfig::new(12, 12, 61)).unwrap();
        assert_eq!(
            generator.generate(&mut StdRng::seed_from_u64(5)).unwrap_err(),
            PlacementError::TooManyMountains {
                requested: 61,
                available: 60
            }
        );
    }

    #[test]
    fn small_boards_are_rejected() {
        assert_eq!(
            PlacementGenerator::new(SetupConfig::new(11, 12, 0)).unwrap_err(),
            PlacementError::BoardTooSmall {
                width: 11,
                height: 12,
                min_width: 12,
                min_height: 12
            }
        );
        assert!(matches!(
            PlacementGenerator::new(SetupConfig::new(12, 11, 0)),
            Err(PlacementError::BoardTooSmall { .. })
        ));
    }

    #[test]
    fn huge_boards_are_rejected_before_allocating() {
        assert_eq!(
            PlacementGenerator::new(SetupConfig::new(100_000, 100_000, 0)).unwrap_err(),
            PlacementError::BoardTooLarge {
                width: 100_000,
                height: 100_000,
                max_cells: MAX_BOARD_CELLS
            }
        );
        assert!(matches!(
            PlacementGenerator::new(SetupConfig::new(usize::max_value(), 12, 0)),
            Err(PlacementError::BoardTooLarge { .. })
        ));
        assert!(PlacementGenerator::new(SetupConfig::new(1024, 1024, 0)).is_ok());
    }

    #[test]
    fn degenerate_layout_is_rejected() {
        let layout = ZoneLayout {
            inset: 0,
            ..ZoneLayout::default()
        };
        assert_eq!(
            PlacementGenerator::new(SetupConfig::new(12, 12, 0).with_layout(layout)).unwrap_err(),
            PlacementError::InvalidLayout
        );
    }

    #[test]
    fn same_seed_same_board() {
        let a = generate(16, 16, 20, 99);
        let b = generate(16, 16, 20, 99);
        assert_eq!(a.terrain(), b.terrain());
    }

    #[test]
    fn difficulty_scales_with_area() {
        assert_eq!(SetupConfig::with_difficulty(20, 20, Difficulty::Easy).mountains, 40);
        assert_eq!(SetupConfig::with_difficulty(20, 20, Difficulty::Medium).mountains, 120);
        assert_eq!(SetupConfig::with_difficulty(20, 20, Difficulty::Hard).mountains, 200);
    }
}
