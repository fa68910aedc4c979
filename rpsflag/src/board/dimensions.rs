//! Rectangular dimensions of the board.
use std::borrow::Borrow;

use rand::{distributions::Distribution, Rng};

use crate::board::{Coordinate, Direction};

/// Width and height of the board.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RectDimensions {
    /// Width of the board. This corresponds to the `x` [`Coordinate`].
    width: usize,
    /// Height of the board. This corresponds to the `y` [`Coordinate`].
    height: usize,
}

impl RectDimensions {
    /// Create new [`RectDimensions`] with the specified width and height.
    /// Panics if `width * height` exceeds `usize::max_value()` or if `width` or `height` is 0.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Some(dim) => dim,
            None => {
                if width == 0 || height == 0 {
                    panic!("RectDimensions must be nonzero, got {}x{}", width, height);
                } else {
                    panic!(
                        "RectDimensions too large: {} * {} > {}",
                        width,
                        height,
                        usize::max_value()
                    );
                }
            }
        }
    }

    /// Create new [`RectDimensions`] with the specified width and height.
    /// Returns `None` if `width * height` exceeds `usize::max_value()` or if `width` or
    /// `height` is 0.
    pub fn try_new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            width
                .checked_mul(height)
                .map(|_| Self { width, height })
        }
    }

    /// Get the width of these [`RectDimensions`].
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of these [`RectDimensions`].
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn total_size(&self) -> usize {
        self.width * self.height
    }

    /// Returns true if the coordinate lies inside the board.
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.check_bounds(coord).is_some()
    }

    /// Convert a coordinate to a linear index within this dimension.
    /// Returns `None` if the coordinate is out of range for the dimension.
    pub fn try_linearize(&self, coord: &Coordinate) -> Option<usize> {
        self.check_bounds(coord)
            .map(|coord| coord.y * self.width + coord.x)
    }

    /// Convert a linear index back into a [`Coordinate`].
    pub fn un_linearize(&self, idx: usize) -> Coordinate {
        Coordinate {
            x: idx % self.width,
            y: idx / self.width,
        }
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the coordinates of
    /// that row.
    pub fn iter_coordinates(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let width = self.width;
        (0..self.height).map(move |y| (0..width).map(move |x| Coordinate { x, y }))
    }

    /// Iterate the in-bounds orthogonal neighbors of the given coordinate. Out of bounds
    /// coordinates have no neighbors.
    pub fn neighbors(&self, coord: Coordinate) -> RectNeighbors {
        RectNeighbors {
            dim: *self,
            coord,
            // If the coordinate is out of bounds, skip directly to the end so we don't
            // produce neighbors for a cell that doesn't exist.
            next: if self.contains(coord) {
                0
            } else {
                Direction::ALL.len()
            },
        }
    }

    /// Return true if both coordinates are in bounds and one orthogonal step apart.
    pub fn is_neighbor(&self, c1: Coordinate, c2: Coordinate) -> bool {
        self.neighbors(c1).any(|n| n == c2)
    }

    /// Check if the given [`Coordinate`] is in bounds for these [`RectDimensions`]. If so, return
    /// it, otherwise return `None`.
    #[inline]
    fn check_bounds<B: Borrow<Coordinate>>(&self, coord: B) -> Option<B> {
        let c = coord.borrow();
        if c.x < self.width && c.y < self.height {
            Some(coord)
        } else {
            None
        }
    }
}

/// Samples a uniformly random in-bounds [`Coordinate`].
impl Distribution<Coordinate> for RectDimensions {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Coordinate {
        Coordinate::new(rng.gen_range(0, self.width), rng.gen_range(0, self.height))
    }
}

/// Iterator over the neighbors of a coordinate in [`RectDimensions`].
#[derive(Debug, Clone)]
pub struct RectNeighbors {
    dim: RectDimensions,
    coord: Coordinate,
    /// Index into [`Direction::ALL`] of the next direction to try.
    next: usize,
}

impl Iterator for RectNeighbors {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        while let Some(&dir) = Direction::ALL.get(self.next) {
            self.next += 1;
            match self.coord.step(dir) {
                Some(n) if self.dim.contains(n) => return Some(n),
                _ => {}
            }
        }
        None
    }
}
