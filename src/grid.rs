//! Toroidal occupancy layers for animals and food.
//!
//! Each layer maps a cell to at most one entity. Coordinates handed to
//! `Position::step` wrap modulo the grid size, so the board has no edges.

use crate::animal::AnimalId;
use crate::error::GridError;
use crate::food::Food;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell coordinate on the square grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The adjacent cell in `direction`, wrapping around the board edges
    #[inline]
    pub fn step(self, direction: Direction, size: usize) -> Position {
        let (dr, dc) = direction.offset();
        Position {
            row: wrap(self.row as isize + dr, size),
            col: wrap(self.col as isize + dc, size),
        }
    }

    /// The four orthogonal neighbours in `Direction::ALL` order
    pub fn neighbors(self, size: usize) -> [Position; 4] {
        Direction::ALL.map(|d| self.step(d, size))
    }

    /// Shortest signed (row, col) offset from `self` to `other` on the torus
    pub fn offset_to(self, other: Position, size: usize) -> (isize, isize) {
        (
            shortest_delta(self.row, other.row, size),
            shortest_delta(self.col, other.col, size),
        )
    }

    /// Manhattan distance on the torus
    pub fn distance(self, other: Position, size: usize) -> usize {
        let (dr, dc) = self.offset_to(other, size);
        dr.unsigned_abs() + dc.unsigned_abs()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[inline]
fn wrap(value: isize, size: usize) -> usize {
    value.rem_euclid(size as isize) as usize
}

fn shortest_delta(from: usize, to: usize, size: usize) -> isize {
    let size = size as isize;
    let raw = (to as isize - from as isize).rem_euclid(size);
    if raw > size / 2 {
        raw - size
    } else {
        raw
    }
}

/// One of the four cardinal movement directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Column + 1
    East,
    /// Row + 1
    South,
    /// Column - 1
    West,
    /// Row - 1
    North,
}

impl Direction {
    /// Fixed scan order used for neighbour interactions and offspring placement
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    /// (row, col) delta of a single step
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::North => (-1, 0),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Direction::East => 0,
            Direction::South => 1,
            Direction::West => 2,
            Direction::North => 3,
        }
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % 4]
    }

    /// Turn by `quarter_turns` steps through `ALL`, wrapping in both directions
    pub fn rotate(self, quarter_turns: i32) -> Self {
        Self::from_index((self.index() as i32 + quarter_turns).rem_euclid(4) as usize)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..4)]
    }

    /// Direction that reduces a toroidal offset the most, preferring the larger axis
    pub fn toward(offset: (isize, isize)) -> Option<Self> {
        let (dr, dc) = offset;
        if dr == 0 && dc == 0 {
            return None;
        }
        if dr.abs() >= dc.abs() {
            Some(if dr > 0 { Direction::South } else { Direction::North })
        } else {
            Some(if dc > 0 { Direction::East } else { Direction::West })
        }
    }
}

/// A square, single-occupancy layer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Layer<T> {
    size: usize,
    /// Row-major cells
    cells: Vec<Option<T>>,
}

impl<T> Layer<T> {
    pub fn new(size: usize) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        cells.resize_with(size * size, || None);
        Self { size, cells }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn index(&self, position: Position) -> Result<usize, GridError> {
        if position.row < self.size && position.col < self.size {
            Ok(position.row * self.size + position.col)
        } else {
            Err(GridError::OutOfBounds {
                position,
                size: self.size,
            })
        }
    }

    /// Store `value` at `position`; fails if the cell is taken
    pub fn place(&mut self, position: Position, value: T) -> Result<(), GridError> {
        let idx = self.index(position)?;
        if self.cells[idx].is_some() {
            return Err(GridError::Occupied(position));
        }
        self.cells[idx] = Some(value);
        Ok(())
    }

    #[inline]
    pub fn occupant(&self, position: Position) -> Option<&T> {
        self.index(position)
            .ok()
            .and_then(|idx| self.cells[idx].as_ref())
    }

    #[inline]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupant(position).is_some()
    }

    /// Clear a cell, returning what was there
    pub fn remove(&mut self, position: Position) -> Option<T> {
        let idx = self.index(position).ok()?;
        self.cells[idx].take()
    }

    /// Occupied cells in row-major order
    pub fn entities(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        let size = self.size;
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.as_ref()
                .map(|value| (Position::new(idx / size, idx % size), value))
        })
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Position> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| Position::new(idx / size, idx % size))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// The two occupancy layers of the world
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,
    pub animals: Layer<AnimalId>,
    pub food: Layer<Food>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            animals: Layer::new(size),
            food: Layer::new(size),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Relocate the animal at `from` to an empty `to`
    pub fn move_animal(&mut self, from: Position, to: Position) -> Result<(), GridError> {
        if self.animals.is_occupied(to) {
            return Err(GridError::Occupied(to));
        }
        if let Some(id) = self.animals.remove(from) {
            self.animals.place(to, id)?;
        }
        Ok(())
    }

    /// First free animal cell around `position`, scanning `Direction::ALL`
    pub fn free_neighbor(&self, position: Position) -> Option<Position> {
        position
            .neighbors(self.size)
            .into_iter()
            .find(|p| !self.animals.is_occupied(*p))
    }
}
