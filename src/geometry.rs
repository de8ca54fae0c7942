use rand::Rng;
use serde::{Deserialize, Serialize};

// Board constants
pub const BOARD_WIDTH: i32 = 400;
pub const GRID_SIZE: i32 = 20;
pub const TILE_COUNT: i32 = BOARD_WIDTH / GRID_SIZE;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, velocity: Velocity) -> Self {
        Self { x: self.x + velocity.dx, y: self.y + velocity.dy }
    }

    /// Pixel coordinates of the cell centre on a board drawn at `grid` pixels per tile.
    pub fn center(self, grid: f32) -> (f32, f32) {
        (self.x as f32 * grid + grid / 2.0, self.y as f32 * grid + grid / 2.0)
    }
}

/// Per-tick displacement of the snake head. Either still or one unit along a single axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub const STILL: Velocity = Velocity { dx: 0, dy: 0 };

    pub fn is_valid(self) -> bool {
        matches!((self.dx, self.dy), (0, 0) | (0, -1) | (0, 1) | (-1, 0) | (1, 0))
    }

    /// Turns towards `heading` unless the snake already moves along that axis.
    /// Returns whether the velocity changed.
    pub fn steer(&mut self, heading: Heading) -> bool {
        let blocked = match heading {
            Heading::Up | Heading::Down => self.dy != 0,
            Heading::Left | Heading::Right => self.dx != 0,
        };
        if blocked {
            return false;
        }
        *self = heading.velocity();
        true
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    pub fn velocity(self) -> Velocity {
        match self {
            Heading::Up => Velocity { dx: 0, dy: -1 },
            Heading::Down => Velocity { dx: 0, dy: 1 },
            Heading::Left => Velocity { dx: -1, dy: 0 },
            Heading::Right => Velocity { dx: 1, dy: 0 },
        }
    }
}

/// Square playing field addressed by `[0, tile_count)` on both axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tile_count: i32,
}

impl Default for Board {
    fn default() -> Self {
        Self { tile_count: TILE_COUNT }
    }
}

impl Board {
    pub fn tile_count(&self) -> i32 {
        self.tile_count
    }

    pub fn area(&self) -> usize {
        (self.tile_count * self.tile_count) as usize
    }

    pub fn contains(&self, c: Cell) -> bool {
        c.x >= 0 && c.y >= 0 && c.x < self.tile_count && c.y < self.tile_count
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        Cell {
            x: rng.gen_range(0..self.tile_count),
            y: rng.gen_range(0..self.tile_count),
        }
    }
}
