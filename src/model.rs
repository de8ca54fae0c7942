use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult, PersistenceError};
use crate::geometry::{Board, Cell, Velocity};

pub const START_CELL: Cell = Cell::new(10, 10);
pub const DEFAULT_FOOD: Cell = Cell::new(15, 15);

// Resampling budget for food placement, in multiples of the board area.
const PLACEMENT_ATTEMPTS_PER_CELL: usize = 4;

/// Everything needed to continue a session. Serialized as-is into the save slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Head first.
    pub snake: Vec<Cell>,
    pub food: Cell,
    pub bonus: Option<Cell>,
    /// Ticks left before the bonus disappears.
    pub bonus_timer: i32,
    #[serde(flatten)]
    pub velocity: Velocity,
    pub score: u32,
    /// Tick period in milliseconds.
    pub game_speed: u64,
    /// Whole seconds elapsed while playing.
    pub game_time: u64,
}

impl GameState {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            snake: vec![START_CELL],
            food: DEFAULT_FOOD,
            bonus: None,
            bonus_timer: 0,
            velocity: Velocity::STILL,
            score: 0,
            game_speed: config.initial_speed_ms,
            game_time: 0,
        }
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    pub fn clear_bonus(&mut self) {
        self.bonus = None;
        self.bonus_timer = 0;
    }

    /// Moves the food to a random cell not covered by the snake.
    pub fn place_food_randomly<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        rng: &mut R,
    ) -> GameResult<()> {
        let attempts = board.area() * PLACEMENT_ATTEMPTS_PER_CELL;
        for _ in 0..attempts {
            let cell = board.random_cell(rng);
            if !self.occupies(cell) {
                self.food = cell;
                return Ok(());
            }
        }
        Err(GameError::BoardFull)
    }

    /// Rolls for a bonus spawn. A roll that lands on the food or the snake is
    /// dropped for this tick rather than retried. Returns whether a bonus appeared.
    pub fn try_spawn_bonus<R: Rng + ?Sized>(
        &mut self,
        board: &Board,
        rng: &mut R,
        probability: f64,
        lifetime: i32,
    ) -> bool {
        if self.bonus.is_some() || !rng.gen_bool(probability.clamp(0.0, 1.0)) {
            return false;
        }
        let cell = board.random_cell(rng);
        if cell == self.food || self.occupies(cell) {
            return false;
        }
        self.bonus = Some(cell);
        self.bonus_timer = lifetime;
        true
    }

    /// Checks the invariants a restored snapshot must hold before it can be played.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.snake.is_empty() {
            return Err(PersistenceError::Malformed("snake has no cells".into()));
        }
        if self.game_speed == 0 {
            return Err(PersistenceError::Malformed("game speed is zero".into()));
        }
        if !self.velocity.is_valid() {
            return Err(PersistenceError::Malformed(format!(
                "velocity ({}, {}) is not a unit step",
                self.velocity.dx, self.velocity.dy
            )));
        }
        Ok(())
    }
}
