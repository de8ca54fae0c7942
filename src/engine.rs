//! One simulation step of the snake.
//!
//! The order of the checks matters: scoring and bonus bookkeeping happen
//! before collisions are looked at, so a tick that ends the game still leaves
//! its mutations in the model.

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::error::GameResult;
use crate::geometry::Board;
use crate::model::GameState;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// The snake moved. Eating food restarts the tick driver with the current speed.
    Moved { ate_food: bool },
    Collided(Collision),
}

pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    board: &Board,
    config: &GameConfig,
    rng: &mut R,
) -> GameResult<TickOutcome> {
    let head = state.head().step(state.velocity);
    state.snake.insert(0, head);

    let ate_food = head == state.food;
    if ate_food {
        state.score = state.score.saturating_add(config.food_score);
        state.place_food_randomly(board, rng)?;
        state.game_speed = config.faster(state.game_speed);
        debug!(score = state.score, speed = state.game_speed, "food eaten");
    } else if state.bonus == Some(head) {
        state.score = state.score.saturating_add(config.bonus_score);
        state.clear_bonus();
        // Grows by two: the head is stored a second time.
        state.snake.insert(0, head);
        debug!(score = state.score, "bonus eaten");
    } else {
        state.snake.pop();
    }

    if state.bonus.is_some() {
        state.bonus_timer -= 1;
        if state.bonus_timer <= 0 {
            state.clear_bonus();
        }
    }

    if state.try_spawn_bonus(board, rng, config.bonus_spawn_chance, config.bonus_lifetime) {
        debug!(bonus = ?state.bonus, "bonus spawned");
    }

    if !board.contains(head) {
        return Ok(TickOutcome::Collided(Collision::Wall));
    }
    if state.snake[1..].contains(&head) {
        return Ok(TickOutcome::Collided(Collision::SelfBite));
    }
    Ok(TickOutcome::Moved { ate_food })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Cell, Heading, Velocity};
    use rand::{SeedableRng, rngs::StdRng};

    fn quiet() -> GameConfig {
        GameConfig { bonus_spawn_chance: 0.0, ..GameConfig::default() }
    }

    fn moving(snake: &[(i32, i32)], heading: Heading) -> GameState {
        let mut s = GameState::new(&GameConfig::default());
        s.snake = snake.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        s.velocity = heading.velocity();
        s
    }

    #[test]
    fn plain_move_keeps_length() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = moving(&[(5, 5), (4, 5), (3, 5)], Heading::Right);
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(out, TickOutcome::Moved { ate_food: false });
        assert_eq!(s.snake, vec![Cell::new(6, 5), Cell::new(5, 5), Cell::new(4, 5)]);
    }

    #[test]
    fn standing_still_does_not_bite_itself() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = GameState::new(&quiet());
        for _ in 0..5 {
            let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
            assert_eq!(out, TickOutcome::Moved { ate_food: false });
        }
        assert_eq!(s.snake, vec![Cell::new(10, 10)]);
    }

    #[test]
    fn eating_food_grows_scores_and_speeds_up() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = moving(&[(14, 10)], Heading::Right);
        s.food = Cell::new(15, 10);
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(out, TickOutcome::Moved { ate_food: true });
        assert_eq!(s.score, 10);
        assert_eq!(s.snake, vec![Cell::new(15, 10), Cell::new(14, 10)]);
        assert_eq!(s.game_speed, 98);
        assert!(!s.occupies(s.food));
    }

    #[test]
    fn score_saturates_instead_of_overflowing() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = moving(&[(14, 10)], Heading::Right);
        s.food = Cell::new(15, 10);
        s.score = u32::MAX - 3;
        tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(s.score, u32::MAX);

        let mut s = moving(&[(5, 5)], Heading::Right);
        s.bonus = Some(Cell::new(6, 5));
        s.bonus_timer = 10;
        s.score = u32::MAX;
        tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(s.score, u32::MAX);
    }

    #[test]
    fn speed_holds_at_the_floor() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = moving(&[(14, 10)], Heading::Right);
        s.food = Cell::new(15, 10);
        s.game_speed = 50;
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(out, TickOutcome::Moved { ate_food: true });
        assert_eq!(s.game_speed, 50);
    }

    #[test]
    fn eating_bonus_duplicates_the_head() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = moving(&[(5, 5), (4, 5)], Heading::Right);
        s.bonus = Some(Cell::new(6, 5));
        s.bonus_timer = 40;
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(s.score, 50);
        assert_eq!(s.bonus, None);
        assert_eq!(s.bonus_timer, 0);
        assert_eq!(
            s.snake,
            vec![Cell::new(6, 5), Cell::new(6, 5), Cell::new(5, 5), Cell::new(4, 5)]
        );
        // The duplicate sits at index 1, which the self-collision check sees.
        assert_eq!(out, TickOutcome::Collided(Collision::SelfBite));
    }

    #[test]
    fn bonus_expires_after_its_lifetime() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = moving(&[(1, 1)], Heading::Down);
        s.bonus = Some(Cell::new(18, 18));
        s.bonus_timer = 2;
        tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(s.bonus_timer, 1);
        assert!(s.bonus.is_some());
        tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(s.bonus, None);
        assert_eq!(s.bonus_timer, 0);
    }

    #[test]
    fn leaving_the_board_collides() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut s = moving(&[(19, 10)], Heading::Right);
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(out, TickOutcome::Collided(Collision::Wall));

        let mut s = moving(&[(3, 0)], Heading::Up);
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(out, TickOutcome::Collided(Collision::Wall));
    }

    #[test]
    fn running_into_the_body_collides() {
        let mut rng = StdRng::seed_from_u64(0);
        // Head turns down into a loop of body cells.
        let mut s = moving(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)], Heading::Down);
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(out, TickOutcome::Collided(Collision::SelfBite));
    }

    #[test]
    fn chasing_the_tail_is_safe() {
        let mut rng = StdRng::seed_from_u64(0);
        // The tail cell is freed in the same tick the head enters it.
        let mut s = moving(&[(5, 5), (6, 5), (6, 6), (5, 6)], Heading::Down);
        let out = tick(&mut s, &Board::default(), &quiet(), &mut rng).unwrap();
        assert_eq!(out, TickOutcome::Moved { ate_food: false });
    }

    #[test]
    fn spawn_roll_runs_every_tick_without_a_bonus() {
        let mut rng = StdRng::seed_from_u64(2);
        let config = GameConfig { bonus_spawn_chance: 1.0, ..GameConfig::default() };
        let mut s = moving(&[(1, 1)], Heading::Right);
        s.velocity = Velocity::STILL;
        for _ in 0..20 {
            tick(&mut s, &Board::default(), &config, &mut rng).unwrap();
            if s.bonus.is_some() {
                break;
            }
        }
        assert!(s.bonus.is_some());
        assert_eq!(s.bonus_timer, 100);
    }
}
