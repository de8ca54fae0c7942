//! Frame composition against an abstract drawing surface.
//!
//! The core decides what goes where; a [`Canvas`] implementation owns the
//! actual pixels.

use std::f32::consts::PI;

use crate::error::RenderError;
use crate::geometry::{Cell, GRID_SIZE};
use crate::model::GameState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self { r: r as f32 / 255.0, g: g as f32 / 255.0, b: b as f32 / 255.0 }
    }
}

// Palette
pub const HEAD: Color = Color::from_rgb_u8(0x22, 0xc5, 0x5e);
pub const BODY: Color = Color::from_rgb_u8(0x16, 0xa3, 0x4a);
pub const FOOD: Color = Color::from_rgb_u8(0xef, 0x44, 0x44);
pub const BONUS: Color = Color::from_rgb_u8(0xfa, 0xcc, 0x15);
pub const BACKGROUND_TOP: Color = Color::from_rgb_u8(0xf3, 0xf4, 0xf6);
pub const BACKGROUND_BOTTOM: Color = Color::from_rgb_u8(0xe5, 0xe7, 0xeb);

pub const BONUS_SPIKES: usize = 5;

pub trait Canvas {
    fn draw_background(&mut self) -> Result<(), RenderError>;
    fn draw_circle_at(&mut self, cell: Cell, color: Color, radius: f32) -> Result<(), RenderError>;
    fn draw_star_at(
        &mut self,
        cell: Cell,
        spikes: usize,
        outer_radius: f32,
        inner_radius: f32,
        color: Color,
    ) -> Result<(), RenderError>;
    fn draw_hud(&mut self, score: u32, clock: &str) -> Result<(), RenderError>;
}

pub fn draw_frame<C: Canvas + ?Sized>(
    state: &GameState,
    canvas: &mut C,
) -> Result<(), RenderError> {
    let grid = GRID_SIZE as f32;
    let radius = grid / 2.0 - 2.0;

    canvas.draw_background()?;
    for (i, segment) in state.snake.iter().enumerate() {
        let color = if i == 0 { HEAD } else { BODY };
        canvas.draw_circle_at(*segment, color, radius)?;
    }
    canvas.draw_circle_at(state.food, FOOD, radius)?;
    if let Some(bonus) = state.bonus {
        canvas.draw_star_at(bonus, BONUS_SPIKES, grid / 2.0, grid / 4.0, BONUS)?;
    }
    canvas.draw_hud(state.score, &format_clock(state.game_time))
}

/// Outline of a star centred on `(cx, cy)`: outer and inner vertices
/// alternate, starting with the outer one straight above the centre.
pub fn star_points(
    cx: f32,
    cy: f32,
    spikes: usize,
    outer_radius: f32,
    inner_radius: f32,
) -> Vec<(f32, f32)> {
    let step = PI / spikes as f32;
    let mut rot = PI / 2.0 * 3.0;
    let mut points = Vec::with_capacity(spikes * 2);
    for _ in 0..spikes {
        points.push((cx + rot.cos() * outer_radius, cy + rot.sin() * outer_radius));
        rot += step;
        points.push((cx + rot.cos() * inner_radius, cy + rot.sin() * inner_radius));
        rot += step;
    }
    points
}

pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_on_star: bool,
    }

    impl Canvas for Recorder {
        fn draw_background(&mut self) -> Result<(), RenderError> {
            self.calls.push("background".into());
            Ok(())
        }

        fn draw_circle_at(
            &mut self,
            cell: Cell,
            color: Color,
            radius: f32,
        ) -> Result<(), RenderError> {
            let kind = if color == HEAD { "head" } else if color == BODY { "body" } else { "food" };
            self.calls.push(format!("{kind} {},{} r{radius}", cell.x, cell.y));
            Ok(())
        }

        fn draw_star_at(
            &mut self,
            cell: Cell,
            spikes: usize,
            outer: f32,
            inner: f32,
            _: Color,
        ) -> Result<(), RenderError> {
            if self.fail_on_star {
                return Err(RenderError::Backend("star".into()));
            }
            self.calls.push(format!("star {},{} {spikes} {outer} {inner}", cell.x, cell.y));
            Ok(())
        }

        fn draw_hud(&mut self, score: u32, clock: &str) -> Result<(), RenderError> {
            self.calls.push(format!("hud {score} {clock}"));
            Ok(())
        }
    }

    #[test]
    fn frame_draws_snake_then_food_then_bonus() {
        let mut state = GameState::new(&GameConfig::default());
        state.snake.push(Cell::new(9, 10));
        state.bonus = Some(Cell::new(2, 3));
        state.score = 60;
        state.game_time = 75;
        let mut canvas = Recorder::default();
        draw_frame(&state, &mut canvas).unwrap();
        assert_eq!(
            canvas.calls,
            vec![
                "background",
                "head 10,10 r8",
                "body 9,10 r8",
                "food 15,15 r8",
                "star 2,3 5 10 5",
                "hud 60 01:15",
            ]
        );
    }

    #[test]
    fn backend_errors_propagate() {
        let mut state = GameState::new(&GameConfig::default());
        state.bonus = Some(Cell::new(2, 3));
        let mut canvas = Recorder { fail_on_star: true, ..Recorder::default() };
        assert!(draw_frame(&state, &mut canvas).is_err());
    }

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn star_alternates_radii_from_the_top() {
        let points = star_points(50.0, 50.0, 5, 10.0, 5.0);
        assert_eq!(points.len(), 10);
        let (x, y) = points[0];
        assert!((x - 50.0).abs() < 1e-4 && (y - 40.0).abs() < 1e-4);
        for (i, (x, y)) in points.iter().enumerate() {
            let r = ((x - 50.0).powi(2) + (y - 50.0).powi(2)).sqrt();
            let expected = if i % 2 == 0 { 10.0 } else { 5.0 };
            assert!((r - expected).abs() < 1e-3, "vertex {i} at radius {r}");
        }
    }
}
