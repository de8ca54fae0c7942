use std::str::FromStr;

use crate::error::GameError;
use crate::geometry::Heading;
use crate::session::Phase;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
}

impl FromStr for Key {
    type Err = GameError;

    /// Accepts DOM-style key names (`ArrowUp`, `Escape`) as well as the bare variant names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ArrowUp" | "Up" => Ok(Key::Up),
            "ArrowDown" | "Down" => Ok(Key::Down),
            "ArrowLeft" | "Left" => Ok(Key::Left),
            "ArrowRight" | "Right" => Ok(Key::Right),
            "Escape" | "Esc" => Ok(Key::Escape),
            other => Err(GameError::Input(format!("unrecognised key {other:?}"))),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Steer(Heading),
    Pause,
    Quit,
    Ignore,
}

pub fn map_key(key: Key, phase: Phase) -> Intent {
    match (key, phase) {
        (Key::Escape, Phase::Menu) => Intent::Quit,
        (Key::Escape, Phase::Playing | Phase::Paused) => Intent::Pause,
        (Key::Escape, Phase::GameOver) => Intent::Ignore,
        (_, Phase::Playing) => Intent::Steer(match key {
            Key::Up => Heading::Up,
            Key::Down => Heading::Down,
            Key::Left => Heading::Left,
            _ => Heading::Right,
        }),
        _ => Intent::Ignore,
    }
}
