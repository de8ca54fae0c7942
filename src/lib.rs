//! Grid snake with a single resumable save slot.
//!
//! The library holds the game rules and the session state machine; drawing,
//! storage and the clock are supplied by the host through [`render::Canvas`],
//! [`persistence::BlobStore`] and [`session::Session::advance`].

pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod input;
pub mod model;
pub mod persistence;
pub mod render;
pub mod scheduler;
pub mod session;

pub use config::GameConfig;
pub use error::{GameError, GameResult, PersistenceError, RenderError};
pub use geometry::{Board, Cell, Heading, Velocity};
pub use input::Key;
pub use model::GameState;
pub use persistence::{BlobStore, FileStore, MemoryStore, SaveSlot};
pub use session::{Notice, PanelSet, Phase, Session, SessionEvent};
