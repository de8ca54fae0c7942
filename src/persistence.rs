use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::PersistenceError;
use crate::model::GameState;

pub const SAVE_KEY: &str = "snakeGameState";

/// String key-value storage backing the save slot.
pub trait BlobStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// The single save slot: a JSON snapshot of [`GameState`] under [`SAVE_KEY`].
#[derive(Debug)]
pub struct SaveSlot<S> {
    store: S,
}

impl<S: BlobStore> SaveSlot<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn save(&mut self, state: &GameState) -> Result<(), PersistenceError> {
        let text = serde_json::to_string(state).map_err(PersistenceError::Serialize)?;
        self.store.set(SAVE_KEY, &text).map_err(store_error)
    }

    /// `Ok(None)` when nothing was saved. Unparseable or invalid snapshots are `Malformed`.
    pub fn load(&self) -> Result<Option<GameState>, PersistenceError> {
        let Some(text) = self.store.get(SAVE_KEY).map_err(store_error)? else {
            return Ok(None);
        };
        let state: GameState =
            serde_json::from_str(&text).map_err(|e| PersistenceError::Malformed(e.to_string()))?;
        state.validate()?;
        Ok(Some(state))
    }

    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.store.remove(SAVE_KEY).map_err(store_error)
    }

    pub fn exists(&self) -> bool {
        matches!(self.store.get(SAVE_KEY), Ok(Some(_)))
    }
}

fn store_error(source: io::Error) -> PersistenceError {
    PersistenceError::Store { key: SAVE_KEY.to_owned(), source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::geometry::{Cell, Velocity};

    fn sample() -> GameState {
        let mut s = GameState::new(&GameConfig::default());
        s.snake = vec![Cell::new(4, 2), Cell::new(3, 2), Cell::new(3, 3)];
        s.food = Cell::new(9, 9);
        s.bonus = Some(Cell::new(0, 19));
        s.bonus_timer = 37;
        s.velocity = Velocity { dx: 1, dy: 0 };
        s.score = 120;
        s.game_speed = 80;
        s.game_time = 65;
        s
    }

    #[test]
    fn round_trip_restores_the_same_state() {
        let mut slot = SaveSlot::new(MemoryStore::new());
        slot.save(&sample()).unwrap();
        assert_eq!(slot.load().unwrap(), Some(sample()));
    }

    #[test]
    fn empty_store_loads_nothing() {
        let slot = SaveSlot::new(MemoryStore::new());
        assert!(!slot.exists());
        assert_eq!(slot.load().unwrap(), None);
    }

    #[test]
    fn garbage_is_malformed() {
        let mut store = MemoryStore::new();
        store.set(SAVE_KEY, "{\"snake\": 3").unwrap();
        let slot = SaveSlot::new(store);
        assert!(matches!(slot.load(), Err(PersistenceError::Malformed(_))));
    }

    #[test]
    fn invalid_snapshot_is_malformed() {
        let mut store = MemoryStore::new();
        store
            .set(
                SAVE_KEY,
                r#"{"snake":[],"food":{"x":1,"y":1},"bonus":null,"bonusTimer":0,"dx":0,"dy":0,"score":0,"gameSpeed":100,"gameTime":0}"#,
            )
            .unwrap();
        let slot = SaveSlot::new(store);
        assert!(matches!(slot.load(), Err(PersistenceError::Malformed(_))));
    }

    #[test]
    fn reads_the_documented_snapshot_shape() {
        let mut store = MemoryStore::new();
        store
            .set(
                SAVE_KEY,
                r#"{"snake":[{"x":4,"y":2},{"x":3,"y":2},{"x":3,"y":3}],"food":{"x":9,"y":9},"bonus":{"x":0,"y":19},"bonusTimer":37,"dx":1,"dy":0,"score":120,"gameSpeed":80,"gameTime":65}"#,
            )
            .unwrap();
        assert_eq!(SaveSlot::new(store).load().unwrap(), Some(sample()));
    }

    #[test]
    fn clear_removes_the_slot() {
        let mut slot = SaveSlot::new(MemoryStore::new());
        slot.save(&sample()).unwrap();
        assert!(slot.exists());
        slot.clear().unwrap();
        assert!(!slot.exists());
        slot.clear().unwrap();
    }

    #[test]
    fn file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("grid-snake-store-{}", std::process::id()));
        let mut slot = SaveSlot::new(FileStore::new(&dir));
        assert_eq!(slot.load().unwrap(), None);
        slot.save(&sample()).unwrap();
        assert!(dir.join("snakeGameState.json").exists());
        assert_eq!(slot.load().unwrap(), Some(sample()));
        slot.clear().unwrap();
        slot.clear().unwrap();
        assert_eq!(slot.load().unwrap(), None);
        let _ = fs::remove_dir_all(&dir);
    }
}
