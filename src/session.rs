//! Menu / playing / paused / game-over state machine.
//!
//! Every public action is a host entry point: failures are logged and turned
//! into a [`Notice`] on the event queue instead of being returned, so a bad
//! save file or a broken canvas never takes the session down.

use std::fmt;
use std::mem;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

use crate::config::GameConfig;
use crate::engine::{self, TickOutcome};
use crate::error::{GameError, GameResult};
use crate::geometry::Board;
use crate::input::{self, Intent, Key};
use crate::model::GameState;
use crate::persistence::{BlobStore, SaveSlot};
use crate::render::{self, Canvas};
use crate::scheduler::{Scheduler, Task};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// User-facing report of a failed action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub action: &'static str,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not {}: {}", self.action, self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Notice(Notice),
    QuitRequested,
}

/// Which overlays the host should show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PanelSet {
    pub menu: bool,
    pub paused: bool,
    /// Final score while the game-over panel is up.
    pub game_over: Option<u32>,
    pub resume_button: bool,
}

pub struct Session<S, R = StdRng> {
    config: GameConfig,
    board: Board,
    state: GameState,
    phase: Phase,
    scheduler: Scheduler,
    slot: SaveSlot<S>,
    rng: R,
    has_save: bool,
    final_score: Option<u32>,
    now: Duration,
    events: Vec<SessionEvent>,
}

impl<S: BlobStore> Session<S, StdRng> {
    pub fn new(config: GameConfig, store: S) -> Self {
        Self::with_rng(config, store, StdRng::from_entropy())
    }
}

impl<S: BlobStore, R: Rng> Session<S, R> {
    pub fn with_rng(config: GameConfig, store: S, rng: R) -> Self {
        let slot = SaveSlot::new(store);
        let has_save = slot.exists();
        Self {
            state: GameState::new(&config),
            config,
            board: Board::default(),
            phase: Phase::Menu,
            scheduler: Scheduler::new(),
            slot,
            rng,
            has_save,
            final_score: None,
            now: Duration::ZERO,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn save_slot(&self) -> &SaveSlot<S> {
        &self.slot
    }

    pub fn drivers_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn tick_period(&self) -> Option<Duration> {
        self.scheduler.tick_period()
    }

    pub fn panels(&self) -> PanelSet {
        PanelSet {
            menu: self.phase == Phase::Menu,
            paused: self.phase == Phase::Paused,
            game_over: self.final_score.filter(|_| self.phase == Phase::GameOver),
            resume_button: self.has_save,
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    // Actions

    pub fn start(&mut self) {
        self.guard("start the game", |s| {
            s.expect_phase("start", &[Phase::Menu])?;
            s.begin_fresh();
            Ok(())
        });
    }

    /// Continues from the saved snapshot, or starts fresh when there is none
    /// or it cannot be read. In-memory progress since the last save is dropped.
    pub fn resume(&mut self) {
        self.guard("resume the game", |s| {
            s.expect_phase("resume", &[Phase::Menu, Phase::Paused])?;
            s.scheduler.stop();
            match s.slot.load() {
                Ok(Some(saved)) => {
                    s.state = saved;
                    s.has_save = true;
                    s.final_score = None;
                    s.enter_playing();
                    info!(score = s.state.score, "resumed from save");
                }
                Ok(None) => {
                    debug!("no saved game, starting fresh");
                    s.begin_fresh();
                }
                Err(e) => {
                    warn!(error = %e, "saved game unreadable, starting fresh");
                    s.report("load the saved game", &GameError::from(e));
                    s.begin_fresh();
                }
            }
            Ok(())
        });
    }

    /// Continues the paused game from memory without touching the save.
    pub fn unpause(&mut self) {
        self.guard("unpause", |s| {
            s.expect_phase("unpause", &[Phase::Paused])?;
            s.enter_playing();
            Ok(())
        });
    }

    pub fn pause(&mut self) {
        self.guard("pause", |s| match s.phase {
            Phase::Paused => Ok(()),
            Phase::Playing => {
                s.scheduler.stop();
                s.phase = Phase::Paused;
                info!(score = s.state.score, time = s.state.game_time, "paused");
                Ok(())
            }
            phase => Err(GameError::StateTransition { action: "pause", phase }),
        });
    }

    pub fn restart(&mut self) {
        self.guard("restart", |s| {
            s.scheduler.stop();
            s.begin_fresh();
            Ok(())
        });
    }

    /// Deletes the save, then restarts.
    pub fn reset(&mut self) {
        self.guard("reset", |s| {
            s.expect_phase("reset", &[Phase::Menu, Phase::Paused, Phase::GameOver])?;
            s.slot.clear()?;
            s.has_save = false;
            info!("saved game removed");
            s.scheduler.stop();
            s.begin_fresh();
            Ok(())
        });
    }

    pub fn quit(&mut self) {
        self.guard("quit", |s| {
            s.expect_phase("quit", &[Phase::Menu])?;
            info!("quit requested");
            s.events.push(SessionEvent::QuitRequested);
            Ok(())
        });
    }

    pub fn show_menu(&mut self) {
        self.guard("show the menu", |s| {
            s.expect_phase("show the menu", &[Phase::Paused, Phase::GameOver])?;
            s.scheduler.stop();
            s.phase = Phase::Menu;
            s.final_score = None;
            Ok(())
        });
    }

    // Host hooks

    pub fn handle_key(&mut self, key: Key) {
        match input::map_key(key, self.phase) {
            Intent::Steer(heading) => {
                if self.state.velocity.steer(heading) {
                    debug!(?heading, "steer");
                }
            }
            Intent::Pause => self.pause(),
            Intent::Quit => self.quit(),
            Intent::Ignore => {}
        }
    }

    pub fn handle_key_name(&mut self, name: &str) {
        match name.parse::<Key>() {
            Ok(key) => self.handle_key(key),
            Err(e) => debug!(error = %e, "key ignored"),
        }
    }

    /// Runs every driver firing due up to `now`, in order.
    pub fn advance(&mut self, now: Duration) {
        while let Some(firing) = self.scheduler.poll(now) {
            match firing.task {
                Task::Tick => self.on_tick(firing.at),
                Task::Clock => self.state.game_time += 1,
            }
        }
        self.now = now;
    }

    pub fn render<C: Canvas + ?Sized>(&mut self, canvas: &mut C) {
        if let Err(e) = render::draw_frame(&self.state, canvas) {
            self.report("draw the board", &e.into());
        }
    }

    // Internals

    fn on_tick(&mut self, at: Duration) {
        let before = self.state.clone();
        match engine::tick(&mut self.state, &self.board, &self.config, &mut self.rng) {
            Ok(TickOutcome::Moved { ate_food: true }) => {
                self.scheduler.set_tick_period(at, Duration::from_millis(self.state.game_speed));
            }
            Ok(TickOutcome::Moved { ate_food: false }) => {}
            Ok(TickOutcome::Collided(kind)) => {
                info!(?kind, score = self.state.score, "game over");
                self.game_over(&before);
            }
            // The drivers keep running; only a collision stops them.
            Err(e) => self.report("advance the game", &e),
        }
    }

    fn game_over(&mut self, snapshot: &GameState) {
        self.scheduler.stop();
        self.phase = Phase::GameOver;
        self.final_score = Some(self.state.score);
        match self.slot.save(snapshot) {
            Ok(()) => self.has_save = true,
            Err(e) => self.report("save the game", &e.into()),
        }
    }

    fn begin_fresh(&mut self) {
        self.state = GameState::new(&self.config);
        self.final_score = None;
        self.enter_playing();
        info!("new game");
    }

    fn enter_playing(&mut self) {
        self.phase = Phase::Playing;
        self.scheduler.start(
            self.now,
            Duration::from_millis(self.state.game_speed),
            Duration::from_millis(self.config.clock_period_ms),
        );
    }

    fn expect_phase(&self, action: &'static str, allowed: &[Phase]) -> GameResult<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(GameError::StateTransition { action, phase: self.phase })
        }
    }

    fn guard(&mut self, action: &'static str, f: impl FnOnce(&mut Self) -> GameResult<()>) {
        if let Err(e) = f(self) {
            self.report(action, &e);
        }
    }

    fn report(&mut self, action: &'static str, err: &GameError) {
        error!(action, error = %err, "session action failed");
        self.events.push(SessionEvent::Notice(Notice { action, message: err.to_string() }));
    }
}
