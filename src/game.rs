//! Game loop
//!
//! Owns the scheduler, the engine, the status relay and the input source, and
//! runs them cooperatively on one virtual clock. Nothing happens between
//! calls to [`Game::advance`]: the host decides how fast virtual time moves
//! (a frame callback, a test, or the headless demo).

use crate::config::{BoardConfig, ConfigError};
use crate::observable::Watch;
use crate::relay::{StatusRelay, StatusSnapshot};
use crate::settings::{FieldError, GameSettings, GameSettingsForm, Setting, SettingsStore};
use crate::sim::engine::{Engine, EngineSnapshot};
use crate::sim::input::{InputSource, KeyEvent, NoInput};
use crate::sim::scheduler::{Scheduler, Task};
use crate::sim::state::{FallingObject, RoundPhase};

pub struct Game {
    scheduler: Scheduler,
    engine: Engine,
    relay: StatusRelay,
    input: Box<dyn InputSource>,
}

impl Game {
    /// New idle game; the status relay starts sampling immediately.
    /// Fails if `board` does not validate.
    pub fn new(
        board: BoardConfig,
        seed: u64,
        input: impl InputSource + 'static,
    ) -> Result<Self, ConfigError> {
        let engine = Engine::new(board, seed)?;
        let relay = StatusRelay::new(
            engine.score(),
            engine.time_remaining(),
            board.status_sample_interval_ms,
        );
        let mut game = Self {
            scheduler: Scheduler::new(),
            engine,
            relay,
            input: Box::new(input),
        };
        game.relay.connect(&mut game.scheduler);
        Ok(game)
    }

    /// Game with no key input
    pub fn without_input(board: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::new(board, seed, NoInput)
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn relay(&self) -> &StatusRelay {
        &self.relay
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn board(&self) -> &BoardConfig {
        self.engine.board()
    }

    pub fn settings(&self) -> &SettingsStore {
        self.engine.settings()
    }

    pub fn player_x(&self) -> Watch<i32> {
        self.engine.player_x()
    }

    pub fn objects(&self) -> Watch<Vec<FallingObject>> {
        self.engine.objects()
    }

    pub fn score(&self) -> Watch<u32> {
        self.engine.score()
    }

    pub fn time_remaining(&self) -> Watch<Option<u32>> {
        self.engine.time_remaining()
    }

    pub fn phase(&self) -> Watch<RoundPhase> {
        self.engine.phase()
    }

    pub fn final_score(&self) -> Watch<Option<u32>> {
        self.engine.final_score()
    }

    pub fn status(&self) -> Watch<Option<StatusSnapshot>> {
        self.relay.snapshots()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.engine.snapshot()
    }

    pub fn set_fall_speed(&mut self, value: Setting) {
        self.engine.set_fall_speed(value);
    }

    pub fn set_spawn_frequency(&mut self, value: Setting) {
        self.engine.set_spawn_frequency(value, &mut self.scheduler);
    }

    pub fn set_paddle_speed(&mut self, value: Setting) {
        self.engine.set_paddle_speed(value);
    }

    pub fn set_round_duration(&mut self, value: Setting) {
        self.engine.set_round_duration(value, &mut self.scheduler);
    }

    pub fn apply_settings(&mut self, settings: &GameSettings) {
        self.engine.apply_settings(settings, &mut self.scheduler);
    }

    /// Validate a settings form and apply it once every field is filled in.
    /// Returns whether the settings were applied.
    pub fn submit_form(&mut self, form: &GameSettingsForm) -> Result<bool, FieldError> {
        let settings = form.validate()?;
        if !settings.is_complete() {
            return Ok(false);
        }
        self.apply_settings(&settings);
        Ok(true)
    }

    pub fn connect_relay(&mut self) {
        self.relay.connect(&mut self.scheduler);
    }

    pub fn disconnect_relay(&mut self) {
        self.relay.disconnect(&mut self.scheduler);
    }

    /// Run everything due in the next `ms` milliseconds
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now_ms().saturating_add(ms);
        self.run_until(target);
    }

    /// Run everything due up to and including `target_ms`, in time order.
    /// Key presses go before timers due at the same instant; presses stamped
    /// in the past are handled at the current time.
    pub fn run_until(&mut self, target_ms: u64) {
        loop {
            let input_limit = self
                .scheduler
                .next_due_ms()
                .filter(|&due| due <= target_ms)
                .unwrap_or(target_ms);

            if let Some(event) = self.input.next_event(input_limit) {
                self.scheduler.advance_clock(event.at_ms);
                self.engine.handle_key(KeyEvent {
                    at_ms: self.scheduler.now_ms(),
                    key: event.key,
                });
                continue;
            }

            match self.scheduler.pop_due(target_ms) {
                Some((_, Task::StatusSample)) => {
                    self.relay.sample();
                }
                Some((_, task)) => self.engine.on_timer(task, &mut self.scheduler),
                None => break,
            }
        }
        self.scheduler.advance_clock(target_ms);
    }
}
