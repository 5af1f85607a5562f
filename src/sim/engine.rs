//! The simulation engine
//!
//! Owns the authoritative game state and the round state machine. Every
//! state field is an [`Observable`]; other components only ever see
//! [`Watch`] handles.
//!
//! Each public operation stages all the fields it changes and then commits
//! once, so a subscriber on any field always reads a consistent state from
//! the others. A score increase and the removal of the caught object, or the
//! whole round reset, are each a single visible transition.
//!
//! Settings react independently: changing the fall speed, spawn frequency
//! or paddle speed never restarts the round; changing the round duration
//! mid-round restarts only the countdown.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::input::KeyEvent;
use super::scheduler::{Scheduler, Task, TimerSlot};
use super::state::{FallingObject, RoundPhase};
use super::tick::tick;
use crate::config::{BoardConfig, ConfigError};
use crate::observable::{Observable, Watch};
use crate::settings::{GameSettings, Setting, SettingsField, SettingsStore};

/// Settings are expressed in whole seconds
const MS_PER_SECOND: u64 = 1000;

/// Plain copy of the engine state at one instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    pub player_x: i32,
    pub objects: Vec<FallingObject>,
    pub score: u32,
    pub time_remaining: Option<u32>,
    pub phase: RoundPhase,
}

pub struct Engine {
    board: BoardConfig,
    settings: SettingsStore,

    player_x: Observable<i32>,
    objects: Observable<Vec<FallingObject>>,
    score: Observable<u32>,
    time_remaining: Observable<Option<u32>>,
    phase: Observable<RoundPhase>,
    /// Score of the most recently finished round
    final_score: Observable<Option<u32>>,

    countdown: TimerSlot,
    physics: TimerSlot,
    spawner: TimerSlot,

    /// Whole seconds elapsed in the current countdown
    elapsed_secs: u32,
    /// Time of the last accepted paddle move (throttle window start)
    last_move_ms: Option<u64>,
    rng: Pcg32,
    next_object_id: u32,
}

impl Engine {
    /// Fails if `board` does not pass [`BoardConfig::validate`]
    pub fn new(board: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        board.validate()?;
        Ok(Self {
            board,
            settings: SettingsStore::new(),
            player_x: Observable::new(board.initial_player_x()),
            objects: Observable::new(Vec::new()),
            score: Observable::new(0),
            time_remaining: Observable::new(None),
            phase: Observable::new(RoundPhase::Idle),
            final_score: Observable::new(None),
            countdown: TimerSlot::new(),
            physics: TimerSlot::new(),
            spawner: TimerSlot::new(),
            elapsed_secs: 0,
            last_move_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            next_object_id: 0,
        })
    }

    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn player_x(&self) -> Watch<i32> {
        self.player_x.watch()
    }

    pub fn objects(&self) -> Watch<Vec<FallingObject>> {
        self.objects.watch()
    }

    pub fn score(&self) -> Watch<u32> {
        self.score.watch()
    }

    pub fn time_remaining(&self) -> Watch<Option<u32>> {
        self.time_remaining.watch()
    }

    pub fn phase(&self) -> Watch<RoundPhase> {
        self.phase.watch()
    }

    pub fn final_score(&self) -> Watch<Option<u32>> {
        self.final_score.watch()
    }

    pub fn is_running(&self) -> bool {
        self.phase.get() == RoundPhase::Running
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            player_x: self.player_x.get(),
            objects: self.objects.get(),
            score: self.score.get(),
            time_remaining: self.time_remaining.get(),
            phase: self.phase.get(),
        }
    }

    /// Takes effect on the next physics tick
    pub fn set_fall_speed(&mut self, value: Setting) {
        if self.settings.stage(SettingsField::FallSpeed, value) {
            self.commit();
        }
    }

    /// Takes effect on the next key press
    pub fn set_paddle_speed(&mut self, value: Setting) {
        if self.settings.stage(SettingsField::PaddleSpeed, value) {
            self.commit();
        }
    }

    /// Cancels the spawn timer and, if a round is running and the new value
    /// is set, starts a new one whose first spawn is one full period away.
    pub fn set_spawn_frequency(&mut self, value: Setting, scheduler: &mut Scheduler) {
        if !self.settings.stage(SettingsField::SpawnFrequency, value) {
            return;
        }
        self.sync_spawner(scheduler);
        self.commit();
    }

    /// Start, re-time or suspend the round
    pub fn set_round_duration(&mut self, value: Setting, scheduler: &mut Scheduler) {
        if !self.settings.stage(SettingsField::RoundDuration, value) {
            return;
        }

        match value {
            Some(secs) => {
                self.elapsed_secs = 0;
                self.time_remaining.stage(Some(secs.get()));
                self.countdown
                    .restart(scheduler, Task::Countdown, self.board.countdown_interval_ms);

                if self.is_running() {
                    log::info!("round duration changed to {}s, countdown restarted", secs);
                } else {
                    // A new round always starts clean
                    self.objects.stage(Vec::new());
                    self.score.stage(0);
                    self.phase.stage(RoundPhase::Running);
                    self.physics
                        .restart(scheduler, Task::Physics, self.board.tick_interval_ms);
                    self.sync_spawner(scheduler);
                    log::info!("round started: {}s", secs);
                }
            }
            None => {
                self.countdown.cancel(scheduler);
                self.physics.cancel(scheduler);
                self.spawner.cancel(scheduler);
                self.elapsed_secs = 0;
                self.time_remaining.stage(None);
                self.phase.stage(RoundPhase::Idle);
                log::info!("round suspended");
            }
        }

        self.commit();
    }

    /// Apply all four settings: fall speed, spawn frequency, paddle speed,
    /// then round duration.
    pub fn apply_settings(&mut self, settings: &GameSettings, scheduler: &mut Scheduler) {
        self.set_fall_speed(settings.fall_speed);
        self.set_spawn_frequency(settings.spawn_frequency_secs, scheduler);
        self.set_paddle_speed(settings.paddle_speed);
        self.set_round_duration(settings.round_duration_secs, scheduler);
    }

    /// Run one firing of a scheduled engine process
    pub fn on_timer(&mut self, task: Task, scheduler: &mut Scheduler) {
        match task {
            Task::Physics => self.physics_tick(),
            Task::Spawn => self.spawn(),
            Task::Countdown => self.countdown_step(scheduler),
            Task::StatusSample => {
                log::warn!("engine received a status sample timer; ignoring");
                debug_assert!(false, "status sample timers belong to the relay");
            }
        }
    }

    /// Move the paddle for a key press. Returns whether the press was
    /// accepted: presses are ignored while the paddle speed is unset and
    /// within one tick interval of the last accepted press.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        let Some(speed) = self.settings.paddle_speed() else {
            return false;
        };
        if let Some(last) = self.last_move_ms {
            if event.at_ms < last + self.board.tick_interval_ms {
                return false;
            }
        }
        self.last_move_ms = Some(event.at_ms);

        let step = i32::try_from(speed.get()).unwrap_or(i32::MAX);
        let x = self
            .player_x
            .get()
            .saturating_add(event.key.direction() * step)
            .clamp(0, self.board.max_player_x());
        self.player_x.stage(x);
        self.commit();
        true
    }

    fn sync_spawner(&mut self, scheduler: &mut Scheduler) {
        match self.settings.spawn_frequency() {
            Some(secs) if self.is_running() => {
                let period_ms = u64::from(secs.get()) * MS_PER_SECOND;
                self.spawner.restart(scheduler, Task::Spawn, period_ms);
            }
            _ => self.spawner.cancel(scheduler),
        }
    }

    fn physics_tick(&mut self) {
        let mut objects = self.objects.get();
        let outcome = tick(
            &mut objects,
            self.player_x.get(),
            self.settings.fall_speed(),
            &self.board,
        );
        self.objects.stage(objects);
        if outcome.caught > 0 {
            self.score.stage(self.score.get().saturating_add(outcome.caught));
        }
        self.commit();
    }

    fn spawn(&mut self) {
        let x = self.rng.random_range(0..self.board.spawn_x_range());
        let object = FallingObject::new(self.next_object_id, x);
        self.next_object_id += 1;
        log::debug!("spawned object {} at x={}", object.id, object.x);

        let mut objects = self.objects.get();
        objects.push(object);
        self.objects.stage(objects);
        self.commit();
    }

    fn countdown_step(&mut self, scheduler: &mut Scheduler) {
        let Some(duration) = self.settings.round_duration() else {
            return;
        };
        self.elapsed_secs += 1;
        let remaining = duration.get().saturating_sub(self.elapsed_secs);
        if remaining == 0 {
            self.reset_round(scheduler);
        } else {
            self.time_remaining.stage(Some(remaining));
            self.commit();
        }
    }

    /// Full wipe at the end of a round. Every round timer is cancelled
    /// before anything is published.
    fn reset_round(&mut self, scheduler: &mut Scheduler) {
        self.countdown.cancel(scheduler);
        self.physics.cancel(scheduler);
        self.spawner.cancel(scheduler);

        let final_score = self.score.get();
        self.objects.stage(Vec::new());
        self.score.stage(0);
        self.player_x.stage(self.board.initial_player_x());
        self.settings.stage(SettingsField::PaddleSpeed, None);
        self.settings.stage(SettingsField::RoundDuration, None);
        self.time_remaining.stage(None);
        self.phase.stage(RoundPhase::Idle);
        self.final_score.stage_always(Some(final_score));
        self.elapsed_secs = 0;
        self.last_move_ms = None;

        log::info!("round over: {} caught", final_score);
        self.commit();
    }

    /// Publish everything staged by the current operation
    fn commit(&self) {
        self.settings.flush();
        self.player_x.flush();
        self.objects.flush();
        self.score.flush();
        self.time_remaining.flush();
        self.phase.flush();
        self.final_score.flush();
    }
}
