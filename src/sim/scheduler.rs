//! Virtual-clock repeating timers
//!
//! Single-threaded and cooperative. Timers never fire on their own; the game
//! loop asks for the next due timer with [`Scheduler::pop_due`] and
//! dispatches it. A repeating timer's next firing is always
//! `previous_due + period`, so firings never drift.

use std::collections::BTreeMap;

/// Periodic processes driven by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Physics tick (move, catch, miss)
    Physics,
    /// Spawn one falling object
    Spawn,
    /// Round countdown step
    Countdown,
    /// Status relay sample
    StatusSample,
}

/// Handle to a scheduled timer. Ids are never reused, and ordering follows
/// scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Timer {
    task: Task,
    period_ms: u64,
    next_due_ms: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: BTreeMap<TimerId, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` every `period_ms`, first firing one period from now.
    /// A zero period is treated as 1 ms.
    pub fn schedule_repeating(&mut self, task: Task, period_ms: u64) -> TimerId {
        let period_ms = period_ms.max(1);
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                task,
                period_ms,
                next_due_ms: self.now_ms + period_ms,
            },
        );
        log::trace!("scheduled {:?} every {}ms as {:?}", task, period_ms, id);
        id
    }

    /// Cancel a timer; returns false if it was not active
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    #[cfg(test)]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of live timers running `task`
    pub fn count(&self, task: Task) -> usize {
        self.timers.values().filter(|t| t.task == task).count()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Due time of the earliest pending timer
    pub fn next_due_ms(&self) -> Option<u64> {
        self.timers.values().map(|t| t.next_due_ms).min()
    }

    /// Pop the earliest timer due at or before `until_ms`.
    ///
    /// Advances the clock to the timer's due time and reschedules it one
    /// period later. Timers due at the same instant come out in scheduling
    /// order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(TimerId, Task)> {
        let (id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.next_due_ms <= until_ms)
            .min_by_key(|(id, t)| (t.next_due_ms, **id))
            .map(|(id, t)| (*id, t.next_due_ms))?;

        let timer = self.timers.get_mut(&id)?;
        self.now_ms = self.now_ms.max(timer.next_due_ms);
        timer.next_due_ms += timer.period_ms;
        Some((id, timer.task))
    }

    /// Move the clock forward without firing anything. Never moves backward.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }
}

/// Holder for the single timer of one logical process.
///
/// Restarting cancels the held timer before scheduling the replacement, so
/// two schedules for the same process can never be live at once.
#[derive(Debug, Default)]
pub struct TimerSlot {
    current: Option<TimerId>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restart(&mut self, scheduler: &mut Scheduler, task: Task, period_ms: u64) -> TimerId {
        self.cancel(scheduler);
        let id = scheduler.schedule_repeating(task, period_ms);
        self.current = Some(id);
        id
    }

    pub fn cancel(&mut self, scheduler: &mut Scheduler) {
        if let Some(id) = self.current.take() {
            scheduler.cancel(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }

    /// Whether `id` is the timer this slot currently holds
    #[cfg(test)]
    pub fn holds(&self, id: TimerId) -> bool {
        self.current == Some(id)
    }
}
