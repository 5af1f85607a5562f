//! Status relay
//!
//! Polls score and time remaining at a fixed period and republishes them as
//! one combined snapshot, so a display surface can follow the round without
//! holding engine handles.

use serde::{Deserialize, Serialize};

use crate::observable::{Observable, Watch};
use crate::sim::scheduler::{Scheduler, Task, TimerSlot};

/// Combined score/time sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    /// Score at sampling time
    pub caught_objects: u32,
    /// Seconds left; 0 while no round is running
    pub time_remaining: u32,
}

pub struct StatusRelay {
    score: Watch<u32>,
    time_remaining: Watch<Option<u32>>,
    period_ms: u64,
    sampler: TimerSlot,
    output: Observable<Option<StatusSnapshot>>,
    samples: u64,
}

impl StatusRelay {
    pub fn new(score: Watch<u32>, time_remaining: Watch<Option<u32>>, period_ms: u64) -> Self {
        Self {
            score,
            time_remaining,
            period_ms,
            sampler: TimerSlot::new(),
            output: Observable::new(None),
            samples: 0,
        }
    }

    /// Latest published snapshot; `None` before the first sample
    pub fn snapshots(&self) -> Watch<Option<StatusSnapshot>> {
        self.output.watch()
    }

    pub fn is_connected(&self) -> bool {
        self.sampler.is_running()
    }

    /// Number of samples published so far
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// Start sampling every period from now. Any previous sampling timer is
    /// cancelled first.
    pub fn connect(&mut self, scheduler: &mut Scheduler) {
        self.sampler
            .restart(scheduler, Task::StatusSample, self.period_ms);
        log::info!("status relay connected ({}ms)", self.period_ms);
    }

    pub fn disconnect(&mut self, scheduler: &mut Scheduler) {
        if self.sampler.is_running() {
            self.sampler.cancel(scheduler);
            log::info!("status relay disconnected");
        }
    }

    /// Read both sources and publish. Every sample is published, even if
    /// nothing changed since the last one.
    pub fn sample(&mut self) -> StatusSnapshot {
        let snapshot = StatusSnapshot {
            caught_objects: self.score.get(),
            time_remaining: self.time_remaining.get().unwrap_or(0),
        };
        self.samples += 1;
        log::trace!("status sample {}: {:?}", self.samples, snapshot);
        self.output.publish(Some(snapshot));
        snapshot
    }
}
