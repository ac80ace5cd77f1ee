//! Rest countdown between sets
//!
//! Single-shot, one at a time: starting a new countdown replaces the old
//! one, reaching zero clears it. Nothing here is persisted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

pub const DEFAULT_REST_SECONDS: u32 = 90;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown {
    /// Bumped on every start/cancel so a replaced task cannot publish
    pub generation: u64,
    /// Seconds left, `None` when no countdown is running
    pub remaining: Option<u32>,
}

pub struct RestTimer {
    state: Arc<watch::Sender<Countdown>>,
    task: Option<JoinHandle<()>>,
}

impl RestTimer {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Countdown::default());
        Self {
            state: Arc::new(tx),
            task: None,
        }
    }

    /// Begin a countdown of `seconds`, replacing any running one.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, seconds: u32) {
        self.abort_task();

        let generation = self.bump(if seconds == 0 { None } else { Some(seconds) });
        if seconds == 0 {
            return;
        }
        debug!(seconds, generation, "Rest timer started");

        let state = Arc::clone(&self.state);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            let mut left = seconds;
            while left > 0 {
                ticker.tick().await;
                left -= 1;
                let next = if left == 0 { None } else { Some(left) };
                let current = state.send_if_modified(|c| {
                    if c.generation != generation {
                        return false;
                    }
                    c.remaining = next;
                    true
                });
                if !current {
                    return;
                }
            }
            debug!(generation, "Rest timer finished");
        }));
    }

    /// Start with the default rest duration
    pub fn start_default(&mut self) {
        self.start(DEFAULT_REST_SECONDS);
    }

    pub fn cancel(&mut self) {
        if self.task.is_some() || self.remaining().is_some() {
            debug!("Rest timer cancelled");
        }
        self.abort_task();
        self.bump(None);
    }

    pub fn remaining(&self) -> Option<u32> {
        self.state.borrow().remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining().is_some()
    }

    pub fn subscribe(&self) -> watch::Receiver<Countdown> {
        self.state.subscribe()
    }

    fn bump(&self, remaining: Option<u32>) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|c| {
            c.generation += 1;
            c.remaining = remaining;
            generation = c.generation;
        });
        generation
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Default for RestTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RestTimer {
    fn drop(&mut self) {
        self.abort_task();
    }
}
