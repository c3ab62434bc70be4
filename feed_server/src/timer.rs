//! Repeating timers driving the per-connection generators.
//!
//! Each `RepeatingTimer` owns one background thread that waits on a
//! `crossbeam_channel::tick` and a stop channel, running its callback once per period.
//! A failing callback (error or panic) is logged and the timer keeps going, so one bad
//! tick never silences the feed. `cancel` disconnects the stop channel and joins the
//! thread: a tick already running completes, and no tick starts after `cancel` returns.

use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Sender, TryRecvError, bounded, select, tick};
use feed_common::Result;
use log::{debug, error, warn};
use strum_macros::Display;

/// Periodic tasks run by a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FeedTask {
    /// Contract creation, rename and removal.
    #[strum(serialize = "contract-lifecycle")]
    ContractLifecycle,
    /// Price/volume ticks.
    #[strum(serialize = "quote-stream")]
    QuoteStream,
}

/// Background thread invoking a callback at a fixed period until cancelled.
pub struct RepeatingTimer {
    task: FeedTask,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTimer {
    /// Spawn the timer thread. The first tick fires one `period` after start.
    pub fn start<F>(task: FeedTask, period: Duration, mut callback: F) -> Result<Self>
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let handle = thread::Builder::new()
            .name(task.to_string())
            .spawn(move || {
                let ticker = tick(period);
                loop {
                    select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => {
                            if let Err(TryRecvError::Disconnected) = stop_rx.try_recv() {
                                break;
                            }
                            match panic::catch_unwind(AssertUnwindSafe(|| callback())) {
                                Ok(Ok(())) => {}
                                Ok(Err(e)) => warn!("{} tick failed: {}", task, e),
                                Err(_) => error!("{} tick panicked, timer keeps running", task),
                            }
                        }
                    }
                }
                debug!("{} timer stopped", task);
            })?;

        Ok(Self {
            task,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Which task this timer drives.
    pub fn task(&self) -> FeedTask {
        self.task
    }

    /// Stop the timer and wait for its thread. Safe to call more than once.
    pub fn cancel(&mut self) {
        drop(self.stop_tx.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("{} timer thread terminated abnormally", self.task);
            }
        }
    }

    /// Whether `cancel` has already run.
    pub fn is_cancelled(&self) -> bool {
        self.handle.is_none()
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
