//! Per-connection composition root.
//!
//! A `Session` owns everything one client sees: a fresh `ContractRegistry`, the
//! bootstrap snapshot, and the two timers that keep mutating and quoting the
//! population. Messages leave through a `crossbeam_channel::Sender<ServerMsg>`; the
//! connection task on the other end turns them into WebSocket frames.
//!
//! Both timers lock the registry for the whole tick, hand-off of the produced message
//! included, so messages reach the channel in the order they were generated and no
//! quote can overtake the removal of its contract.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::Sender;
use feed_common::{FeedError, Result, ServerMsg};
use log::{debug, info, warn};

use crate::config::FeedConfig;
use crate::model::contract_generator::ContractGenerator;
use crate::model::quote_generator::QuoteGenerator;
use crate::model::registry::ContractRegistry;
use crate::timer::{FeedTask, RepeatingTimer};

/// Simulation state and timers for one connected client.
pub struct Session {
    registry: Arc<Mutex<ContractRegistry>>,
    timers: Vec<RepeatingTimer>,
}

impl Session {
    /// Bootstrap a session and start its generators.
    ///
    /// Creates `initial_contracts` contracts, pushes them as the first message (even
    /// when the list is empty), then starts the lifecycle and quote timers.
    pub fn start(config: &FeedConfig, outbound: Sender<ServerMsg>) -> Result<Self> {
        config.validate()?;

        let mut registry = ContractRegistry::new();
        let contracts = (0..config.initial_contracts)
            .map(|_| registry.create())
            .collect::<Vec<_>>();
        info!("Session bootstrapped with {} contracts", contracts.len());
        forward(&outbound, ServerMsg::with_contracts(contracts));

        let registry = Arc::new(Mutex::new(registry));
        let mut session = Self {
            registry: Arc::clone(&registry),
            timers: Vec::with_capacity(2),
        };

        let contracts = ContractGenerator::from_config(config);
        let lifecycle_registry = Arc::clone(&registry);
        let lifecycle_tx = outbound.clone();
        session.timers.push(RepeatingTimer::start(
            FeedTask::ContractLifecycle,
            config.contract_interval,
            move || {
                let mut registry = lock_registry(&lifecycle_registry);
                if let Some(msg) = contracts.tick(&mut registry, &mut rand::rng()) {
                    forward(&lifecycle_tx, msg);
                }
                Ok(())
            },
        )?);

        let quotes = QuoteGenerator::from_config(config);
        let quote_registry = registry;
        let quote_tx = outbound;
        session.timers.push(RepeatingTimer::start(
            FeedTask::QuoteStream,
            config.quote_interval,
            move || {
                let mut registry = lock_registry(&quote_registry);
                if let Some(msg) = quotes.tick(&mut registry, &mut rand::rng()) {
                    forward(&quote_tx, msg);
                }
                Ok(())
            },
        )?);

        Ok(session)
    }

    /// Cancel both timers. No message is produced once this returns.
    pub fn close(&mut self) {
        if self.is_closed() {
            return;
        }
        for timer in &mut self.timers {
            timer.cancel();
            debug!("{} timer cancelled", timer.task());
        }
        info!("Session closed");
    }

    /// Whether `close` has run.
    pub fn is_closed(&self) -> bool {
        self.timers.iter().all(RepeatingTimer::is_cancelled)
    }

    /// Number of live contracts.
    pub fn contract_count(&self) -> usize {
        lock_registry(&self.registry).len()
    }

    /// Run `f` against the registry under the session lock.
    pub fn with_registry<T>(&self, f: impl FnOnce(&ContractRegistry) -> T) -> T {
        f(&lock_registry(&self.registry))
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// Push a message to the connection. Delivery is best-effort: a closed connection
/// simply drops it.
fn forward(outbound: &Sender<ServerMsg>, msg: ServerMsg) {
    if let Err(e) = outbound.send(msg) {
        debug!("{}", FeedError::ChannelSend(e.to_string()));
    }
}

/// Lock the registry, recovering it if a panicking tick poisoned the mutex.
fn lock_registry(registry: &Mutex<ContractRegistry>) -> MutexGuard<'_, ContractRegistry> {
    registry.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("{}, recovering registry", FeedError::MutexLock(poisoned.to_string()));
        poisoned.into_inner()
    })
}
