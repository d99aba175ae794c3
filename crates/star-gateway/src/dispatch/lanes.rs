//! Ordering lanes for dispatched events
//!
//! Events on one message run in arrival order, each on its own task once
//! its predecessor has finished. Different messages run concurrently.
//! Guild-wide events wait for everything already scheduled in the guild
//! and hold back whatever arrives after them.

use std::collections::HashMap;
use std::future::Future;

use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use tokio::task::AbortHandle;
use tracing::error;

use star_core::Snowflake;

/// Scheduled events between two sweeps of finished lanes
const PRUNE_EVERY: u64 = 256;

type Signal = Shared<BoxFuture<'static, ()>>;

/// One scheduled event
struct Lane {
    signal: Signal,
    task: AbortHandle,
}

impl Lane {
    fn spawn<F>(after: Vec<Signal>, work: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            join_all(after).await;
            work.await;
        });
        let task = handle.abort_handle();
        let signal = handle
            .map(|result| {
                if let Err(err) = result {
                    error!(error = %err, "Dispatched event task failed");
                }
            })
            .boxed()
            .shared();
        Self { signal, task }
    }

    fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[derive(Default)]
struct GuildLanes {
    /// Latest guild-wide event
    barrier: Option<Lane>,
    /// Latest event per message since the barrier
    messages: HashMap<Snowflake, Lane>,
}

impl GuildLanes {
    fn is_empty(&self) -> bool {
        self.barrier.is_none() && self.messages.is_empty()
    }
}

/// Per-guild, per-message lanes of in-flight events
#[derive(Default)]
pub struct EventLanes {
    guilds: HashMap<Snowflake, GuildLanes>,
    scheduled: u64,
}

impl EventLanes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `work` behind whatever it must follow
    ///
    /// `message_id` of `None` marks a guild-wide event.
    pub fn schedule<F>(&mut self, guild_id: Snowflake, message_id: Option<Snowflake>, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let lanes = self.guilds.entry(guild_id).or_default();
        match message_id {
            Some(message_id) => {
                let after: Vec<Signal> = lanes
                    .messages
                    .get(&message_id)
                    .or(lanes.barrier.as_ref())
                    .map(|lane| lane.signal.clone())
                    .into_iter()
                    .collect();
                lanes.messages.insert(message_id, Lane::spawn(after, work));
            }
            None => {
                let after: Vec<Signal> = lanes
                    .barrier
                    .iter()
                    .chain(lanes.messages.values())
                    .map(|lane| lane.signal.clone())
                    .collect();
                lanes.messages.clear();
                lanes.barrier = Some(Lane::spawn(after, work));
            }
        }

        self.scheduled += 1;
        if self.scheduled % PRUNE_EVERY == 0 {
            self.prune();
        }
    }

    /// Forget lanes whose last event has finished
    pub fn prune(&mut self) {
        for lanes in self.guilds.values_mut() {
            lanes.messages.retain(|_, lane| !lane.is_finished());
            if lanes.barrier.as_ref().is_some_and(Lane::is_finished) {
                lanes.barrier = None;
            }
        }
        self.guilds.retain(|_, lanes| !lanes.is_empty());
    }

    /// Number of lanes still tracked
    pub fn len(&self) -> usize {
        self.guilds
            .values()
            .map(|lanes| lanes.messages.len() + usize::from(lanes.barrier.is_some()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.guilds.is_empty()
    }

    /// Wait for every scheduled event to finish
    pub async fn drain(&mut self) {
        let pending: Vec<Signal> = self
            .guilds
            .drain()
            .flat_map(|(_, lanes)| lanes.barrier.into_iter().chain(lanes.messages.into_values()))
            .map(|lane| lane.signal)
            .collect();
        join_all(pending).await;
    }
}

impl std::fmt::Debug for EventLanes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLanes")
            .field("guilds", &self.guilds.len())
            .field("lanes", &self.len())
            .field("scheduled", &self.scheduled)
            .finish()
    }
}
