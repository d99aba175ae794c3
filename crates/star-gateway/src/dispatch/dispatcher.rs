//! Event dispatcher
//!
//! Receives star events from the event source and routes them to the
//! starboard manager. Events on the same message keep their arrival order;
//! everything else runs concurrently (see [`EventLanes`]).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use star_core::StarEvent;
use star_service::{ServiceError, ServiceResult, StarboardManager};

use super::lanes::EventLanes;

/// Event dispatcher that routes inbound events to the starboards
pub struct EventDispatcher {
    /// Starboards of every configured guild
    manager: Arc<StarboardManager>,
    /// Only reactions with this emoji count as stars
    star_emoji: String,
    /// Whether the dispatcher is running
    running: AtomicBool,
    /// Events handled so far
    processed: AtomicU64,
}

impl EventDispatcher {
    pub fn new(manager: Arc<StarboardManager>, star_emoji: impl Into<String>) -> Self {
        Self {
            manager,
            star_emoji: star_emoji.into(),
            running: AtomicBool::new(false),
            processed: AtomicU64::new(0),
        }
    }

    /// Number of events handled, including ignored ones
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start the dispatch loop on a background task
    ///
    /// The loop ends once every sender of `events` is dropped.
    pub fn start(self: Arc<Self>, events: mpsc::Receiver<StarEvent>) -> JoinHandle<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Event dispatcher is already running");
        }

        info!(star_emoji = %self.star_emoji, "Event dispatcher started");
        tokio::spawn(async move {
            self.run(events).await;
        })
    }

    async fn run(self: Arc<Self>, mut events: mpsc::Receiver<StarEvent>) {
        let mut lanes = EventLanes::new();
        while let Some(event) = events.recv().await {
            let (guild_id, message_id) = (event.guild_id(), event.message_id());
            let this = Arc::clone(&self);
            lanes.schedule(guild_id, message_id, async move {
                this.handle_event(event).await;
            });
        }

        lanes.drain().await;

        self.running.store(false, Ordering::SeqCst);
        info!(processed = self.processed(), "Event dispatcher loop ended");
    }

    /// Route one event and log any failure
    pub async fn handle_event(&self, event: StarEvent) {
        let event_type = event.event_type();
        let guild_id = event.guild_id();
        trace!(event_type, %guild_id, "Dispatching event");

        if let Err(err) = self.dispatch(event).await {
            if err.is_store_fault() {
                error!(error = %err, event_type, %guild_id, "Store fault while handling event");
            } else {
                warn!(error = %err, code = err.error_code(), event_type, %guild_id, "Event handling failed");
            }
        }
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    /// Route one event to the manager
    pub async fn dispatch(&self, event: StarEvent) -> ServiceResult<()> {
        if let Some(emoji) = event.emoji() {
            if emoji != self.star_emoji {
                debug!(emoji, "Non-star reaction ignored");
                return Ok(());
            }
        }

        match event {
            StarEvent::ReactionAdded {
                guild_id,
                message_id,
                user_id,
                ..
            } => {
                self.manager
                    .on_reaction_added(guild_id, message_id, user_id)
                    .await
            }
            StarEvent::ReactionRemoved {
                guild_id,
                message_id,
                user_id,
                ..
            } => {
                self.manager
                    .on_reaction_removed(guild_id, message_id, user_id)
                    .await
            }
            StarEvent::MessageDeleted {
                guild_id,
                message_id,
            } => self.manager.on_message_deleted(guild_id, message_id).await,
            StarEvent::GuildLeft { guild_id } => self.manager.leave(guild_id).await,
            StarEvent::ConfigureStarboard {
                guild_id,
                channel_id,
                threshold,
            } => {
                if channel_id.is_none() && threshold.is_none() {
                    return Err(ServiceError::validation(
                        "configure needs a channel_id or a threshold",
                    ));
                }
                if channel_id.is_some() || self.manager.board(guild_id).is_none() {
                    self.manager.set_channel(guild_id, channel_id).await?;
                }
                if let Some(threshold) = threshold {
                    self.manager.set_threshold(guild_id, threshold).await?;
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("star_emoji", &self.star_emoji)
            .field("running", &self.is_running())
            .field("processed", &self.processed())
            .finish()
    }
}
