//! Starboard - per-guild facade over the StarMessage aggregates
//!
//! Owns the registry of live aggregates and routes reaction and deletion
//! events to them. Registry access never holds a shard guard across an
//! await: the aggregate `Arc` is cloned out first.
//!
//! Event handlers run under a shared hold of `gate`; `leave` takes it
//! exclusively, so no handler is mid-flight while the guild is wiped and
//! none starts afterwards.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::RwLock as GateLock;
use tracing::{debug, info, instrument};

use star_core::{Snowflake, StarboardSettings};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::star_message::{StarMessage, StarOutcome};

/// Attempts before giving up on a message whose aggregate keeps retiring
const MAX_ATTEMPTS: usize = 8;

/// Starboard of one guild
pub struct Starboard {
    guild_id: Snowflake,
    settings: RwLock<StarboardSettings>,
    messages: DashMap<Snowflake, Arc<StarMessage>>,
    gate: GateLock<()>,
    closed: AtomicBool,
    ctx: ServiceContext,
}

impl Starboard {
    pub fn new(ctx: ServiceContext, settings: StarboardSettings) -> Self {
        Self {
            guild_id: settings.guild_id,
            settings: RwLock::new(settings),
            messages: DashMap::new(),
            gate: GateLock::new(()),
            closed: AtomicBool::new(false),
            ctx,
        }
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    /// Current settings
    pub fn settings(&self) -> StarboardSettings {
        *self.settings.read()
    }

    /// Swap channel and threshold
    ///
    /// Takes effect from the next event; existing entries are not revisited.
    pub fn update_settings(&self, settings: StarboardSettings) -> ServiceResult<()> {
        if settings.guild_id != self.guild_id {
            return Err(ServiceError::validation(format!(
                "settings for guild {} applied to starboard of guild {}",
                settings.guild_id, self.guild_id
            )));
        }
        settings.check()?;

        *self.settings.write() = settings;
        info!(
            guild_id = %self.guild_id,
            channel_id = ?settings.channel_id,
            threshold = settings.threshold,
            "Starboard settings updated"
        );
        Ok(())
    }

    /// Number of live aggregates
    pub fn tracked(&self) -> usize {
        self.messages.len()
    }

    /// True once `leave` has run
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Handle a star reaction being added
    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    pub async fn on_reaction_added(&self, message_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let _open = self.gate.read().await;
        if self.is_closed() {
            return Ok(());
        }
        self.drive(message_id, |star, settings| async move {
            star.add_star(&self.ctx, &settings, user_id).await
        })
        .await
    }

    /// Handle a star reaction being removed
    ///
    /// Untracked messages are only touched if the store still has the star,
    /// which happens after a restart.
    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    pub async fn on_reaction_removed(&self, message_id: Snowflake, user_id: Snowflake) -> ServiceResult<()> {
        let _open = self.gate.read().await;
        if self.is_closed() {
            return Ok(());
        }
        if !self.messages.contains_key(&message_id)
            && !self
                .ctx
                .reaction_store()
                .is_starring(self.guild_id, message_id, user_id)
                .await?
        {
            debug!(%message_id, "Star removed from untracked message, ignoring");
            return Ok(());
        }

        self.drive(message_id, |star, settings| async move {
            star.remove_star(&self.ctx, &settings, user_id).await
        })
        .await
    }

    /// Handle a message being deleted upstream
    ///
    /// `message_id` may be a starred message or one of this board's entries.
    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    pub async fn on_message_deleted(&self, message_id: Snowflake) -> ServiceResult<()> {
        let _open = self.gate.read().await;
        if self.is_closed() {
            return Ok(());
        }

        let store = self.ctx.reaction_store();
        let starred_id = if self.messages.contains_key(&message_id) {
            message_id
        } else if let Some(starred_id) = store.find_by_entry(self.guild_id, message_id).await? {
            debug!(entry_id = %message_id, %starred_id, "Starboard entry deleted upstream");
            starred_id
        } else if store.get_star_count(self.guild_id, message_id).await? > 0 {
            message_id
        } else {
            return Ok(());
        };

        self.drive(starred_id, |star, _| async move { star.delete(&self.ctx).await })
            .await
    }

    /// Drop a retired aggregate from the registry
    ///
    /// Only removes the exact aggregate given, so a fresh aggregate created
    /// for the same message in the meantime survives.
    pub fn deleted_message(&self, message_id: Snowflake, star: &Arc<StarMessage>) {
        if self
            .messages
            .remove_if(&message_id, |_, current| Arc::ptr_eq(current, star))
            .is_some()
        {
            debug!(guild_id = %self.guild_id, %message_id, "Starred message dropped from registry");
        }
    }

    /// Wipe every starred message of this guild
    ///
    /// Entries are left on the backend; the bot no longer has access to them.
    #[instrument(skip(self), fields(guild_id = %self.guild_id))]
    pub async fn leave(&self) -> ServiceResult<u64> {
        let _closing = self.gate.write().await;
        self.closed.store(true, Ordering::SeqCst);

        let stars: Vec<Arc<StarMessage>> = self
            .messages
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        futures::future::join_all(stars.iter().map(|star| star.retire())).await;
        self.messages.clear();

        let removed = self.ctx.reaction_store().remove_all(self.guild_id).await?;
        info!(guild_id = %self.guild_id, removed, "Starboard left guild");
        Ok(removed)
    }

    /// Star count of a message, tracked or not
    pub async fn star_count(&self, message_id: Snowflake) -> ServiceResult<i64> {
        match self.lookup(message_id) {
            Some(star) => star.count(&self.ctx).await,
            None => Ok(self
                .ctx
                .reaction_store()
                .get_star_count(self.guild_id, message_id)
                .await?),
        }
    }

    /// Has `user_id` starred a message
    pub async fn is_starring(&self, message_id: Snowflake, user_id: Snowflake) -> ServiceResult<bool> {
        match self.lookup(message_id) {
            Some(star) => star.is_starring(&self.ctx, user_id).await,
            None => Ok(self
                .ctx
                .reaction_store()
                .is_starring(self.guild_id, message_id, user_id)
                .await?),
        }
    }

    /// Live aggregate for a message, if any
    pub fn lookup(&self, message_id: Snowflake) -> Option<Arc<StarMessage>> {
        self.messages.get(&message_id).map(|entry| Arc::clone(entry.value()))
    }

    fn get_or_create(&self, message_id: Snowflake) -> Arc<StarMessage> {
        let entry = self
            .messages
            .entry(message_id)
            .or_insert_with(|| Arc::new(StarMessage::new(self.guild_id, message_id)));
        Arc::clone(entry.value())
    }

    /// Run `op` against the message's aggregate and apply its outcome
    async fn drive<F, Fut>(&self, message_id: Snowflake, op: F) -> ServiceResult<()>
    where
        F: Fn(Arc<StarMessage>, StarboardSettings) -> Fut,
        Fut: Future<Output = ServiceResult<StarOutcome>>,
    {
        for _ in 0..MAX_ATTEMPTS {
            let star = self.get_or_create(message_id);
            match op(Arc::clone(&star), self.settings()).await {
                Ok(StarOutcome::Updated) => return Ok(()),
                Ok(StarOutcome::Emptied) => {
                    self.deleted_message(message_id, &star);
                    return Ok(());
                }
                Ok(StarOutcome::Retired) => {
                    debug!(%message_id, "Raced with a retiring aggregate, retrying");
                    self.deleted_message(message_id, &star);
                }
                Err(err) => {
                    if star.discard_if_vacant().await {
                        self.deleted_message(message_id, &star);
                    }
                    return Err(err);
                }
            }
        }

        Err(ServiceError::internal(format!(
            "message {message_id} retired {MAX_ATTEMPTS} times in a row"
        )))
    }
}

impl std::fmt::Debug for Starboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Starboard")
            .field("guild_id", &self.guild_id)
            .field("settings", &self.settings())
            .field("tracked", &self.tracked())
            .field("closed", &self.is_closed())
            .finish()
    }
}
