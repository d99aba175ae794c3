//! StarMessage aggregate
//!
//! Tracks the reactors of one starred message and the lifecycle of its entry
//! on the board. All operations on one message are serialized by the
//! aggregate's lock; the lock is held across store and backend calls so the
//! cached reactor set, the store rows, and the posted entry never disagree.

use std::collections::HashSet;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use star_core::{DomainError, Snowflake, StarSnapshot, StarboardSettings};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Where the board entry of a starred message stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// No entry posted yet
    NoEntry,
    /// Entry posted and linked in the store
    EntryExists(Snowflake),
    /// Aggregate retired; the owning board must drop it
    Deleted,
}

/// What the owning board has to do after an aggregate operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum StarOutcome {
    /// State changed (or stayed) and the aggregate stays registered
    Updated,
    /// The last star went away; the aggregate retired itself
    Emptied,
    /// The aggregate was already retired; retry against a fresh one
    Retired,
}

#[derive(Debug)]
struct Stars {
    loaded: bool,
    reactors: HashSet<Snowflake>,
    entry: EntryState,
}

impl Stars {
    fn count(&self) -> i64 {
        i64::try_from(self.reactors.len()).unwrap_or(i64::MAX)
    }

    fn is_retired(&self) -> bool {
        self.entry == EntryState::Deleted
    }
}

/// The star state of one message in one guild
#[derive(Debug)]
pub struct StarMessage {
    guild_id: Snowflake,
    message_id: Snowflake,
    stars: Mutex<Stars>,
}

impl StarMessage {
    /// Create an aggregate; its state is loaded from the store on first use
    pub fn new(guild_id: Snowflake, message_id: Snowflake) -> Self {
        Self {
            guild_id,
            message_id,
            stars: Mutex::new(Stars {
                loaded: false,
                reactors: HashSet::new(),
                entry: EntryState::NoEntry,
            }),
        }
    }

    pub fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    pub fn message_id(&self) -> Snowflake {
        self.message_id
    }

    /// Record a star from `user_id` and create or refresh the entry
    ///
    /// A user who already starred the message is a no-op.
    #[instrument(skip(self, ctx, settings), fields(guild_id = %self.guild_id, message_id = %self.message_id))]
    pub async fn add_star(
        &self,
        ctx: &ServiceContext,
        settings: &StarboardSettings,
        user_id: Snowflake,
    ) -> ServiceResult<StarOutcome> {
        let mut stars = self.stars.lock().await;
        if stars.is_retired() {
            return Ok(StarOutcome::Retired);
        }
        self.hydrate(&mut stars, ctx).await?;

        if stars.reactors.contains(&user_id) {
            debug!(%user_id, "Duplicate star ignored");
            return Ok(StarOutcome::Updated);
        }

        ctx.reaction_store()
            .add_star(self.guild_id, self.message_id, user_id)
            .await?;
        stars.reactors.insert(user_id);
        debug!(%user_id, count = stars.count(), "Star added");

        match stars.entry {
            EntryState::EntryExists(entry_id) => {
                self.update_entry(&mut stars, ctx, settings, entry_id).await
            }
            EntryState::NoEntry if settings.meets_threshold(stars.count()) => {
                self.create_entry(&mut stars, ctx, settings).await?;
                Ok(StarOutcome::Updated)
            }
            _ => Ok(StarOutcome::Updated),
        }
    }

    /// Withdraw the star of `user_id`
    ///
    /// Removing the last star retires the aggregate and reports `Emptied`.
    #[instrument(skip(self, ctx, settings), fields(guild_id = %self.guild_id, message_id = %self.message_id))]
    pub async fn remove_star(
        &self,
        ctx: &ServiceContext,
        settings: &StarboardSettings,
        user_id: Snowflake,
    ) -> ServiceResult<StarOutcome> {
        let mut stars = self.stars.lock().await;
        if stars.is_retired() {
            return Ok(StarOutcome::Retired);
        }
        self.hydrate(&mut stars, ctx).await?;

        let removed = ctx
            .reaction_store()
            .remove_star(self.guild_id, self.message_id, user_id)
            .await?;
        let cached = stars.reactors.remove(&user_id);
        if !removed && !cached {
            debug!(%user_id, "Star removal for non-reactor ignored");
            return Ok(StarOutcome::Updated);
        }
        debug!(%user_id, count = stars.count(), "Star removed");

        if stars.reactors.is_empty() {
            self.retire_entry(&mut stars, ctx).await?;
            return Ok(StarOutcome::Emptied);
        }

        match stars.entry {
            EntryState::EntryExists(entry_id) => {
                self.update_entry(&mut stars, ctx, settings, entry_id).await
            }
            EntryState::NoEntry if settings.meets_threshold(stars.count()) => {
                self.create_entry(&mut stars, ctx, settings).await?;
                Ok(StarOutcome::Updated)
            }
            _ => Ok(StarOutcome::Updated),
        }
    }

    /// Delete the entry (best-effort) and every stored row for this message
    #[instrument(skip(self, ctx), fields(guild_id = %self.guild_id, message_id = %self.message_id))]
    pub async fn delete(&self, ctx: &ServiceContext) -> ServiceResult<StarOutcome> {
        let mut stars = self.stars.lock().await;
        if stars.is_retired() {
            return Ok(StarOutcome::Retired);
        }
        self.hydrate(&mut stars, ctx).await?;

        self.retire_entry(&mut stars, ctx).await?;
        Ok(StarOutcome::Emptied)
    }

    /// Retire without touching the store or the backend
    ///
    /// Used when the whole guild's rows are wiped in one go.
    pub async fn retire(&self) {
        let mut stars = self.stars.lock().await;
        stars.reactors.clear();
        stars.entry = EntryState::Deleted;
    }

    /// Retire the aggregate if nothing durable depends on it
    ///
    /// Called after a failed operation so a freshly created aggregate does
    /// not linger in the registry. Returns true when the aggregate retired.
    pub async fn discard_if_vacant(&self) -> bool {
        let mut stars = self.stars.lock().await;
        let vacant = !stars.loaded
            || (stars.reactors.is_empty() && stars.entry == EntryState::NoEntry);
        if vacant && !stars.is_retired() {
            stars.entry = EntryState::Deleted;
            return true;
        }
        stars.is_retired()
    }

    /// Has `user_id` starred this message
    pub async fn is_starring(&self, ctx: &ServiceContext, user_id: Snowflake) -> ServiceResult<bool> {
        let mut stars = self.stars.lock().await;
        if stars.is_retired() {
            return Ok(false);
        }
        self.hydrate(&mut stars, ctx).await?;
        Ok(stars.reactors.contains(&user_id))
    }

    /// Current number of stars
    pub async fn count(&self, ctx: &ServiceContext) -> ServiceResult<i64> {
        let mut stars = self.stars.lock().await;
        if stars.is_retired() {
            return Ok(0);
        }
        self.hydrate(&mut stars, ctx).await?;
        Ok(stars.count())
    }

    /// Point-in-time view, `None` once retired
    pub async fn snapshot(&self, ctx: &ServiceContext) -> ServiceResult<Option<StarSnapshot>> {
        let mut stars = self.stars.lock().await;
        if stars.is_retired() {
            return Ok(None);
        }
        self.hydrate(&mut stars, ctx).await?;
        Ok(Some(self.snapshot_of(&stars)))
    }

    /// Current entry state, without loading from the store
    pub async fn entry_state(&self) -> EntryState {
        self.stars.lock().await.entry
    }

    async fn hydrate(&self, stars: &mut Stars, ctx: &ServiceContext) -> ServiceResult<()> {
        if stars.loaded {
            return Ok(());
        }

        let store = ctx.reaction_store();
        let reactors = store.get_stars(self.guild_id, self.message_id).await?;
        let entry = store.get_entry(self.guild_id, self.message_id).await?;

        stars.reactors = reactors.into_iter().collect();
        stars.entry = entry.map_or(EntryState::NoEntry, EntryState::EntryExists);
        stars.loaded = true;

        if !stars.reactors.is_empty() || entry.is_some() {
            debug!(count = stars.count(), entry_id = ?entry, "Loaded star state from store");
        }
        Ok(())
    }

    fn snapshot_of(&self, stars: &Stars) -> StarSnapshot {
        let entry_id = match stars.entry {
            EntryState::EntryExists(entry_id) => Some(entry_id),
            _ => None,
        };
        StarSnapshot::new(
            self.guild_id,
            self.message_id,
            entry_id,
            stars.reactors.iter().copied().collect(),
        )
    }

    async fn create_entry(
        &self,
        stars: &mut Stars,
        ctx: &ServiceContext,
        settings: &StarboardSettings,
    ) -> ServiceResult<()> {
        if stars.entry != EntryState::NoEntry {
            return Ok(());
        }
        let Some(channel_id) = settings.channel_id else {
            absorb(&DomainError::BoardChannelMissing, "create");
            return Ok(());
        };
        if !can_publish(ctx, channel_id).await {
            return Ok(());
        }

        let content = match ctx.renderer().render(&self.snapshot_of(stars)).await {
            Ok(content) => content,
            Err(err) => {
                absorb(&err, "render");
                return Ok(());
            }
        };
        let entry_id = match ctx.poster().post(channel_id, &content).await {
            Ok(entry_id) => entry_id,
            Err(err) => {
                absorb(&err, "post");
                return Ok(());
            }
        };

        if let Err(err) = ctx
            .reaction_store()
            .set_entry(self.guild_id, self.message_id, entry_id)
            .await
        {
            // An entry the store cannot point at would never be cleaned up
            if let Err(delete_err) = ctx.poster().delete(entry_id).await {
                absorb(&delete_err, "delete");
            }
            return Err(err.into());
        }

        stars.entry = EntryState::EntryExists(entry_id);
        info!(
            guild_id = %self.guild_id,
            message_id = %self.message_id,
            %entry_id,
            count = stars.count(),
            "Starboard entry created"
        );
        Ok(())
    }

    async fn update_entry(
        &self,
        stars: &mut Stars,
        ctx: &ServiceContext,
        settings: &StarboardSettings,
        entry_id: Snowflake,
    ) -> ServiceResult<StarOutcome> {
        if stars.reactors.is_empty() {
            self.retire_entry(stars, ctx).await?;
            return Ok(StarOutcome::Emptied);
        }
        let Some(channel_id) = settings.channel_id else {
            absorb(&DomainError::BoardChannelMissing, "edit");
            return Ok(StarOutcome::Updated);
        };
        if !can_publish(ctx, channel_id).await {
            return Ok(StarOutcome::Updated);
        }

        let content = match ctx.renderer().render(&self.snapshot_of(stars)).await {
            Ok(content) => content,
            Err(err) => {
                absorb(&err, "render");
                return Ok(StarOutcome::Updated);
            }
        };
        match ctx.poster().edit(entry_id, &content).await {
            Ok(()) => debug!(%entry_id, count = stars.count(), "Starboard entry updated"),
            Err(err) => absorb(&err, "edit"),
        }
        Ok(StarOutcome::Updated)
    }

    async fn retire_entry(&self, stars: &mut Stars, ctx: &ServiceContext) -> ServiceResult<()> {
        if let EntryState::EntryExists(entry_id) = stars.entry {
            if let Err(err) = ctx.poster().delete(entry_id).await {
                absorb(&err, "delete");
            }
            stars.entry = EntryState::NoEntry;
        }

        ctx.reaction_store()
            .remove_all_entries(self.guild_id, self.message_id)
            .await?;

        stars.reactors.clear();
        stars.entry = EntryState::Deleted;
        info!(
            guild_id = %self.guild_id,
            message_id = %self.message_id,
            "Starred message removed from starboard"
        );
        Ok(())
    }
}

async fn can_publish(ctx: &ServiceContext, channel_id: Snowflake) -> bool {
    let capability = ctx.capability();
    if capability.can_post(channel_id).await && capability.has_embed_capability(channel_id).await {
        return true;
    }
    absorb(&DomainError::CapabilityDenied { channel_id }, "publish");
    false
}

fn absorb(err: &DomainError, action: &'static str) {
    warn!(error = %err, code = err.code(), action, "Starboard entry step skipped");
}
