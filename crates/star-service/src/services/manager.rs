//! StarboardManager - registry of per-guild starboards
//!
//! The surface the event dispatcher calls. Events for guilds without a
//! configured starboard are dropped here.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, instrument};

use star_core::{Snowflake, StarboardSettings};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::starboard::Starboard;

/// Per-process registry of starboards, one per guild
pub struct StarboardManager {
    boards: DashMap<Snowflake, Arc<Starboard>>,
    default_threshold: i64,
    ctx: ServiceContext,
}

impl StarboardManager {
    pub fn new(ctx: ServiceContext, default_threshold: i64) -> Self {
        Self {
            boards: DashMap::new(),
            default_threshold,
            ctx,
        }
    }

    /// Starboard of a guild, if configured
    pub fn board(&self, guild_id: Snowflake) -> Option<Arc<Starboard>> {
        self.boards.get(&guild_id).map(|board| Arc::clone(board.value()))
    }

    /// Number of configured guilds
    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Install every persisted starboard
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> ServiceResult<usize> {
        let all = self.ctx.settings_repo().find_all().await?;
        let loaded = all.len();
        for settings in all {
            self.install(settings)?;
        }
        info!(loaded, "Starboards loaded");
        Ok(loaded)
    }

    /// Validate, persist, and install or update a guild's starboard
    #[instrument(skip(self))]
    pub async fn configure(&self, settings: StarboardSettings) -> ServiceResult<Arc<Starboard>> {
        settings.check()?;
        self.ctx.settings_repo().upsert(&settings).await?;
        self.install(settings)
    }

    /// Point a guild's starboard at `channel_id`, creating it with the
    /// default threshold when missing
    pub async fn set_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> ServiceResult<Arc<Starboard>> {
        let threshold = self
            .board(guild_id)
            .map_or(self.default_threshold, |board| board.settings().threshold);
        self.configure(StarboardSettings::new(guild_id, channel_id, threshold)?)
            .await
    }

    /// Change the threshold of an existing starboard
    pub async fn set_threshold(&self, guild_id: Snowflake, threshold: i64) -> ServiceResult<Arc<Starboard>> {
        let board = self
            .board(guild_id)
            .ok_or_else(|| ServiceError::not_configured(guild_id))?;
        let channel_id = board.settings().channel_id;
        self.configure(StarboardSettings::new(guild_id, channel_id, threshold)?)
            .await
    }

    pub async fn on_reaction_added(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        match self.board(guild_id) {
            Some(board) => board.on_reaction_added(message_id, user_id).await,
            None => {
                ignore(guild_id, "reaction added");
                Ok(())
            }
        }
    }

    pub async fn on_reaction_removed(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<()> {
        match self.board(guild_id) {
            Some(board) => board.on_reaction_removed(message_id, user_id).await,
            None => {
                ignore(guild_id, "reaction removed");
                Ok(())
            }
        }
    }

    pub async fn on_message_deleted(&self, guild_id: Snowflake, message_id: Snowflake) -> ServiceResult<()> {
        match self.board(guild_id) {
            Some(board) => board.on_message_deleted(message_id).await,
            None => {
                ignore(guild_id, "message deleted");
                Ok(())
            }
        }
    }

    /// Forget a guild: stars, entry links and settings
    #[instrument(skip(self))]
    pub async fn leave(&self, guild_id: Snowflake) -> ServiceResult<()> {
        match self.boards.remove(&guild_id) {
            Some((_, board)) => {
                board.leave().await?;
            }
            None => {
                self.ctx.reaction_store().remove_all(guild_id).await?;
            }
        }
        self.ctx.settings_repo().delete(guild_id).await?;
        info!(%guild_id, "Guild left");
        Ok(())
    }

    fn install(&self, settings: StarboardSettings) -> ServiceResult<Arc<Starboard>> {
        match self.boards.entry(settings.guild_id) {
            Entry::Occupied(occupied) => {
                let board = Arc::clone(occupied.get());
                drop(occupied);
                board.update_settings(settings)?;
                Ok(board)
            }
            Entry::Vacant(vacant) => {
                let board = Arc::new(Starboard::new(self.ctx.clone(), settings));
                vacant.insert(Arc::clone(&board));
                debug!(guild_id = %settings.guild_id, threshold = settings.threshold, "Starboard installed");
                Ok(board)
            }
        }
    }
}

impl std::fmt::Debug for StarboardManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarboardManager")
            .field("boards", &self.boards.len())
            .field("default_threshold", &self.default_threshold)
            .finish()
    }
}

fn ignore(guild_id: Snowflake, event: &'static str) {
    debug!(%guild_id, event, "No starboard configured, event ignored");
}
