//! In-memory implementations of the starboard ports
//!
//! Used when no database is configured, and by tests. Every operation takes a
//! single lock, so multi-row writes are never observed half-applied.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use star_core::entities::StarboardSettings;
use star_core::error::DomainError;
use star_core::traits::{ReactionStore, RepoResult, SettingsRepository};
use star_core::value_objects::Snowflake;

#[derive(Debug, Default)]
struct StarredRows {
    stars: HashSet<Snowflake>,
    entry_id: Option<Snowflake>,
}

impl StarredRows {
    fn is_empty(&self) -> bool {
        self.stars.is_empty() && self.entry_id.is_none()
    }
}

type GuildRows = HashMap<Snowflake, StarredRows>;

/// In-memory ReactionStore
#[derive(Debug, Default)]
pub struct MemoryReactionStore {
    guilds: RwLock<HashMap<Snowflake, GuildRows>>,
    unavailable: AtomicBool,
}

impl MemoryReactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: while set, every call fails with a store fault
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of starred messages with rows in a guild
    pub fn message_count(&self, guild_id: Snowflake) -> usize {
        self.guilds.read().get(&guild_id).map_or(0, HashMap::len)
    }

    fn check(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::StoreFault("store unavailable".to_string()));
        }
        Ok(())
    }

    fn read<T>(&self, guild_id: Snowflake, message_id: Snowflake, f: impl FnOnce(&StarredRows) -> T) -> RepoResult<T>
    where
        T: Default,
    {
        self.check()?;
        let guilds = self.guilds.read();
        Ok(guilds
            .get(&guild_id)
            .and_then(|rows| rows.get(&message_id))
            .map(f)
            .unwrap_or_default())
    }
}

#[async_trait]
impl ReactionStore for MemoryReactionStore {
    async fn add_star(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        self.check()?;
        let mut guilds = self.guilds.write();
        Ok(guilds
            .entry(guild_id)
            .or_default()
            .entry(message_id)
            .or_default()
            .stars
            .insert(user_id))
    }

    async fn get_stars(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        self.read(guild_id, message_id, |rows| rows.stars.iter().copied().collect())
    }

    async fn get_star_count(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<i64> {
        self.read(guild_id, message_id, |rows| rows.stars.len() as i64)
    }

    async fn is_starring(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        self.read(guild_id, message_id, |rows| rows.stars.contains(&user_id))
    }

    async fn remove_star(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        self.check()?;
        let mut guilds = self.guilds.write();
        let Some(rows) = guilds.get_mut(&guild_id) else {
            return Ok(false);
        };
        let removed = rows
            .get_mut(&message_id)
            .is_some_and(|starred| starred.stars.remove(&user_id));
        if rows.get(&message_id).is_some_and(StarredRows::is_empty) {
            rows.remove(&message_id);
        }
        Ok(removed)
    }

    async fn set_entry(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        entry_id: Snowflake,
    ) -> RepoResult<()> {
        self.check()?;
        let mut guilds = self.guilds.write();
        guilds
            .entry(guild_id)
            .or_default()
            .entry(message_id)
            .or_default()
            .entry_id = Some(entry_id);
        Ok(())
    }

    async fn get_entry(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        self.read(guild_id, message_id, |rows| rows.entry_id)
    }

    async fn find_by_entry(&self, guild_id: Snowflake, entry_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        self.check()?;
        let guilds = self.guilds.read();
        Ok(guilds.get(&guild_id).and_then(|rows| {
            rows.iter()
                .find(|(_, starred)| starred.entry_id == Some(entry_id))
                .map(|(message_id, _)| *message_id)
        }))
    }

    async fn remove_all_entries(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<()> {
        self.check()?;
        if let Some(rows) = self.guilds.write().get_mut(&guild_id) {
            rows.remove(&message_id);
        }
        Ok(())
    }

    async fn remove_all(&self, guild_id: Snowflake) -> RepoResult<u64> {
        self.check()?;
        let removed = self
            .guilds
            .write()
            .remove(&guild_id)
            .map_or(0, |rows| rows.values().map(|r| r.stars.len() as u64).sum());
        Ok(removed)
    }
}

/// In-memory SettingsRepository
#[derive(Debug, Default)]
pub struct MemorySettingsRepository {
    settings: RwLock<HashMap<Snowflake, StarboardSettings>>,
}

impl MemorySettingsRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsRepository for MemorySettingsRepository {
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<StarboardSettings>> {
        Ok(self.settings.read().get(&guild_id).copied())
    }

    async fn find_all(&self) -> RepoResult<Vec<StarboardSettings>> {
        let mut all: Vec<_> = self.settings.read().values().copied().collect();
        all.sort_by_key(|s| s.guild_id);
        Ok(all)
    }

    async fn upsert(&self, settings: &StarboardSettings) -> RepoResult<()> {
        settings.check()?;
        self.settings.write().insert(settings.guild_id, *settings);
        Ok(())
    }

    async fn delete(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.settings.write().remove(&guild_id);
        Ok(())
    }
}
