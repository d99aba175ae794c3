//! Entry poster that writes entries to the log

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;

use star_core::{DomainError, EntryContent, EntryPoster, Snowflake, SnowflakeGenerator};

/// Poster that "publishes" entries as log lines
///
/// Entry ids come from the process snowflake generator. Live entries are
/// remembered so edits and deletes of unknown ids fail like a real backend.
#[derive(Debug)]
pub struct LogEntryPoster {
    ids: SnowflakeGenerator,
    live: DashMap<Snowflake, Snowflake>,
}

impl LogEntryPoster {
    pub fn new(ids: SnowflakeGenerator) -> Self {
        Self {
            ids,
            live: DashMap::new(),
        }
    }

    /// Number of entries currently posted
    pub fn live_entries(&self) -> usize {
        self.live.len()
    }
}

#[async_trait]
impl EntryPoster for LogEntryPoster {
    async fn post(&self, channel_id: Snowflake, content: &EntryContent) -> Result<Snowflake, DomainError> {
        let entry_id = self.ids.generate();
        self.live.insert(entry_id, channel_id);
        info!(
            channel = %channel_id.channel_mention(),
            %entry_id,
            content = %content.content,
            "Entry posted"
        );
        Ok(entry_id)
    }

    async fn edit(&self, entry_id: Snowflake, content: &EntryContent) -> Result<(), DomainError> {
        let Some(channel_id) = self.live.get(&entry_id).map(|entry| *entry.value()) else {
            return Err(DomainError::PostFault(format!("unknown entry {entry_id}")));
        };
        info!(
            channel = %channel_id.channel_mention(),
            %entry_id,
            content = %content.content,
            "Entry edited"
        );
        Ok(())
    }

    async fn delete(&self, entry_id: Snowflake) -> Result<(), DomainError> {
        match self.live.remove(&entry_id) {
            Some((_, channel_id)) => {
                info!(channel = %channel_id.channel_mention(), %entry_id, "Entry deleted");
                Ok(())
            }
            None => Err(DomainError::PostFault(format!("unknown entry {entry_id}"))),
        }
    }
}
