//! PostgreSQL implementation of SettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use star_core::entities::StarboardSettings;
use star_core::traits::{RepoResult, SettingsRepository};
use star_core::value_objects::Snowflake;

use crate::models::SettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SettingsRepository
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    /// Create a new PgSettingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<StarboardSettings>> {
        let row = sqlx::query_as::<_, SettingsModel>(
            r#"
            SELECT guild_id, channel_id, threshold, updated_at
            FROM starboard_settings
            WHERE guild_id = $1
            "#,
        )
        .bind(guild_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(StarboardSettings::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<StarboardSettings>> {
        let rows = sqlx::query_as::<_, SettingsModel>(
            r#"
            SELECT guild_id, channel_id, threshold, updated_at
            FROM starboard_settings
            ORDER BY guild_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(StarboardSettings::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn upsert(&self, settings: &StarboardSettings) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO starboard_settings (guild_id, channel_id, threshold, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (guild_id) DO UPDATE
            SET channel_id = EXCLUDED.channel_id,
                threshold = EXCLUDED.threshold,
                updated_at = NOW()
            "#,
        )
        .bind(settings.guild_id.into_inner())
        .bind(settings.channel_id.map(Snowflake::into_inner))
        .bind(settings.threshold)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake) -> RepoResult<()> {
        sqlx::query("DELETE FROM starboard_settings WHERE guild_id = $1")
            .bind(guild_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
