//! PostgreSQL implementation of ReactionStore

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use star_core::entities::StarReaction;
use star_core::traits::{ReactionStore, RepoResult};
use star_core::value_objects::Snowflake;

use crate::models::{StarEntryModel, StarReactionModel};

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionStore
#[derive(Clone)]
pub struct PgReactionStore {
    pool: PgPool,
}

impl PgReactionStore {
    /// Create a new PgReactionStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionStore for PgReactionStore {
    #[instrument(skip(self))]
    async fn add_star(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO star_reactions (guild_id, message_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id, message_id, user_id) DO NOTHING
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn get_stars(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        let rows = sqlx::query_as::<_, StarReactionModel>(
            r#"
            SELECT guild_id, message_id, user_id, created_at
            FROM star_reactions
            WHERE guild_id = $1 AND message_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(StarReaction::from)
            .map(|star| star.user_id)
            .collect())
    }

    #[instrument(skip(self))]
    async fn get_star_count(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM star_reactions WHERE guild_id = $1 AND message_id = $2
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn is_starring(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM star_reactions
                WHERE guild_id = $1 AND message_id = $2 AND user_id = $3
            )
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn remove_star(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM star_reactions WHERE guild_id = $1 AND message_id = $2 AND user_id = $3
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn set_entry(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        entry_id: Snowflake,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO star_entries (guild_id, message_id, entry_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (guild_id, message_id) DO UPDATE SET entry_id = EXCLUDED.entry_id
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .bind(entry_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_entry(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        let row = sqlx::query_as::<_, StarEntryModel>(
            r#"
            SELECT guild_id, message_id, entry_id, created_at
            FROM star_entries
            WHERE guild_id = $1 AND message_id = $2
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(message_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(row.map(|r| Snowflake::new(r.entry_id)))
    }

    #[instrument(skip(self))]
    async fn find_by_entry(&self, guild_id: Snowflake, entry_id: Snowflake) -> RepoResult<Option<Snowflake>> {
        let message_id = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT message_id FROM star_entries WHERE guild_id = $1 AND entry_id = $2
            "#,
        )
        .bind(guild_id.into_inner())
        .bind(entry_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(message_id.map(Snowflake::new))
    }

    #[instrument(skip(self))]
    async fn remove_all_entries(&self, guild_id: Snowflake, message_id: Snowflake) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM star_reactions WHERE guild_id = $1 AND message_id = $2")
            .bind(guild_id.into_inner())
            .bind(message_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        sqlx::query("DELETE FROM star_entries WHERE guild_id = $1 AND message_id = $2")
            .bind(guild_id.into_inner())
            .bind(message_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn remove_all(&self, guild_id: Snowflake) -> RepoResult<u64> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query("DELETE FROM star_reactions WHERE guild_id = $1")
            .bind(guild_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();

        sqlx::query("DELETE FROM star_entries WHERE guild_id = $1")
            .bind(guild_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(removed)
    }
}
