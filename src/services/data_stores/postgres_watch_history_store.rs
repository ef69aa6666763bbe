use color_eyre::eyre::eyre;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    EpisodeId, ProfileId, TitleId, WatchEntry, WatchHistoryStore,
    WatchHistoryStoreError, WatchedPercentage,
};

pub struct PostgresWatchHistoryStore {
    pool: PgPool,
}

impl PostgresWatchHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl WatchHistoryStore for PostgresWatchHistoryStore {
    #[tracing::instrument(
        name = "Upserting watch history entry in PostgreSQL",
        skip_all
    )]
    async fn record(
        &mut self,
        entry: WatchEntry,
    ) -> Result<(), WatchHistoryStoreError> {
        // episode_id is part of the uniqueness key; NULLs never collide
        // under a plain UNIQUE constraint, so the index uses a sentinel
        // expression (see migration) and the upsert matches on it.
        sqlx::query(
            r#"
            INSERT INTO watch_history
                (profile_id, title_id, episode_id, watched_percentage,
                 position_seconds, completed, last_watched)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (profile_id, title_id,
                         COALESCE(episode_id, '00000000-0000-0000-0000-000000000000'::uuid))
            DO UPDATE SET
                watched_percentage = EXCLUDED.watched_percentage,
                position_seconds = EXCLUDED.position_seconds,
                completed = EXCLUDED.completed,
                last_watched = EXCLUDED.last_watched
            "#,
        )
        .bind(entry.profile_id.as_ref())
        .bind(entry.title_id.as_ref())
        .bind(entry.episode_id.as_ref().map(|id| *id.as_ref()))
        .bind(entry.watched_percentage.value_of())
        .bind(entry.position_seconds)
        .bind(entry.completed)
        .bind(entry.last_watched)
        .execute(&self.pool)
        .await
        .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?;

        Ok(())
    }

    #[tracing::instrument(
        name = "Listing watch history from PostgreSQL",
        skip_all
    )]
    async fn get_history(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<WatchEntry>, WatchHistoryStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT profile_id, title_id, episode_id, watched_percentage,
                   position_seconds, completed, last_watched
            FROM watch_history
            WHERE profile_id = $1
            ORDER BY last_watched DESC
            "#,
        )
        .bind(profile_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(entry_from_row).collect()
    }

    #[tracing::instrument(
        name = "Listing continue-watching entries from PostgreSQL",
        skip_all
    )]
    async fn get_continue_watching(
        &self,
        profile_id: &ProfileId,
        limit: i64,
    ) -> Result<Vec<WatchEntry>, WatchHistoryStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT profile_id, title_id, episode_id, watched_percentage,
                   position_seconds, completed, last_watched
            FROM watch_history
            WHERE profile_id = $1 AND completed = FALSE
            ORDER BY last_watched DESC
            LIMIT $2
            "#,
        )
        .bind(profile_id.as_ref())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(entry_from_row).collect()
    }

    #[tracing::instrument(
        name = "Retrieving watch history entry from PostgreSQL",
        skip_all
    )]
    async fn get_entry(
        &self,
        profile_id: &ProfileId,
        title_id: &TitleId,
        episode_id: Option<&EpisodeId>,
    ) -> Result<WatchEntry, WatchHistoryStoreError> {
        sqlx::query(
            r#"
            SELECT profile_id, title_id, episode_id, watched_percentage,
                   position_seconds, completed, last_watched
            FROM watch_history
            WHERE profile_id = $1 AND title_id = $2
              AND episode_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(profile_id.as_ref())
        .bind(title_id.as_ref())
        .bind(episode_id.map(|id| *id.as_ref()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => WatchHistoryStoreError::EntryNotFound,
            err => WatchHistoryStoreError::UnexpectedError(eyre!(err)),
        })
        .map(|row| entry_from_row(&row))?
    }
}

fn entry_from_row(row: &PgRow) -> Result<WatchEntry, WatchHistoryStoreError> {
    let profile_id: uuid::Uuid = row
        .try_get("profile_id")
        .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?;
    let title_id: uuid::Uuid = row
        .try_get("title_id")
        .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?;
    let episode_id: Option<uuid::Uuid> = row
        .try_get("episode_id")
        .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?;
    let watched_percentage: f64 = row
        .try_get("watched_percentage")
        .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?;

    Ok(WatchEntry {
        profile_id: ProfileId::new(profile_id),
        title_id: TitleId::new(title_id),
        episode_id: episode_id.map(EpisodeId::new),
        watched_percentage: WatchedPercentage::parse(watched_percentage)
            .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?,
        position_seconds: row
            .try_get("position_seconds")
            .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?,
        completed: row
            .try_get("completed")
            .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?,
        last_watched: row
            .try_get("last_watched")
            .map_err(|e| WatchHistoryStoreError::UnexpectedError(eyre!(e)))?,
    })
}
