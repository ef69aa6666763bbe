use color_eyre::eyre::eyre;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    MyListEntry, MyListStore, MyListStoreError, ProfileId, TitleId,
};

pub struct PostgresMyListStore {
    pool: PgPool,
}

impl PostgresMyListStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MyListStore for PostgresMyListStore {
    #[tracing::instrument(
        name = "Adding my-list entry to PostgreSQL",
        skip_all
    )]
    async fn add_entry(
        &mut self,
        entry: MyListEntry,
    ) -> Result<(), MyListStoreError> {
        sqlx::query(
            r#"
            INSERT INTO my_list (profile_id, title_id, added_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(entry.profile_id.as_ref())
        .bind(entry.title_id.as_ref())
        .bind(entry.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                MyListStoreError::EntryExists
            }
            err => MyListStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(
        name = "Removing my-list entry from PostgreSQL",
        skip_all
    )]
    async fn remove_entry(
        &mut self,
        profile_id: &ProfileId,
        title_id: &TitleId,
    ) -> Result<(), MyListStoreError> {
        let result = sqlx::query(
            r#"
            DELETE FROM my_list WHERE profile_id = $1 AND title_id = $2
            "#,
        )
        .bind(profile_id.as_ref())
        .bind(title_id.as_ref())
        .execute(&self.pool)
        .await
        .map_err(|e| MyListStoreError::UnexpectedError(eyre!(e)))?;

        if result.rows_affected() == 0 {
            return Err(MyListStoreError::EntryNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(
        name = "Listing my-list entries from PostgreSQL",
        skip_all
    )]
    async fn get_entries(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<MyListEntry>, MyListStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT profile_id, title_id, added_at
            FROM my_list
            WHERE profile_id = $1
            ORDER BY added_at DESC
            "#,
        )
        .bind(profile_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MyListStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(entry_from_row).collect()
    }
}

fn entry_from_row(row: &PgRow) -> Result<MyListEntry, MyListStoreError> {
    let profile_id: uuid::Uuid = row
        .try_get("profile_id")
        .map_err(|e| MyListStoreError::UnexpectedError(eyre!(e)))?;
    let title_id: uuid::Uuid = row
        .try_get("title_id")
        .map_err(|e| MyListStoreError::UnexpectedError(eyre!(e)))?;

    Ok(MyListEntry {
        profile_id: ProfileId::new(profile_id),
        title_id: TitleId::new(title_id),
        added_at: row
            .try_get("added_at")
            .map_err(|e| MyListStoreError::UnexpectedError(eyre!(e)))?,
    })
}
