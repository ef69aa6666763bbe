use color_eyre::eyre::eyre;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::{
    CatalogStore, CatalogStoreError, Episode, EpisodeId, Title, TitleFilter,
    TitleId, TitleKind, TitleName,
};

pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[tracing::instrument(name = "Adding title to PostgreSQL", skip_all)]
    async fn add_title(
        &mut self,
        title: Title,
    ) -> Result<(), CatalogStoreError> {
        sqlx::query(
            r#"
            INSERT INTO titles
                (id, name, description, release_year, kind, genre,
                 maturity_rating, thumbnail_url, video_url, total_seasons)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(title.id.as_ref())
        .bind(title.name.as_ref())
        .bind(&title.description)
        .bind(title.release_year)
        .bind(title.kind.as_str())
        .bind(&title.genre)
        .bind(&title.maturity_rating)
        .bind(&title.thumbnail_url)
        .bind(&title.video_url)
        .bind(title.total_seasons)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CatalogStoreError::TitleExists
            }
            err => CatalogStoreError::UnexpectedError(eyre!(err)),
        })?;
        Ok(())
    }

    #[tracing::instrument(name = "Listing titles from PostgreSQL", skip_all)]
    async fn list_titles(
        &self,
        filter: &TitleFilter,
    ) -> Result<Vec<Title>, CatalogStoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, release_year, kind, genre,
                   maturity_rating, thumbnail_url, video_url, total_seasons,
                   deleted_at
            FROM titles
            WHERE deleted_at IS NULL
              AND ($1::text IS NULL OR genre = $1)
              AND ($2::text IS NULL OR kind = $2)
            ORDER BY name
            "#,
        )
        .bind(filter.genre.as_deref())
        .bind(filter.kind.map(|kind| kind.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(title_from_row).collect()
    }

    #[tracing::instrument(
        name = "Retrieving title from PostgreSQL",
        skip_all
    )]
    async fn get_title(
        &self,
        title_id: &TitleId,
    ) -> Result<Title, CatalogStoreError> {
        sqlx::query(
            r#"
            SELECT id, name, description, release_year, kind, genre,
                   maturity_rating, thumbnail_url, video_url, total_seasons,
                   deleted_at
            FROM titles
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(title_id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => CatalogStoreError::TitleNotFound,
            err => CatalogStoreError::UnexpectedError(eyre!(err)),
        })
        .map(|row| title_from_row(&row))?
    }

    #[tracing::instrument(name = "Adding episode to PostgreSQL", skip_all)]
    async fn add_episode(
        &mut self,
        episode: Episode,
    ) -> Result<(), CatalogStoreError> {
        // The parent must still be live; a foreign key alone would accept
        // episodes under a soft-deleted title.
        self.get_title(&episode.title_id).await?;

        sqlx::query(
            r#"
            INSERT INTO episodes
                (id, title_id, name, season_number, episode_number,
                 duration_minutes, video_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(episode.id.as_ref())
        .bind(episode.title_id.as_ref())
        .bind(episode.name.as_ref())
        .bind(episode.season_number)
        .bind(episode.episode_number)
        .bind(episode.duration_minutes)
        .bind(&episode.video_url)
        .execute(&self.pool)
        .await
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;
        Ok(())
    }

    #[tracing::instrument(
        name = "Listing episodes from PostgreSQL",
        skip_all
    )]
    async fn get_episodes(
        &self,
        title_id: &TitleId,
    ) -> Result<Vec<Episode>, CatalogStoreError> {
        self.get_title(title_id).await?;

        let rows = sqlx::query(
            r#"
            SELECT id, title_id, name, season_number, episode_number,
                   duration_minutes, video_url
            FROM episodes
            WHERE title_id = $1
            ORDER BY season_number, episode_number
            "#,
        )
        .bind(title_id.as_ref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;

        rows.iter().map(episode_from_row).collect()
    }
}

fn title_from_row(row: &PgRow) -> Result<Title, CatalogStoreError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;
    let kind: String = row
        .try_get("kind")
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;

    Ok(Title {
        id: TitleId::new(id),
        name: TitleName::parse(name)
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        description: row
            .try_get("description")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        release_year: row
            .try_get("release_year")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        kind: TitleKind::parse(&kind)
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        genre: row
            .try_get("genre")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        maturity_rating: row
            .try_get("maturity_rating")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        thumbnail_url: row
            .try_get("thumbnail_url")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        video_url: row
            .try_get("video_url")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        total_seasons: row
            .try_get("total_seasons")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        deleted_at: row
            .try_get("deleted_at")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
    })
}

fn episode_from_row(row: &PgRow) -> Result<Episode, CatalogStoreError> {
    let id: uuid::Uuid = row
        .try_get("id")
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;
    let title_id: uuid::Uuid = row
        .try_get("title_id")
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?;

    Ok(Episode {
        id: EpisodeId::new(id),
        title_id: TitleId::new(title_id),
        name: TitleName::parse(name)
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        season_number: row
            .try_get("season_number")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        episode_number: row
            .try_get("episode_number")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        duration_minutes: row
            .try_get("duration_minutes")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
        video_url: row
            .try_get("video_url")
            .map_err(|e| CatalogStoreError::UnexpectedError(eyre!(e)))?,
    })
}
