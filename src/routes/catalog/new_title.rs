use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        CatalogStoreError, MediaAPIError, Title, TitleId, TitleKind,
        TitleName,
    },
};

use super::require_admin;

#[tracing::instrument(name = "Create title route handler", skip_all)]
pub async fn new_title(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<NewTitleRequest>,
) -> Result<(StatusCode, CookieJar, Json<TitleResponse>), MediaAPIError> {
    require_admin(&state, &jar).await?;

    let title = Title {
        id: TitleId::default(),
        name: TitleName::parse(request.name)?,
        description: request.description,
        release_year: request.release_year,
        kind: TitleKind::parse(&request.kind)?,
        genre: request.genre,
        maturity_rating: request.maturity_rating,
        thumbnail_url: request.thumbnail_url.unwrap_or_default(),
        video_url: request.video_url.unwrap_or_default(),
        total_seasons: request.total_seasons,
        deleted_at: None,
    };

    state
        .catalog_store
        .write()
        .await
        .add_title(title.clone())
        .await
        .map_err(|e| match e {
            CatalogStoreError::TitleExists => {
                MediaAPIError::IDExistsError(*title.id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((StatusCode::CREATED, jar, Json(TitleResponse::from(&title))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTitleRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_year: i32,
    pub kind: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub maturity_rating: String,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub total_seasons: Option<i32>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub release_year: i32,
    pub kind: TitleKind,
    pub genre: String,
    pub maturity_rating: String,
    pub thumbnail_url: String,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_seasons: Option<i32>,
}

impl From<&Title> for TitleResponse {
    fn from(title: &Title) -> Self {
        Self {
            id: title.id.as_ref().to_string(),
            name: title.name.as_ref().to_owned(),
            description: title.description.clone(),
            release_year: title.release_year,
            kind: title.kind,
            genre: title.genre.clone(),
            maturity_rating: title.maturity_rating.clone(),
            thumbnail_url: title.thumbnail_url.clone(),
            video_url: title.video_url.clone(),
            total_seasons: title.total_seasons,
        }
    }
}
