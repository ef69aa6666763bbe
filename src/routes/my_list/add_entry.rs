use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        CatalogStoreError, MediaAPIError, MyListEntry, MyListStoreError,
        ProfileId, TitleId,
    },
    utils::{auth::get_claims, profile::check_profile_ownership},
};

#[tracing::instrument(name = "Add to my list route handler", skip_all)]
pub async fn add_entry(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<AddToListRequest>,
) -> Result<(StatusCode, CookieJar, Json<MyListEntryResponse>), MediaAPIError>
{
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(request.profile_id);
    let title_id = TitleId::new(request.title_id);

    check_profile_ownership(&state.profile_store, &user_id, &profile_id)
        .await?;

    // Only live catalog entries can be saved.
    state
        .catalog_store
        .read()
        .await
        .get_title(&title_id)
        .await
        .map_err(|e| match e {
            CatalogStoreError::TitleNotFound => {
                MediaAPIError::IDNotFoundError(*title_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    let entry = MyListEntry {
        profile_id,
        title_id,
        added_at: Utc::now(),
    };

    state
        .my_list_store
        .write()
        .await
        .add_entry(entry.clone())
        .await
        .map_err(|e| match e {
            MyListStoreError::EntryExists => {
                MediaAPIError::IDExistsError(*title_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(MyListEntryResponse::from(&entry)),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToListRequest {
    pub profile_id: uuid::Uuid,
    pub title_id: uuid::Uuid,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyListEntryResponse {
    pub profile_id: String,
    pub title_id: String,
    pub added_at: chrono::DateTime<chrono::Utc>,
}

impl From<&MyListEntry> for MyListEntryResponse {
    fn from(entry: &MyListEntry) -> Self {
        Self {
            profile_id: entry.profile_id.as_ref().to_string(),
            title_id: entry.title_id.as_ref().to_string(),
            added_at: entry.added_at,
        }
    }
}
