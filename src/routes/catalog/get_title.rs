use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{CatalogStoreError, MediaAPIError, TitleId},
    utils::auth::get_claims,
};

use super::new_title::TitleResponse;

#[tracing::instrument(name = "Get title route handler", skip_all)]
pub async fn get_title(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(title_id): Path<uuid::Uuid>,
) -> Result<(StatusCode, CookieJar, Json<TitleResponse>), MediaAPIError> {
    get_claims(&jar, &state.banned_token_store).await?;
    let title_id = TitleId::new(title_id);

    let title = state
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

    Ok((StatusCode::OK, jar, Json(TitleResponse::from(&title))))
}
