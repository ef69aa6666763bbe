use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{MediaAPIError, TitleFilter, TitleKind},
    utils::auth::get_claims,
};

use super::new_title::TitleResponse;

#[derive(Deserialize)]
pub struct QueryParams {
    genre: Option<String>,
    kind: Option<String>,
}

#[tracing::instrument(name = "List titles route handler", skip_all)]
pub async fn list_titles(
    State(state): State<AppState>,
    jar: CookieJar,
    query_params: Query<QueryParams>,
) -> Result<(StatusCode, CookieJar, Json<Vec<TitleResponse>>), MediaAPIError> {
    get_claims(&jar, &state.banned_token_store).await?;

    let kind = query_params
        .kind
        .as_deref()
        .map(TitleKind::parse)
        .transpose()?;

    let filter = TitleFilter {
        genre: query_params.genre.clone(),
        kind,
    };

    let titles = state
        .catalog_store
        .read()
        .await
        .list_titles(&filter)
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    let response =
        titles.iter().map(TitleResponse::from).collect::<Vec<_>>();

    Ok((StatusCode::OK, jar, Json(response)))
}
