use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    app_state::AppState,
    domain::{MediaAPIError, ProfileId, ProfileName, ProfileStoreError},
    utils::auth::get_claims,
};

use super::create_profile::ProfileResponse;

#[tracing::instrument(name = "Update profile route handler", skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(profile_id): Path<uuid::Uuid>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<(StatusCode, CookieJar, Json<ProfileResponse>), MediaAPIError> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let profile_id = ProfileId::new(profile_id);

    let mut profile = state
        .profile_store
        .read()
        .await
        .get_profile(&user_id, &profile_id)
        .await
        .map_err(|e| match e {
            ProfileStoreError::ProfileNotFound => {
                MediaAPIError::IDNotFoundError(*profile_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    if let Some(name) = request.name {
        profile.name = ProfileName::parse(name)?;
    }
    if let Some(avatar_url) = request.avatar_url {
        profile.avatar_url = avatar_url;
    }
    if let Some(is_kids) = request.is_kids {
        profile.is_kids = is_kids;
    }
    if let Some(maturity_level) = request.maturity_level {
        profile.maturity_level = maturity_level;
    }
    if profile.is_kids {
        profile.maturity_level = "Kids".to_string();
    }

    state
        .profile_store
        .write()
        .await
        .update_profile(&profile)
        .await
        .map_err(|e| match e {
            ProfileStoreError::ProfileNotFound => {
                MediaAPIError::IDNotFoundError(*profile_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((StatusCode::OK, jar, Json(ProfileResponse::from(&profile))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub is_kids: Option<bool>,
    pub maturity_level: Option<String>,
}
