use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{
        MediaAPIError, Profile, ProfileName, MAX_PROFILES_PER_USER,
    },
    utils::auth::get_claims,
};

#[tracing::instrument(name = "Create profile route handler", skip_all)]
pub async fn create_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CreateProfileRequest>,
) -> Result<(StatusCode, CookieJar, Json<ProfileResponse>), MediaAPIError> {
    let user_id = get_claims(&jar, &state.banned_token_store).await?.id;
    let name = ProfileName::parse(request.name)?;

    let existing = state
        .profile_store
        .read()
        .await
        .get_profiles(&user_id)
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;
    if existing.len() >= MAX_PROFILES_PER_USER {
        return Err(MediaAPIError::ProfileLimitReached);
    }

    let profile = Profile::new(
        user_id,
        name,
        request.avatar_url,
        request.is_kids,
        request
            .maturity_level
            .unwrap_or_else(|| "All Ages".to_string()),
    );

    state
        .profile_store
        .write()
        .await
        .add_profile(profile.clone())
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ProfileResponse::from(&profile)),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub name: String,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub is_kids: bool,
    pub maturity_level: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub avatar_url: String,
    pub is_kids: bool,
    pub maturity_level: String,
}

impl From<&Profile> for ProfileResponse {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.as_ref().to_string(),
            name: profile.name.as_ref().to_owned(),
            avatar_url: profile.avatar_url.clone(),
            is_kids: profile.is_kids,
            maturity_level: profile.maturity_level.clone(),
        }
    }
}
