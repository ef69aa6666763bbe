use axum_extra::extract::CookieJar;
use color_eyre::eyre::eyre;

use crate::{
    app_state::AppState,
    domain::{MediaAPIError, UserRole},
    utils::auth::get_claims,
};

mod episodes;
mod get_title;
mod list_titles;
mod new_title;

pub use episodes::*;
pub use get_title::*;
pub use list_titles::*;
pub use new_title::*;

/// Catalog writes are reserved for administrators.
#[tracing::instrument(name = "Check admin role", skip_all)]
async fn require_admin(
    state: &AppState,
    jar: &CookieJar,
) -> Result<(), MediaAPIError> {
    let claims = get_claims(jar, &state.banned_token_store).await?;

    let user = state
        .user_store
        .read()
        .await
        .get_user_by_id(&claims.id)
        .await
        .map_err(|e| MediaAPIError::UnexpectedError(eyre!(e)))?;

    if user.role != UserRole::Admin {
        return Err(MediaAPIError::Forbidden);
    }

    Ok(())
}
