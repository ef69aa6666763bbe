use color_eyre::eyre::eyre;

use crate::{
    app_state::ProfileStoreType,
    domain::{MediaAPIError, ProfileId, ProfileStoreError, UserId},
};

/// Confirms the profile exists, is live, and belongs to the caller.
#[tracing::instrument(name = "Check profile ownership", skip_all)]
pub async fn check_profile_ownership(
    profile_store: &ProfileStoreType,
    user_id: &UserId,
    profile_id: &ProfileId,
) -> Result<(), MediaAPIError> {
    profile_store
        .read()
        .await
        .get_profile(user_id, profile_id)
        .await
        .map_err(|e| match e {
            ProfileStoreError::ProfileNotFound => {
                MediaAPIError::IDNotFoundError(*profile_id.as_ref())
            }
            e => MediaAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok(())
}
