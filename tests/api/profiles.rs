use crate::helpers::{
    default_profile_id, get_json_response_body, get_session, TestApp,
};
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn profiles_require_a_session(app: &mut TestApp) {
    let response = app.get_profiles().await;
    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestApp)]
#[tokio::test]
async fn create_and_list_profiles(app: &mut TestApp) {
    get_session(app).await;

    let response = app
        .post_profile(&serde_json::json!({
            "name": "Kids corner",
            "isKids": true
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let body = get_json_response_body(response).await;
    assert_eq!(body["name"], "Kids corner");
    assert_eq!(body["isKids"], true);
    assert_eq!(body["maturityLevel"], "Kids");

    let response = app.get_profiles().await;
    let profiles = get_json_response_body(response).await;
    let profiles = profiles.as_array().unwrap();
    // The default profile plus the new one.
    assert_eq!(profiles.len(), 2);
}

#[test_context(TestApp)]
#[tokio::test]
async fn profile_count_is_capped(app: &mut TestApp) {
    get_session(app).await;

    // One default profile exists; four more fills the quota.
    for i in 0..4 {
        let response = app
            .post_profile(&serde_json::json!({
                "name": format!("Profile {i}")
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let response = app
        .post_profile(&serde_json::json!({ "name": "One too many" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn update_renames_a_profile(app: &mut TestApp) {
    get_session(app).await;
    let profile_id = default_profile_id(app).await;

    let response = app
        .put_profile(
            &profile_id,
            &serde_json::json!({ "name": "Renamed" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body["name"], "Renamed");
}

#[test_context(TestApp)]
#[tokio::test]
async fn deleted_profile_disappears_from_the_list(app: &mut TestApp) {
    get_session(app).await;
    let profile_id = default_profile_id(app).await;

    let response = app.delete_profile(&profile_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get_profiles().await;
    let profiles = get_json_response_body(response).await;
    assert!(profiles.as_array().unwrap().is_empty());

    // Deleting it again is a 404.
    let response = app.delete_profile(&profile_id).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn profiles_are_scoped_to_their_owner(app: &mut TestApp) {
    get_session(app).await;
    let foreign_profile_id = default_profile_id(app).await;

    // A different user cannot touch the first user's profile.
    app.post_logout().await;
    get_session(app).await;

    let response = app
        .put_profile(
            &foreign_profile_id,
            &serde_json::json!({ "name": "Hijacked" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.delete_profile(&foreign_profile_id).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn empty_profile_name_is_rejected(app: &mut TestApp) {
    get_session(app).await;

    let response = app
        .post_profile(&serde_json::json!({ "name": "" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}
