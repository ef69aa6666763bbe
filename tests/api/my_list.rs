use crate::helpers::{
    default_profile_id, get_json_response_body, get_session,
    promote_to_admin, seed_title, TestApp,
};
use test_context::test_context;
use uuid::Uuid;

async fn session_with_title(app: &TestApp) -> (String, String) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;
    let title_id = seed_title(app, "Saved for later").await;
    let profile_id = default_profile_id(app).await;
    (profile_id, title_id)
}

#[test_context(TestApp)]
#[tokio::test]
async fn add_list_and_remove_round_trip(app: &mut TestApp) {
    let (profile_id, title_id) = session_with_title(app).await;

    let response = app
        .post_my_list(&serde_json::json!({
            "profileId": profile_id,
            "titleId": title_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app.get_my_list(&profile_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let entries = get_json_response_body(response).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["titleId"], title_id);

    let response = app.delete_my_list(&profile_id, &title_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get_my_list(&profile_id).await;
    let entries = get_json_response_body(response).await;
    assert!(entries.as_array().unwrap().is_empty());
}

#[test_context(TestApp)]
#[tokio::test]
async fn saving_the_same_title_twice_conflicts(app: &mut TestApp) {
    let (profile_id, title_id) = session_with_title(app).await;
    let request = serde_json::json!({
        "profileId": profile_id,
        "titleId": title_id
    });

    assert_eq!(app.post_my_list(&request).await.status().as_u16(), 201);
    assert_eq!(app.post_my_list(&request).await.status().as_u16(), 409);
}

#[test_context(TestApp)]
#[tokio::test]
async fn removing_an_absent_entry_is_a_404(app: &mut TestApp) {
    let (profile_id, title_id) = session_with_title(app).await;

    let response = app.delete_my_list(&profile_id, &title_id).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_title_cannot_be_saved(app: &mut TestApp) {
    get_session(app).await;
    let profile_id = default_profile_id(app).await;

    let response = app
        .post_my_list(&serde_json::json!({
            "profileId": profile_id,
            "titleId": Uuid::new_v4().to_string()
        }))
        .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn foreign_profiles_are_rejected(app: &mut TestApp) {
    let (profile_id, title_id) = session_with_title(app).await;

    app.post_logout().await;
    get_session(app).await;

    let response = app
        .post_my_list(&serde_json::json!({
            "profileId": profile_id,
            "titleId": title_id
        }))
        .await;
    assert_eq!(response.status().as_u16(), 404);

    let response = app.get_my_list(&profile_id).await;
    assert_eq!(response.status().as_u16(), 404);
}
