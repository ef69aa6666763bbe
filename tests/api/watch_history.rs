use crate::helpers::{
    default_profile_id, get_json_response_body, get_session,
    promote_to_admin, seed_title, TestApp,
};
use test_context::test_context;

async fn session_with_title(app: &TestApp) -> (String, String) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;
    let title_id = seed_title(app, "Something to watch").await;
    let profile_id = default_profile_id(app).await;
    (profile_id, title_id)
}

#[test_context(TestApp)]
#[tokio::test]
async fn progress_is_recorded_and_listed(app: &mut TestApp) {
    let (profile_id, title_id) = session_with_title(app).await;

    let response = app
        .post_watch_history(&serde_json::json!({
            "profileId": profile_id,
            "titleId": title_id,
            "watchedPercentage": 12.5,
            "positionSeconds": 540
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.get_watch_history(&profile_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let entries = get_json_response_body(response).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["watchedPercentage"], 12.5);
    assert_eq!(entries[0]["completed"], false);
}

/*
 * One row per (profile, title, episode): reporting progress twice moves
 * the row instead of adding another.
 */
#[test_context(TestApp)]
#[tokio::test]
async fn repeated_reports_update_the_same_entry(app: &mut TestApp) {
    let (profile_id, title_id) = session_with_title(app).await;

    for (percentage, position) in [(10.0, 400), (55.0, 2300)] {
        let response = app
            .post_watch_history(&serde_json::json!({
                "profileId": profile_id,
                "titleId": title_id,
                "watchedPercentage": percentage,
                "positionSeconds": position
            }))
            .await;
        assert_eq!(response.status().as_u16(), 200);
    }

    let response = app.get_watch_history(&profile_id).await;
    let entries = get_json_response_body(response).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["watchedPercentage"], 55.0);
    assert_eq!(entries[0]["positionSeconds"], 2300);
}

#[test_context(TestApp)]
#[tokio::test]
async fn continue_watching_skips_completed_entries(app: &mut TestApp) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;
    let profile_id = default_profile_id(app).await;
    let finished = seed_title(app, "Finished film").await;
    let in_progress = seed_title(app, "Half-watched film").await;

    app.post_watch_history(&serde_json::json!({
        "profileId": profile_id,
        "titleId": finished,
        "watchedPercentage": 100.0,
        "positionSeconds": 7200,
        "completed": true
    }))
    .await;
    app.post_watch_history(&serde_json::json!({
        "profileId": profile_id,
        "titleId": in_progress,
        "watchedPercentage": 48.0,
        "positionSeconds": 3500
    }))
    .await;

    let response = app.get_continue_watching(&profile_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let entries = get_json_response_body(response).await;
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["titleId"], in_progress);
}

#[test_context(TestApp)]
#[tokio::test]
async fn out_of_range_percentage_is_rejected(app: &mut TestApp) {
    let (profile_id, title_id) = session_with_title(app).await;

    for percentage in [-1.0, 100.5] {
        let response = app
            .post_watch_history(&serde_json::json!({
                "profileId": profile_id,
                "titleId": title_id,
                "watchedPercentage": percentage,
                "positionSeconds": 0
            }))
            .await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for percentage: {percentage}"
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn episode_progress_is_tracked_separately(app: &mut TestApp) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;
    let profile_id = default_profile_id(app).await;
    let title_id = seed_title(app, "A Series").await;

    let response = app
        .post_episode(
            &title_id,
            &serde_json::json!({
                "name": "Pilot",
                "seasonNumber": 1,
                "episodeNumber": 1,
                "durationMinutes": 42
            }),
        )
        .await;
    let episode = get_json_response_body(response).await;
    let episode_id = episode["id"].as_str().unwrap();

    // Title-level and episode-level progress are separate rows.
    app.post_watch_history(&serde_json::json!({
        "profileId": profile_id,
        "titleId": title_id,
        "watchedPercentage": 5.0,
        "positionSeconds": 120
    }))
    .await;
    app.post_watch_history(&serde_json::json!({
        "profileId": profile_id,
        "titleId": title_id,
        "episodeId": episode_id,
        "watchedPercentage": 80.0,
        "positionSeconds": 2000
    }))
    .await;

    let response = app.get_watch_history(&profile_id).await;
    let entries = get_json_response_body(response).await;
    assert_eq!(entries.as_array().unwrap().len(), 2);
}
