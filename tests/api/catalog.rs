use crate::helpers::{
    get_json_response_body, get_session, promote_to_admin, seed_title,
    TestApp,
};
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestApp)]
#[tokio::test]
async fn catalog_requires_a_session(app: &mut TestApp) {
    let response = app.get_titles().await;
    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestApp)]
#[tokio::test]
async fn only_admins_can_create_titles(app: &mut TestApp) {
    get_session(app).await;

    let response = app
        .post_title(&serde_json::json!({
            "name": "Forbidden",
            "releaseYear": 2020,
            "kind": "Movie"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[test_context(TestApp)]
#[tokio::test]
async fn admin_creates_and_everyone_browses(app: &mut TestApp) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;

    let title_id = seed_title(app, "The Long Quiet").await;

    let response = app.get_titles().await;
    assert_eq!(response.status().as_u16(), 200);
    let titles = get_json_response_body(response).await;
    let titles = titles.as_array().unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0]["name"], "The Long Quiet");

    let response = app.get_title(&title_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body["id"], title_id);
    assert_eq!(body["kind"], "Movie");
}

#[test_context(TestApp)]
#[tokio::test]
async fn listing_filters_by_genre_and_kind(app: &mut TestApp) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;

    app.post_title(&serde_json::json!({
        "name": "A Drama",
        "releaseYear": 2019,
        "kind": "Movie",
        "genre": "Drama"
    }))
    .await;
    app.post_title(&serde_json::json!({
        "name": "A Comedy Series",
        "releaseYear": 2022,
        "kind": "Series",
        "genre": "Comedy",
        "totalSeasons": 2
    }))
    .await;

    let response =
        app.get_titles_filtered(&[("genre", "Comedy")]).await;
    let titles = get_json_response_body(response).await;
    let titles = titles.as_array().unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0]["name"], "A Comedy Series");

    let response = app.get_titles_filtered(&[("kind", "Movie")]).await;
    let titles = get_json_response_body(response).await;
    let titles = titles.as_array().unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0]["name"], "A Drama");

    let response = app.get_titles_filtered(&[("kind", "Documentary")]).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_title_is_a_404(app: &mut TestApp) {
    get_session(app).await;

    let response = app.get_title(&Uuid::new_v4().to_string()).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[test_context(TestApp)]
#[tokio::test]
async fn episodes_hang_off_their_title(app: &mut TestApp) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;
    let title_id = seed_title(app, "A Series").await;

    for episode_number in 1..=2 {
        let response = app
            .post_episode(
                &title_id,
                &serde_json::json!({
                    "name": format!("Episode {episode_number}"),
                    "seasonNumber": 1,
                    "episodeNumber": episode_number,
                    "durationMinutes": 42
                }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
    }

    let response = app.get_episodes(&title_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let episodes = get_json_response_body(response).await;
    let episodes = episodes.as_array().unwrap();
    assert_eq!(episodes.len(), 2);
    assert_eq!(episodes[0]["episodeNumber"], 1);
    assert_eq!(episodes[1]["episodeNumber"], 2);
}

#[test_context(TestApp)]
#[tokio::test]
async fn episode_under_unknown_title_is_a_404(app: &mut TestApp) {
    let email = get_session(app).await;
    promote_to_admin(app, &email).await;

    let response = app
        .post_episode(
            &Uuid::new_v4().to_string(),
            &serde_json::json!({
                "name": "Orphan",
                "seasonNumber": 1,
                "episodeNumber": 1,
                "durationMinutes": 42
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 404);
}
