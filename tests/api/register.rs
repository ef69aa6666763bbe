use crate::helpers::{get_json_response_body, get_random_email, TestApp};
use streambox::utils::constants::JWT_COOKIE_NAME;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_201_and_a_session_for_valid_input(app: &mut TestApp) {
    let email = get_random_email();

    let response = app
        .post_register(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);

    let auth_cookie = response
        .cookies()
        .find(|cookie| cookie.name() == JWT_COOKIE_NAME)
        .expect("No auth cookie found");
    assert!(!auth_cookie.value().is_empty());

    let body = get_json_response_body(response).await;
    assert_eq!(body["isSuccessful"], true);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["user"]["role"], "User");
}

#[test_context(TestApp)]
#[tokio::test]
async fn registration_creates_a_default_profile(app: &mut TestApp) {
    let email = get_random_email();

    let response = app
        .post_register(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 201);

    let response = app.get_profiles().await;
    assert_eq!(response.status().as_u16(), 200);

    let profiles = get_json_response_body(response).await;
    let profiles = profiles.as_array().expect("expected a profile array");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["name"], "Main");
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_409_if_email_already_registered(app: &mut TestApp) {
    let email = get_random_email();
    let request = serde_json::json!({
        "email": email,
        "password": "password123"
    });

    assert_eq!(app.post_register(&request).await.status().as_u16(), 201);
    assert_eq!(app.post_register(&request).await.status().as_u16(), 409);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_input(app: &mut TestApp) {
    let test_cases = [
        serde_json::json!({
            "email": "not-an-email",
            "password": "password123"
        }),
        serde_json::json!({
            "email": get_random_email(),
            "password": "short"
        }),
    ];

    for test_case in test_cases {
        let response = app.post_register(&test_case).await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "Failed for input: {:?}",
            test_case
        );
    }
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_422_if_malformed_input(app: &mut TestApp) {
    let test_cases = [
        serde_json::json!({ "email": get_random_email() }),
        serde_json::json!({ "password": "password123" }),
        serde_json::json!({ "email": true, "password": "password123" }),
    ];

    for test_case in test_cases {
        let response = app.post_register(&test_case).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {:?}",
            test_case
        );
    }
}
