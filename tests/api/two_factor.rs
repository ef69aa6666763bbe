use crate::helpers::{
    enable_two_factor, get_json_response_body, get_random_email,
    last_emailed_code, mount_email_mock, register, TestApp,
};
use streambox::utils::constants::JWT_COOKIE_NAME;
use test_context::test_context;
use wiremock::{
    matchers::method, matchers::path, Mock, ResponseTemplate,
};

async fn login(app: &TestApp, email: &str, password: &str) -> reqwest::Response {
    app.post_login(&serde_json::json!({
        "email": email,
        "password": password
    }))
    .await
}

#[test_context(TestApp)]
#[tokio::test]
async fn enable_flips_the_preference_and_reports_status(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    let response = app.get_two_factor_status(&email).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["isEnabled"], false);

    enable_two_factor(app, &email).await;

    let response = app.get_two_factor_status(&email).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["isEnabled"], true);
}

#[test_context(TestApp)]
#[tokio::test]
async fn enabling_twice_is_rejected(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;

    let response = app
        .post_two_factor_enable(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["message"],
        "Two-factor authentication is already enabled"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn enable_is_rejected_for_unknown_user(app: &mut TestApp) {
    let response = app
        .post_two_factor_enable(
            &serde_json::json!({ "email": get_random_email() }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User not found");
}

/*
 * Enabling is a standing preference only; the first code is issued at
 * the next login.
 */
#[test_context(TestApp)]
#[tokio::test]
async fn enable_does_not_send_a_code(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    enable_two_factor(app, &email).await;
}

#[test_context(TestApp)]
#[tokio::test]
async fn full_two_factor_login_round_trip(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;
    mount_email_mock(app).await;

    let response = login(app, &email, "password123").await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["requiresTwoFactor"], true);

    let code = last_emailed_code(app).await;

    let response = app
        .post_two_factor_verify(&serde_json::json!({
            "email": email,
            "code": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let auth_cookie = response
        .cookies()
        .find(|cookie| cookie.name() == JWT_COOKIE_NAME)
        .expect("No auth cookie found");
    assert!(!auth_cookie.value().is_empty());

    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["isVerified"], true);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["role"], "User");
}

#[test_context(TestApp)]
#[tokio::test]
async fn verified_code_cannot_be_replayed(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;
    mount_email_mock(app).await;

    login(app, &email, "password123").await;
    let code = last_emailed_code(app).await;

    let request = serde_json::json!({
        "email": email,
        "code": code
    });

    let response = app.post_two_factor_verify(&request).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);

    // Same code, same window: must be rejected now.
    let response = app.post_two_factor_verify(&request).await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["isVerified"], false);
    assert_eq!(body["message"], "Invalid verification code");
    assert!(body["token"].is_null());
}

#[test_context(TestApp)]
#[tokio::test]
async fn wrong_code_is_rejected_and_the_real_one_still_works(
    app: &mut TestApp,
) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;
    mount_email_mock(app).await;

    login(app, &email, "password123").await;
    let code = last_emailed_code(app).await;
    let wrong_code = if code == "000000" { "000001" } else { "000000" };

    let response = app
        .post_two_factor_verify(&serde_json::json!({
            "email": email,
            "code": wrong_code
        }))
        .await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid verification code");

    let response = app
        .post_two_factor_verify(&serde_json::json!({
            "email": email,
            "code": code
        }))
        .await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);
}

#[test_context(TestApp)]
#[tokio::test]
async fn code_is_rejected_once_the_window_lapses(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;
    mount_email_mock(app).await;

    login(app, &email, "password123").await;
    let code = last_emailed_code(app).await;

    sqlx::query(
        "UPDATE two_factor_settings
         SET code_expires_at = now() - interval '1 second'
         WHERE email = $1",
    )
    .bind(&email)
    .execute(&app.pg_pool)
    .await
    .expect("Failed to expire the code");

    let response = app
        .post_two_factor_verify(&serde_json::json!({
            "email": email,
            "code": code
        }))
        .await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Verification code has expired");
}

#[test_context(TestApp)]
#[tokio::test]
async fn code_is_accepted_just_inside_the_window(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;
    mount_email_mock(app).await;

    login(app, &email, "password123").await;
    let code = last_emailed_code(app).await;

    // Nearly the whole window has elapsed but not quite.
    sqlx::query(
        "UPDATE two_factor_settings
         SET code_generated_at = now() - interval '9 minutes 30 seconds',
             code_expires_at = now() + interval '30 seconds'
         WHERE email = $1",
    )
    .bind(&email)
    .execute(&app.pg_pool)
    .await
    .expect("Failed to age the code");

    let response = app
        .post_two_factor_verify(&serde_json::json!({
            "email": email,
            "code": code
        }))
        .await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);
}

#[test_context(TestApp)]
#[tokio::test]
async fn resend_invalidates_the_previous_code(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;
    mount_email_mock(app).await;

    login(app, &email, "password123").await;
    let first_code = last_emailed_code(app).await;

    let response = app
        .post_two_factor_resend(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let second_code = last_emailed_code(app).await;

    if first_code != second_code {
        let response = app
            .post_two_factor_verify(&serde_json::json!({
                "email": email,
                "code": first_code
            }))
            .await;
        let body = get_json_response_body(response).await;
        assert_eq!(body["success"], false, "old code must be invalid");
    }

    let response = app
        .post_two_factor_verify(&serde_json::json!({
            "email": email,
            "code": second_code
        }))
        .await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);
}

#[test_context(TestApp)]
#[tokio::test]
async fn verify_without_an_enabled_setting_is_rejected(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    let response = app
        .post_two_factor_verify(&serde_json::json!({
            "email": email,
            "code": "123456"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Two-factor authentication is not enabled");
}

#[test_context(TestApp)]
#[tokio::test]
async fn disable_requires_the_correct_password(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;

    let response = app
        .post_two_factor_disable(&serde_json::json!({
            "email": email,
            "password": "not-the-password"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid password");

    // The setting is untouched.
    let response = app.get_two_factor_status(&email).await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["isEnabled"], true);
}

#[test_context(TestApp)]
#[tokio::test]
async fn disable_with_the_correct_password_turns_it_off(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;

    let response = app
        .post_two_factor_disable(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["isEnabled"], false);

    // Login goes straight through again.
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = login(app, &email, "password123").await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["requiresTwoFactor"], false);
    assert!(body["token"].is_string());
}

#[test_context(TestApp)]
#[tokio::test]
async fn disable_when_not_enabled_is_rejected(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    let response = app
        .post_two_factor_disable(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Two-factor authentication is not enabled");
}

#[test_context(TestApp)]
#[tokio::test]
async fn resend_fails_when_two_factor_is_off(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    let response = app
        .post_two_factor_resend(&serde_json::json!({ "email": email }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
}
