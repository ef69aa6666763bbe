use crate::helpers::{
    get_json_response_body, get_random_email, last_emailed_code,
    mount_email_mock, register, TestApp,
};
use test_context::test_context;
use wiremock::{
    matchers::method, matchers::path, Mock, ResponseTemplate,
};

async fn request_reset(app: &TestApp, email: &str) -> reqwest::Response {
    app.post_forgot_password(&serde_json::json!({ "email": email }))
        .await
}

async fn reset_row_count(app: &TestApp, email: &str) -> i64 {
    sqlx::query_scalar("SELECT count(*) FROM password_resets WHERE email = $1")
        .bind(email)
        .fetch_one(&app.pg_pool)
        .await
        .expect("Failed to count reset rows")
}

#[test_context(TestApp)]
#[tokio::test]
async fn unknown_email_gets_the_same_response_and_no_side_effects(
    app: &mut TestApp,
) {
    let known = get_random_email();
    let unknown = get_random_email();
    register(app, &known, "password123").await;

    // Exactly one send: the known email's. The unknown one must not
    // reach the mail server at all.
    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let known_response = request_reset(app, &known).await;
    assert_eq!(known_response.status().as_u16(), 200);
    let known_body = get_json_response_body(known_response).await;

    let unknown_response = request_reset(app, &unknown).await;
    assert_eq!(unknown_response.status().as_u16(), 200);
    let unknown_body = get_json_response_body(unknown_response).await;

    assert_eq!(known_body["success"], unknown_body["success"]);
    assert_eq!(known_body["message"], unknown_body["message"]);

    assert_eq!(reset_row_count(app, &unknown).await, 0);
    assert_eq!(reset_row_count(app, &known).await, 1);
}

#[test_context(TestApp)]
#[tokio::test]
async fn repeated_requests_leave_at_most_one_record(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    mount_email_mock(app).await;

    request_reset(app, &email).await;
    let first_code = last_emailed_code(app).await;

    request_reset(app, &email).await;
    let second_code = last_emailed_code(app).await;

    assert_eq!(reset_row_count(app, &email).await, 1);

    if first_code != second_code {
        let response = app
            .post_verify_reset_code(&serde_json::json!({
                "email": email,
                "resetCode": first_code
            }))
            .await;
        assert_eq!(
            response.status().as_u16(),
            400,
            "the replaced code must be dead"
        );
    }

    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": second_code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn forgot_password_fails_when_delivery_fails(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = request_reset(app, &email).await;
    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], false);
}

#[test_context(TestApp)]
#[tokio::test]
async fn verify_rejects_every_single_field_mutation(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    mount_email_mock(app).await;

    request_reset(app, &email).await;
    let code = last_emailed_code(app).await;
    let wrong_code = if code == "000000" { "000001" } else { "000000" };

    // Wrong code.
    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": wrong_code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    // Wrong email.
    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": get_random_email(),
            "resetCode": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    // The unmodified pair still verifies.
    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);
}

/*
 * Expiry is measured from created_at; the stored expires_at is written
 * but not consulted. Pushing expires_at into the future must not keep
 * an aged code alive.
 */
#[test_context(TestApp)]
#[tokio::test]
async fn expiry_is_measured_from_created_at(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    mount_email_mock(app).await;

    request_reset(app, &email).await;
    let code = last_emailed_code(app).await;

    sqlx::query(
        "UPDATE password_resets
         SET created_at = now() - interval '10 minutes 1 second',
             expires_at = now() + interval '1 hour'
         WHERE email = $1",
    )
    .bind(&email)
    .execute(&app.pg_pool)
    .await
    .expect("Failed to age the reset record");

    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn code_is_still_valid_just_inside_the_window(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    mount_email_mock(app).await;

    request_reset(app, &email).await;
    let code = last_emailed_code(app).await;

    // T + 9m59s, give or take the request round trip.
    sqlx::query(
        "UPDATE password_resets
         SET created_at = now() - interval '9 minutes 59 seconds',
             expires_at = now() + interval '1 second'
         WHERE email = $1",
    )
    .bind(&email)
    .execute(&app.pg_pool)
    .await
    .expect("Failed to age the reset record");

    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn full_reset_round_trip_consumes_the_code(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    mount_email_mock(app).await;

    request_reset(app, &email).await;
    let code = last_emailed_code(app).await;

    // Step 1: the code checks out.
    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    // Step 2: complete the reset.
    let response = app
        .post_reset_password(&serde_json::json!({
            "email": email,
            "resetCode": code,
            "newPassword": "brand-new-password",
            "confirmPassword": "brand-new-password"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    let body = get_json_response_body(response).await;
    assert_eq!(body["success"], true);

    let used: bool = sqlx::query_scalar(
        "SELECT used FROM password_resets WHERE email = $1",
    )
    .bind(&email)
    .fetch_one(&app.pg_pool)
    .await
    .expect("Failed to read used flag");
    assert!(used, "the record must be flagged used");

    // The consumed code cannot complete a second reset.
    let response = app
        .post_reset_password(&serde_json::json!({
            "email": email,
            "resetCode": code,
            "newPassword": "another-password",
            "confirmPassword": "another-password"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(body["message"], "Invalid or expired reset code");

    // Old password out, new password in.
    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "brand-new-password"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn mismatched_confirmation_is_rejected(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    mount_email_mock(app).await;

    request_reset(app, &email).await;
    let code = last_emailed_code(app).await;

    let response = app
        .post_reset_password(&serde_json::json!({
            "email": email,
            "resetCode": code,
            "newPassword": "brand-new-password",
            "confirmPassword": "different-password"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
    let body = get_json_response_body(response).await;
    assert_eq!(body["message"], "Passwords do not match");

    // The code survives a failed attempt.
    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": code
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_input(app: &mut TestApp) {
    let response = app
        .post_forgot_password(&serde_json::json!({ "email": "not-an-email" }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": "not-an-email",
            "resetCode": "123456"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);

    // A malformed code can never match, so it reads as invalid.
    let email = get_random_email();
    register(app, &email, "password123").await;
    let response = app
        .post_verify_reset_code(&serde_json::json!({
            "email": email,
            "resetCode": "not-a-code"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 400);
}
