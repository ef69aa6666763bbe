use crate::helpers::{
    enable_two_factor, get_json_response_body, get_random_email,
    mount_email_mock, register, TestApp,
};
use streambox::utils::constants::JWT_COOKIE_NAME;
use test_context::test_context;
use wiremock::{
    matchers::method, matchers::path, Mock, ResponseTemplate,
};

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_200_with_token_when_2fa_is_off(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let auth_cookie = response
        .cookies()
        .find(|cookie| cookie.name() == JWT_COOKIE_NAME)
        .expect("No auth cookie found");
    assert!(!auth_cookie.value().is_empty());

    let body = get_json_response_body(response).await;
    assert_eq!(body["isSuccessful"], true);
    assert_eq!(body["requiresTwoFactor"], false);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], email);
    assert_eq!(body["role"], "User");
}

/*
 * The response shape is part of the wire contract; clients dispatch on
 * these fields.
 */
#[test_context(TestApp)]
#[tokio::test]
async fn login_response_matches_the_contract(app: &mut TestApp) {
    let schema = serde_json::json!({
        "type": "object",
        "required": ["isSuccessful", "requiresTwoFactor", "token", "user", "role"],
        "properties": {
            "isSuccessful": { "type": "boolean" },
            "requiresTwoFactor": { "type": "boolean" },
            "token": { "type": "string" },
            "role": { "enum": ["User", "Admin"] },
            "user": {
                "type": "object",
                "required": ["id", "email", "role"],
                "properties": {
                    "id": { "type": "string" },
                    "email": { "type": "string" },
                    "role": { "enum": ["User", "Admin"] }
                }
            }
        }
    });
    let validator =
        jsonschema::validator_for(&schema).expect("schema is valid");

    let email = get_random_email();
    register(app, &email, "password123").await;

    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    let body = get_json_response_body(response).await;

    assert!(
        validator.is_valid(&body),
        "login response violates the contract: {body}"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable(
    app: &mut TestApp,
) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    let wrong_password = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "not-the-password"
        }))
        .await;
    let unknown_user = app
        .post_login(&serde_json::json!({
            "email": get_random_email(),
            "password": "password123"
        }))
        .await;

    assert_eq!(wrong_password.status().as_u16(), 401);
    assert_eq!(unknown_user.status().as_u16(), 401);

    let wrong_password_body = get_json_response_body(wrong_password).await;
    let unknown_user_body = get_json_response_body(unknown_user).await;
    assert_eq!(
        wrong_password_body, unknown_user_body,
        "the two rejections must not differ"
    );
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_401_for_deactivated_account(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;

    sqlx::query("UPDATE users SET is_active = FALSE WHERE email = $1")
        .bind(&email)
        .execute(&app.pg_pool)
        .await
        .expect("Failed to deactivate user");

    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestApp)]
#[tokio::test]
async fn login_with_2fa_returns_no_token_and_sends_a_code(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    assert!(
        !response
            .cookies()
            .any(|cookie| cookie.name() == JWT_COOKIE_NAME),
        "no session cookie before the code is verified"
    );

    let body = get_json_response_body(response).await;
    assert_eq!(body["isSuccessful"], true);
    assert_eq!(body["requiresTwoFactor"], true);
    assert_eq!(body["email"], email);
    assert!(body["token"].is_null(), "no token before verification");
}

#[test_context(TestApp)]
#[tokio::test]
async fn login_with_2fa_fails_when_delivery_fails(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "password123"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn wrong_password_never_triggers_a_code(app: &mut TestApp) {
    let email = get_random_email();
    register(app, &email, "password123").await;
    enable_two_factor(app, &email).await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app
        .post_login(&serde_json::json!({
            "email": email,
            "password": "not-the-password"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[test_context(TestApp)]
#[tokio::test]
async fn should_return_400_if_invalid_input(app: &mut TestApp) {
    mount_email_mock(app).await;

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
        let response = app.post_login(&test_case).await;
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
    ];

    for test_case in test_cases {
        let response = app.post_login(&test_case).await;
        assert_eq!(
            response.status().as_u16(),
            422,
            "Failed for input: {:?}",
            test_case
        );
    }
}
