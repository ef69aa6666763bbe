use crate::helpers::{get_json_response_body, get_session, TestApp};
use reqwest::cookie::CookieStore;
use streambox::utils::constants::JWT_COOKIE_NAME;
use test_context::test_context;

#[test_context(TestApp)]
#[tokio::test]
async fn logout_clears_the_cookie_and_bans_the_token(app: &mut TestApp) {
    get_session(app).await;

    // Capture the token before it disappears with the cookie.
    let response = app.get_me().await;
    assert_eq!(response.status().as_u16(), 200);

    let token = {
        let url = app.address.parse::<reqwest::Url>().unwrap();
        let cookies = app.cookie_jar.cookies(&url).expect("No cookies set");
        let cookies = cookies.to_str().unwrap().to_owned();
        cookies
            .split("; ")
            .find_map(|cookie| {
                cookie
                    .strip_prefix(&format!("{}=", JWT_COOKIE_NAME))
                    .map(String::from)
            })
            .expect("No jwt cookie")
    };

    let response = app.post_logout().await;
    assert_eq!(response.status().as_u16(), 200);

    // The revoked token no longer validates.
    let response = app
        .post_verify_token(&serde_json::json!({ "token": token }))
        .await;
    assert_eq!(response.status().as_u16(), 401);

    // And the session routes reject the cleared cookie.
    let response = app.get_me().await;
    assert_eq!(response.status().as_u16(), 400);
}

#[test_context(TestApp)]
#[tokio::test]
async fn logout_without_a_cookie_is_rejected(app: &mut TestApp) {
    let response = app.post_logout().await;
    assert_eq!(response.status().as_u16(), 400);

    let body = get_json_response_body(response).await;
    assert_eq!(body["error"], "Missing token");
}

#[test_context(TestApp)]
#[tokio::test]
async fn second_logout_is_rejected(app: &mut TestApp) {
    get_session(app).await;

    assert_eq!(app.post_logout().await.status().as_u16(), 200);
    assert_eq!(app.post_logout().await.status().as_u16(), 400);
}
