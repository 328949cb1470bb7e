use crate::helpers::{body_json, form_post, get, make_test_app, make_user};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

#[tokio::test]
async fn login_form_echoes_safe_next() {
    let (app, _) = make_test_app().await;

    let response = app
        .clone()
        .oneshot(get("/accounts/login/?next=%2Ftickets%2F", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["next"], "/tickets/");

    let response = app
        .oneshot(get("/accounts/login/?next=https://evil.example/", None))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"]["next"], "/");
}

#[tokio::test]
async fn login_sets_session_cookie_and_follows_next() {
    let (app, state) = make_test_app().await;
    make_user(&state, "alice", false).await;

    let response = app
        .clone()
        .oneshot(form_post(
            "/accounts/login/",
            None,
            "username=alice&password=password1&next=%2Ftickets%2F",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/tickets/");

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_owned();
    assert!(cookie.starts_with("sessionid="));
    assert!(cookie.contains("HttpOnly"));

    let session = cookie.split(';').next().unwrap().to_owned();
    let req = Request::builder()
        .uri("/")
        .header(header::COOKIE, session)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (app, state) = make_test_app().await;
    make_user(&state, "alice", false).await;

    let response = app
        .oneshot(form_post(
            "/accounts/login/",
            None,
            "username=alice&password=nope",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_json(response).await["success"], false);
}

#[tokio::test]
async fn missing_fields_are_field_errors() {
    let (app, _) = make_test_app().await;

    let response = app
        .oneshot(form_post("/accounts/login/", None, "username=alice"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["data"]["password"].is_array());
}

#[tokio::test]
async fn logout_clears_cookie() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let response = app
        .oneshot(form_post("/accounts/logout/", Some(&token), ""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/accounts/login/");
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("sessionid="));
}
