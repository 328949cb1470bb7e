use crate::helpers::{body_json, form_post, get, make_test_app, make_user};
use axum::http::{StatusCode, header};
use db::models::{tickets, user};
use sea_orm::{EntityTrait, PaginatorTrait};
use services::ticket_service::{CreateTicket, TicketService};
use tower::ServiceExt;

#[tokio::test]
async fn non_admin_is_forbidden() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let response = app.oneshot(get("/users/", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_is_redirected() {
    let (app, _) = make_test_app().await;

    let response = app.oneshot(get("/users/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn admin_lists_users_without_hashes() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "root", true).await;
    make_user(&state, "alice", false).await;

    let response = app.oneshot(get("/users/", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let users = json["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "alice");
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn admin_creates_user() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "root", true).await;

    let response = app
        .clone()
        .oneshot(form_post(
            "/users/",
            Some(&token),
            "username=dave&email=dave%40example.com&password=longenough&admin=on",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/users/");

    let dave = user::Model::find_by_username(state.db(), "dave")
        .await
        .unwrap()
        .unwrap();
    assert!(dave.admin);
    assert!(dave.verify_password("longenough"));

    let response = app
        .oneshot(form_post(
            "/users/",
            Some(&token),
            "username=dave&email=bad&password=short",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["data"]["username"].is_array());
    assert!(json["data"]["email"].is_array());
    assert!(json["data"]["password"].is_array());
}

#[tokio::test]
async fn deleting_user_cascades_and_unassigns() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "root", true).await;
    let (alice, _) = make_user(&state, "alice", false).await;
    let (bob, _) = make_user(&state, "bob", false).await;
    let db = state.db();

    let owned = TicketService::create_ticket(
        db,
        CreateTicket {
            title: "alice's".into(),
            description: "d".into(),
            ..Default::default()
        },
        alice.id,
    )
    .await
    .unwrap();
    let assigned = TicketService::create_ticket(
        db,
        CreateTicket {
            title: "bob's".into(),
            description: "d".into(),
            assigned_to: Some(alice.id.to_string()),
            ..Default::default()
        },
        bob.id,
    )
    .await
    .unwrap();

    let response = app
        .oneshot(form_post(
            &format!("/users/{}/delete/", alice.id),
            Some(&token),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    assert!(tickets::Entity::find_by_id(owned.id).one(db).await.unwrap().is_none());
    let kept = tickets::Entity::find_by_id(assigned.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(kept.assigned_to_id, None);
    assert_eq!(tickets::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn admin_cannot_delete_self() {
    let (app, state) = make_test_app().await;
    let (root, token) = make_user(&state, "root", true).await;

    let response = app
        .oneshot(form_post(
            &format!("/users/{}/delete/", root.id),
            Some(&token),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_with_non_numeric_id_is_404() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "root", true).await;

    let response = app
        .oneshot(form_post("/users/root/delete/", Some(&token), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(user::Entity::find().count(state.db()).await.unwrap(), 1);
}
