use crate::helpers::{body_json, form_post, get, make_test_app, make_user};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use db::models::{ticket_comments, tickets};
use sea_orm::{EntityTrait, PaginatorTrait};
use services::{
    comment_service::CommentService,
    ticket_service::{CreateTicket, TicketService},
};
use tower::ServiceExt;

fn ticket(title: &str, description: &str) -> CreateTicket {
    CreateTicket {
        title: title.into(),
        description: description.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn create_forces_creator_to_caller() {
    let (app, state) = make_test_app().await;
    let (alice, token) = make_user(&state, "alice", false).await;
    let (bob, _) = make_user(&state, "bob", false).await;

    let body = format!(
        "title=Printer+jam&description=Tray+2&priority=HIGH&status=OPEN&assigned_to=&created_by={}",
        bob.id
    );
    let response = app
        .oneshot(form_post("/tickets/new/", Some(&token), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/tickets/");

    let all = tickets::Entity::find().all(state.db()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].created_by_id, alice.id);
    assert_eq!(all[0].assigned_to_id, None);
    assert_eq!(all[0].priority, tickets::TicketPriority::High);
}

#[tokio::test]
async fn create_with_bad_input_reports_fields() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let response = app
        .oneshot(form_post(
            "/tickets/new/",
            Some(&token),
            "title=&description=x&priority=URGENT&assigned_to=999",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["data"]["title"].is_array());
    assert!(json["data"]["priority"].is_array());
    assert!(json["data"]["assigned_to"].is_array());
    assert_eq!(tickets::Entity::find().count(state.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn unparsable_assignee_does_not_hide_other_errors() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let response = app
        .oneshot(form_post(
            "/tickets/new/",
            Some(&token),
            "title=&description=&status=open&assigned_to=bob",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    for field in ["title", "description", "status", "assigned_to"] {
        assert!(json["data"][field].is_array(), "missing error for {field}");
    }
    assert_eq!(tickets::Entity::find().count(state.db()).await.unwrap(), 0);
}

#[tokio::test]
async fn non_numeric_ids_are_404() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    for uri in ["/tickets/abc/", "/tickets/-1/edit/", "/tickets/1x/delete/"] {
        let response = app.clone().oneshot(get(uri, Some(&token))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body_json(response).await["success"], false);
    }

    let response = app
        .oneshot(form_post("/tickets/abc/comment/", Some(&token), "body=hi"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        ticket_comments::Entity::find().count(state.db()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn new_form_lists_choices_and_assignees() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "carol", false).await;
    make_user(&state, "alice", false).await;

    let response = app.oneshot(get("/tickets/new/", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["initial"]["priority"], "MEDIUM");
    assert_eq!(data["initial"]["status"], "OPEN");
    assert_eq!(data["statuses"].as_array().unwrap().len(), 4);
    assert_eq!(data["assignees"][0]["username"], "alice");
    assert_eq!(data["assignees"][1]["username"], "carol");
}

#[tokio::test]
async fn list_filters_by_search_and_status() {
    let (app, state) = make_test_app().await;
    let (alice, token) = make_user(&state, "alice", false).await;
    let db = state.db();

    TicketService::create_ticket(db, ticket("Cannot reach VPN", "timeout"), alice.id)
        .await
        .unwrap();
    let mut resolved = ticket("Laptop", "vpn client crashes");
    resolved.status = Some("RESOLVED".into());
    TicketService::create_ticket(db, resolved, alice.id).await.unwrap();
    TicketService::create_ticket(db, ticket("Printer", "jam"), alice.id)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get("/tickets/?q=VPN", Some(&token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 2);

    let response = app
        .clone()
        .oneshot(get("/tickets/?q=vpn&status=OPEN", Some(&token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    let found = json["data"]["tickets"].as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Cannot reach VPN");
    assert_eq!(found[0]["created_by"]["username"], "alice");

    let response = app
        .oneshot(get("/tickets/?status=BOGUS&page=abc", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total"], 3);
    assert_eq!(json["data"]["page"], 1);
    assert!(json["data"]["status"].is_null());
}

#[tokio::test]
async fn detail_includes_comments_oldest_first() {
    let (app, state) = make_test_app().await;
    let (alice, token) = make_user(&state, "alice", false).await;
    let (bob, _) = make_user(&state, "bob", false).await;
    let db = state.db();

    let t = TicketService::create_ticket(db, ticket("VPN", "down"), alice.id)
        .await
        .unwrap();
    CommentService::add_comment(db, t.id, "first", alice.id).await.unwrap();
    CommentService::add_comment(db, t.id, "second", bob.id).await.unwrap();

    let response = app
        .oneshot(get(&format!("/tickets/{}/", t.id), Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let comments = json["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["body"], "first");
    assert_eq!(comments[1]["author"]["username"], "bob");
}

#[tokio::test]
async fn missing_ticket_is_404() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let response = app.oneshot(get("/tickets/77/", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_on_missing_ticket_writes_nothing() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let response = app
        .oneshot(form_post("/tickets/77/comment/", Some(&token), "body=hello"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        ticket_comments::Entity::find().count(state.db()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn comment_redirects_back_to_ticket() {
    let (app, state) = make_test_app().await;
    let (alice, token) = make_user(&state, "alice", false).await;
    let t = TicketService::create_ticket(state.db(), ticket("VPN", "down"), alice.id)
        .await
        .unwrap();

    let response = app
        .oneshot(form_post(
            &format!("/tickets/{}/comment/", t.id),
            Some(&token),
            "body=Rebooted+the+router",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/tickets/{}/", t.id).as_str()
    );
    let comments = CommentService::comments_for(state.db(), t.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].author_id, alice.id);
    assert_eq!(comments[0].body, "Rebooted the router");
}

#[tokio::test]
async fn edit_updates_fields_and_clears_assignee() {
    let (app, state) = make_test_app().await;
    let (alice, token) = make_user(&state, "alice", false).await;
    let (bob, _) = make_user(&state, "bob", false).await;

    let mut input = ticket("VPN", "down");
    input.assigned_to = Some(bob.id.to_string());
    let t = TicketService::create_ticket(state.db(), input, alice.id)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(form_post(
            &format!("/tickets/{}/edit/", t.id),
            Some(&token),
            "status=IN_PROGRESS&assigned_to=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/tickets/{}/", t.id).as_str()
    );

    let updated = TicketService::get_ticket(state.db(), t.id).await.unwrap();
    assert_eq!(updated.status, tickets::TicketStatus::InProgress);
    assert_eq!(updated.assigned_to_id, None);
    assert_eq!(updated.title, "VPN");

    let response = app
        .oneshot(get(&format!("/tickets/{}/edit/", t.id), Some(&token)))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"]["initial"]["status"], "IN_PROGRESS");
}

#[tokio::test]
async fn edit_unknown_ticket_is_404() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let response = app
        .oneshot(form_post("/tickets/5/edit/", Some(&token), "assigned_to=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_confirms_then_removes() {
    let (app, state) = make_test_app().await;
    let (alice, token) = make_user(&state, "alice", false).await;
    let t = TicketService::create_ticket(state.db(), ticket("VPN", "down"), alice.id)
        .await
        .unwrap();
    CommentService::add_comment(state.db(), t.id, "note", alice.id)
        .await
        .unwrap();

    let uri = format!("/tickets/{}/delete/", t.id);
    let response = app.clone().oneshot(get(&uri, Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["title"], "VPN");

    let response = app.oneshot(form_post(&uri, Some(&token), "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/tickets/");
    assert_eq!(tickets::Entity::find().count(state.db()).await.unwrap(), 0);
    assert_eq!(
        ticket_comments::Entity::find().count(state.db()).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let (app, state) = make_test_app().await;
    let (_, token) = make_user(&state, "alice", false).await;

    let req = Request::builder()
        .uri("/tickets/")
        .header(header::COOKIE, format!("sessionid={token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
