use crate::helpers::{body_json, get, make_test_app, make_user};
use axum::http::{StatusCode, header};
use services::ticket_service::{CreateTicket, TicketService};
use tower::ServiceExt;

fn ticket(title: &str, status: &str) -> CreateTicket {
    CreateTicket {
        title: title.into(),
        description: "details".into(),
        status: Some(status.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn anonymous_dashboard_redirects_to_login() {
    let (app, _) = make_test_app().await;

    let response = app.oneshot(get("/", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/accounts/login/?next=%2F"
    );
}

#[tokio::test]
async fn garbage_token_redirects_to_login() {
    let (app, _) = make_test_app().await;

    let response = app
        .oneshot(get("/tickets/?q=vpn", Some("not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/accounts/login/?next=%2Ftickets%2F%3Fq%3Dvpn"
    );
}

#[tokio::test]
async fn token_of_deleted_user_is_rejected() {
    let (app, state) = make_test_app().await;
    let (user, token) = make_user(&state, "ghost", false).await;
    services::user_service::UserService::delete_user(state.db(), user.id)
        .await
        .unwrap();

    let response = app.oneshot(get("/", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn dashboard_reports_counts_and_my_tickets() {
    let (app, state) = make_test_app().await;
    let (alice, token) = make_user(&state, "alice", false).await;
    let (bob, _) = make_user(&state, "bob", false).await;
    let db = state.db();

    for i in 0..3 {
        TicketService::create_ticket(db, ticket(&format!("open {i}"), "OPEN"), alice.id)
            .await
            .unwrap();
    }
    for i in 0..4 {
        let mut t = ticket(&format!("working {i}"), "IN_PROGRESS");
        t.assigned_to = Some(alice.id.to_string());
        TicketService::create_ticket(db, t, bob.id).await.unwrap();
    }
    TicketService::create_ticket(db, ticket("done", "RESOLVED"), bob.id)
        .await
        .unwrap();
    TicketService::create_ticket(db, ticket("archived", "CLOSED"), bob.id)
        .await
        .unwrap();

    let response = app.oneshot(get("/", Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["open_count"], 3);
    assert_eq!(data["in_progress_count"], 4);
    assert_eq!(data["resolved_count"], 1);

    let mine = data["my_tickets"].as_array().unwrap();
    assert_eq!(mine.len(), 5);
    for t in mine {
        let created = t["created_by"]["id"].as_i64().unwrap();
        let assigned = t["assigned_to"]["id"].as_i64();
        assert!(created == alice.id || assigned == Some(alice.id));
    }
}
