use crate::{
    response::{ApiResponse, service_error},
    routes::common::RecordId,
    routes::tickets::common::{
        Choice, CommentResponse, TicketFormInitial, TicketFormResponse, TicketResponse,
        status_choices, ticket_responses,
    },
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::tickets::TicketStatus;
use serde::{Deserialize, Serialize};
use services::{
    ServiceResult, comment_service::CommentService, ticket_service::TicketService,
    user_service::UserService,
};
use util::state::AppState;

fn ok<T: Serialize>(data: T, message: &str) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data, message))).into_response()
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    /// Unknown status tokens are ignored rather than rejected.
    fn status(&self) -> Option<TicketStatus> {
        self.status.as_deref().and_then(|s| s.trim().parse().ok())
    }

    fn page(&self) -> u64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<u64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

#[derive(Serialize)]
pub struct TicketListResponse {
    pub tickets: Vec<TicketResponse>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub num_pages: u64,
    pub q: String,
    pub status: Option<TicketStatus>,
    pub statuses: Vec<Choice>,
}

/// GET /tickets/
///
/// Newest-first ticket list, 10 per page.
///
/// ### Query Parameters
/// - `q`: case-insensitive substring of title or description
/// - `status`: `OPEN`, `IN_PROGRESS`, `RESOLVED` or `CLOSED`; anything else is ignored
/// - `page`: 1-based page number; invalid values fall back to 1
pub async fn list_tickets(
    State(app_state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Response {
    let db = app_state.db();
    let q = params.q.as_deref().map(str::trim).unwrap_or_default().to_owned();
    let status = params.status();

    let result: ServiceResult<TicketListResponse> = async {
        let page = TicketService::list_tickets_page(db, Some(q.as_str()), status, params.page()).await?;
        Ok(TicketListResponse {
            tickets: ticket_responses(db, page.tickets).await?,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            num_pages: page.num_pages,
            q,
            status,
            statuses: status_choices(),
        })
    }
    .await;

    match result {
        Ok(list) => ok(list, "Tickets retrieved successfully"),
        Err(e) => service_error(e),
    }
}

#[derive(Serialize)]
pub struct TicketDetailResponse {
    pub ticket: TicketResponse,
    pub comments: Vec<CommentResponse>,
}

/// GET /tickets/{id}/
///
/// The ticket with its comments, oldest comment first.
pub async fn get_ticket(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
) -> Response {
    let db = app_state.db();

    let result: ServiceResult<TicketDetailResponse> = async {
        let ticket = TicketService::get_ticket(db, id).await?;
        let comments = CommentService::comments_for(db, id).await?;
        let names = UserService::usernames(
            db,
            ticket.user_ids().chain(comments.iter().map(|c| c.author_id)),
        )
        .await?;

        Ok(TicketDetailResponse {
            ticket: TicketResponse::new(ticket, &names),
            comments: comments
                .into_iter()
                .map(|c| CommentResponse::new(c, &names))
                .collect(),
        })
    }
    .await;

    match result {
        Ok(detail) => ok(detail, "Ticket retrieved successfully"),
        Err(e) => service_error(e),
    }
}

/// GET /tickets/new/
///
/// Choices and defaults for the creation form.
pub async fn new_ticket_form(State(app_state): State<AppState>) -> Response {
    match TicketFormResponse::load(app_state.db(), TicketFormInitial::default()).await {
        Ok(form) => ok(form, "Ticket form"),
        Err(e) => service_error(e),
    }
}

/// GET /tickets/{id}/edit/
///
/// The edit form pre-filled from the ticket.
pub async fn edit_ticket_form(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
) -> Response {
    let db = app_state.db();

    let result = async {
        let ticket = TicketService::get_ticket(db, id).await?;
        TicketFormResponse::load(db, TicketFormInitial::from(&ticket)).await
    }
    .await;

    match result {
        Ok(form) => ok(form, "Ticket form"),
        Err(e) => service_error(e),
    }
}

/// GET /tickets/{id}/delete/
///
/// The ticket about to be deleted, for confirmation.
pub async fn delete_ticket_confirm(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
) -> Response {
    let db = app_state.db();

    let result: ServiceResult<TicketResponse> = async {
        let ticket = TicketService::get_ticket(db, id).await?;
        let mut responses = ticket_responses(db, vec![ticket]).await?;
        Ok(responses.remove(0))
    }
    .await;

    match result {
        Ok(ticket) => ok(ticket, "Confirm ticket deletion"),
        Err(e) => service_error(e),
    }
}
