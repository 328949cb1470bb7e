use crate::{
    auth::AuthUser,
    response::{found, service_error},
    routes::{common::RecordId, tickets::common::TicketForm},
};
use axum::{
    Extension, Form,
    extract::State,
    response::Response,
};
use serde::Deserialize;
use services::{
    ServiceResult,
    comment_service::CommentService,
    ticket_service::{CreateTicket, TicketService, UpdateTicket},
};
use util::state::AppState;

/// POST /tickets/new/
///
/// Creates a ticket owned by the caller and redirects to the list.
///
/// ### Form Fields
/// - `title` (required, at most 255 characters)
/// - `description` (required)
/// - `priority`: `LOW`, `MEDIUM` (default), `HIGH` or `CRITICAL`
/// - `status`: `OPEN` (default), `IN_PROGRESS`, `RESOLVED` or `CLOSED`
/// - `assigned_to`: user id, blank for nobody
///
/// ### Responses
/// - `302 Found` → `/tickets/`
/// - `400 Bad Request` with field errors in `data`
pub async fn create_ticket(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Form(form): Form<TicketForm>,
) -> Response {
    let input = CreateTicket {
        title: form.title.unwrap_or_default(),
        description: form.description.unwrap_or_default(),
        priority: form.priority,
        status: form.status,
        assigned_to: form.assigned_to,
    };

    match TicketService::create_ticket(app_state.db(), input, claims.sub).await {
        Ok(_) => found("/tickets/"),
        Err(e) => service_error(e),
    }
}

/// POST /tickets/{id}/edit/
///
/// Updates the fields present in the form; absent fields keep their values
/// and a blank `assigned_to` clears the assignee.
///
/// ### Responses
/// - `302 Found` → `/tickets/{id}/`
/// - `400 Bad Request` with field errors in `data`
/// - `404 Not Found`
pub async fn edit_ticket(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Form(form): Form<TicketForm>,
) -> Response {
    let result: ServiceResult<_> = async {
        // Unknown tickets are reported before bad form input.
        TicketService::get_ticket(app_state.db(), id).await?;
        let input = UpdateTicket {
            title: form.title,
            description: form.description,
            priority: form.priority,
            status: form.status,
            assigned_to: form.assigned_to,
        };
        TicketService::update_ticket(app_state.db(), id, input, claims.sub).await
    }
    .await;

    match result {
        Ok(ticket) => found(format!("/tickets/{}/", ticket.id)),
        Err(e) => service_error(e),
    }
}

/// POST /tickets/{id}/delete/
///
/// Deletes the ticket and its comments, then redirects to the list.
pub async fn delete_ticket(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match TicketService::delete_ticket(app_state.db(), id).await {
        Ok(()) => {
            tracing::info!(ticket_id = id, user_id = claims.sub, "Ticket deleted via form");
            found("/tickets/")
        }
        Err(e) => service_error(e),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentForm {
    pub body: Option<String>,
}

/// POST /tickets/{id}/comment/
///
/// Adds a comment by the caller and redirects back to the ticket.
///
/// ### Responses
/// - `302 Found` → `/tickets/{id}/`
/// - `400 Bad Request` when the body is blank
/// - `404 Not Found` when the ticket does not exist; nothing is written
pub async fn add_comment(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Form(form): Form<CommentForm>,
) -> Response {
    let body = form.body.unwrap_or_default();
    match CommentService::add_comment(app_state.db(), id, &body, claims.sub).await {
        Ok(_) => found(format!("/tickets/{id}/")),
        Err(e) => service_error(e),
    }
}
