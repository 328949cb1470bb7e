//! Ticket routes.
//!
//! Every path mirrors an HTML form: `GET` returns the data the form needs and
//! `POST` submits it, answering with a `302` on success.
//!
//! - `GET  /tickets/`               → `list_tickets`
//! - `GET  /tickets/new/`           → `new_ticket_form`
//! - `POST /tickets/new/`           → `create_ticket`
//! - `GET  /tickets/{id}/`          → `get_ticket`
//! - `GET  /tickets/{id}/edit/`     → `edit_ticket_form`
//! - `POST /tickets/{id}/edit/`     → `edit_ticket`
//! - `GET  /tickets/{id}/delete/`   → `delete_ticket_confirm`
//! - `POST /tickets/{id}/delete/`   → `delete_ticket`
//! - `POST /tickets/{id}/comment/`  → `add_comment`

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

use get::{delete_ticket_confirm, edit_ticket_form, get_ticket, list_tickets, new_ticket_form};
use post::{add_comment, create_ticket, delete_ticket, edit_ticket};

pub fn ticket_routes() -> Router<AppState> {
    Router::new()
        .route("/tickets/", get(list_tickets))
        .route("/tickets/new/", get(new_ticket_form).post(create_ticket))
        .route("/tickets/{id}/", get(get_ticket))
        .route("/tickets/{id}/edit/", get(edit_ticket_form).post(edit_ticket))
        .route(
            "/tickets/{id}/delete/",
            get(delete_ticket_confirm).post(delete_ticket),
        )
        .route("/tickets/{id}/comment/", post(add_comment))
}
