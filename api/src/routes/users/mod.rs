//! # Users Routes Module
//!
//! Account administration. Every route here sits behind `require_admin`.
//!
//! - `GET  /users/`             → `list_users`
//! - `POST /users/`             → `create_user`
//! - `POST /users/{id}/delete/` → `delete_user`

use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

pub mod common;
pub mod get;
pub mod post;

use get::list_users;
use post::{create_user, delete_user};

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route("/users/{id}/delete/", post(delete_user))
}
