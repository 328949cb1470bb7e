//! HTTP route entry point.
//!
//! - `/health`, `/accounts/login/` → public
//! - `/`, `/tickets/...`, `/accounts/logout/` → login required
//! - `/users/...` → login required, admin only

use crate::auth::guards::{require_admin, require_login};
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
};
use util::state::AppState;

pub mod accounts;
pub mod common;
pub mod dashboard;
pub mod health;
pub mod tickets;
pub mod users;

use accounts::{account_routes, logout_routes};
use dashboard::dashboard_routes;
use health::health_routes;
use tickets::ticket_routes;
use users::users_routes;

/// Builds the complete application router.
///
/// Guards are attached with `route_layer`, so unknown paths still answer
/// `404` instead of a login redirect.
pub fn routes(app_state: AppState) -> Router {
    let protected = Router::new()
        .merge(dashboard_routes())
        .merge(ticket_routes())
        .merge(logout_routes())
        .merge(users_routes().route_layer(from_fn(require_admin)))
        .route_layer(from_fn_with_state(app_state.clone(), require_login));

    Router::new()
        .merge(health_routes())
        .merge(account_routes())
        .merge(protected)
        .with_state(app_state)
}
