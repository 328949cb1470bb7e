use crate::{
    auth::AuthUser,
    response::{ApiResponse, service_error},
    routes::tickets::common::{TicketResponse, ticket_responses},
};
use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use services::{ServiceResult, ticket_service::TicketService};
use util::state::AppState;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub open_count: u64,
    pub in_progress_count: u64,
    pub resolved_count: u64,
    pub my_tickets: Vec<TicketResponse>,
}

/// GET /
///
/// Ticket totals per status across everyone, plus the caller's five newest
/// tickets (created by or assigned to them).
pub async fn dashboard(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    let db = app_state.db();

    let result: ServiceResult<DashboardResponse> = async {
        let summary = TicketService::dashboard_summary(db, claims.sub).await?;
        Ok(DashboardResponse {
            open_count: summary.open_count,
            in_progress_count: summary.in_progress_count,
            resolved_count: summary.resolved_count,
            my_tickets: ticket_responses(db, summary.my_tickets).await?,
        })
    }
    .await;

    match result {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse::success(data, "Dashboard retrieved successfully")),
        )
            .into_response(),
        Err(e) => service_error(e),
    }
}
