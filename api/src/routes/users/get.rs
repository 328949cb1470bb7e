use crate::{
    response::{ApiResponse, service_error},
    routes::users::common::UserResponse,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::user_service::UserService;
use util::state::AppState;

/// GET /users/
///
/// All accounts ordered by username.
pub async fn list_users(State(app_state): State<AppState>) -> Response {
    match UserService::assignable_users(app_state.db()).await {
        Ok(users) => {
            let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(users, "Users retrieved successfully")),
            )
                .into_response()
        }
        Err(e) => service_error(e),
    }
}
