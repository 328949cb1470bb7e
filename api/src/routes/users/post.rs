use crate::{
    auth::AuthUser,
    response::{error_response, found, service_error},
    routes::{common::RecordId, users::common::CreateUserForm},
};
use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::Response,
};
use services::user_service::{CreateUser, UserService};
use util::state::AppState;

/// POST /users/
///
/// ### Form Fields
/// - `username` (required, unique)
/// - `email` (valid address)
/// - `password` (at least 8 characters)
/// - `admin`: checkbox
///
/// ### Responses
/// - `302 Found` → `/users/`
/// - `400 Bad Request` with field errors in `data`
pub async fn create_user(
    State(app_state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Response {
    let input = CreateUser {
        admin: form.is_admin(),
        username: form.username,
        email: form.email,
        password: form.password,
    };

    match UserService::create_user(app_state.db(), input).await {
        Ok(_) => found("/users/"),
        Err(e) => service_error(e),
    }
}

/// POST /users/{id}/delete/
///
/// Deletes the account. Tickets the user created go with it (along with
/// their comments), as do the user's own comments; tickets assigned to the
/// user become unassigned.
///
/// ### Responses
/// - `302 Found` → `/users/`
/// - `400 Bad Request` when deleting your own account
/// - `404 Not Found`
pub async fn delete_user(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    if id == claims.sub {
        return error_response(StatusCode::BAD_REQUEST, "You cannot delete your own account");
    }

    match UserService::delete_user(app_state.db(), id).await {
        Ok(()) => found("/users/"),
        Err(e) => service_error(e),
    }
}
