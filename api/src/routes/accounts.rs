//! Session routes.
//!
//! - `GET  /accounts/login/`  → `login_form` (public)
//! - `POST /accounts/login/`  → `login` (public)
//! - `POST /accounts/logout/` → `logout` (login required)

use crate::{
    auth::{AuthUser, SESSION_COOKIE, generate_jwt},
    response::{ApiResponse, FieldErrors, error_response, found, service_error},
};
use axum::{
    Extension, Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};
use services::user_service::UserService;
use util::state::AppState;
use validator::Validate;

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/accounts/login/", get(login_form).post(login))
}

pub fn logout_routes() -> Router<AppState> {
    Router::new().route("/accounts/logout/", post(logout))
}

/// Only same-site absolute paths are followed after login.
fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n.to_owned(),
        _ => "/".to_owned(),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

#[derive(Serialize)]
pub struct LoginFormResponse {
    pub next: String,
}

/// GET /accounts/login/
///
/// Returns where a successful login will redirect to.
pub async fn login_form(Query(query): Query<LoginQuery>) -> Response {
    let data = LoginFormResponse {
        next: safe_next(query.next.as_deref()),
    };
    (StatusCode::OK, Json(ApiResponse::success(data, "Login required"))).into_response()
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    #[serde(default)]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// POST /accounts/login/
///
/// ### Form Fields
/// - `username`, `password` (required)
/// - `next`: path to continue to (defaults to `/`)
///
/// ### Responses
/// - `302 Found` → `next`, with the `sessionid` cookie set
/// - `400 Bad Request` on missing fields or wrong credentials
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    if let Err(errors) = form.validate() {
        return service_error(errors.into());
    }

    let user = match UserService::verify_credentials(app_state.db(), &form.username, &form.password).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(username = %form.username.trim(), "Failed login");
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error_with(
                    FieldErrors::new(),
                    "Please enter a correct username and password.",
                )),
            )
                .into_response();
        }
        Err(e) => return service_error(e),
    };

    let (token, _expires_at) = match generate_jwt(user.id, user.admin) {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(error = %e, "Token encoding failed");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Could not start session");
        }
    };

    tracing::info!(user_id = user.id, "User logged in");
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    (jar.add(cookie), found(safe_next(form.next.as_deref()))).into_response()
}

/// POST /accounts/logout/
///
/// Clears the session cookie and redirects to the login page.
pub async fn logout(
    Extension(AuthUser(claims)): Extension<AuthUser>,
    jar: CookieJar,
) -> Response {
    tracing::info!(user_id = claims.sub, "User logged out");
    // Always send the expired cookie; Bearer sessions have no original to remove.
    let mut removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    removal.make_removal();
    (jar.add(removal), found("/accounts/login/")).into_response()
}
