use crate::auth::claims::AuthUser;
use crate::response::{error_response, login_redirect, service_error};
use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use services::user_service::UserService;
use util::state::AppState;

/// Login guard for every non-public route.
///
/// Accepts a session token whose user still exists and inserts the matching
/// [`AuthUser`] into request extensions. Anything else is redirected to the
/// login page with `next` set to the requested path.
pub async fn require_login(
    State(app_state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned());

    let Ok(AuthUser(claims)) = AuthUser::from_request_parts(&mut parts, &app_state).await else {
        return login_redirect(&target);
    };

    let user = match UserService::find_by_id(app_state.db(), claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::warn!(user_id = claims.sub, "Session for unknown user");
            return login_redirect(&target);
        }
        Err(e) => return service_error(e),
    };

    // The stored flag wins over the one baked into the token.
    let claims = crate::auth::Claims {
        admin: user.admin,
        ..claims
    };

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(AuthUser(claims));
    next.run(req).await
}

/// Admin-only guard. Must run inside [`require_login`].
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<AuthUser>() {
        Some(AuthUser(claims)) if claims.admin => next.run(req).await,
        Some(_) => error_response(StatusCode::FORBIDDEN, "Admin access required"),
        None => login_redirect(req.uri().path()),
    }
}
