use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;
use utoipa::ToSchema;

use unidesk_core::AppError;
use unidesk_core::permissions::{allowed_routes, get_permissions};
use unidesk_models::{LoginRequest, LoginResponse, MeResponse, MessageResponse};

use super::service::AuthService;
use crate::middleware::auth::RequireAuth;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Log in and receive a session
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; session cookie set", body = LoginResponse),
        (status = 400, description = "Bad request - validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;

    let cookie = Cookie::build((state.jwt_config.cookie_name.clone(), response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((jar.add(cookie), Json(response)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cookie cleared", body = MessageResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    let cookie = Cookie::build(state.jwt_config.cookie_name.clone()).path("/");
    (jar.remove(cookie), Json(MessageResponse::new("Logged out")))
}

/// The current principal with its permission set and allowed routes
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current session", body = MeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = []),
        ("session_cookie" = [])
    ),
    tag = "Authentication"
)]
#[instrument(skip(auth))]
pub async fn me(RequireAuth(auth): RequireAuth) -> Json<MeResponse> {
    let role = auth.role;
    Json(MeResponse {
        principal: auth.principal,
        permissions: get_permissions(role).clone(),
        allowed_routes: allowed_routes(role).iter().map(|r| r.to_string()).collect(),
    })
}
