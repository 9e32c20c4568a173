use crate::application::services::{
    AuthService, AwardService, EducationService, PermissionService, PostService, RoleService,
    UserService,
};
use crate::domain::entities::Principal;
use crate::domain::services::TokenService;
use crate::infrastructure::http::middleware::error::ApiError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;

/// Name of the cookie carrying the access token.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub cookie_secure: bool,
    pub permission_service: PermissionService,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub role_service: RoleService,
    pub post_service: PostService,
    pub award_service: AwardService,
    pub education_service: EducationService,
}

/// Authenticates the request from the `token` cookie or an
/// `Authorization: Bearer` header. On success the [`Principal`] and the
/// verified claims are available to handlers as request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match jar.get(TOKEN_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_string(),
        _ => bearer_token(&request).ok_or_else(|| {
            metrics::counter!("auth_failures_total", "reason" => "missing_token").increment(1);
            ApiError::Unauthorized
        })?,
    };

    let claims = state.tokens.verify_token(&token).map_err(|_| {
        metrics::counter!("auth_failures_total", "reason" => "invalid_token").increment(1);
        tracing::warn!("Rejected invalid or expired token for {}", request.uri().path());
        ApiError::InvalidToken
    })?;

    request.extensions_mut().insert(Principal {
        user_id: claims.user_id,
        role_id: claims.role_id,
    });
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
