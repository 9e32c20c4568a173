use crate::{
    domain::entities::*,
    infrastructure::http::middleware::{ApiResult, AppState, TOKEN_COOKIE},
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let user = state.auth_service.register(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Registration successful. Please wait for admin approval.",
            "user": user,
        })),
    ))
}

/// Returns the token in the body and also sets it as an HttpOnly cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    let response = state.auth_service.login(request).await?;

    let cookie = Cookie::build((TOKEN_COOKIE, response.access_token.clone()))
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(state.tokens.lifetime_secs()));

    Ok((jar.add(cookie), Json(response)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, Json(json!({ "message": "Logout successful" })))
}

pub async fn me(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
) -> ApiResult<Json<ProfileResponse>> {
    let profile = state.auth_service.profile(principal.user_id).await?;
    Ok(Json(profile))
}

pub async fn change_password(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Json<Value>> {
    state
        .auth_service
        .change_password(principal.user_id, request)
        .await?;
    Ok(Json(json!({ "message": "Password changed successfully" })))
}
