use crate::{
    domain::entities::*,
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

pub async fn list_pending_users(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_pending(principal.user_id).await?;
    Ok(Json(users))
}

pub async fn review_registration(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(request): Json<ApproveUserRequest>,
) -> ApiResult<Json<Value>> {
    let approved = state
        .user_service
        .review_registration(principal.user_id, user_id, request.approve)
        .await?;

    let body = match approved {
        Some(user) => json!({ "message": "User approved", "user": user }),
        None => json!({ "message": "User registration rejected" }),
    };
    Ok(Json(body))
}

pub async fn list_users(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_users(principal.user_id).await?;
    Ok(Json(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .get_user(principal.user_id, user_id)
        .await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(principal.user_id, user_id, request)
        .await?;
    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete_user(principal.user_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
