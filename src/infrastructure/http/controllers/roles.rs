use crate::{
    domain::entities::*,
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

pub async fn list_roles(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state.role_service.list_roles(principal.user_id).await?;
    Ok(Json(roles))
}

pub async fn get_role(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state.role_service.get_role(principal.user_id, id).await?;
    Ok(Json(role))
}

pub async fn create_role(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Json(request): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleResponse>)> {
    let role = state
        .role_service
        .create_role(principal.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(role)))
}

pub async fn update_role(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<Json<RoleResponse>> {
    let role = state
        .role_service
        .update_role(principal.user_id, id, request)
        .await?;
    Ok(Json(role))
}

pub async fn delete_role(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.role_service.delete_role(principal.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn transfer_role(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Json(request): Json<TransferRoleRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    state
        .role_service
        .transfer_role(principal.user_id, request)
        .await?;
    Ok(Json(json!({ "message": "Role transferred successfully" })))
}

pub async fn list_permissions(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
) -> ApiResult<Json<Vec<Permission>>> {
    let permissions = state
        .role_service
        .list_permissions(principal.user_id)
        .await?;
    Ok(Json(permissions))
}
