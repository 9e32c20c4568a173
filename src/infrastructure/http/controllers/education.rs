use crate::{
    domain::entities::*,
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationFilter {
    pub user_id: Option<i64>,
}

pub async fn list_education(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(filter): Query<EducationFilter>,
) -> ApiResult<Json<Vec<Education>>> {
    let records = state
        .education_service
        .list_education(principal.user_id, filter.user_id)
        .await?;
    Ok(Json(records))
}

pub async fn get_education(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Education>> {
    let record = state
        .education_service
        .get_education(principal.user_id, id)
        .await?;
    Ok(Json(record))
}

pub async fn create_education(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(request): Json<CreateEducationRequest>,
) -> ApiResult<(StatusCode, Json<Education>)> {
    let record = state
        .education_service
        .create_education(principal.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update_education(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEducationRequest>,
) -> ApiResult<Json<Education>> {
    let record = state
        .education_service
        .update_education(principal.user_id, id, request)
        .await?;
    Ok(Json(record))
}

pub async fn delete_education(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .education_service
        .delete_education(principal.user_id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
