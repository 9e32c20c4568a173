use crate::{
    domain::entities::*,
    infrastructure::http::middleware::{ApiResult, AppState},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardFilter {
    pub user_id: Option<i64>,
}

pub async fn list_awards(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Query(filter): Query<AwardFilter>,
) -> ApiResult<Json<Vec<Award>>> {
    let awards = state
        .award_service
        .list_awards(principal.user_id, filter.user_id)
        .await?;
    Ok(Json(awards))
}

pub async fn get_award(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Award>> {
    let award = state.award_service.get_award(principal.user_id, id).await?;
    Ok(Json(award))
}

pub async fn create_award(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Json(request): Json<CreateAwardRequest>,
) -> ApiResult<(StatusCode, Json<Award>)> {
    let award = state
        .award_service
        .create_award(principal.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(award)))
}

pub async fn update_award(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAwardRequest>,
) -> ApiResult<Json<Award>> {
    let award = state
        .award_service
        .update_award(principal.user_id, id, request)
        .await?;
    Ok(Json(award))
}

pub async fn delete_award(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.award_service.delete_award(principal.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
