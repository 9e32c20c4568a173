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
pub struct PostFilter {
    pub category_id: Option<i64>,
}

pub async fn list_categories(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.post_service.list_categories(principal.user_id).await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Json(request): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = state
        .post_service
        .create_category(principal.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_posts(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Query(filter): Query<PostFilter>,
) -> ApiResult<Json<Vec<Post>>> {
    let posts = state
        .post_service
        .list_posts(principal.user_id, filter.category_id)
        .await?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Post>> {
    let post = state.post_service.get_post(principal.user_id, id).await?;
    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Json(request): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<Post>)> {
    let post = state
        .post_service
        .create_post(principal.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePostRequest>,
) -> ApiResult<Json<Post>> {
    let post = state
        .post_service
        .update_post(principal.user_id, id, request)
        .await?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.post_service.delete_post(principal.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<Vec<Comment>>> {
    let comments = state
        .post_service
        .list_comments(principal.user_id, post_id)
        .await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path(post_id): Path<i64>,
    Json(request): Json<CommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = state
        .post_service
        .create_comment(principal.user_id, post_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(request): Json<CommentRequest>,
) -> ApiResult<Json<Comment>> {
    let comment = state
        .post_service
        .update_comment(principal.user_id, post_id, comment_id, request)
        .await?;
    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    axum::Extension(principal): axum::Extension<Principal>,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> ApiResult<StatusCode> {
    state
        .post_service
        .delete_comment(principal.user_id, post_id, comment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
