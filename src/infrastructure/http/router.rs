use crate::infrastructure::http as api;
use crate::infrastructure::http::middleware::{require_auth, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Build protected routes (require authentication)
    let protected = Router::new()
        .route("/api/auth/logout", post(api::auth::logout))
        .route("/api/auth/me", get(api::auth::me))
        .route("/api/auth/password", put(api::auth::change_password))
        // User administration
        .route("/api/admin/users", get(api::users::list_users))
        .route(
            "/api/admin/users/pending",
            get(api::users::list_pending_users),
        )
        .route(
            "/api/admin/users/:id",
            get(api::users::get_user)
                .patch(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .route(
            "/api/admin/users/:id/approve",
            post(api::users::review_registration),
        )
        // Roles
        .route(
            "/api/admin/roles",
            get(api::roles::list_roles).post(api::roles::create_role),
        )
        .route(
            "/api/admin/roles/transfer",
            post(api::roles::transfer_role),
        )
        .route(
            "/api/admin/roles/:id",
            get(api::roles::get_role)
                .put(api::roles::update_role)
                .delete(api::roles::delete_role),
        )
        .route(
            "/api/admin/permissions",
            get(api::roles::list_permissions),
        )
        // Board
        .route(
            "/api/categories",
            get(api::posts::list_categories).post(api::posts::create_category),
        )
        .route(
            "/api/posts",
            get(api::posts::list_posts).post(api::posts::create_post),
        )
        .route(
            "/api/posts/:id",
            get(api::posts::get_post)
                .put(api::posts::update_post)
                .delete(api::posts::delete_post),
        )
        .route(
            "/api/posts/:id/comments",
            get(api::posts::list_comments).post(api::posts::create_comment),
        )
        .route(
            "/api/posts/:id/comments/:comment_id",
            put(api::posts::update_comment).delete(api::posts::delete_comment),
        )
        // Awards
        .route(
            "/api/awards",
            get(api::awards::list_awards).post(api::awards::create_award),
        )
        .route(
            "/api/awards/:id",
            get(api::awards::get_award)
                .put(api::awards::update_award)
                .delete(api::awards::delete_award),
        )
        // Education history
        .route(
            "/api/education",
            get(api::education::list_education).post(api::education::create_education),
        )
        .route(
            "/api/education/:id",
            get(api::education::get_education)
                .put(api::education::update_education)
                .delete(api::education::delete_education),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    // Build public routes
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/register", post(api::auth::register))
        .route("/api/auth/login", post(api::auth::login))
        .merge(protected)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
