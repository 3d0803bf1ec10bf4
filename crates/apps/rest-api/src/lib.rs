pub mod auth;
pub mod error;
pub mod routes;

use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::PgPool;
use user_feature::TokenSigner;

/// Application state shared across handlers
///
/// The pool and signer are constructed once at startup and injected; no
/// global connection state.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub signer: TokenSigner,
}

/// Health check handler
async fn health() -> &'static str {
    "OK"
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/todos", post(routes::todos::create_todo).get(routes::todos::list_todos))
        .route(
            "/todos/{id}",
            get(routes::todos::get_todo)
                .delete(routes::todos::delete_todo)
                .patch(routes::todos::update_todo),
        )
        .route("/users", post(routes::users::signup))
        .route("/users/login", post(routes::users::login))
        .route("/users/me", get(routes::users::me))
        .route("/users/me/token", delete(routes::users::logout))
        .route("/health", get(health))
        .with_state(state)
}
