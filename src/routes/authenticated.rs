use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get},
};

/// Authenticated Router Module
///
/// Everything under `/profile`. The `auth_middleware` layer in `create_router`
/// rejects anonymous requests with 401 before any handler runs, and each
/// handler scopes its repository calls to the caller's own id.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /profile
        // Username, full name, email, avatar and the custom question count.
        .route("/profile", get(handlers::get_profile))
        // GET/POST /profile/questions
        // The caller's own interview questions.
        .route(
            "/profile/questions",
            get(handlers::get_custom_questions).post(handlers::add_custom_question),
        )
        // DELETE /profile/questions/{id}
        // Owner-only delete.
        .route(
            "/profile/questions/{id}",
            delete(handlers::delete_custom_question),
        )
}
