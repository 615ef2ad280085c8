use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Read-only content endpoints plus the sign-up gateway. Nothing here needs
/// an identity; unknown document or question set ids resolve to 404.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // GET /
        // Site name, description and the navigation bar.
        .route("/", get(handlers::get_home))
        // POST /register
        // Sign-up proxy to the external auth provider.
        .route("/register", post(handlers::register_user))
        // GET /documents
        // One card per top-level document.
        .route("/documents", get(handlers::get_documents))
        // GET /documents/{*path}
        // Nested documents, e.g. /documents/design-patterns/creational/singleton.
        .route("/documents/{*path}", get(handlers::get_document))
        // GET /interview-questions
        // One card per question set.
        .route("/interview-questions", get(handlers::get_technologies))
        // GET /interview-questions/{id}?filter=&sort=&order=&page=&page_size=&columns=
        .route("/interview-questions/{id}", get(handlers::get_questions))
        // GET /interview-questions/{id}/{number}
        .route(
            "/interview-questions/{id}/{number}",
            get(handlers::get_question),
        )
        // GET /breadcrumbs?path=/documents/oop/about
        .route("/breadcrumbs", get(handlers::get_breadcrumbs))
}
