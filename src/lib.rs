use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::path::Path;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Content layer: manifest, storage backends, loading and table shaping.
pub mod content;
pub mod registry;
pub mod storage;
pub mod table;
pub mod titles;

// Service plumbing.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;

// Routing split by access level (Public, Authenticated).
pub mod routes;
use auth::AuthUser;
use config::Env;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use error::AppError;
pub use registry::{ContentRegistry, RegistryState};
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{FsContentStore, MockContentStore, S3ContentStore, StorageState};

/// ApiDoc
///
/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_home, handlers::get_documents, handlers::get_document,
        handlers::get_technologies, handlers::get_questions, handlers::get_question,
        handlers::get_breadcrumbs, handlers::register_user, handlers::get_profile,
        handlers::get_custom_questions, handlers::add_custom_question,
        handlers::delete_custom_question
    ),
    components(
        schemas(
            models::SiteInfo, models::NavLink, models::CardItem, models::CardImage,
            models::Breadcrumb, models::DocumentResponse, models::QaPair,
            models::AnswerSegment, models::SegmentKind, models::DifficultyLabel,
            models::QuestionRow, models::QuestionPage, models::QuestionDetail,
            models::User, models::UserProfile, models::RegisterUserRequest,
            models::CustomQuestion, models::CreateCustomQuestionRequest, models::ErrorBody,
            table::SortColumn, table::SortOrder,
        )
    ),
    tags(
        (name = "devsage", description = "DevSage documents and interview questions API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, cheaply clonable container for every service a handler may need.
#[derive(Clone)]
pub struct AppState {
    /// Immutable document and question set hierarchy.
    pub registry: RegistryState,
    /// Profiles and custom questions (Postgres in production).
    pub repo: RepositoryState,
    /// Where MDX bodies, question JSON and images live (disk or S3).
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RegistryState {
    fn from_ref(app_state: &AppState) -> RegistryState {
        app_state.registry.clone()
    }
}

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Runs the `AuthUser` extractor ahead of the authenticated routes. A failed
/// extraction rejects with 401 and the handler never runs.
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles routes, middleware and state into the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let mut base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        );

    // In production images are presigned S3 URLs; locally they are served from disk.
    if state.config.env == Env::Local {
        let assets_dir = Path::new(&state.config.content_dir).join("assets");
        base_router = base_router.nest_service("/assets", ServeDir::new(assets_dir));
    }

    let base_router = base_router
        .fallback(handlers::not_found)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request `http_request` span so every log line of a request
/// carries its `x-request-id`.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
