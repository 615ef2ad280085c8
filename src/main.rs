use devsage::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    registry::{ContentRegistry, RegistryState},
    repository::{PostgresRepository, RepositoryState},
    storage::{FsContentStore, S3ContentStore, StorageState},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, initializes logging, the content registry, storage
/// and the database, then serves the router until the process is stopped.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise verbose for this crate.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "devsage=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Content registry: the compiled-in manifest unless CONTENT_MANIFEST overrides it.
    let registry = match &config.manifest_path {
        Some(path) => ContentRegistry::from_file(path),
        None => ContentRegistry::builtin(),
    }
    .expect("FATAL: content manifest is invalid");
    tracing::info!(
        "Loaded {} documents and {} question sets",
        registry.documents().len(),
        registry.question_sets().len()
    );
    let registry = Arc::new(registry) as RegistryState;

    // 4. Database (profiles, custom questions)
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.db_url)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("FATAL: Failed to run database migrations.");

    let repo = Arc::new(PostgresRepository::new(pool)) as RepositoryState;

    // 5. Content storage: local directory or S3 bucket.
    let storage = match config.env {
        Env::Local => {
            tracing::info!("Serving content from {}", config.content_dir);
            Arc::new(FsContentStore::new(&config.content_dir)) as StorageState
        }
        Env::Production => {
            let s3 = S3ContentStore::new(
                &config.s3_endpoint,
                &config.s3_region,
                &config.s3_key,
                &config.s3_secret,
                &config.s3_bucket,
            )
            .await;
            Arc::new(s3) as StorageState
        }
    };

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState {
        registry,
        repo,
        storage,
        config,
    };

    // 6. Router and server
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
