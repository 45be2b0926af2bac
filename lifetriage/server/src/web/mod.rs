use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use migration::MigratorTrait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::category::CategoryService;
use crate::category::api::create_category_router;
use crate::config::Config;
use crate::task::api::create_task_router;

pub mod api;

/// State shared by every handler: the store's connection pool.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

/// Store reachability report returned by `/health/db`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DbHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DbHealth {
    fn healthy(db_version: String) -> Self {
        Self {
            status: "healthy".to_string(),
            db_version: Some(db_version),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            db_version: None,
            error: Some(error),
        }
    }
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(config.connect_options()).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    CategoryService::new(&db).seed_categories().await?;

    let app = create_app(AppState::new(db));
    axum::serve(listener, app).await?;
    Ok(())
}

/// Builds the full application router: the JSON API, health checks and API docs.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(create_task_router(state.clone()))
        .merge(create_category_router(state.clone()))
        .merge(create_health_router(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api::ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Creates the router for the liveness and store health checks.
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .route("/health/db", axum::routing::get(db_health_handler))
        .with_state(state)
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[tracing::instrument(skip(state))]
pub async fn db_health_handler(State(state): State<AppState>) -> (StatusCode, Json<DbHealth>) {
    match database_version(&state.db).await {
        Ok(version) => (StatusCode::OK, Json(DbHealth::healthy(version))),
        Err(err) => {
            tracing::error!("Database health check failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DbHealth::unhealthy(err.to_string())),
            )
        }
    }
}

async fn database_version(db: &DatabaseConnection) -> Result<String, DbErr> {
    let statement = Statement::from_string(DbBackend::Postgres, "SELECT version()");
    let row = db
        .query_one(statement)
        .await?
        .ok_or_else(|| DbErr::Custom("SELECT version() returned no rows".to_string()))?;
    row.try_get_by_index::<String>(0)
}
