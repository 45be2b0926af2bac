use crate::category::{Category, CategoryService, CategoryServiceError};
use crate::web::AppState;
use crate::web::api::ErrorResponse;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// JSON representation of a Category for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryJson {
    /// Unique identifier for the category
    pub id: Uuid,
    /// Display name, unique across categories
    pub name: String,
}

impl From<Category> for CategoryJson {
    fn from(category: Category) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_string(),
        }
    }
}

/// API response for seeding the default categories.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SeedResponse {
    pub message: String,
    /// Categories created by this request
    pub inserted: Vec<CategoryJson>,
    /// Every category after seeding
    pub categories: Vec<CategoryJson>,
}

impl IntoResponse for CategoryServiceError {
    fn into_response(self) -> Response {
        tracing::error!("Category request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(
                "An unexpected error occurred while processing your request".to_string(),
            )),
        )
            .into_response()
    }
}

/// Handler for GET /api/categories - Returns all categories.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Successfully retrieved categories", body = [CategoryJson]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn get_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryJson>>, CategoryServiceError> {
    let categories = CategoryService::new(&state.db).get_all_categories().await?;
    Ok(Json(
        categories.into_iter().map(CategoryJson::from).collect(),
    ))
}

/// Handler for POST /api/categories/seed - Inserts any missing default categories.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/categories/seed",
    responses(
        (status = 200, description = "Default categories are present", body = SeedResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Categories"
)]
pub async fn seed_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<SeedResponse>, CategoryServiceError> {
    let service = CategoryService::new(&state.db);
    let inserted = service.seed_categories().await?;
    let categories = service.get_all_categories().await?;

    Ok(Json(SeedResponse {
        message: "Categories seeded successfully".to_string(),
        inserted: inserted.into_iter().map(CategoryJson::from).collect(),
        categories: categories.into_iter().map(CategoryJson::from).collect(),
    }))
}

/// Creates and returns the categories API router.
pub fn create_category_router(state: AppState) -> Router {
    Router::new()
        .route("/api/categories", get(get_categories_handler))
        .route("/api/categories/seed", post(seed_categories_handler))
        .with_state(state)
}
