use crate::category::api::CategoryJson;
use crate::task::{NewTask, Task, TaskPatch, TaskService, TaskServiceError};
use crate::web::AppState;
use crate::web::api::{ErrorResponse, MessageResponse};
use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// JSON representation of a Task for API responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskJson {
    /// Unique identifier for the task
    pub id: Uuid,
    pub description: String,
    pub category_id: Option<Uuid>,
    /// The category the task is filed under, resolved from `category_id`
    pub category: Option<CategoryJson>,
    pub priority: i32,
    pub completed: bool,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<FixedOffset>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            description: task.description().to_string(),
            category_id: task.category_id(),
            category: task.category().cloned().map(CategoryJson::from),
            priority: task.priority(),
            completed: task.completed(),
            created_at: task.created_at(),
        }
    }
}

/// Query parameters for listing tasks.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TasksQuery {
    /// Only return tasks in the category with this exact name
    #[serde(default)]
    category: Option<String>,
}

impl IntoResponse for TaskServiceError {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            TaskServiceError::Validation(message) => {
                tracing::warn!("Rejected task request: {}", message);
                (StatusCode::BAD_REQUEST, message.clone())
            }
            TaskServiceError::TaskNotFound => {
                tracing::warn!("Task not found");
                (StatusCode::NOT_FOUND, self.to_string())
            }
            TaskServiceError::Database(err) => {
                tracing::error!("Task request failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred while processing your request".to_string(),
                )
            }
        };

        (status_code, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<JsonRejection> for TaskServiceError {
    fn from(rejection: JsonRejection) -> Self {
        TaskServiceError::Validation(rejection.body_text())
    }
}

// An ID that cannot be decoded from the path names no task.
impl From<PathRejection> for TaskServiceError {
    fn from(_: PathRejection) -> Self {
        TaskServiceError::TaskNotFound
    }
}

impl From<QueryRejection> for TaskServiceError {
    fn from(rejection: QueryRejection) -> Self {
        TaskServiceError::Validation(rejection.body_text())
    }
}

/// Handler for GET /api/tasks - Returns all tasks, optionally filtered by category name.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TasksQuery),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 400, description = "Invalid query string", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_tasks_handler(
    State(state): State<AppState>,
    query: Result<Query<TasksQuery>, QueryRejection>,
) -> Result<Json<Vec<TaskJson>>, TaskServiceError> {
    let Query(query) = query?;
    let service = TaskService::new(&state.db);

    let tasks = match query.category {
        Some(category) => service.get_tasks_by_category(&category).await?,
        None => service.get_all_tasks().await?,
    };

    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for POST /api/tasks - Creates a task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Invalid task", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskJson>), TaskServiceError> {
    let Json(input) = payload?;
    let task = TaskService::new(&state.db).create_task(input).await?;
    Ok((StatusCode::CREATED, Json(TaskJson::from(task))))
}

/// Handler for GET /api/tasks/{id} - Returns a single task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskJson),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn get_task_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<TaskJson>, TaskServiceError> {
    let Path(id) = id?;
    let task = TaskService::new(&state.db).get_task_by_id(&id).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for PUT /api/tasks/{id} - Applies a partial update.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<TaskJson>, TaskServiceError> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let task = TaskService::new(&state.db).update_task(&id, patch).await?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /api/tasks/{id} - Deletes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task deleted", body = MessageResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, TaskServiceError> {
    let Path(id) = id?;
    TaskService::new(&state.db).delete_task(&id).await?;
    Ok(Json(MessageResponse::new("Task deleted".to_string())))
}

/// Creates and returns the tasks API router.
pub fn create_task_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tasks", get(get_tasks_handler).post(create_task_handler))
        .route(
            "/api/tasks/{id}",
            get(get_task_handler)
                .put(update_task_handler)
                .delete(delete_task_handler),
        )
        .with_state(state)
}
