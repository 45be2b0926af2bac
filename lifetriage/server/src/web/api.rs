use crate::category::api::{CategoryJson, SeedResponse};
use crate::task::api::TaskJson;
use crate::task::{NewTask, TaskPatch};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// JSON body of every API error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

/// JSON body for operations that only confirm success.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::task::api::get_tasks_handler,
        crate::task::api::create_task_handler,
        crate::task::api::get_task_handler,
        crate::task::api::update_task_handler,
        crate::task::api::delete_task_handler,
        crate::category::api::get_categories_handler,
        crate::category::api::seed_categories_handler,
    ),
    components(schemas(
        TaskJson,
        NewTask,
        TaskPatch,
        CategoryJson,
        SeedResponse,
        ErrorResponse,
        MessageResponse
    )),
    tags(
        (name = "Tasks", description = "Create, list, update and delete tasks"),
        (name = "Categories", description = "Category listing and seeding")
    )
)]
pub struct ApiDoc;
