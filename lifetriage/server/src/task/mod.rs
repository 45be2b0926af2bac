use crate::category::Category;
use crate::entities::*;
use chrono::{DateTime, FixedOffset};
use sea_orm::*;
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;
use uuid::Uuid;

pub mod api;

/// Priority given to tasks created without one.
pub const DEFAULT_PRIORITY: i32 = 1;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: Uuid,
    description: String,
    category: Option<Category>,
    priority: i32,
    completed: bool,
    created_at: DateTime<FixedOffset>,
}

impl Task {
    pub fn new(
        id: Uuid,
        description: String,
        category: Option<Category>,
        priority: i32,
        completed: bool,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id,
            description,
            category,
            priority,
            completed,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category the task is filed under, if any.
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn category_id(&self) -> Option<Uuid> {
        self.category.as_ref().map(Category::id)
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<FixedOffset> {
        self.created_at
    }
}

impl From<(task::Model, Option<category::Model>)> for Task {
    fn from((model, category): (task::Model, Option<category::Model>)) -> Self {
        Task::new(
            model.id,
            model.description,
            category.map(Category::from),
            model.priority,
            model.completed,
            model.created_at,
        )
    }
}

/// Payload for creating a task.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct NewTask {
    /// What needs doing; must not be blank
    #[serde(default)]
    pub description: Option<String>,
    /// ID of an existing category
    #[serde(default)]
    pub category_id: Option<String>,
    /// Defaults to 1
    #[serde(default)]
    pub priority: Option<i32>,
    /// Defaults to false
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Partial update for a task.
///
/// The outer `Option` records whether a field was sent at all, the inner one
/// whether it was sent as `null`. Absent fields are left unchanged.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct TaskPatch {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    /// A category ID, or `null` to clear the category
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub category_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub priority: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Option<bool>>,
}

/// Marks a field as sent, keeping an explicit `null` distinct from absence.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A patch whose fields have all passed validation.
#[derive(Debug, Default, PartialEq)]
struct TaskChanges {
    description: Option<String>,
    category_id: Option<Option<Uuid>>,
    priority: Option<i32>,
    completed: Option<bool>,
}

impl TaskPatch {
    fn validate(self) -> Result<TaskChanges, TaskServiceError> {
        let description = match self.description {
            Some(description) => Some(validate_description(description)?),
            None => None,
        };
        let category_id = match self.category_id {
            Some(Some(category_id)) => Some(Some(parse_category_id(&category_id)?)),
            Some(None) => Some(None),
            None => None,
        };
        let priority = match self.priority {
            Some(Some(priority)) => Some(priority),
            Some(None) => return Err(null_field("priority")),
            None => None,
        };
        let completed = match self.completed {
            Some(Some(completed)) => Some(completed),
            Some(None) => return Err(null_field("completed")),
            None => None,
        };

        Ok(TaskChanges {
            description,
            category_id,
            priority,
            completed,
        })
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Client-supplied data breaks a rule; nothing was written.
    #[error("{0}")]
    Validation(String),
    /// No task has the requested ID.
    #[error("Task not found")]
    TaskNotFound,
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

fn validate_description(description: Option<String>) -> Result<String, TaskServiceError> {
    match description {
        Some(description) if !description.trim().is_empty() => Ok(description),
        _ => Err(TaskServiceError::Validation(
            "Description is required".to_string(),
        )),
    }
}

fn parse_category_id(category_id: &str) -> Result<Uuid, TaskServiceError> {
    Uuid::parse_str(category_id).map_err(|_| {
        TaskServiceError::Validation(format!("Invalid category ID '{}'", category_id))
    })
}

fn null_field(field: &str) -> TaskServiceError {
    TaskServiceError::Validation(format!("Field '{}' cannot be null", field))
}

/// Task IDs that do not parse can never match a row.
fn parse_task_id(id: &str) -> Result<Uuid, TaskServiceError> {
    Uuid::parse_str(id).map_err(|_| TaskServiceError::TaskNotFound)
}

/// Looks up a category inside the caller's transaction.
async fn find_category<C>(db: &C, category_id: Uuid) -> Result<category::Model, TaskServiceError>
where
    C: ConnectionTrait,
{
    category::Entity::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            TaskServiceError::Validation(format!("Category {} does not exist", category_id))
        })
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService<'_> {
        TaskService { db }
    }

    /// Creates a new task.
    ///
    /// # Arguments
    ///
    /// * `input` - The task to create. Only `description` is required.
    ///
    /// # Returns
    ///
    /// A `Result` containing the stored `Task` with its generated ID and
    /// creation time, or a `Validation` error if the input is rejected.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, input: NewTask) -> Result<Task, TaskServiceError> {
        let description = validate_description(input.description)?;
        let category_id = input
            .category_id
            .as_deref()
            .map(parse_category_id)
            .transpose()?;

        let txn = self.db.begin().await?;
        let category = match category_id {
            Some(category_id) => Some(find_category(&txn, category_id).await?),
            None => None,
        };

        let active_model = task::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            description: ActiveValue::Set(description),
            category_id: ActiveValue::Set(category_id),
            priority: ActiveValue::Set(input.priority.unwrap_or(DEFAULT_PRIORITY)),
            completed: ActiveValue::Set(input.completed.unwrap_or(false)),
            created_at: ActiveValue::NotSet,
        };
        let created_model = active_model.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!("Created task {}", created_model.id);
        Ok(Task::from((created_model, category)))
    }

    /// Retrieves all tasks in creation order, each with its category.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .find_also_related(category::Entity)
            .order_by_asc(task::Column::CreatedAt)
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// An ID that is not a valid UUID is reported as `TaskNotFound`.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: &str) -> Result<Task, TaskServiceError> {
        let id = parse_task_id(id)?;
        let task = task::Entity::find_by_id(id)
            .find_also_related(category::Entity)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound)?;
        Ok(Task::from(task))
    }

    /// Applies a partial update to a task.
    ///
    /// Every provided field is validated before the store is touched, and the
    /// changes are written in a single transaction.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `patch` - The fields to change; absent fields keep their value.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task`.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task, TaskServiceError> {
        let id = parse_task_id(id)?;
        let changes = patch.validate()?;

        let txn = self.db.begin().await?;
        let task_to_update = task::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(TaskServiceError::TaskNotFound)?;

        let mut active_model: task::ActiveModel = task_to_update.clone().into();
        if let Some(description) = changes.description {
            active_model.description = ActiveValue::Set(description);
        }
        if let Some(category_id) = changes.category_id {
            if let Some(category_id) = category_id {
                find_category(&txn, category_id).await?;
            }
            active_model.category_id = ActiveValue::Set(category_id);
        }
        if let Some(priority) = changes.priority {
            active_model.priority = ActiveValue::Set(priority);
        }
        if let Some(completed) = changes.completed {
            active_model.completed = ActiveValue::Set(completed);
        }

        let updated_model = if active_model.is_changed() {
            active_model.update(&txn).await?
        } else {
            task_to_update
        };
        let category = match updated_model.category_id {
            Some(category_id) => category::Entity::find_by_id(category_id).one(&txn).await?,
            None => None,
        };
        txn.commit().await?;

        Ok(Task::from((updated_model, category)))
    }

    /// Permanently deletes a task by its ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: &str) -> Result<(), TaskServiceError> {
        let id = parse_task_id(id)?;
        let result = task::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TaskServiceError::TaskNotFound);
        }
        tracing::info!("Deleted task {}", id);
        Ok(())
    }

    /// Retrieves the tasks filed under the category with exactly this name.
    ///
    /// Returns an empty list when no category has that name.
    #[tracing::instrument(skip(self))]
    pub async fn get_tasks_by_category(&self, name: &str) -> Result<Vec<Task>, TaskServiceError> {
        let tasks = task::Entity::find()
            .find_also_related(category::Entity)
            .filter(category::Column::Name.eq(name))
            .order_by_asc(task::Column::CreatedAt)
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }
}
