use crate::entities::*;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

pub mod api;

/// Categories every store starts out with.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Health",
    "Work",
    "Relationships",
    "Finance",
    "Personal Growth",
];

#[derive(Debug, PartialEq, Clone, Eq, Hash)]
pub struct Category {
    id: Uuid,
    name: String,
}

impl Category {
    pub fn new(id: Uuid, name: String) -> Self {
        Self { id, name }
    }

    /// Returns the ID of the category.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the name of the category.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<category::Model> for Category {
    fn from(model: category::Model) -> Self {
        Category::new(model.id, model.name)
    }
}

/// Error type for CategoryService operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct CategoryService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl CategoryService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> CategoryService<'_> {
        CategoryService { db }
    }

    /// Retrieves all categories, ordered by name.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_categories(&self) -> Result<Vec<Category>, CategoryServiceError> {
        let categories = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(self.db)
            .await?
            .into_iter()
            .map(Category::from)
            .collect();
        Ok(categories)
    }

    /// Inserts every default category whose name is not already taken.
    ///
    /// Calling this repeatedly never duplicates a category: names that already
    /// exist are skipped by the unique index on `name`.
    ///
    /// # Returns
    ///
    /// A `Result` containing only the categories inserted by this call.
    #[tracing::instrument(skip(self))]
    pub async fn seed_categories(&self) -> Result<Vec<Category>, CategoryServiceError> {
        let txn = self.db.begin().await?;
        let mut inserted = Vec::new();

        for name in DEFAULT_CATEGORIES {
            let id = Uuid::new_v4();
            let active_model = category::ActiveModel {
                id: ActiveValue::Set(id),
                name: ActiveValue::Set(name.to_string()),
            };
            let rows_affected = category::Entity::insert(active_model)
                .on_conflict(
                    OnConflict::column(category::Column::Name)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await?;

            if rows_affected > 0 {
                inserted.push(Category::new(id, name.to_string()));
            }
        }

        txn.commit().await?;
        tracing::info!("Seeded {} new categories", inserted.len());
        Ok(inserted)
    }
}
