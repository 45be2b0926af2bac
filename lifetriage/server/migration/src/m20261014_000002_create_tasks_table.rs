use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const FK_TASKS_TO_CATEGORIES: &str = "fk-tasks-category_id";
const IDX_TASKS_CATEGORY_ID: &str = "idx-tasks-category_id";
const IDX_TASKS_CREATED_AT: &str = "idx-tasks-created_at";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tasks::Table)
                    .if_not_exists()
                    .col(uuid(Tasks::Id).primary_key())
                    .col(text(Tasks::Description))
                    .col(uuid_null(Tasks::CategoryId))
                    .col(integer(Tasks::Priority).default(1))
                    .col(boolean(Tasks::Completed).default(false))
                    .col(
                        timestamp_with_time_zone(Tasks::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_TASKS_TO_CATEGORIES)
                            .from(Tasks::Table, Tasks::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TASKS_CATEGORY_ID)
                    .table(Tasks::Table)
                    .col(Tasks::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_TASKS_CREATED_AT)
                    .table(Tasks::Table)
                    .col(Tasks::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Indexes and the foreign key go away with the table.
        manager
            .drop_table(Table::drop().table(Tasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Tasks {
    Table,
    Id,
    Description,
    CategoryId,
    Priority,
    Completed,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}
