use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkHours::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(WorkHours::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(WorkHours::UserId).uuid().not_null())
                    .col(ColumnDef::new(WorkHours::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(WorkHours::Hours).integer().not_null())
                    .col(
                        ColumnDef::new(WorkHours::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_hours_user_id")
                            .from(WorkHours::Table, WorkHours::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_hours_project_id")
                            .from(WorkHours::Table, WorkHours::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(WorkHours::Hours).between(1, 8))
                    .to_owned(),
            )
            .await?;

        // (user, project) ごとに1レコード
        manager
            .create_index(
                Index::create()
                    .name("idx_work_hours_user_project")
                    .table(WorkHours::Table)
                    .col(WorkHours::UserId)
                    .col(WorkHours::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkHours::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkHours {
    Table,
    Id,
    UserId,
    ProjectId,
    Hours,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}
