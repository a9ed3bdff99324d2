use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Projects::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Projects::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(Projects::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Projects::Description).text().not_null())
                    .col(ColumnDef::new(Projects::Period).string_len(16).not_null())
                    .col(ColumnDef::new(Projects::StartDate).date().not_null())
                    .col(ColumnDef::new(Projects::DeadlineDate).date().null())
                    .col(
                        ColumnDef::new(Projects::Status)
                            .string_len(16)
                            .not_null()
                            .default("not_started"),
                    )
                    .col(
                        ColumnDef::new(Projects::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Projects::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_projects_organization_id")
                            .from(Projects::Table, Projects::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_organization_id")
                    .table(Projects::Table)
                    .col(Projects::OrganizationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CustomRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CustomRoles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CustomRoles::OrganizationId).uuid().not_null())
                    .col(ColumnDef::new(CustomRoles::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(CustomRoles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_custom_roles_organization_id")
                            .from(CustomRoles::Table, CustomRoles::OrganizationId)
                            .to(Organizations::Table, Organizations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProjectCustomRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectCustomRoles::ProjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectCustomRoles::CustomRoleId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProjectCustomRoles::ProjectId)
                            .col(ProjectCustomRoles::CustomRoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_custom_roles_project_id")
                            .from(ProjectCustomRoles::Table, ProjectCustomRoles::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_custom_roles_custom_role_id")
                            .from(ProjectCustomRoles::Table, ProjectCustomRoles::CustomRoleId)
                            .to(CustomRoles::Table, CustomRoles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 現在のメンバー
        manager
            .create_table(
                Table::create()
                    .table(ProjectUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProjectUsers::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(ProjectUsers::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(ProjectUsers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProjectUsers::ProjectId)
                            .col(ProjectUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_users_project_id")
                            .from(ProjectUsers::Table, ProjectUsers::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_users_user_id")
                            .from(ProjectUsers::Table, ProjectUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_project_users_user_id")
                    .table(ProjectUsers::Table)
                    .col(ProjectUsers::UserId)
                    .to_owned(),
            )
            .await?;

        // 過去のメンバー
        manager
            .create_table(
                Table::create()
                    .table(ProjectDeallocatedUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProjectDeallocatedUsers::ProjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectDeallocatedUsers::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProjectDeallocatedUsers::DeallocatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(ProjectDeallocatedUsers::ProjectId)
                            .col(ProjectDeallocatedUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_deallocated_users_project_id")
                            .from(
                                ProjectDeallocatedUsers::Table,
                                ProjectDeallocatedUsers::ProjectId,
                            )
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_project_deallocated_users_user_id")
                            .from(
                                ProjectDeallocatedUsers::Table,
                                ProjectDeallocatedUsers::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserCustomRoles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UserCustomRoles::UserId).uuid().not_null())
                    .col(ColumnDef::new(UserCustomRoles::ProjectId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserCustomRoles::CustomRoleId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(UserCustomRoles::UserId)
                            .col(UserCustomRoles::ProjectId)
                            .col(UserCustomRoles::CustomRoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_custom_roles_user_id")
                            .from(UserCustomRoles::Table, UserCustomRoles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_custom_roles_project_id")
                            .from(UserCustomRoles::Table, UserCustomRoles::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_custom_roles_custom_role_id")
                            .from(UserCustomRoles::Table, UserCustomRoles::CustomRoleId)
                            .to(CustomRoles::Table, CustomRoles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserCustomRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectDeallocatedUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProjectCustomRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CustomRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
    OrganizationId,
    Name,
    Description,
    Period,
    StartDate,
    DeadlineDate,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CustomRoles {
    Table,
    Id,
    OrganizationId,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ProjectCustomRoles {
    Table,
    ProjectId,
    CustomRoleId,
}

#[derive(DeriveIden)]
enum ProjectUsers {
    Table,
    ProjectId,
    UserId,
    JoinedAt,
}

#[derive(DeriveIden)]
enum ProjectDeallocatedUsers {
    Table,
    ProjectId,
    UserId,
    DeallocatedAt,
}

#[derive(DeriveIden)]
enum UserCustomRoles {
    Table,
    UserId,
    ProjectId,
    CustomRoleId,
}

#[derive(DeriveIden)]
enum Organizations {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
