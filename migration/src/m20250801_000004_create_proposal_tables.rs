use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AllocationProposals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AllocationProposals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AllocationProposals::ProjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AllocationProposals::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(AllocationProposals::WorkHours)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AllocationProposals::Comment).text().null())
                    .col(
                        ColumnDef::new(AllocationProposals::ProposedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AllocationProposals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allocation_proposals_project_id")
                            .from(AllocationProposals::Table, AllocationProposals::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allocation_proposals_user_id")
                            .from(AllocationProposals::Table, AllocationProposals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 同時作成による重複提案を防ぐ
        manager
            .create_index(
                Index::create()
                    .name("idx_allocation_proposals_user_project")
                    .table(AllocationProposals::Table)
                    .col(AllocationProposals::UserId)
                    .col(AllocationProposals::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AllocationProposalRoles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AllocationProposalRoles::ProposalId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AllocationProposalRoles::CustomRoleId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(AllocationProposalRoles::ProposalId)
                            .col(AllocationProposalRoles::CustomRoleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allocation_proposal_roles_proposal_id")
                            .from(
                                AllocationProposalRoles::Table,
                                AllocationProposalRoles::ProposalId,
                            )
                            .to(AllocationProposals::Table, AllocationProposals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_allocation_proposal_roles_custom_role_id")
                            .from(
                                AllocationProposalRoles::Table,
                                AllocationProposalRoles::CustomRoleId,
                            )
                            .to(CustomRoles::Table, CustomRoles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DeallocationProposals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeallocationProposals::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DeallocationProposals::ProjectId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeallocationProposals::UserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DeallocationProposals::Reason).text().null())
                    .col(
                        ColumnDef::new(DeallocationProposals::ProposedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeallocationProposals::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deallocation_proposals_project_id")
                            .from(
                                DeallocationProposals::Table,
                                DeallocationProposals::ProjectId,
                            )
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deallocation_proposals_user_id")
                            .from(DeallocationProposals::Table, DeallocationProposals::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_deallocation_proposals_user_project")
                    .table(DeallocationProposals::Table)
                    .col(DeallocationProposals::UserId)
                    .col(DeallocationProposals::ProjectId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeallocationProposals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AllocationProposalRoles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AllocationProposals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AllocationProposals {
    Table,
    Id,
    ProjectId,
    UserId,
    WorkHours,
    Comment,
    ProposedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AllocationProposalRoles {
    Table,
    ProposalId,
    CustomRoleId,
}

#[derive(DeriveIden)]
enum DeallocationProposals {
    Table,
    Id,
    ProjectId,
    UserId,
    Reason,
    ProposedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum CustomRoles {
    Table,
    Id,
}
