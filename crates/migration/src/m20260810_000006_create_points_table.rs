use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260810_000001_create_users_table::Users,
    m20260810_000004_create_service_records_table::ServiceRecords,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Points::Table)
                    .if_not_exists()
                    .col(uuid(Points::Id).primary_key())
                    .col(uuid(Points::ServiceRecordId))
                    .col(string(Points::Title))
                    .col(text_null(Points::Description))
                    .col(string(Points::Status))
                    .col(string(Points::Priority))
                    .col(uuid_null(Points::AssignedToId))
                    .col(uuid(Points::CreatedById))
                    .col(timestamp_with_time_zone_null(Points::DueDate))
                    .col(timestamp_with_time_zone_null(Points::CompletedAt))
                    .col(timestamp_with_time_zone(Points::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Points::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_service_record")
                            .from(Points::Table, Points::ServiceRecordId)
                            .to(ServiceRecords::Table, ServiceRecords::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_assigned_to")
                            .from(Points::Table, Points::AssignedToId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_points_created_by")
                            .from(Points::Table, Points::CreatedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_points_service_record")
                    .table(Points::Table)
                    .col(Points::ServiceRecordId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_points_assigned_to")
                    .table(Points::Table)
                    .col(Points::AssignedToId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_points_status")
                    .table(Points::Table)
                    .col(Points::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Points::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Points {
    Table,
    Id,
    ServiceRecordId,
    Title,
    Description,
    Status,
    Priority,
    AssignedToId,
    CreatedById,
    DueDate,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
