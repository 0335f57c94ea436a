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
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(uuid(Reports::Id).primary_key())
                    .col(uuid(Reports::ServiceRecordId))
                    .col(uuid(Reports::EngineerId))
                    .col(json_binary(Reports::ReportData))
                    .col(json_binary(Reports::ScanData))
                    .col(string_null(Reports::ManualUrl))
                    .col(string_null(Reports::EDrawingsUrl))
                    .col(timestamp_with_time_zone(Reports::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Reports::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_service_record")
                            .from(Reports::Table, Reports::ServiceRecordId)
                            .to(ServiceRecords::Table, ServiceRecords::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reports_engineer")
                            .from(Reports::Table, Reports::EngineerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reports_service_record")
                    .table(Reports::Table)
                    .col(Reports::ServiceRecordId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Reports {
    Table,
    Id,
    ServiceRecordId,
    EngineerId,
    ReportData,
    ScanData,
    ManualUrl,
    EDrawingsUrl,
    CreatedAt,
    UpdatedAt,
}
