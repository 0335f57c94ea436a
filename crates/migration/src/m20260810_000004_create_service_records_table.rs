use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20260810_000001_create_users_table::Users,
    m20260810_000002_create_customers_table::Customers,
    m20260810_000003_create_machines_table::Machines,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceRecords::Table)
                    .if_not_exists()
                    .col(uuid(ServiceRecords::Id).primary_key())
                    .col(uuid(ServiceRecords::CustomerId))
                    .col(uuid(ServiceRecords::MachineId))
                    .col(uuid(ServiceRecords::CreatedById))
                    .col(timestamp_with_time_zone(ServiceRecords::PurchaseDate))
                    .col(timestamp_with_time_zone(ServiceRecords::WarrantyExpiresAt))
                    .col(double(ServiceRecords::PendingAmount).default(0.0))
                    .col(string(ServiceRecords::Status))
                    .col(json_binary(ServiceRecords::Kpis))
                    .col(timestamp_with_time_zone(ServiceRecords::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(ServiceRecords::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_customer")
                            .from(ServiceRecords::Table, ServiceRecords::CustomerId)
                            .to(Customers::Table, Customers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_machine")
                            .from(ServiceRecords::Table, ServiceRecords::MachineId)
                            .to(Machines::Table, Machines::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_records_created_by")
                            .from(ServiceRecords::Table, ServiceRecords::CreatedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_records_customer")
                    .table(ServiceRecords::Table)
                    .col(ServiceRecords::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_records_warranty_expires")
                    .table(ServiceRecords::Table)
                    .col(ServiceRecords::WarrantyExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ServiceRecords::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ServiceRecords {
    Table,
    Id,
    CustomerId,
    MachineId,
    CreatedById,
    PurchaseDate,
    WarrantyExpiresAt,
    PendingAmount,
    Status,
    Kpis,
    CreatedAt,
    UpdatedAt,
}
