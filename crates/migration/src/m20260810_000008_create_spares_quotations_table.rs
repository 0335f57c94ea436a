use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SparesQuotations::Table)
                    .if_not_exists()
                    .col(uuid(SparesQuotations::Id).primary_key())
                    .col(string(SparesQuotations::CustomerName))
                    .col(string(SparesQuotations::MachineInfo))
                    .col(json_binary(SparesQuotations::PartDetails))
                    .col(double_null(SparesQuotations::QuotationAmount))
                    .col(string(SparesQuotations::Status))
                    .col(text_null(SparesQuotations::Notes))
                    .col(timestamp_with_time_zone(SparesQuotations::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(SparesQuotations::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_spares_quotations_status")
                    .table(SparesQuotations::Table)
                    .col(SparesQuotations::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SparesQuotations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum SparesQuotations {
    Table,
    Id,
    CustomerName,
    MachineInfo,
    PartDetails,
    QuotationAmount,
    Status,
    Notes,
    CreatedAt,
    UpdatedAt,
}
