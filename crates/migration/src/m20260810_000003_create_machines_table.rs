use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Machines::Table)
                    .if_not_exists()
                    .col(uuid(Machines::Id).primary_key())
                    .col(string(Machines::Name))
                    .col(string(Machines::Category))
                    .col(string(Machines::Brand))
                    .col(integer(Machines::WarrantyTimeInMonths))
                    .col(string_null(Machines::SerialNumber))
                    .col(timestamp_with_time_zone(Machines::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Machines::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Serial numbers are unique within a brand, not globally.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_machines_brand_serial")
                    .table(Machines::Table)
                    .col(Machines::Brand)
                    .col(Machines::SerialNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_machines_category")
                    .table(Machines::Table)
                    .col(Machines::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Machines::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Machines {
    Table,
    Id,
    Name,
    Category,
    Brand,
    WarrantyTimeInMonths,
    SerialNumber,
    CreatedAt,
    UpdatedAt,
}
