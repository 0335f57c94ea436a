use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(uuid(Customers::Id).primary_key())
                    .col(string(Customers::Uid).unique_key())
                    .col(string(Customers::Name))
                    .col(string(Customers::Phone))
                    .col(string_null(Customers::Email))
                    .col(text_null(Customers::Address))
                    .col(timestamp_with_time_zone(Customers::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp_with_time_zone(Customers::UpdatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customers_name")
                    .table(Customers::Table)
                    .col(Customers::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Customers {
    Table,
    Id,
    Uid,
    Name,
    Phone,
    Email,
    Address,
    CreatedAt,
    UpdatedAt,
}
