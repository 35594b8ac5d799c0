//! Create `product` table with FK to `user`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(uuid(Product::Id).primary_key())
                    .col(uuid(Product::UserId).not_null())
                    .col(string_len(Product::Name, 255).not_null())
                    .col(double(Product::Price).not_null())
                    .col(big_integer(Product::Barcode).not_null())
                    .col(integer(Product::Quantity).not_null().default(0))
                    .col(timestamp_with_time_zone(Product::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_user")
                            .from(Product::Table, Product::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product { Table, Id, UserId, Name, Price, Barcode, Quantity, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
