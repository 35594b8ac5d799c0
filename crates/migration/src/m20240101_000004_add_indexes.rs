use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Product: index on user_id for owner-scoped listings
        manager
            .create_index(
                Index::create()
                    .name("idx_product_user")
                    .table(Product::Table)
                    .col(Product::UserId)
                    .to_owned(),
            )
            .await?;

        // Product: composite unique (user_id, barcode). A barcode is unique
        // within one owner's inventory; owners may reuse each other's codes.
        manager
            .create_index(
                Index::create()
                    .name("uniq_product_user_barcode")
                    .table(Product::Table)
                    .col(Product::UserId)
                    .col(Product::Barcode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Credentials: one row per user
        manager
            .create_index(
                Index::create()
                    .name("uniq_user_credentials_user")
                    .table(UserCredentials::Table)
                    .col(UserCredentials::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_user").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_product_user_barcode")
                    .table(Product::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("uniq_user_credentials_user")
                    .table(UserCredentials::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Product { Table, UserId, Barcode }

#[derive(DeriveIden)]
enum UserCredentials { Table, UserId }
