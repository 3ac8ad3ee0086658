use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Farm: index on owner
        manager
            .create_index(
                Index::create()
                    .name("idx_farm_user")
                    .table(Farm::Table)
                    .col(Farm::UserId)
                    .to_owned(),
            )
            .await?;

        // Listings are ordered newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_farm_created_at")
                    .table(Farm::Table)
                    .col(Farm::CreatedAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_user_created_at")
                    .table(User::Table)
                    .col(User::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_farm_user").table(Farm::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_farm_created_at").table(Farm::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_user_created_at").table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum User { Table, CreatedAt }

#[derive(DeriveIden)]
enum Farm { Table, UserId, CreatedAt }
