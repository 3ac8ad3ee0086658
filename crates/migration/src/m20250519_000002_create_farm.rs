//! Create `farm` table with FK to `user`.
//!
//! Deleting a user that still owns farms is refused (`RESTRICT`).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Farm::Table)
                    .if_not_exists()
                    .col(uuid(Farm::Id).primary_key())
                    .col(string_len(Farm::Name, 255).not_null())
                    .col(string_len(Farm::County, 128).not_null())
                    .col(string_len(Farm::AdministrativeLocation, 128).not_null())
                    .col(double(Farm::Size).not_null())
                    .col(string_len(Farm::Ownership, 64).not_null())
                    .col(
                        ColumnDef::new(Farm::FarmingTypes)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(uuid(Farm::UserId).not_null())
                    .col(timestamp_with_time_zone(Farm::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Farm::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farm_user")
                            .from(Farm::Table, Farm::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Farm::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Farm {
    Table,
    Id,
    Name,
    County,
    AdministrativeLocation,
    Size,
    Ownership,
    FarmingTypes,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum User { Table, Id }
