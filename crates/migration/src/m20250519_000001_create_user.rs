//! Create `user` table.
//!
//! Farmers; `email` and `phone_number` carry named unique indexes so that
//! violations can be traced back to the offending field.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(uuid(User::Id).primary_key())
                    .col(string_len(User::FirstName, 128).not_null())
                    .col(string_len_null(User::MiddleName, 128))
                    .col(string_len(User::LastName, 128).not_null())
                    .col(string_len(User::Gender, 16).not_null())
                    .col(string_len(User::Dob, 10).not_null())
                    .col(string_len(User::ResidenceCounty, 128).not_null())
                    .col(string_len(User::ResidenceLocation, 128).not_null())
                    .col(string_len(User::Email, 255).not_null())
                    .col(string_len(User::BusinessNumber, 32).not_null())
                    .col(string_len(User::PhoneNumber, 32).not_null())
                    .col(string_len(User::Pin, 255).not_null())
                    .col(timestamp_with_time_zone(User::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(User::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_user_email")
                    .table(User::Table)
                    .col(User::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_user_phone_number")
                    .table(User::Table)
                    .col(User::PhoneNumber)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    FirstName,
    MiddleName,
    LastName,
    Gender,
    Dob,
    ResidenceCounty,
    ResidenceLocation,
    Email,
    BusinessNumber,
    PhoneNumber,
    Pin,
    CreatedAt,
    UpdatedAt,
}
