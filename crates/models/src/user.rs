use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::farm;
use crate::validate::EMAIL_MAX;

/// Stored farmer record. Deliberately not `Serialize`: outbound shapes go
/// through the service layer's redacted view, which has no `pin`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Gender,
    pub dob: String,
    pub residence_county: String,
    pub residence_location: String,
    pub email: String,
    pub business_number: String,
    pub phone_number: String,
    /// Argon2 PHC string.
    pub pin: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Gender {
    #[sea_orm(string_value = "Male")]
    Male,
    #[sea_orm(string_value = "Female")]
    Female,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Farm,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Farm => Entity::has_many(farm::Entity).into() }
    }
}

impl Related<farm::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Unique indexes on `user` and the field each one guards.
pub const UNIQUE_INDEXES: &[(&str, &str)] = &[
    ("uniq_user_email", "email"),
    ("uniq_user_phone_number", "phone_number"),
];

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if email.chars().count() > EMAIL_MAX {
        return Err(ModelError::Validation(format!("email must be at most {EMAIL_MAX} characters")));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ModelError::Validation("email must be a valid email address".into()));
    };
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') || email.chars().any(char::is_whitespace) {
        return Err(ModelError::Validation("email must be a valid email address".into()));
    }
    Ok(())
}

pub fn validate_phone_number(field: &str, phone: &str) -> Result<(), ModelError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < 7 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::Validation(format!("{field} must be 7 to 15 digits, optionally prefixed with '+'")));
    }
    Ok(())
}

pub fn validate_dob(dob: &str) -> Result<(), ModelError> {
    chrono::NaiveDate::parse_from_str(dob, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ModelError::Validation("dob must be a date formatted as YYYY-MM-DD".into()))
}

pub fn validate_pin(pin: &str) -> Result<(), ModelError> {
    if !(4..=6).contains(&pin.len()) || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(ModelError::Validation("pin must be 4 to 6 digits".into()));
    }
    Ok(())
}
