use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::user::{self, Gender};
use models::validate::{validate_text, TEXT_MAX};
use models::{errors::ModelError, farm};

/// Registration payload (plain PIN, hashed by the service).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUser {
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Gender,
    pub dob: String,
    pub residence_county: String,
    pub residence_location: String,
    pub email: String,
    pub business_number: String,
    pub phone_number: String,
    pub pin: String,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_text("firstName", &self.first_name, TEXT_MAX)?;
        if let Some(m) = &self.middle_name { validate_text("middleName", m, TEXT_MAX)?; }
        validate_text("lastName", &self.last_name, TEXT_MAX)?;
        user::validate_dob(&self.dob)?;
        validate_text("residenceCounty", &self.residence_county, TEXT_MAX)?;
        validate_text("residenceLocation", &self.residence_location, TEXT_MAX)?;
        user::validate_email(&self.email)?;
        user::validate_phone_number("businessNumber", &self.business_number)?;
        user::validate_phone_number("phoneNumber", &self.phone_number)?;
        user::validate_pin(&self.pin)
    }
}

/// Sparse patch: only the fields present are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub dob: Option<String>,
    pub residence_county: Option<String>,
    pub residence_location: Option<String>,
    pub email: Option<String>,
    pub business_number: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateUser {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(v) = &self.first_name { validate_text("firstName", v, TEXT_MAX)?; }
        if let Some(v) = &self.middle_name { validate_text("middleName", v, TEXT_MAX)?; }
        if let Some(v) = &self.last_name { validate_text("lastName", v, TEXT_MAX)?; }
        if let Some(v) = &self.dob { user::validate_dob(v)?; }
        if let Some(v) = &self.residence_county { validate_text("residenceCounty", v, TEXT_MAX)?; }
        if let Some(v) = &self.residence_location { validate_text("residenceLocation", v, TEXT_MAX)?; }
        if let Some(v) = &self.email { user::validate_email(v)?; }
        if let Some(v) = &self.business_number { user::validate_phone_number("businessNumber", v)?; }
        if let Some(v) = &self.phone_number { user::validate_phone_number("phoneNumber", v)?; }
        Ok(())
    }
}

/// Insert payload handed to the repository; `pin_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
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
    pub pin_hash: String,
}

impl NewUser {
    pub fn from_input(input: CreateUser, pin_hash: String) -> Self {
        Self {
            first_name: input.first_name,
            middle_name: input.middle_name,
            last_name: input.last_name,
            gender: input.gender,
            dob: input.dob,
            residence_county: input.residence_county,
            residence_location: input.residence_location,
            email: input.email,
            business_number: input.business_number,
            phone_number: input.phone_number,
            pin_hash,
        }
    }
}

/// Outbound user shape. An allow-list of the stored columns: there is no
/// `pin` field, so nothing built from it can leak the secret.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
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
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub farms: Vec<farm::Model>,
}

impl PublicUser {
    /// Redaction step applied to every user leaving the service.
    pub fn redact(model: user::Model, farms: Vec<farm::Model>) -> Self {
        let user::Model {
            id,
            first_name,
            middle_name,
            last_name,
            gender,
            dob,
            residence_county,
            residence_location,
            email,
            business_number,
            phone_number,
            pin: _,
            created_at,
            updated_at,
        } = model;
        Self {
            id,
            first_name,
            middle_name,
            last_name,
            gender,
            dob,
            residence_county,
            residence_location,
            email,
            business_number,
            phone_number,
            created_at,
            updated_at,
            farms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_rejects_unknown_and_secret_fields() {
        assert!(serde_json::from_str::<UpdateUser>(r#"{"pin":"1234"}"#).is_err());
        assert!(serde_json::from_str::<UpdateUser>(r#"{"nickname":"x"}"#).is_err());
        let p: UpdateUser = serde_json::from_str(r#"{"email":"a@x.com","gender":"Female"}"#).unwrap();
        assert_eq!(p.email.as_deref(), Some("a@x.com"));
        assert_eq!(p.gender, Some(Gender::Female));
        assert!(p.first_name.is_none());
    }

    #[test]
    fn patch_validation_checks_present_fields_only() {
        assert!(UpdateUser::default().validate().is_ok());
        let bad = UpdateUser { email: Some("not-an-email".into()), ..Default::default() };
        assert!(bad.validate().is_err());
    }
}
