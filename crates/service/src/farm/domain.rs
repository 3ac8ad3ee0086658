use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::errors::ModelError;
use models::validate::{validate_text, FARM_NAME_MAX, OWNERSHIP_MAX, TEXT_MAX};
use models::{farm, user};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFarm {
    pub name: String,
    pub county: String,
    pub administrative_location: String,
    pub size: f64,
    pub ownership: String,
    #[serde(default)]
    pub farming_types: Vec<String>,
    pub user_id: Uuid,
}

impl CreateFarm {
    pub fn validate(&self) -> Result<(), ModelError> {
        validate_text("name", &self.name, FARM_NAME_MAX)?;
        validate_text("county", &self.county, TEXT_MAX)?;
        validate_text("administrativeLocation", &self.administrative_location, TEXT_MAX)?;
        validate_text("ownership", &self.ownership, OWNERSHIP_MAX)?;
        farm::validate_size(self.size)?;
        farm::validate_farming_types(&self.farming_types)
    }
}

/// Sparse patch. The owner cannot be changed after creation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFarm {
    pub name: Option<String>,
    pub county: Option<String>,
    pub administrative_location: Option<String>,
    pub size: Option<f64>,
    pub ownership: Option<String>,
    pub farming_types: Option<Vec<String>>,
}

impl UpdateFarm {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(v) = &self.name { validate_text("name", v, FARM_NAME_MAX)?; }
        if let Some(v) = &self.county { validate_text("county", v, TEXT_MAX)?; }
        if let Some(v) = &self.administrative_location { validate_text("administrativeLocation", v, TEXT_MAX)?; }
        if let Some(v) = &self.ownership { validate_text("ownership", v, OWNERSHIP_MAX)?; }
        if let Some(v) = self.size { farm::validate_size(v)?; }
        if let Some(v) = &self.farming_types { farm::validate_farming_types(v)?; }
        Ok(())
    }
}

/// Public fields of a farm's owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
}

impl From<user::Model> for OwnerSummary {
    fn from(u: user::Model) -> Self {
        Self { id: u.id, first_name: u.first_name, last_name: u.last_name, phone_number: u.phone_number, email: u.email }
    }
}

/// Outbound farm shape: the farm columns plus a `user` owner summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmView {
    #[serde(flatten)]
    pub farm: farm::Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerSummary>,
}

impl FarmView {
    pub fn new(farm: farm::Model, owner: Option<user::Model>) -> Self {
        Self { farm, user: owner.map(OwnerSummary::from) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateFarm {
        serde_json::from_value(serde_json::json!({
            "name": "Kamau Mixed Farm",
            "county": "Kiambu",
            "administrativeLocation": "Kikuyu",
            "size": 7.2,
            "ownership": "Freehold",
            "farmingTypes": ["Dairy cattle", "Maize"],
            "userId": Uuid::nil(),
        }))
        .unwrap()
    }

    #[test]
    fn create_payload_validates() {
        assert!(input().validate().is_ok());
        let mut bad = input();
        bad.size = 0.0;
        assert!(bad.validate().is_err());
        let mut blank = input();
        blank.county = "  ".into();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn text_limits_match_column_widths() {
        let mut farm = input();
        farm.ownership = "o".repeat(OWNERSHIP_MAX);
        farm.name = "n".repeat(FARM_NAME_MAX);
        assert!(farm.validate().is_ok());

        farm.ownership.push('o');
        assert!(farm.validate().is_err());

        let patch = UpdateFarm { ownership: Some("o".repeat(OWNERSHIP_MAX + 1)), ..Default::default() };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn patch_cannot_move_farm_to_another_owner() {
        let err = serde_json::from_value::<UpdateFarm>(serde_json::json!({"userId": Uuid::nil()}));
        assert!(err.is_err());
        let ok: UpdateFarm = serde_json::from_value(serde_json::json!({"size": 3.5})).unwrap();
        assert_eq!(ok.size, Some(3.5));
        assert!(ok.validate().is_ok());
    }
}
