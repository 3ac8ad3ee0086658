use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farm")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub county: String,
    pub administrative_location: String,
    /// Hectares.
    pub size: f64,
    pub ownership: String,
    pub farming_types: Vec<String>,
    pub user_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_size(size: f64) -> Result<(), ModelError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(ModelError::Validation("size must be a positive number of hectares".into()));
    }
    Ok(())
}

pub fn validate_farming_types(types: &[String]) -> Result<(), ModelError> {
    if types.iter().any(|t| t.trim().is_empty()) {
        return Err(ModelError::Validation("farmingTypes must not contain empty entries".into()));
    }
    Ok(())
}
