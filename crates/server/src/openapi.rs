use serde::Serialize;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDoc { pub status_code: u16, pub error: String, pub message: String }

#[derive(Serialize, ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMetaDoc { pub total: u64, pub page: u64, pub pages: u64, pub has_next_page: bool, pub has_prev_page: bool }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecordDoc {
    pub id: Uuid,
    pub name: String,
    pub county: String,
    pub administrative_location: String,
    /// hectares
    pub size: f64,
    pub ownership: String,
    pub farming_types: Vec<String>,
    pub user_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDoc { pub id: Uuid, pub first_name: String, pub last_name: String, pub phone_number: String, pub email: String }

/// Farm record with its owner summary under `user`.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FarmDoc {
    pub id: Uuid,
    pub name: String,
    pub county: String,
    pub administrative_location: String,
    pub size: f64,
    pub ownership: String,
    pub farming_types: Vec<String>,
    pub user_id: Uuid,
    pub created_at: String,
    pub updated_at: String,
    pub user: Option<OwnerDoc>,
}

/// User record; the PIN is never returned.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[schema(example = "Female")]
    pub gender: String,
    #[schema(example = "1990-07-21")]
    pub dob: String,
    pub residence_county: String,
    pub residence_location: String,
    pub email: String,
    pub business_number: String,
    pub phone_number: String,
    pub created_at: String,
    pub updated_at: String,
    pub farms: Vec<FarmRecordDoc>,
}

#[derive(Serialize, ToSchema)]
pub struct UserPageDoc { pub data: Vec<UserDoc>, pub meta: PageMetaDoc }

#[derive(Serialize, ToSchema)]
pub struct FarmPageDoc { pub data: Vec<FarmDoc>, pub meta: PageMetaDoc }

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDoc {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    #[schema(example = "Male")]
    pub gender: String,
    #[schema(example = "1985-03-14")]
    pub dob: String,
    pub residence_county: String,
    pub residence_location: String,
    pub email: String,
    pub business_number: String,
    pub phone_number: String,
    /// 4 to 6 digits
    #[schema(example = "1234")]
    pub pin: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDoc {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub residence_county: Option<String>,
    pub residence_location: Option<String>,
    pub email: Option<String>,
    pub business_number: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFarmDoc {
    pub name: String,
    pub county: String,
    pub administrative_location: String,
    pub size: f64,
    #[schema(example = "Freehold")]
    pub ownership: String,
    pub farming_types: Vec<String>,
    pub user_id: Uuid,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFarmDoc {
    pub name: Option<String>,
    pub county: Option<String>,
    pub administrative_location: Option<String>,
    pub size: Option<f64>,
    pub ownership: Option<String>,
    pub farming_types: Option<Vec<String>>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list,
        crate::routes::users::create,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::farms::list,
        crate::routes::farms::create,
        crate::routes::farms::get,
        crate::routes::farms::update,
        crate::routes::farms::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            MessageDoc,
            PageMetaDoc,
            FarmRecordDoc,
            OwnerDoc,
            FarmDoc,
            UserDoc,
            UserPageDoc,
            FarmPageDoc,
            CreateUserDoc,
            UpdateUserDoc,
            CreateFarmDoc,
            UpdateFarmDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "farms")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_resources_and_bearer_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["paths"]["/users/{id}"]["patch"].is_object());
        assert!(doc["paths"]["/farms"]["post"].is_object());
        assert!(doc["components"]["securitySchemes"]["bearer"].is_object());
        assert!(doc["components"]["schemas"]["UserDoc"]["properties"].get("pin").is_none());
    }
}
