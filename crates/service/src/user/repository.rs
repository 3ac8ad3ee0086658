use async_trait::async_trait;
use uuid::Uuid;

use models::{farm, user};

use super::domain::{NewUser, UpdateUser};
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, SearchField};

/// A user together with the farms it owns.
pub type UserWithFarms = (user::Model, Vec<farm::Model>);

/// Columns matched by the list `search` term. `phone_number` is matched
/// case-sensitively, unlike the name and email columns.
pub const SEARCH_FIELDS: &[SearchField<user::Column>] = &[
    SearchField::insensitive(user::Column::FirstName),
    SearchField::insensitive(user::Column::LastName),
    SearchField::insensitive(user::Column::Email),
    SearchField::sensitive(user::Column::PhoneNumber),
];

/// Persistence operations on users. Unique violations surface as
/// `ServiceError::UniqueViolation` naming the offending fields.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// One page, newest first, plus the total number of matching rows.
    async fn list(&self, req: &PageRequest) -> Result<(Vec<UserWithFarms>, u64), ServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError>;
    async fn farms_of(&self, user_id: Uuid) -> Result<Vec<farm::Model>, ServiceError>;
    async fn insert(&self, new: NewUser) -> Result<user::Model, ServiceError>;
    async fn update(&self, id: Uuid, patch: &UpdateUser) -> Result<user::Model, ServiceError>;
    /// Returns false when nothing was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}
