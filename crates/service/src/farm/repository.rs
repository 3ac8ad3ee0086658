use async_trait::async_trait;
use uuid::Uuid;

use models::{farm, user};

use super::domain::{CreateFarm, UpdateFarm};
use crate::errors::ServiceError;
use crate::pagination::{PageRequest, SearchField};

/// A farm together with its owner, when the owner row could be joined.
pub type FarmWithOwner = (farm::Model, Option<user::Model>);

pub const SEARCH_FIELDS: &[SearchField<farm::Column>] = &[
    SearchField::insensitive(farm::Column::Name),
    SearchField::insensitive(farm::Column::County),
    SearchField::insensitive(farm::Column::AdministrativeLocation),
];

/// Persistence operations on farms.
#[async_trait]
pub trait FarmRepository: Send + Sync {
    /// One page of farms with owners, newest first, plus the matching total.
    async fn list_farms(&self, req: &PageRequest) -> Result<(Vec<FarmWithOwner>, u64), ServiceError>;
    async fn find_farm(&self, id: Uuid) -> Result<Option<farm::Model>, ServiceError>;
    async fn find_farm_with_owner(&self, id: Uuid) -> Result<Option<FarmWithOwner>, ServiceError>;
    async fn insert_farm(&self, input: &CreateFarm) -> Result<farm::Model, ServiceError>;
    async fn update_farm(&self, id: Uuid, patch: &UpdateFarm) -> Result<farm::Model, ServiceError>;
    /// Returns false when nothing was deleted.
    async fn delete_farm(&self, id: Uuid) -> Result<bool, ServiceError>;
}
