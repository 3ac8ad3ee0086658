use std::sync::Arc;

use common::types::MessageResponse;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{CreateFarm, FarmView, UpdateFarm};
use super::repository::FarmRepository;
use crate::errors::ServiceError;
use crate::pagination::{ListQuery, Paginated, Pagination};
use crate::user::repository::UserRepository;

/// Farm business service. Needs the user store for the owner pre-check.
pub struct FarmService<F: ?Sized, U: ?Sized> {
    farms: Arc<F>,
    users: Arc<U>,
    pagination: Pagination,
}

impl<F, U> FarmService<F, U>
where
    F: FarmRepository + ?Sized,
    U: UserRepository + ?Sized,
{
    pub fn new(farms: Arc<F>, users: Arc<U>, pagination: Pagination) -> Self {
        Self { farms, users, pagination }
    }

    /// Create a farm for an existing user.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::farm::{domain::CreateFarm, FarmService};
    /// use service::pagination::Pagination;
    /// use service::repo::memory::InMemoryStore;
    /// let store = Arc::new(InMemoryStore::default());
    /// let svc = FarmService::new(store.clone(), store, Pagination::default());
    /// let input = CreateFarm {
    ///     name: "Shamba".into(), county: "Nakuru".into(), administrative_location: "Njoro".into(),
    ///     size: 2.5, ownership: "Freehold".into(), farming_types: vec![], user_id: uuid::Uuid::new_v4(),
    /// };
    /// let err = tokio_test::block_on(svc.create(input)).unwrap_err();
    /// assert_eq!(err.to_string(), "User not found");
    /// ```
    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn create(&self, input: CreateFarm) -> Result<FarmView, ServiceError> {
        input.validate()?;
        let owner = self
            .users
            .find_by_id(input.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;
        let farm = self.farms.insert_farm(&input).await?;
        info!(farm_id = %farm.id, "farm_created");
        Ok(FarmView::new(farm, Some(owner)))
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self, query: ListQuery) -> Result<Paginated<FarmView>, ServiceError> {
        let req = self.pagination.resolve(&query);
        let (rows, total) = self.farms.list_farms(&req).await?;
        debug!(total, returned = rows.len(), "farms_listed");
        let data = rows.into_iter().map(|(farm, owner)| FarmView::new(farm, owner)).collect();
        Ok(Paginated::new(data, total, &req))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<FarmView, ServiceError> {
        let (farm, owner) = self
            .farms
            .find_farm_with_owner(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Farm", id))?;
        Ok(FarmView::new(farm, owner))
    }

    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: UpdateFarm) -> Result<FarmView, ServiceError> {
        let existing = self.farms.find_farm(id).await?.ok_or_else(|| ServiceError::not_found("Farm", id))?;
        patch.validate()?;
        let farm = self.farms.update_farm(id, &patch).await?;
        let owner = self.users.find_by_id(existing.user_id).await?;
        info!(farm_id = %id, "farm_updated");
        Ok(FarmView::new(farm, owner))
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<MessageResponse, ServiceError> {
        if self.farms.find_farm(id).await?.is_none() || !self.farms.delete_farm(id).await? {
            return Err(ServiceError::not_found("Farm", id));
        }
        info!(farm_id = %id, "farm_deleted");
        Ok(MessageResponse::new("Farm deleted successfully"))
    }
}
