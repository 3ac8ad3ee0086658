use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{Set, Unchanged};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, LoaderTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr,
};
use uuid::Uuid;

use models::{farm, user};

use crate::errors::ServiceError;
use crate::farm::domain::{CreateFarm, UpdateFarm};
use crate::farm::repository::{self as farm_repo, FarmRepository, FarmWithOwner};
use crate::pagination::{search_condition, PageRequest};
use crate::user::domain::{NewUser, UpdateUser};
use crate::user::repository::{self as user_repo, UserRepository, UserWithFarms};

/// Postgres-backed store for both resources.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// Unique violations become `UniqueViolation` naming the guarded fields;
/// everything else is an opaque `Db` error.
pub(crate) fn store_error(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => ServiceError::UniqueViolation { target: unique_target(&detail) },
        _ => ServiceError::Db(err.to_string()),
    }
}

/// Fields guarded by the constraint named in a driver message. Unknown
/// constraints are reported by name.
pub(crate) fn unique_target(detail: &str) -> Vec<String> {
    let fields: Vec<String> = user::UNIQUE_INDEXES
        .iter()
        .filter(|(index, _)| detail.contains(index))
        .map(|(_, field)| field.to_string())
        .collect();
    if !fields.is_empty() {
        return fields;
    }
    detail.split('"').nth(1).map(|name| vec![name.to_string()]).unwrap_or_default()
}

fn not_updated(entity: &'static str, id: Uuid) -> impl FnOnce(DbErr) -> ServiceError {
    move |err| match err {
        DbErr::RecordNotUpdated => ServiceError::not_found(entity, id),
        other => store_error(other),
    }
}

#[async_trait]
impl UserRepository for SeaOrmStore {
    async fn list(&self, req: &PageRequest) -> Result<(Vec<UserWithFarms>, u64), ServiceError> {
        let mut select = user::Entity::find();
        if let Some(term) = &req.search {
            select = select.filter(search_condition::<user::Entity>(user_repo::SEARCH_FIELDS, term));
        }
        let page = select
            .clone()
            .order_by_desc(user::Column::CreatedAt)
            .offset(req.skip())
            .limit(req.limit)
            .all(&self.db);
        let (users, total) = tokio::try_join!(page, select.count(&self.db)).map_err(store_error)?;
        let mut farms = users.load_many(farm::Entity, &self.db).await.map_err(store_error)?;
        farms.iter_mut().for_each(|owned| sort_newest_first(owned));
        Ok((users.into_iter().zip(farms).collect(), total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        user::Entity::find_by_id(id).one(&self.db).await.map_err(store_error)
    }

    async fn farms_of(&self, user_id: Uuid) -> Result<Vec<farm::Model>, ServiceError> {
        farm::Entity::find()
            .filter(farm::Column::UserId.eq(user_id))
            .order_by_desc(farm::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(store_error)
    }

    async fn insert(&self, new: NewUser) -> Result<user::Model, ServiceError> {
        let now = Utc::now().fixed_offset();
        user::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(new.first_name),
            middle_name: Set(new.middle_name),
            last_name: Set(new.last_name),
            gender: Set(new.gender),
            dob: Set(new.dob),
            residence_county: Set(new.residence_county),
            residence_location: Set(new.residence_location),
            email: Set(new.email),
            business_number: Set(new.business_number),
            phone_number: Set(new.phone_number),
            pin: Set(new.pin_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update(&self, id: Uuid, patch: &UpdateUser) -> Result<user::Model, ServiceError> {
        let mut am = user::ActiveModel { id: Unchanged(id), ..Default::default() };
        if let Some(v) = &patch.first_name { am.first_name = Set(v.clone()); }
        if let Some(v) = &patch.middle_name { am.middle_name = Set(Some(v.clone())); }
        if let Some(v) = &patch.last_name { am.last_name = Set(v.clone()); }
        if let Some(v) = patch.gender { am.gender = Set(v); }
        if let Some(v) = &patch.dob { am.dob = Set(v.clone()); }
        if let Some(v) = &patch.residence_county { am.residence_county = Set(v.clone()); }
        if let Some(v) = &patch.residence_location { am.residence_location = Set(v.clone()); }
        if let Some(v) = &patch.email { am.email = Set(v.clone()); }
        if let Some(v) = &patch.business_number { am.business_number = Set(v.clone()); }
        if let Some(v) = &patch.phone_number { am.phone_number = Set(v.clone()); }
        am.updated_at = Set(Utc::now().fixed_offset());
        am.update(&self.db).await.map_err(not_updated("User", id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = user::Entity::delete_by_id(id).exec(&self.db).await.map_err(store_error)?;
        Ok(res.rows_affected > 0)
    }
}

#[async_trait]
impl FarmRepository for SeaOrmStore {
    async fn list_farms(&self, req: &PageRequest) -> Result<(Vec<FarmWithOwner>, u64), ServiceError> {
        let mut select = farm::Entity::find();
        if let Some(term) = &req.search {
            select = select.filter(search_condition::<farm::Entity>(farm_repo::SEARCH_FIELDS, term));
        }
        let page = select
            .clone()
            .find_also_related(user::Entity)
            .order_by_desc(farm::Column::CreatedAt)
            .offset(req.skip())
            .limit(req.limit)
            .all(&self.db);
        let (rows, total) = tokio::try_join!(page, select.count(&self.db)).map_err(store_error)?;
        Ok((rows, total))
    }

    async fn find_farm(&self, id: Uuid) -> Result<Option<farm::Model>, ServiceError> {
        farm::Entity::find_by_id(id).one(&self.db).await.map_err(store_error)
    }

    async fn find_farm_with_owner(&self, id: Uuid) -> Result<Option<FarmWithOwner>, ServiceError> {
        farm::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(store_error)
    }

    async fn insert_farm(&self, input: &CreateFarm) -> Result<farm::Model, ServiceError> {
        let now = Utc::now().fixed_offset();
        farm::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name.clone()),
            county: Set(input.county.clone()),
            administrative_location: Set(input.administrative_location.clone()),
            size: Set(input.size),
            ownership: Set(input.ownership.clone()),
            farming_types: Set(input.farming_types.clone()),
            user_id: Set(input.user_id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_farm(&self, id: Uuid, patch: &UpdateFarm) -> Result<farm::Model, ServiceError> {
        let mut am = farm::ActiveModel { id: Unchanged(id), ..Default::default() };
        if let Some(v) = &patch.name { am.name = Set(v.clone()); }
        if let Some(v) = &patch.county { am.county = Set(v.clone()); }
        if let Some(v) = &patch.administrative_location { am.administrative_location = Set(v.clone()); }
        if let Some(v) = patch.size { am.size = Set(v); }
        if let Some(v) = &patch.ownership { am.ownership = Set(v.clone()); }
        if let Some(v) = &patch.farming_types { am.farming_types = Set(v.clone()); }
        am.updated_at = Set(Utc::now().fixed_offset());
        am.update(&self.db).await.map_err(not_updated("Farm", id))
    }

    async fn delete_farm(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = farm::Entity::delete_by_id(id).exec(&self.db).await.map_err(store_error)?;
        Ok(res.rows_affected > 0)
    }
}

/// `load_many` leaves each group unordered; match `farms_of`.
fn sort_newest_first(farms: &mut [farm::Model]) {
    farms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
