//! In-process store used by tests, doc examples and the router tests of the
//! server crate. Enforces the same unique and foreign-key rules as the
//! Postgres schema.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use models::{farm, user};

use crate::errors::ServiceError;
use crate::farm::domain::{CreateFarm, UpdateFarm};
use crate::farm::repository::{self as farm_repo, FarmRepository, FarmWithOwner};
use crate::pagination::{model_matches, PageRequest};
use crate::user::domain::{NewUser, UpdateUser};
use crate::user::repository::{self as user_repo, UserRepository, UserWithFarms};

#[derive(Default)]
struct Tables {
    /// insertion order
    users: Vec<user::Model>,
    farms: Vec<farm::Model>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    farm_inserts: AtomicUsize,
}

impl InMemoryStore {
    /// Number of times `insert_farm` has been called.
    pub fn farm_insert_attempts(&self) -> usize {
        self.farm_inserts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Newest first; rows sharing a timestamp keep the later insert first.
fn newest_first<T: Clone>(rows: &[T], created: impl Fn(&T) -> chrono::DateTime<chrono::FixedOffset>) -> Vec<T> {
    let mut out: Vec<T> = rows.iter().rev().cloned().collect();
    out.sort_by(|a, b| created(b).cmp(&created(a)));
    out
}

fn window<T>(rows: Vec<T>, req: &PageRequest) -> Vec<T> {
    let skip = usize::try_from(req.skip()).unwrap_or(usize::MAX);
    let take = usize::try_from(req.limit).unwrap_or(usize::MAX);
    rows.into_iter().skip(skip).take(take).collect()
}

fn check_unique(users: &[user::Model], skip_id: Option<Uuid>, email: &str, phone: &str) -> Result<(), ServiceError> {
    let others = || users.iter().filter(move |u| Some(u.id) != skip_id);
    if others().any(|u| u.email == email) {
        return Err(ServiceError::UniqueViolation { target: vec!["email".into()] });
    }
    if others().any(|u| u.phone_number == phone) {
        return Err(ServiceError::UniqueViolation { target: vec!["phone_number".into()] });
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn list(&self, req: &PageRequest) -> Result<(Vec<UserWithFarms>, u64), ServiceError> {
        let t = self.lock();
        let matching: Vec<user::Model> = t
            .users
            .iter()
            .filter(|u| req.search.as_deref().map_or(true, |term| model_matches(*u, user_repo::SEARCH_FIELDS, term)))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let page = window(newest_first(&matching, |u| u.created_at), req)
            .into_iter()
            .map(|u| {
                let owned: Vec<farm::Model> = t.farms.iter().filter(|f| f.user_id == u.id).cloned().collect();
                let farms = newest_first(&owned, |f| f.created_at);
                (u, farms)
            })
            .collect();
        Ok((page, total))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<user::Model>, ServiceError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn farms_of(&self, user_id: Uuid) -> Result<Vec<farm::Model>, ServiceError> {
        let t = self.lock();
        let owned: Vec<farm::Model> = t.farms.iter().filter(|f| f.user_id == user_id).cloned().collect();
        Ok(newest_first(&owned, |f| f.created_at))
    }

    async fn insert(&self, new: NewUser) -> Result<user::Model, ServiceError> {
        let mut t = self.lock();
        check_unique(&t.users, None, &new.email, &new.phone_number)?;
        let now = Utc::now().fixed_offset();
        let model = user::Model {
            id: Uuid::new_v4(),
            first_name: new.first_name,
            middle_name: new.middle_name,
            last_name: new.last_name,
            gender: new.gender,
            dob: new.dob,
            residence_county: new.residence_county,
            residence_location: new.residence_location,
            email: new.email,
            business_number: new.business_number,
            phone_number: new.phone_number,
            pin: new.pin_hash,
            created_at: now,
            updated_at: now,
        };
        t.users.push(model.clone());
        Ok(model)
    }

    async fn update(&self, id: Uuid, patch: &UpdateUser) -> Result<user::Model, ServiceError> {
        let mut t = self.lock();
        let Some(pos) = t.users.iter().position(|u| u.id == id) else {
            return Err(ServiceError::not_found("User", id));
        };
        let mut next = t.users[pos].clone();
        if let Some(v) = &patch.first_name { next.first_name = v.clone(); }
        if let Some(v) = &patch.middle_name { next.middle_name = Some(v.clone()); }
        if let Some(v) = &patch.last_name { next.last_name = v.clone(); }
        if let Some(v) = patch.gender { next.gender = v; }
        if let Some(v) = &patch.dob { next.dob = v.clone(); }
        if let Some(v) = &patch.residence_county { next.residence_county = v.clone(); }
        if let Some(v) = &patch.residence_location { next.residence_location = v.clone(); }
        if let Some(v) = &patch.email { next.email = v.clone(); }
        if let Some(v) = &patch.business_number { next.business_number = v.clone(); }
        if let Some(v) = &patch.phone_number { next.phone_number = v.clone(); }
        check_unique(&t.users, Some(id), &next.email, &next.phone_number)?;
        next.updated_at = Utc::now().fixed_offset();
        t.users[pos] = next.clone();
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.lock();
        if t.farms.iter().any(|f| f.user_id == id) {
            return Err(ServiceError::Db("update or delete on table \"user\" violates foreign key constraint \"fk_farm_user\"".into()));
        }
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        Ok(t.users.len() < before)
    }
}

#[async_trait]
impl FarmRepository for InMemoryStore {
    async fn list_farms(&self, req: &PageRequest) -> Result<(Vec<FarmWithOwner>, u64), ServiceError> {
        let t = self.lock();
        let matching: Vec<farm::Model> = t
            .farms
            .iter()
            .filter(|f| req.search.as_deref().map_or(true, |term| model_matches(*f, farm_repo::SEARCH_FIELDS, term)))
            .cloned()
            .collect();
        let total = matching.len() as u64;
        let page = window(newest_first(&matching, |f| f.created_at), req)
            .into_iter()
            .map(|f| {
                let owner = t.users.iter().find(|u| u.id == f.user_id).cloned();
                (f, owner)
            })
            .collect();
        Ok((page, total))
    }

    async fn find_farm(&self, id: Uuid) -> Result<Option<farm::Model>, ServiceError> {
        Ok(self.lock().farms.iter().find(|f| f.id == id).cloned())
    }

    async fn find_farm_with_owner(&self, id: Uuid) -> Result<Option<FarmWithOwner>, ServiceError> {
        let t = self.lock();
        Ok(t.farms.iter().find(|f| f.id == id).map(|f| {
            let owner = t.users.iter().find(|u| u.id == f.user_id).cloned();
            (f.clone(), owner)
        }))
    }

    async fn insert_farm(&self, input: &CreateFarm) -> Result<farm::Model, ServiceError> {
        self.farm_inserts.fetch_add(1, Ordering::SeqCst);
        let mut t = self.lock();
        if !t.users.iter().any(|u| u.id == input.user_id) {
            return Err(ServiceError::Db("insert or update on table \"farm\" violates foreign key constraint \"fk_farm_user\"".into()));
        }
        let now = Utc::now().fixed_offset();
        let model = farm::Model {
            id: Uuid::new_v4(),
            name: input.name.clone(),
            county: input.county.clone(),
            administrative_location: input.administrative_location.clone(),
            size: input.size,
            ownership: input.ownership.clone(),
            farming_types: input.farming_types.clone(),
            user_id: input.user_id,
            created_at: now,
            updated_at: now,
        };
        t.farms.push(model.clone());
        Ok(model)
    }

    async fn update_farm(&self, id: Uuid, patch: &UpdateFarm) -> Result<farm::Model, ServiceError> {
        let mut t = self.lock();
        let Some(f) = t.farms.iter_mut().find(|f| f.id == id) else {
            return Err(ServiceError::not_found("Farm", id));
        };
        if let Some(v) = &patch.name { f.name = v.clone(); }
        if let Some(v) = &patch.county { f.county = v.clone(); }
        if let Some(v) = &patch.administrative_location { f.administrative_location = v.clone(); }
        if let Some(v) = patch.size { f.size = v; }
        if let Some(v) = &patch.ownership { f.ownership = v.clone(); }
        if let Some(v) = &patch.farming_types { f.farming_types = v.clone(); }
        f.updated_at = Utc::now().fixed_offset();
        Ok(f.clone())
    }

    async fn delete_farm(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut t = self.lock();
        let before = t.farms.len();
        t.farms.retain(|f| f.id != id);
        Ok(t.farms.len() < before)
    }
}
