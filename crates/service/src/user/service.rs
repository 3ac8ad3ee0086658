use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, SaltString}};
use common::types::MessageResponse;
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{CreateUser, NewUser, PublicUser, UpdateUser};
use super::repository::UserRepository;
use crate::conflict::{self, ConflictRule};
use crate::errors::ServiceError;
use crate::pagination::{ListQuery, Paginated, Pagination};

/// Unique fields on `user`, in the order they are reported.
pub const USER_CONFLICTS: &[ConflictRule] = &[
    ConflictRule { field: "email", message: "Email is already in use by another user." },
    ConflictRule { field: "phone_number", message: "Phone number is already in use by another user." },
];

/// User business service. Every returned record passes through
/// [`PublicUser::redact`].
pub struct UserService<R: ?Sized> {
    repo: Arc<R>,
    pagination: Pagination,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>, pagination: Pagination) -> Self { Self { repo, pagination } }

    /// Paginated, optionally filtered list of users with their farms.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::pagination::{ListQuery, Pagination};
    /// use service::repo::memory::InMemoryStore;
    /// use service::user::UserService;
    /// let store = Arc::new(InMemoryStore::default());
    /// let svc = UserService::new(store, Pagination::default());
    /// let page = tokio_test::block_on(svc.find_all(ListQuery::new(Some(0), Some(-5), None))).unwrap();
    /// assert_eq!(page.meta.page, 1);
    /// assert_eq!(page.meta.total, 0);
    /// ```
    #[instrument(skip(self))]
    pub async fn find_all(&self, query: ListQuery) -> Result<Paginated<PublicUser>, ServiceError> {
        let req = self.pagination.resolve(&query);
        let (rows, total) = self.repo.list(&req).await?;
        debug!(total, returned = rows.len(), "users_listed");
        let data = rows.into_iter().map(|(u, farms)| PublicUser::redact(u, farms)).collect();
        Ok(Paginated::new(data, total, &req))
    }

    #[instrument(skip(self))]
    pub async fn find_one(&self, id: Uuid) -> Result<PublicUser, ServiceError> {
        let user = self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("User", id))?;
        let farms = self.repo.farms_of(id).await?;
        Ok(PublicUser::redact(user, farms))
    }

    /// Register a farmer; the PIN is stored as an Argon2 hash.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(&self, input: CreateUser) -> Result<PublicUser, ServiceError> {
        input.validate()?;
        let pin_hash = hash_pin(&input.pin)?;
        let created = self
            .repo
            .insert(NewUser::from_input(input, pin_hash))
            .await
            .map_err(|e| conflict::translate(e, USER_CONFLICTS))?;
        info!(user_id = %created.id, "user_created");
        Ok(PublicUser::redact(created, Vec::new()))
    }

    /// Apply a sparse patch. Clashing email / phone number yields `Conflict`.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: UpdateUser) -> Result<PublicUser, ServiceError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("User", id));
        }
        patch.validate()?;
        let updated = self
            .repo
            .update(id, &patch)
            .await
            .map_err(|e| conflict::translate(e, USER_CONFLICTS))?;
        let farms = self.repo.farms_of(id).await?;
        info!(user_id = %id, "user_updated");
        Ok(PublicUser::redact(updated, farms))
    }

    /// Delete a user. Users that still own farms are refused with `Conflict`.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> Result<MessageResponse, ServiceError> {
        if self.repo.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("User", id));
        }
        let owned = self.repo.farms_of(id).await?.len();
        if owned > 0 {
            debug!(user_id = %id, owned, "user_delete_refused");
            return Err(ServiceError::Conflict("User still owns farms; remove them first.".into()));
        }
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("User", id));
        }
        info!(user_id = %id, "user_deleted");
        Ok(MessageResponse::new("User deleted successfully"))
    }
}

fn hash_pin(pin: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pin.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::domain::CreateFarm;
    use crate::farm::repository::FarmRepository;
    use crate::repo::memory::InMemoryStore;
    use crate::test_support::{new_user, seed_users};
    use argon2::{PasswordHash, PasswordVerifier};
    use models::user::Gender;

    fn service(store: &Arc<InMemoryStore>) -> UserService<InMemoryStore> {
        UserService::new(store.clone(), Pagination::default())
    }

    fn assert_no_pin(value: &serde_json::Value) {
        let text = value.to_string();
        assert!(!text.contains("\"pin\""), "pin leaked: {text}");
    }

    #[tokio::test]
    async fn second_page_of_twenty_five() {
        let store = Arc::new(InMemoryStore::default());
        seed_users(&store, 25).await;
        let page = service(&store).find_all(ListQuery::new(Some(2), Some(10), None)).await.unwrap();
        assert_eq!(page.data.len(), 10);
        assert_eq!((page.meta.total, page.meta.page, page.meta.pages), (25, 2, 3));
        assert!(page.meta.has_next_page && page.meta.has_prev_page);
    }

    #[tokio::test]
    async fn non_positive_params_behave_as_defaults() {
        let store = Arc::new(InMemoryStore::default());
        seed_users(&store, 12).await;
        let page = service(&store).find_all(ListQuery::new(Some(-1), Some(0), None)).await.unwrap();
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.data.len(), 10);
        assert_eq!(page.meta.pages, 2);
        assert!(!page.meta.has_prev_page);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let store = Arc::new(InMemoryStore::default());
        seed_users(&store, 3).await;
        let page = service(&store).find_all(ListQuery::default()).await.unwrap();
        let created: Vec<_> = page.data.iter().map(|u| u.created_at).collect();
        let mut sorted = created.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(created, sorted);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_on_names_and_email() {
        let store = Arc::new(InMemoryStore::default());
        store.insert(new_user("Wanjiru", "wanjiru@farm.co.ke", "+254700000001")).await.unwrap();
        store.insert(new_user("Otieno", "otieno@farm.co.ke", "+254700000002")).await.unwrap();
        let svc = service(&store);

        let by_name = svc.find_all(ListQuery::new(None, None, Some("WANJ".into()))).await.unwrap();
        assert_eq!(by_name.meta.total, 1);
        assert_eq!(by_name.data[0].first_name, "Wanjiru");

        let by_email = svc.find_all(ListQuery::new(None, None, Some("FARM.CO".into()))).await.unwrap();
        assert_eq!(by_email.meta.total, 2);

        let by_phone = svc.find_all(ListQuery::new(None, None, Some("0000002".into()))).await.unwrap();
        assert_eq!(by_phone.meta.total, 1);
        assert_eq!(by_phone.data[0].first_name, "Otieno");
    }

    #[tokio::test]
    async fn wildcard_characters_match_literally() {
        let store = Arc::new(InMemoryStore::default());
        store.insert(new_user("Kamau", "kamau@farm.co.ke", "+254700000003")).await.unwrap();
        let page = service(&store).find_all(ListQuery::new(None, None, Some("%".into()))).await.unwrap();
        assert_eq!(page.meta.total, 0);
    }

    #[tokio::test]
    async fn find_one_includes_farms_and_never_pin() {
        let store = Arc::new(InMemoryStore::default());
        let u = store.insert(new_user("Mwangi", "mwangi@example.com", "+254712345678")).await.unwrap();
        store
            .insert_farm(&CreateFarm {
                name: "Kamau Mixed Farm".into(),
                county: "Kiambu".into(),
                administrative_location: "Kikuyu".into(),
                size: 7.2,
                ownership: "Freehold".into(),
                farming_types: vec!["Dairy cattle".into()],
                user_id: u.id,
            })
            .await
            .unwrap();

        let found = service(&store).find_one(u.id).await.unwrap();
        assert_eq!(found.farms.len(), 1);
        let json = serde_json::to_value(&found).unwrap();
        assert_no_pin(&json);
        assert_eq!(json["farms"][0]["administrativeLocation"], "Kikuyu");
    }

    #[tokio::test]
    async fn find_one_missing_is_not_found() {
        let store = Arc::new(InMemoryStore::default());
        let id = Uuid::new_v4();
        match service(&store).find_one(id).await {
            Err(ServiceError::NotFound(msg)) => assert_eq!(msg, format!("User with ID {id} not found")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_operation_returns_pin() {
        let store = Arc::new(InMemoryStore::default());
        seed_users(&store, 2).await;
        let svc = service(&store);

        let list = svc.find_all(ListQuery::default()).await.unwrap();
        assert_no_pin(&serde_json::to_value(&list).unwrap());

        let id = list.data[0].id;
        let one = svc.find_one(id).await.unwrap();
        assert_no_pin(&serde_json::to_value(&one).unwrap());

        let patch = UpdateUser { last_name: Some("Njoroge".into()), ..Default::default() };
        let updated = svc.update(id, patch).await.unwrap();
        assert_eq!(updated.last_name, "Njoroge");
        assert_no_pin(&serde_json::to_value(&updated).unwrap());
    }

    #[tokio::test]
    async fn create_hashes_pin_and_redacts_it() {
        let store = Arc::new(InMemoryStore::default());
        let input = CreateUser {
            first_name: "Achieng".into(),
            middle_name: None,
            last_name: "Odhiambo".into(),
            gender: Gender::Female,
            dob: "1990-07-21".into(),
            residence_county: "Kisumu".into(),
            residence_location: "Nyando".into(),
            email: "achieng@example.com".into(),
            business_number: "+254720123456".into(),
            phone_number: "+254711000111".into(),
            pin: "4321".into(),
        };
        let created = service(&store).create(input).await.unwrap();
        assert_no_pin(&serde_json::to_value(&created).unwrap());

        let stored = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_ne!(stored.pin, "4321");
        let parsed = PasswordHash::new(&stored.pin).unwrap();
        assert!(Argon2::default().verify_password(b"4321", &parsed).is_ok());
    }

    #[tokio::test]
    async fn create_rejects_bad_pin_before_writing() {
        let store = Arc::new(InMemoryStore::default());
        let input = CreateUser {
            first_name: "Achieng".into(),
            middle_name: None,
            last_name: "Odhiambo".into(),
            gender: Gender::Female,
            dob: "1990-07-21".into(),
            residence_county: "Kisumu".into(),
            residence_location: "Nyando".into(),
            email: "achieng@example.com".into(),
            business_number: "+254720123456".into(),
            phone_number: "+254711000111".into(),
            pin: "12".into(),
        };
        assert!(matches!(service(&store).create(input).await, Err(ServiceError::Model(_))));
        let page = service(&store).find_all(ListQuery::default()).await.unwrap();
        assert_eq!(page.meta.total, 0);
    }

    #[tokio::test]
    async fn update_to_taken_email_is_conflict() {
        let store = Arc::new(InMemoryStore::default());
        store.insert(new_user("Ann", "a@x.com", "+254700000001")).await.unwrap();
        let u2 = store.insert(new_user("Ben", "b@x.com", "+254700000002")).await.unwrap();

        let patch = UpdateUser { email: Some("a@x.com".into()), ..Default::default() };
        match service(&store).update(u2.id, patch).await {
            Err(ServiceError::Conflict(msg)) => assert_eq!(msg, "Email is already in use by another user."),
            other => panic!("unexpected {other:?}"),
        }
        let unchanged = store.find_by_id(u2.id).await.unwrap().unwrap();
        assert_eq!(unchanged.email, "b@x.com");
    }

    #[tokio::test]
    async fn update_to_taken_phone_is_conflict() {
        let store = Arc::new(InMemoryStore::default());
        store.insert(new_user("Ann", "a@x.com", "+254700000001")).await.unwrap();
        let u2 = store.insert(new_user("Ben", "b@x.com", "+254700000002")).await.unwrap();

        let patch = UpdateUser { phone_number: Some("+254700000001".into()), ..Default::default() };
        match service(&store).update(u2.id, patch).await {
            Err(ServiceError::Conflict(msg)) => assert!(msg.contains("Phone number"), "{msg}"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_own_email_is_not_a_conflict() {
        let store = Arc::new(InMemoryStore::default());
        let u = store.insert(new_user("Ann", "a@x.com", "+254700000001")).await.unwrap();
        let patch = UpdateUser { email: Some("a@x.com".into()), ..Default::default() };
        let updated = service(&store).update(u.id, patch).await.unwrap();
        assert!(updated.updated_at >= u.updated_at);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = Arc::new(InMemoryStore::default());
        let res = service(&store).update(Uuid::new_v4(), UpdateUser::default()).await;
        assert!(matches!(res, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_twice_fails_the_second_time() {
        let store = Arc::new(InMemoryStore::default());
        let u = store.insert(new_user("Ann", "a@x.com", "+254700000001")).await.unwrap();
        let svc = service(&store);
        assert_eq!(svc.remove(u.id).await.unwrap().message, "User deleted successfully");
        assert!(matches!(svc.remove(u.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_refuses_owner_of_farms() {
        let store = Arc::new(InMemoryStore::default());
        let u = store.insert(new_user("Ann", "a@x.com", "+254700000001")).await.unwrap();
        store
            .insert_farm(&CreateFarm {
                name: "Shamba".into(),
                county: "Nakuru".into(),
                administrative_location: "Njoro".into(),
                size: 2.0,
                ownership: "Leasehold".into(),
                farming_types: vec![],
                user_id: u.id,
            })
            .await
            .unwrap();
        assert!(matches!(service(&store).remove(u.id).await, Err(ServiceError::Conflict(_))));
        assert!(store.find_by_id(u.id).await.unwrap().is_some());
    }
}
