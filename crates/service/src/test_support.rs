use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use models::user::{self, Gender};

use crate::repo::memory::InMemoryStore;
use crate::user::domain::NewUser;
use crate::user::repository::UserRepository;

// Migrations run once per test process
static MIGRATED: OnceCell<bool> = OnceCell::const_new();

/// A fresh migrated connection, or `None` when no database is configured or reachable.
pub async fn get_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return None;
    }
    let migrated = MIGRATED
        .get_or_init(|| async {
            match models::db::connect().await {
                Ok(db) => migration::Migrator::up(&db, None).await.is_ok(),
                Err(e) => {
                    eprintln!("skip: cannot connect to db: {}", e);
                    false
                }
            }
        })
        .await;
    if !*migrated {
        return None;
    }
    models::db::connect().await.ok()
}

pub fn new_user(first_name: &str, email: &str, phone_number: &str) -> NewUser {
    NewUser {
        first_name: first_name.into(),
        middle_name: None,
        last_name: "Doe".into(),
        gender: Gender::Male,
        dob: "1985-03-14".into(),
        residence_county: "Kiambu".into(),
        residence_location: "Kikuyu".into(),
        email: email.into(),
        business_number: "+254720000000".into(),
        phone_number: phone_number.into(),
        pin_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA".into(),
    }
}

/// Insert `n` distinct users, returned in insertion order.
pub async fn seed_users(store: &InMemoryStore, n: usize) -> Vec<user::Model> {
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = new_user(&format!("Farmer{i:02}"), &format!("farmer{i:02}@example.com"), &format!("+2547000{i:05}"));
        out.push(store.insert(u).await.expect("seed user"));
    }
    out
}
