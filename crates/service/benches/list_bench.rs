use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use models::user::Gender;
use service::pagination::{ListQuery, Pagination};
use service::repo::memory::InMemoryStore;
use service::user::domain::NewUser;
use service::user::repository::UserRepository;
use service::user::UserService;

fn bench_list_users(c: &mut Criterion) {
    let store = Arc::new(InMemoryStore::default());
    let svc = UserService::new(store.clone(), Pagination::default());

    // seed outside of the measured loop
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        for i in 0..500 {
            let _ = store
                .insert(NewUser {
                    first_name: format!("Farmer{i}"),
                    middle_name: None,
                    last_name: "Bench".into(),
                    gender: Gender::Female,
                    dob: "1990-01-01".into(),
                    residence_county: "Nakuru".into(),
                    residence_location: "Njoro".into(),
                    email: format!("farmer{i}@bench.example"),
                    business_number: "+254720000000".into(),
                    phone_number: format!("+25470{i:07}"),
                    pin_hash: "hash".into(),
                })
                .await;
        }
    });

    c.bench_function("user_list_search_page3", |b| {
        b.iter(|| {
            let q = ListQuery::new(Some(3), Some(20), Some("FARMER1".into()));
            let _ = rt.block_on(svc.find_all(q)).unwrap();
        });
    });
}

criterion_group!(benches, bench_list_users);
criterion_main!(benches);
