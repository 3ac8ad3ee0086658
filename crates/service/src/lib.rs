//! Business layer of the farm registry.
//! - `pagination` and `conflict` hold the shared list and write policies.
//! - `user` and `farm` each follow domain / repository / service.
//! - `repo` provides the Postgres and in-memory stores.

pub mod conflict;
pub mod errors;
pub mod farm;
pub mod pagination;
pub mod repo;
pub mod user;
#[cfg(test)]
pub mod test_support;
