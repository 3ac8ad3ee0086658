//! Farmers: listing, lookup, registration, patching and removal.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::UserService;
