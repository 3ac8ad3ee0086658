//! Farm resource: domain payloads, repository trait and service.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::FarmService;
