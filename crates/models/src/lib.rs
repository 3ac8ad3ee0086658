//! SeaORM entities for the farm registry plus connection helpers.

pub mod errors;
pub mod db;
pub mod user;
pub mod farm;
pub mod validate;

#[cfg(test)]
mod tests;
