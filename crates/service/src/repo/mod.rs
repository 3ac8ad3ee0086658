//! Store implementations of the user and farm repository traits.

pub mod memory;
pub mod seaorm;

pub use memory::InMemoryStore;
pub use seaorm::SeaOrmStore;
