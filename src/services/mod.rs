// Service exports
pub mod memory;
pub mod postgres;

pub use memory::InMemorySchools;
pub use postgres::{RepositoryError, SchoolRepository};
