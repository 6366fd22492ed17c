pub mod connection;
pub mod entities;
pub mod error;
pub mod repositories;

pub use error::{RepositoryError, RepositoryResult};
