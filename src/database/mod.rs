pub mod manager;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod storage;

pub use manager::DatabaseError;
pub use models::{Ad, AdQuery, NewAd, SortDirection, SortField};
pub use postgres::PgStorage;
pub use storage::{Storage, StorageError};
