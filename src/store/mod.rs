mod connection;
pub mod errors;
pub mod records;
pub mod schema;
mod seeding;

pub use connection::CatalogStore;
pub use errors::StoreError;
pub use records::{AttributeRecord, CategoryRecord};
