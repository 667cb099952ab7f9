pub mod catalog;
pub mod config;
pub mod entity;
pub mod errors;
pub mod product_catalog;

pub use catalog::SchemaCatalog;
pub use config::SchemaCatalogConfig;
pub use entity::{EntityMetadata, ForeignKeyMetadata, NavigationMetadata};
pub use errors::SchemaCatalogError;
