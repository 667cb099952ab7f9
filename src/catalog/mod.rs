//! Catalog use cases built on the recursive query engine.
//!
//! - category search: matched categories plus ancestors, merged into a forest
//! - category subtree: a category and all of its descendants
//! - attribute hierarchy: attributes plus their sub-attributes

mod attribute_hierarchy;
mod category_search;
mod category_subtree;
pub mod errors;
mod service;

pub use category_search::{SearchCategoriesQuery, SearchCategoryDto, SearchCriterion};
pub use errors::CatalogError;
pub use service::CatalogService;

