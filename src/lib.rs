//! catalogtree - recursive hierarchy queries for relational catalogs
//!
//! This crate loads whole hierarchies (category trees, attribute graphs) in a
//! single round trip through:
//! - Entity metadata describing tables, keys and navigations
//! - Seed query compilation from typed filters
//! - Recursive CTE generation over self-referencing and join-table relationships
//! - Forest reconstruction from the flat closure rows

pub mod utils;

pub mod catalog;
pub mod config;
pub mod recursive_query;
pub mod schema_catalog;
pub mod seed_query;
pub mod server;
pub mod store;
