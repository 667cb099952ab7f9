//! Recursive hierarchy queries.
//!
//! Compiles the transitive closure of a self-referencing or many-to-many
//! navigation into a single `WITH RECURSIVE` statement, and rebuilds a
//! deduplicated forest from the flat rows it returns.
//!
//! ```text
//! filter ──► seed compiler ──► normalizer ──► CTE compiler ──► SQL + params
//!                 ▲                                ▲
//!                 └──────── relationship resolver ─┘
//! rows ──► forest reconstructor ──► roots
//! ```

pub mod cache;
pub mod cte_compiler;
pub mod engine;
pub mod errors;
pub mod forest;
pub mod placeholders;
pub mod relationship;
pub mod seed_normalizer;
pub mod types;

pub use cache::{CompiledQueryCache, QueryCacheConfig};
pub use cte_compiler::RECURSIVE_CTE_NAME;
pub use engine::RecursiveQueryEngine;
pub use errors::RecursiveQueryError;
pub use forest::{reconstruct as reconstruct_forest, ClosureRow, ForestNode};
pub use placeholders::{placeholder_indices, PlaceholderStyle};
pub use types::{
    ColumnRef, CompiledRecursiveQuery, NormalizedSeed, RelationshipDescriptor, RelationshipKind,
    TraversalDirection,
};
