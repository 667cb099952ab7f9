use std::sync::Arc;

use super::cache::{CacheKey, CacheMetrics, CompiledQueryCache, QueryCacheConfig};
use super::cte_compiler;
use super::errors::RecursiveQueryError;
use super::relationship;
use super::seed_normalizer;
use super::types::{column_refs, CompiledRecursiveQuery};
use crate::schema_catalog::SchemaCatalog;
use crate::seed_query::{Filter, FilterCompiler, SeedQueryCompiler};

/// Entry point of the hierarchy query engine.
///
/// Stateless apart from the optional compiled statement cache, so one
/// instance is shared behind `Arc` by all requests.
pub struct RecursiveQueryEngine {
    catalog: Arc<SchemaCatalog>,
    seed_compiler: Arc<dyn SeedQueryCompiler>,
    cache: CompiledQueryCache,
}

impl RecursiveQueryEngine {
    pub fn new(catalog: Arc<SchemaCatalog>, cache_config: QueryCacheConfig) -> Self {
        RecursiveQueryEngine {
            catalog,
            seed_compiler: Arc::new(FilterCompiler::new()),
            cache: CompiledQueryCache::new(cache_config),
        }
    }

    pub fn with_seed_compiler(mut self, seed_compiler: Arc<dyn SeedQueryCompiler>) -> Self {
        self.seed_compiler = seed_compiler;
        self
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }

    /// Compile the closure of `navigation` starting from the rows of `entity`
    /// matching `filter` into one statement.
    ///
    /// The relationship is resolved first, so an invalid navigation fails
    /// before the seed compiler runs.
    pub fn compile_recursive_query(
        &self,
        entity: &str,
        filter: &Filter,
        navigation: &str,
    ) -> Result<CompiledRecursiveQuery, RecursiveQueryError> {
        let relationship = relationship::resolve(&self.catalog, entity, navigation)?;
        log::debug!(
            "Resolved {}.{} as {}",
            entity,
            navigation,
            relationship.kind_name()
        );

        let metadata = self.catalog.entity(entity)?;
        let seed = self.seed_compiler.compile(metadata, filter)?;
        let normalized = seed_normalizer::normalize(
            seed,
            &relationship,
            &column_refs(&metadata.primary_key),
        )?;

        let key = CacheKey::new(entity, navigation, &normalized.sql_text);
        if let Some(sql_text) = self.cache.get(&key) {
            return Ok(CompiledRecursiveQuery {
                sql_text,
                parameters: normalized.positional_parameters,
            });
        }

        let compiled = cte_compiler::compile(normalized, &relationship, metadata)?;
        log::debug!("Compiled recursive query: {}", compiled.sql_text);
        self.cache.insert(key, compiled.sql_text.clone());
        Ok(compiled)
    }
}
