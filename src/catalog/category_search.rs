//! Category search.
//!
//! Finds the categories matching a search term or a category number inside
//! one root category, loads all their ancestors in one recursive query and
//! merges the matches into a single tree per top-level category.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::CatalogError;
use super::service::CatalogService;
use crate::recursive_query::{reconstruct_forest, ClosureRow, ForestNode};
use crate::schema_catalog::product_catalog::{CATEGORY, NAV_PARENT};
use crate::seed_query::Filter;
use crate::store::CategoryRecord;

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct SearchCategoriesQuery {
    #[validate(range(min = 1, message = "Root category id must be positive"))]
    pub root_category_id: i64,
    #[validate(length(min = 1, message = "Article number cannot be empty"))]
    pub article_number: String,
    /// Takes precedence over `category_number` when not blank
    pub search_term: Option<String>,
    pub category_number: Option<i64>,
}

/// What a search request matches categories by
#[derive(Debug, Clone, PartialEq)]
pub enum SearchCriterion {
    Term(String),
    CategoryNumber(i64),
}

impl SearchCriterion {
    fn seed_filter(&self, root_category_id: i64) -> Filter {
        let criterion = match self {
            SearchCriterion::Term(term) => Filter::contains_ignore_case("name", term.as_str()),
            SearchCriterion::CategoryNumber(number) => Filter::eq("category_number", *number),
        };
        Filter::and(vec![Filter::eq("root_category_id", root_category_id), criterion])
    }

    fn matches(&self, category: &CategoryRecord) -> bool {
        match self {
            SearchCriterion::Term(term) => category
                .name
                .to_lowercase()
                .contains(&term.to_lowercase()),
            SearchCriterion::CategoryNumber(number) => category.category_number == *number,
        }
    }

    fn describe(&self) -> String {
        match self {
            SearchCriterion::Term(term) => format!("search term '{}'", term),
            SearchCriterion::CategoryNumber(number) => format!("category number {}", number),
        }
    }
}

impl SearchCategoriesQuery {
    pub fn criterion(&self) -> Result<SearchCriterion, CatalogError> {
        if let Some(term) = self.search_term.as_deref().map(str::trim) {
            if !term.is_empty() {
                return Ok(SearchCriterion::Term(term.to_string()));
            }
        }
        match self.category_number {
            Some(number) if number != 0 => Ok(SearchCriterion::CategoryNumber(number)),
            _ => Err(CatalogError::InvalidRequest(
                "Either a search term or a category number must be provided".to_string(),
            )),
        }
    }
}

/// One node of a category search result tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCategoryDto {
    pub category_number: i64,
    pub label: String,
    /// The article is mapped to this category
    pub is_selected: bool,
    pub is_leaf: bool,
    pub parent_category_number: Option<i64>,
    pub children: Vec<SearchCategoryDto>,
}

struct DtoContext {
    mapped: HashSet<i64>,
    // category id -> category number
    numbers: HashMap<i64, i64>,
}

impl DtoContext {
    fn convert(&self, node: ForestNode<CategoryRecord>) -> SearchCategoryDto {
        let category = node.row.payload;
        SearchCategoryDto {
            category_number: category.category_number,
            label: category.name,
            is_selected: self.mapped.contains(&category.id),
            is_leaf: category.is_leaf,
            parent_category_number: category
                .parent_id
                .and_then(|id| self.numbers.get(&id).copied()),
            children: node.children.into_iter().map(|c| self.convert(c)).collect(),
        }
    }
}

impl CatalogService {
    pub fn search_categories(
        &self,
        query: &SearchCategoriesQuery,
    ) -> Result<Vec<SearchCategoryDto>, CatalogError> {
        query.validate()?;
        let criterion = query.criterion()?;

        let compiled = self.engine.compile_recursive_query(
            CATEGORY,
            &criterion.seed_filter(query.root_category_id),
            NAV_PARENT,
        )?;
        let mut categories = self.store.query_categories(&compiled)?;
        if categories.is_empty() {
            return Err(CatalogError::NoResultsForCategorySearch {
                root_category_id: query.root_category_id,
                criterion: criterion.describe(),
            });
        }
        categories.sort_by_key(|c| c.category_number);

        let matched: Vec<i64> = categories
            .iter()
            .filter(|c| criterion.matches(c))
            .map(|c| c.id)
            .collect();
        log::debug!(
            "Category search matched {} of {} categories",
            matched.len(),
            categories.len()
        );

        let context = DtoContext {
            mapped: self
                .store
                .mapped_category_ids(&query.article_number, query.root_category_id)?
                .into_iter()
                .collect(),
            numbers: categories.iter().map(|c| (c.id, c.category_number)).collect(),
        };

        let rows = categories
            .into_iter()
            .map(|c| ClosureRow::new(c.id, c.parent_id, c))
            .collect();
        let forest = reconstruct_forest(rows, &matched)?;

        Ok(forest.into_iter().map(|node| context.convert(node)).collect())
    }
}
