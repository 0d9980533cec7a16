//! The per-interaction filter over the merged dataset.
//!
//! A filter is a conjunction of an inclusive date range and two optional
//! membership predicates (categories, product names). `None` means the
//! predicate is unconstrained, which is distinct from an empty set. A filter
//! that matches nothing reports [`FilterOutcome::Empty`] so callers suppress
//! aggregation instead of rendering zero-valued metrics.

use std::collections::HashSet;

use chrono::NaiveDate;
use itertools::Itertools;

use crate::model::MergedSale;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub categories: Option<HashSet<String>>,
    pub products: Option<HashSet<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// The filter combination matched no records. Not an error; the caller
    /// should short-circuit aggregation.
    Empty,
    Matched(Vec<MergedSale>),
}

impl ReportFilter {
    pub fn date_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            categories: None,
            products: None,
        }
    }

    pub fn with_categories<I: IntoIterator<Item = String>>(mut self, categories: I) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    pub fn with_products<I: IntoIterator<Item = String>>(mut self, products: I) -> Self {
        self.products = Some(products.into_iter().collect());
        self
    }

    fn matches(&self, record: &MergedSale) -> bool {
        if record.sale.sale_date < self.start || record.sale.sale_date > self.end {
            return false;
        }
        if let Some(categories) = &self.categories
            && !categories.contains(&record.category)
        {
            return false;
        }
        if let Some(products) = &self.products {
            // A sale without a product name cannot belong to any selection.
            match &record.product_name {
                Some(name) if products.contains(name) => {}
                _ => return false,
            }
        }
        true
    }

    /// Read-only projection of the dataset; the input is never mutated.
    pub fn apply(&self, sales: &[MergedSale]) -> FilterOutcome {
        let matched: Vec<MergedSale> = sales
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect();
        if matched.is_empty() {
            FilterOutcome::Empty
        } else {
            FilterOutcome::Matched(matched)
        }
    }
}

/// Earliest and latest sale dates in a record set, for default date ranges.
pub fn date_bounds(sales: &[MergedSale]) -> Option<(NaiveDate, NaiveDate)> {
    let min = sales.iter().map(|s| s.sale.sale_date).min()?;
    let max = sales.iter().map(|s| s.sale.sale_date).max()?;
    Some((min, max))
}

/// Distinct categories in a record set, sorted, for cascading filter choices.
pub fn distinct_categories(sales: &[MergedSale]) -> Vec<String> {
    sales
        .iter()
        .map(|s| s.category.clone())
        .unique()
        .sorted()
        .collect()
}

/// Distinct product names, optionally restricted to a category subset, for
/// the second level of the cascade.
pub fn distinct_products(
    sales: &[MergedSale],
    categories: Option<&HashSet<String>>,
) -> Vec<String> {
    sales
        .iter()
        .filter(|s| categories.is_none_or(|set| set.contains(&s.category)))
        .filter_map(|s| s.product_name.clone())
        .unique()
        .sorted()
        .collect()
}
