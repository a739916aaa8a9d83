//! Sales aggregation engine.
//!
//! The engine itself is a pure function over a record set; the service
//! wrapper adds the date-window query against the store. Aggregation
//! never fails: an empty record set produces the sentinel result.

use crate::models::{Sale, SalesAggregates};
use crate::sales::store::SaleStore;
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Aggregate a record set into summary statistics.
///
/// When a branch filter is given, records from other branches are
/// discarded before any computation (case-sensitive exact match).
/// Top-SKU/top-branch ties resolve to the lexicographically smallest key.
pub fn aggregate(sales: &[Sale], branch: Option<&str>) -> SalesAggregates {
    let filtered: Vec<&Sale> = match branch {
        Some(branch) => sales.iter().filter(|sale| sale.branch == branch).collect(),
        None => sales.iter().collect(),
    };

    if filtered.is_empty() {
        return SalesAggregates::empty();
    }

    let total_units: u64 = filtered.iter().map(|sale| u64::from(sale.units)).sum();

    let total_revenue: f64 = filtered
        .iter()
        .map(|sale| f64::from(sale.units) * sale.price)
        .sum();

    let top_sku = top_by_units(filtered.iter().map(|sale| (sale.sku.as_str(), sale.units)));
    let top_branch = top_by_units(
        filtered
            .iter()
            .map(|sale| (sale.branch.as_str(), sale.units)),
    );

    SalesAggregates {
        total_units,
        total_revenue,
        top_sku,
        top_branch,
    }
}

/// Sum units per key and return the key with the highest sum.
///
/// Grouping in a `BTreeMap` and replacing the leader only on a strictly
/// greater sum makes the lex-smallest key win every tie.
fn top_by_units<'a>(pairs: impl Iterator<Item = (&'a str, u32)>) -> String {
    let mut by_key: BTreeMap<&str, u64> = BTreeMap::new();
    for (key, units) in pairs {
        *by_key.entry(key).or_default() += u64::from(units);
    }

    let mut top: Option<(&str, u64)> = None;
    for (key, sum) in by_key {
        if top.map_or(true, |(_, best)| sum > best) {
            top = Some((key, sum));
        }
    }

    top.map(|(key, _)| key.to_string())
        .unwrap_or_else(|| crate::models::NO_DATA.to_string())
}

/// Aggregation over the store's date-windowed record set.
pub struct AggregationService {
    store: Arc<dyn SaleStore>,
}

impl AggregationService {
    /// Create a service over the given store.
    pub fn new(store: Arc<dyn SaleStore>) -> Self {
        Self { store }
    }

    /// Aggregate all sales between start-of-day `from` and end-of-day `to`
    /// (both inclusive), optionally narrowed to one branch.
    pub async fn aggregates_for(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        branch: Option<&str>,
    ) -> Result<SalesAggregates> {
        let start = from.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc();
        let end = to
            .and_hms_opt(23, 59, 59)
            .expect("end of day is valid")
            .and_utc();

        let sales = self.store.sales_between(start, end).await?;
        Ok(aggregate(&sales, branch))
    }
}
