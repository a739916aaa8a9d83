//! Sale-record store interface.
//!
//! Persistence itself belongs to the CRUD layer; the pipeline only needs
//! a date-range query. `InMemorySaleStore` backs that query with records
//! loaded from a JSON file.

use crate::models::Sale;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Read-only access to sale records, as the pipeline consumes them.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Return all sales whose timestamp falls within `[start, end]`.
    async fn sales_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Sale>>;
}

/// A store over an in-memory record set.
pub struct InMemorySaleStore {
    sales: Vec<Sale>,
}

impl InMemorySaleStore {
    /// Create a store over the given records.
    pub fn new(sales: Vec<Sale>) -> Self {
        Self { sales }
    }

    /// Load records from a JSON file containing an array of sales.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read sales data file: {}", path.display()))?;

        let sales: Vec<Sale> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sales data file: {}", path.display()))?;

        Ok(Self::new(sales))
    }

    /// Number of records held by the store.
    pub fn len(&self) -> usize {
        self.sales.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.sales.is_empty()
    }
}

#[async_trait]
impl SaleStore for InMemorySaleStore {
    async fn sales_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Sale>> {
        Ok(self
            .sales
            .iter()
            .filter(|sale| sale.sold_at >= start && sale.sold_at <= end)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale_at(sku: &str, day: u32) -> Sale {
        Sale {
            sku: sku.to_string(),
            units: 1,
            price: 1.0,
            branch: "Miraflores".to_string(),
            sold_at: Utc.with_ymd_and_hms(2025, 11, day, 12, 0, 0).unwrap(),
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_range_query_is_inclusive() {
        let store = InMemorySaleStore::new(vec![
            sale_at("EARLY", 1),
            sale_at("INSIDE", 5),
            sale_at("LATE", 20),
        ]);

        let start = Utc.with_ymd_and_hms(2025, 11, 3, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 5, 12, 0, 0).unwrap();

        let sales = store.sales_between(start, end).await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].sku, "INSIDE");
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = InMemorySaleStore::new(vec![]);
        assert!(store.is_empty());

        let start = Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 11, 30, 23, 59, 59).unwrap();

        let sales = store.sales_between(start, end).await.unwrap();
        assert!(sales.is_empty());
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let path = std::env::temp_dir().join("insight-factory-bad-sales.json");
        std::fs::write(&path, "{not json").unwrap();

        let result = InMemorySaleStore::load(&path);
        assert!(result.is_err());

        std::fs::remove_file(&path).ok();
    }
}
