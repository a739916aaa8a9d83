//! Data models for the report pipeline.
//!
//! This module contains the core data structures shared across the
//! pipeline stages: sale records, aggregates, report requests, and
//! the generated summary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used for `top_sku`/`top_branch` when no records match.
pub const NO_DATA: &str = "N/A";

/// A single sale record.
///
/// Owned and mutated by the CRUD layer; the pipeline only reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Product SKU identifier.
    pub sku: String,
    /// Number of units sold (positive).
    pub units: u32,
    /// Unit price (non-negative).
    pub price: f64,
    /// Branch where the sale happened.
    pub branch: String,
    /// When the sale happened.
    pub sold_at: DateTime<Utc>,
    /// Username of whoever recorded the sale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Summary statistics produced by the aggregation engine.
///
/// A fresh value per aggregation call; it has no identity beyond its
/// fields. Empty input yields the all-zero/sentinel value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesAggregates {
    /// Sum of unit counts across the filtered record set.
    pub total_units: u64,
    /// Sum of units x price across the filtered set. Unrounded; two-decimal
    /// formatting happens at the email-rendering stage.
    pub total_revenue: f64,
    /// SKU with the highest unit-count sum, or `NO_DATA`.
    pub top_sku: String,
    /// Branch with the highest unit-count sum, or `NO_DATA`.
    pub top_branch: String,
}

impl SalesAggregates {
    /// The result for an empty record set.
    pub fn empty() -> Self {
        Self {
            total_units: 0,
            total_revenue: 0.0,
            top_sku: NO_DATA.to_string(),
            top_branch: NO_DATA.to_string(),
        }
    }
}

/// The immutable message that starts one pipeline run.
///
/// Created once by the request-handling layer, consumed exactly once by
/// the orchestrator, then discarded.
#[derive(Debug, Clone)]
pub struct ReportRequest {
    /// Start of the reporting period (inclusive).
    pub from: NaiveDate,
    /// End of the reporting period (inclusive).
    pub to: NaiveDate,
    /// Optional branch filter (case-sensitive exact match).
    pub branch: Option<String>,
    /// Destination address for the report email.
    pub email_to: String,
    /// Opaque identifier used only for correlation in logs.
    pub request_id: String,
}

/// Where the summary text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryProvenance {
    /// Produced by the external text-generation service.
    Narrative,
    /// Built from the deterministic template.
    Templated,
}

impl fmt::Display for SummaryProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryProvenance::Narrative => write!(f, "narrative"),
            SummaryProvenance::Templated => write!(f, "templated"),
        }
    }
}

/// A generated executive summary. Exists only within one pipeline run.
#[derive(Debug, Clone)]
pub struct GeneratedSummary {
    /// The summary text.
    pub text: String,
    /// Which path produced the text.
    pub provenance: SummaryProvenance,
}

/// Terminal state of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The full report email went out.
    Completed,
    /// The primary path failed; the degraded email went out instead.
    Degraded,
    /// Both the primary and the degraded attempt failed. The request is
    /// lost from the pipeline's perspective.
    Failed,
}

impl fmt::Display for ReportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportOutcome::Completed => write!(f, "completed"),
            ReportOutcome::Degraded => write!(f, "degraded"),
            ReportOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// The 202-style acknowledgment returned to the caller before the
/// pipeline starts. Emitted by the request-handling layer, never by the
/// pipeline itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAck {
    pub request_id: String,
    pub status: String,
    pub message: String,
    pub estimated_time: String,
    pub requested_at: DateTime<Utc>,
}

impl ReportAck {
    /// Build the standard PROCESSING acknowledgment for a request.
    pub fn processing(request_id: &str, email_to: &str) -> Self {
        Self {
            request_id: request_id.to_string(),
            status: "PROCESSING".to_string(),
            message: format!(
                "Your report request is being processed. The summary will arrive at {} shortly.",
                email_to
            ),
            estimated_time: "30-60 seconds".to_string(),
            requested_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregates() {
        let empty = SalesAggregates::empty();
        assert_eq!(empty.total_units, 0);
        assert_eq!(empty.total_revenue, 0.0);
        assert_eq!(empty.top_sku, NO_DATA);
        assert_eq!(empty.top_branch, NO_DATA);
    }

    #[test]
    fn test_sale_deserialization() {
        let json = r#"{
            "sku": "OREO_CLASSIC",
            "units": 10,
            "price": 1.99,
            "branch": "Miraflores",
            "sold_at": "2025-11-03T14:30:00Z"
        }"#;

        let sale: Sale = serde_json::from_str(json).unwrap();
        assert_eq!(sale.sku, "OREO_CLASSIC");
        assert_eq!(sale.units, 10);
        assert_eq!(sale.branch, "Miraflores");
        assert!(sale.created_by.is_none());
    }

    #[test]
    fn test_ack_shape() {
        let ack = ReportAck::processing("req-123", "ceo@example.com");
        assert_eq!(ack.status, "PROCESSING");
        assert!(ack.message.contains("ceo@example.com"));

        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["requestId"], "req-123");
        assert!(json["estimatedTime"].is_string());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ReportOutcome::Completed.to_string(), "completed");
        assert_eq!(ReportOutcome::Degraded.to_string(), "degraded");
        assert_eq!(ReportOutcome::Failed.to_string(), "failed");
    }
}
