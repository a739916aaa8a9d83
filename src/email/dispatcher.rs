//! Report email rendering and dispatch.
//!
//! Two bodies exist: the primary one carries the narrative summary plus
//! a key-metrics block, and the degraded one embeds the statistics
//! directly so it never depends on the summary stage having run.

use crate::email::outbox::{EmailMessage, MailTransport};
use crate::models::{GeneratedSummary, SalesAggregates};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Renders and submits report emails through the mail transport.
pub struct EmailDispatcher {
    transport: Arc<dyn MailTransport>,
}

impl EmailDispatcher {
    /// Create a dispatcher over the given transport.
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Send the full report email. Transport failures propagate; there
    /// is no retry.
    pub async fn send_report(
        &self,
        email_to: &str,
        from: NaiveDate,
        to: NaiveDate,
        aggregates: &SalesAggregates,
        summary: &GeneratedSummary,
    ) -> Result<()> {
        let message = EmailMessage {
            to: email_to.to_string(),
            subject: subject(from, to),
            body: report_body(aggregates, &summary.text, from, to),
        };

        self.transport
            .send(&message)
            .await
            .with_context(|| format!("Failed to send report email to {}", email_to))?;

        info!(
            "Report email ({} summary) sent to {}",
            summary.provenance, email_to
        );
        Ok(())
    }

    /// Send the degraded report email, built from the statistics alone.
    pub async fn send_degraded_report(
        &self,
        email_to: &str,
        from: NaiveDate,
        to: NaiveDate,
        aggregates: &SalesAggregates,
    ) -> Result<()> {
        let message = EmailMessage {
            to: email_to.to_string(),
            subject: subject(from, to),
            body: degraded_body(aggregates, from, to),
        };

        self.transport
            .send(&message)
            .await
            .with_context(|| format!("Failed to send degraded report email to {}", email_to))?;

        info!("Degraded report email sent to {}", email_to);
        Ok(())
    }
}

fn subject(from: NaiveDate, to: NaiveDate) -> String {
    format!("Weekly Sales Report - {} to {}", from, to)
}

fn key_metrics(aggregates: &SalesAggregates) -> String {
    format!(
        "Key metrics:\n\
         - Total units: {}\n\
         - Total revenue: ${:.2}\n\
         - Best-selling SKU: {}\n\
         - Leading branch: {}",
        aggregates.total_units,
        aggregates.total_revenue,
        aggregates.top_sku,
        aggregates.top_branch
    )
}

fn report_body(
    aggregates: &SalesAggregates,
    summary: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> String {
    format!(
        "Weekly Sales Report\n\
         Period: {} to {}\n\n\
         {}\n\n\
         {}\n\n\
         Thank you for using Insight Factory!",
        from,
        to,
        summary,
        key_metrics(aggregates)
    )
}

fn degraded_body(aggregates: &SalesAggregates, from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "Weekly Sales Report\n\
         Period: {} to {}\n\n\
         Summary: {} units were sold for a total revenue of ${:.2}. \
         The best-selling SKU was {} and the leading branch was {}.\n\n\
         {}",
        from,
        to,
        aggregates.total_units,
        aggregates.total_revenue,
        aggregates.top_sku,
        aggregates.top_branch,
        key_metrics(aggregates)
    )
}
