//! Report pipeline orchestrator.
//!
//! One run per request: aggregate, summarize, notify. The summary stage
//! absorbs its own failures, so the outer degraded path only triggers on
//! store or mail-transport errors. The degraded path re-aggregates and
//! sends the statistics-only email; if that also fails the run ends as
//! `Failed` and nothing further is attempted.

use crate::email::EmailDispatcher;
use crate::models::{ReportOutcome, ReportRequest};
use crate::sales::AggregationService;
use crate::summary::SummaryGenerator;
use anyhow::Result;
use tracing::{error, info, warn};

/// Sequences the pipeline stages for report requests.
///
/// Holds no per-request state; concurrent runs are fully independent.
pub struct ReportPipeline {
    aggregation: AggregationService,
    summaries: SummaryGenerator,
    email: EmailDispatcher,
}

impl ReportPipeline {
    /// Assemble the pipeline from its stages.
    pub fn new(
        aggregation: AggregationService,
        summaries: SummaryGenerator,
        email: EmailDispatcher,
    ) -> Self {
        Self {
            aggregation,
            summaries,
            email,
        }
    }

    /// Run the pipeline for one request. Entered exactly once per
    /// request; the outcome is observable only through logs and the
    /// outbound email.
    pub async fn handle(&self, request: ReportRequest) -> ReportOutcome {
        info!(
            "Processing report request {} for {}",
            request.request_id, request.email_to
        );

        match self.run(&request).await {
            Ok(()) => {
                info!(
                    "Report {} sent successfully to {}",
                    request.request_id, request.email_to
                );
                ReportOutcome::Completed
            }
            Err(e) => {
                error!("Report {} failed: {:#}", request.request_id, e);

                match self.run_degraded(&request).await {
                    Ok(()) => {
                        warn!(
                            "Report {} delivered via degraded path to {}",
                            request.request_id, request.email_to
                        );
                        ReportOutcome::Degraded
                    }
                    Err(e) => {
                        error!(
                            "Report {} degraded delivery also failed: {:#}",
                            request.request_id, e
                        );
                        ReportOutcome::Failed
                    }
                }
            }
        }
    }

    /// Primary path: aggregate, summarize, send the full report.
    async fn run(&self, request: &ReportRequest) -> Result<()> {
        let aggregates = self
            .aggregation
            .aggregates_for(request.from, request.to, request.branch.as_deref())
            .await?;

        let summary = self.summaries.generate(&aggregates).await;

        self.email
            .send_report(
                &request.email_to,
                request.from,
                request.to,
                &aggregates,
                &summary,
            )
            .await
    }

    /// Degraded path: re-aggregate and send the statistics-only email,
    /// bypassing the summary stage entirely.
    async fn run_degraded(&self, request: &ReportRequest) -> Result<()> {
        let aggregates = self
            .aggregation
            .aggregates_for(request.from, request.to, request.branch.as_deref())
            .await?;

        self.email
            .send_degraded_report(&request.email_to, request.from, request.to, &aggregates)
            .await
    }
}
