//! Report worker: explicit task submission for pipeline runs.
//!
//! One submitted request becomes exactly one independent tokio task.
//! Runs for different requests interleave freely; stages within a run
//! stay strictly sequential inside the orchestrator. The submitting
//! side never waits for a run to finish, only for queue capacity.

use crate::models::ReportRequest;
use crate::pipeline::orchestrator::ReportPipeline;
use anyhow::{anyhow, Context, Result};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Accepts report requests and dispatches one pipeline task per event.
pub struct ReportWorker {
    tx: mpsc::Sender<ReportRequest>,
    dispatcher: JoinHandle<()>,
}

impl ReportWorker {
    /// Start the worker with a bounded submission queue.
    pub fn spawn(pipeline: Arc<ReportPipeline>, queue_capacity: usize) -> Self {
        let (tx, mut rx) = mpsc::channel::<ReportRequest>(queue_capacity.max(1));

        let dispatcher = tokio::spawn(async move {
            let mut runs: Vec<JoinHandle<()>> = Vec::new();

            while let Some(request) = rx.recv().await {
                let pipeline = Arc::clone(&pipeline);
                let request_id = request.request_id.clone();

                runs.push(tokio::spawn(async move {
                    let outcome = pipeline.handle(request).await;
                    debug!("Report run {} ended as {}", request_id, outcome);
                }));
            }

            for result in join_all(runs).await {
                if let Err(e) = result {
                    error!("Report task panicked: {}", e);
                }
            }
        });

        Self { tx, dispatcher }
    }

    /// Submit one request. Blocks only on queue back-pressure; fails
    /// only when the worker has shut down.
    pub async fn submit(&self, request: ReportRequest) -> Result<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| anyhow!("Report worker is shut down"))
    }

    /// Close the queue and wait for every in-flight run to finish.
    pub async fn join(self) -> Result<()> {
        drop(self.tx);
        self.dispatcher
            .await
            .context("Report worker dispatcher panicked")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::email::{EmailDispatcher, EmailMessage, MailTransport};
    use crate::models::Sale;
    use crate::sales::{AggregationService, InMemorySaleStore};
    use crate::summary::SummaryGenerator;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::Mutex;

    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl MailTransport for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<()> {
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn test_pipeline(mailer: Arc<RecordingMailer>) -> Arc<ReportPipeline> {
        let store = Arc::new(InMemorySaleStore::new(vec![Sale {
            sku: "OREO_CLASSIC".to_string(),
            units: 10,
            price: 1.99,
            branch: "Miraflores".to_string(),
            sold_at: Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0).unwrap(),
            created_by: None,
        }]));

        let generator = SummaryGenerator::new(ModelConfig {
            token: None,
            ..ModelConfig::default()
        });

        Arc::new(ReportPipeline::new(
            AggregationService::new(store),
            generator,
            EmailDispatcher::new(mailer),
        ))
    }

    fn request(id: &str) -> ReportRequest {
        ReportRequest {
            from: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2025, 11, 7).unwrap(),
            branch: None,
            email_to: format!("{}@example.com", id),
            request_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_one_email_per_submitted_event() {
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
        });
        let worker = ReportWorker::spawn(test_pipeline(mailer.clone()), 8);

        for i in 0..5 {
            worker.submit(request(&format!("req-{}", i))).await.unwrap();
        }

        worker.join().await.unwrap();

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 5);
    }

    #[tokio::test]
    async fn test_join_waits_for_in_flight_runs() {
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
        });
        let worker = ReportWorker::spawn(test_pipeline(mailer.clone()), 1);

        worker.submit(request("only")).await.unwrap();
        worker.join().await.unwrap();

        assert_eq!(mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tiny_queue_still_accepts_everything() {
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(Vec::new()),
        });
        // Capacity 0 is bumped to 1; submissions just see back-pressure.
        let worker = ReportWorker::spawn(test_pipeline(mailer.clone()), 0);

        for i in 0..3 {
            worker.submit(request(&format!("req-{}", i))).await.unwrap();
        }

        worker.join().await.unwrap();
        assert_eq!(mailer.sent.lock().unwrap().len(), 3);
    }
}
