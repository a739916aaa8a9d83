//! Summary generator backed by a chat-completions endpoint.
//!
//! The generator never fails: transport errors, unexpected statuses and
//! malformed response envelopes are all absorbed into the templated
//! fallback, and the provenance flag records which path produced the
//! text.

use crate::config::ModelConfig;
use crate::models::{GeneratedSummary, SalesAggregates, SummaryProvenance};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Internal failure taxonomy. Never leaves this module: every variant
/// ends in the templated fallback.
#[derive(Debug, Error)]
enum SummaryError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed model response: {0}")]
    Malformed(&'static str),
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completions response envelope. All fields default so that shape
/// validation happens in `extract_content`, not in serde.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

const SYSTEM_PROMPT: &str = "You are a senior sales analyst. You write clear, \
professional, actionable executive summaries.";

/// Generates the executive summary for a set of aggregates.
pub struct SummaryGenerator {
    config: ModelConfig,
    http_client: reqwest::Client,
}

impl SummaryGenerator {
    /// Create a generator. The HTTP client carries an explicit timeout so
    /// a stalled model call ends in the fallback instead of hanging the
    /// pipeline run.
    pub fn new(config: ModelConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http_client,
        }
    }

    /// Produce a summary for the aggregates. Never fails.
    ///
    /// Without a configured token no outbound call is attempted and the
    /// templated text is returned directly.
    pub async fn generate(&self, aggregates: &SalesAggregates) -> GeneratedSummary {
        if !self.config.token_configured() {
            warn!("Model token not configured, using templated summary");
            return GeneratedSummary {
                text: templated_summary(aggregates),
                provenance: SummaryProvenance::Templated,
            };
        }

        match self.request_narrative(aggregates).await {
            Ok(text) => {
                info!("Narrative summary generated by {}", self.config.id);
                GeneratedSummary {
                    text,
                    provenance: SummaryProvenance::Narrative,
                }
            }
            Err(e) => {
                warn!("Model call failed ({}), using templated summary", e);
                GeneratedSummary {
                    text: templated_summary(aggregates),
                    provenance: SummaryProvenance::Templated,
                }
            }
        }
    }

    /// Call the model and extract the narrative text.
    async fn request_narrative(&self, aggregates: &SalesAggregates) -> Result<String, SummaryError> {
        let request = ChatRequest {
            model: self.config.id.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(aggregates),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!("Requesting narrative from {}", self.config.api_url);

        let response = self
            .http_client
            .post(&self.config.api_url)
            .bearer_auth(self.config.token.as_deref().unwrap_or_default())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummaryError::Status { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;
        extract_content(chat_response)
    }
}

/// Pull the narrative out of the response envelope, treating any missing
/// or blank field as a malformed response.
fn extract_content(response: ChatResponse) -> Result<String, SummaryError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(SummaryError::Malformed("no choices in response"))?;

    let message = choice
        .message
        .ok_or(SummaryError::Malformed("choice carries no message"))?;

    let content = message
        .content
        .ok_or(SummaryError::Malformed("message carries no content"))?;

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(SummaryError::Malformed("content is blank"));
    }

    Ok(trimmed.to_string())
}

/// The user prompt, embedding the four statistics.
fn build_prompt(aggregates: &SalesAggregates) -> String {
    format!(
        "As a sales analyst, write an executive summary of at most 120 words based on \
         this data: we sold {} units, generated ${:.2} in revenue, the best-selling \
         product was {} and the leading branch was {}. \
         Keep it professional and concise for an executive email.",
        aggregates.total_units,
        aggregates.total_revenue,
        aggregates.top_sku,
        aggregates.top_branch
    )
}

/// Deterministic fallback narrative built from the aggregates alone.
pub fn templated_summary(aggregates: &SalesAggregates) -> String {
    format!(
        "📊 EXECUTIVE SALES SUMMARY\n\n\
         This period closed with {} units sold and a total revenue of ${:.2}. \
         The standout product was {}, confirming its popularity with our customers. \
         The {} branch led all locations in sales volume. \
         These numbers reflect solid commercial performance across the board.\n\n\
         Let's keep this momentum going!",
        aggregates.total_units,
        aggregates.total_revenue,
        aggregates.top_sku,
        aggregates.top_branch
    )
}
