//! Findings producer abstraction and implementations.
//!
//! The producer is the generative collaborator behind `rl research` and
//! `rl update`: given a query (and optionally the previous findings), it
//! returns new findings text plus source attributions. The ledger records
//! whatever string comes back — prompting strategy and retrieval are the
//! producer's business, not the store's.
//!
//! Implementations:
//! - **[`DisabledProducer`]** — returns errors; used when generation is not configured.
//! - **[`OpenAIProducer`]** — calls the OpenAI chat completions API with
//!   retry and backoff (same strategy as the embedding provider).

use async_trait::async_trait;
use std::time::Duration;

use crate::config::ProducerConfig;
use crate::error::{LedgerError, Result};

/// Findings text and source attributions returned by a producer.
#[derive(Debug, Clone)]
pub struct ProducedFindings {
    pub findings: String,
    pub sources: Vec<String>,
}

/// Trait for findings producers.
#[async_trait]
pub trait FindingsProducer: Send + Sync {
    /// Returns the model identifier (e.g. `"gpt-4o-mini"`).
    fn model_name(&self) -> &str;

    /// Produce findings for `query`, optionally building on `previous`
    /// findings text from the latest recorded version.
    async fn produce(&self, query: &str, previous: Option<&str>) -> Result<ProducedFindings>;
}

// ============ Prompt templates ============

const DEFAULT_PROMPT_INITIAL: &str = "You are a research assistant. Research the following \
question and write structured findings. Separate distinct topics with blank lines.\n\n\
Question: {query}";

const DEFAULT_PROMPT_UPDATE: &str = "You are a research assistant. Below are previously \
recorded findings. Update and extend them in light of the question, keeping the section \
structure where it still applies. Separate distinct topics with blank lines.\n\n\
Previous findings:\n{previous}\n\nQuestion: {query}";

/// Render the initial-research prompt, substituting `{query}`.
pub fn initial_prompt(config: &ProducerConfig, query: &str) -> String {
    config
        .prompt_initial
        .as_deref()
        .unwrap_or(DEFAULT_PROMPT_INITIAL)
        .replace("{query}", query)
}

/// Render the update prompt, substituting `{query}` and `{previous}`.
pub fn update_prompt(config: &ProducerConfig, query: &str, previous: &str) -> String {
    config
        .prompt_update
        .as_deref()
        .unwrap_or(DEFAULT_PROMPT_UPDATE)
        .replace("{previous}", previous)
        .replace("{query}", query)
}

// ============ Disabled Producer ============

/// A no-op producer that always returns errors.
pub struct DisabledProducer;

#[async_trait]
impl FindingsProducer for DisabledProducer {
    fn model_name(&self) -> &str {
        "disabled"
    }

    async fn produce(&self, _query: &str, _previous: Option<&str>) -> Result<ProducedFindings> {
        Err(LedgerError::Producer(
            "findings provider is disabled. Set [producer] provider in config.".to_string(),
        ))
    }
}

// ============ OpenAI Producer ============

/// Findings producer using the OpenAI chat completions API.
///
/// Requires the `OPENAI_API_KEY` environment variable to be set.
pub struct OpenAIProducer {
    model: String,
    max_retries: u32,
    client: reqwest::Client,
    config: ProducerConfig,
}

impl OpenAIProducer {
    pub fn new(config: &ProducerConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| LedgerError::Producer("producer.model required for OpenAI provider".to_string()))?;

        if std::env::var("OPENAI_API_KEY").is_err() {
            return Err(LedgerError::Producer(
                "OPENAI_API_KEY environment variable not set".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LedgerError::Producer(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            model,
            max_retries: config.max_retries,
            client,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl FindingsProducer for OpenAIProducer {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn produce(&self, query: &str, previous: Option<&str>) -> Result<ProducedFindings> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| LedgerError::Producer("OPENAI_API_KEY not set".to_string()))?;

        let prompt = match previous {
            Some(previous) => update_prompt(&self.config, query, previous),
            None => initial_prompt(&self.config, query),
        };

        let body = serde_json::json!({
            "model": self.model,
            "messages": [ { "role": "user", "content": prompt } ],
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post("https://api.openai.com/v1/chat/completions")
                .header("Authorization", format!("Bearer {}", api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await.map_err(|e| {
                            LedgerError::Producer(format!("invalid completion response: {}", e))
                        })?;
                        let findings = parse_completion_response(&json)?;
                        return Ok(ProducedFindings {
                            findings,
                            sources: vec![format!("openai:{}", self.model)],
                        });
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(LedgerError::Producer(format!(
                            "OpenAI API error {}: {}",
                            status, body_text
                        )));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    return Err(LedgerError::Producer(format!(
                        "OpenAI API error {}: {}",
                        status, body_text
                    )));
                }
                Err(e) => {
                    last_err = Some(LedgerError::Producer(format!("request failed: {}", e)));
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| LedgerError::Producer("generation failed after retries".to_string())))
    }
}

/// Extract `choices[0].message.content` from a chat completion response.
fn parse_completion_response(json: &serde_json::Value) -> Result<String> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            LedgerError::Producer("invalid response: missing message content".to_string())
        })
}

/// Create the appropriate [`FindingsProducer`] based on configuration.
pub fn create_producer(config: &ProducerConfig) -> Result<Box<dyn FindingsProducer>> {
    match config.provider.as_str() {
        "disabled" => Ok(Box::new(DisabledProducer)),
        "openai" => Ok(Box::new(OpenAIProducer::new(config)?)),
        other => Err(LedgerError::Producer(format!(
            "unknown findings provider: {}",
            other
        ))),
    }
}
