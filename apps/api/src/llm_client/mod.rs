/// LLM Client — the only module that talks to the Anthropic Messages API.
///
/// Used by the LLM-backed item generator. The simulated backends never
/// construct one.
use std::time::Duration;

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_ATTEMPTS: u32 = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("LLM returned no text content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Thin wrapper over the Messages API with retry and JSON helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, api_key })
    }

    /// Sends one user turn and returns the first text block.
    /// 429 and 5xx responses and transport errors are retried with backoff.
    pub async fn complete(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "LLM attempt {attempt} failed, retrying in {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(MESSAGES_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&body)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();
            if status.as_u16() == 429 || status.is_server_error() {
                let message = response.text().await.unwrap_or_default();
                warn!("LLM API returned {status}");
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
                continue;
            }

            if !status.is_success() {
                let raw = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                    .map(|e| e.error.message)
                    .unwrap_or(raw);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: MessagesResponse = response.json().await?;
            debug!(
                input_tokens = parsed.usage.input_tokens,
                output_tokens = parsed.usage.output_tokens,
                "LLM call succeeded"
            );

            return parsed
                .content
                .into_iter()
                .find(|block| block.kind == "text")
                .and_then(|block| block.text)
                .ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::Exhausted {
            attempts: MAX_ATTEMPTS,
        }))
    }

    /// Like [`complete`](Self::complete) but deserializes the reply as JSON.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let text = self.complete(prompt, system).await?;
        Ok(serde_json::from_str(unfence(&text))?)
    }
}

/// 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 << attempt.saturating_sub(1).min(5))
}

/// Removes a surrounding markdown code fence, with or without a language tag.
fn unfence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening line, if any.
    let rest = match rest.find('\n') {
        Some(newline) if !rest[..newline].contains('{') && !rest[..newline].contains('[') => {
            &rest[newline + 1..]
        }
        Some(_) => rest,
        // Single-line fence: the tag runs straight into the payload.
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfence_with_language_tag() {
        assert_eq!(unfence("```json\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn test_unfence_single_line_with_language_tag() {
        assert_eq!(unfence("```json[{\"id\": \"1\"}]```"), "[{\"id\": \"1\"}]");
        assert_eq!(unfence("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unfence_without_tag() {
        assert_eq!(unfence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn test_unfence_plain_text_untouched() {
        assert_eq!(unfence("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
    }
}
