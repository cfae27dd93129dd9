use reqwest::Client;
pub use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Default webhook endpoint when neither config nor env names one.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://arianab68.app.n8n.cloud/webhook/4a8cdb1e-dc63-4711-9d23-7d4e28257943";

/// A failed webhook call.
///
/// Every variant is handled the same way by the conversation; the variant
/// only records which step failed so the log says something useful.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("webhook returned status {0}")]
    Status(StatusCode),
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("webhook reply was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("webhook task did not finish: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    pub fn new(url: &str) -> Self {
        Self::with_http_client(url, Client::new())
    }

    pub fn with_http_client(url: &str, client: Client) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }

    /// Send the prompt as the `message` query parameter and return the
    /// reply text. Anything other than a 2xx JSON reply is an error.
    pub async fn fetch_reply(&self, prompt: &str) -> Result<String, WebhookError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("message", prompt)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status));
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)?;
        let text = extract_reply_text(&data);

        tracing::info!(status = status.as_u16(), reply_len = text.len(), "webhook replied");
        Ok(text)
    }
}

/// Pick the reply text out of the webhook's JSON: `output`, then `text`,
/// then the whole body as compact JSON.
pub fn extract_reply_text(data: &Value) -> String {
    ["output", "text"]
        .iter()
        .find_map(|key| {
            data.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_else(|| data.to_string())
}
