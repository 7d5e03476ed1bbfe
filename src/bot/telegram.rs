use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Minimal Telegram Bot API client: long-polling `getUpdates` and
/// `sendMessage`, nothing more.
pub struct TelegramClient {
    client: reqwest::Client,
    base_url: String,
    poll_timeout: u64,
}

impl TelegramClient {
    pub fn new(token: &str, poll_timeout: u64) -> Result<Self, BotError> {
        Self::with_base_url(format!("https://api.telegram.org/bot{}", token), poll_timeout)
    }

    pub fn with_base_url(base_url: String, poll_timeout: u64) -> Result<Self, BotError> {
        // The HTTP timeout must outlast the long-poll window.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout.saturating_add(10)))
            .build()?;
        Ok(Self {
            client,
            base_url,
            poll_timeout,
        })
    }

    /// Long-poll for updates past the given offset.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, BotError> {
        let url = format!("{}/getUpdates", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("offset", offset), ("timeout", self.poll_timeout as i64)])
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<Vec<Update>> = response.json().await?;
        unwrap_api(body)
    }

    /// Send a plain-text reply into a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        let url = format!("{}/sendMessage", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?
            .error_for_status()?;

        let body: ApiResponse<serde_json::Value> = response.json().await?;
        unwrap_api(body).map(|_| ())
    }
}

fn unwrap_api<T>(body: ApiResponse<T>) -> Result<T, BotError> {
    if !body.ok {
        return Err(BotError::Api(
            body.description.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }
    body.result
        .ok_or_else(|| BotError::Api("missing result".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_deserializes() {
        let body = r#"{
            "ok": true,
            "result": [{
                "update_id": 42,
                "message": {
                    "message_id": 7,
                    "chat": {"id": 1234, "type": "private"},
                    "text": "/add usd"
                }
            }]
        }"#;
        let parsed: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = unwrap_api(parsed).unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 42);
        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 1234);
        assert_eq!(message.text.as_deref(), Some("/add usd"));
    }

    #[test]
    fn test_api_error_surfaces_description() {
        let body = r#"{"ok": false, "description": "Unauthorized"}"#;
        let parsed: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        match unwrap_api(parsed) {
            Err(BotError::Api(desc)) => assert_eq!(desc, "Unauthorized"),
            other => panic!("expected api error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_maximum_poll_timeout_does_not_panic() {
        let client = TelegramClient::with_base_url("http://localhost".into(), u64::MAX);
        assert!(client.is_ok());
    }

    #[test]
    fn test_updates_without_text_are_representable() {
        let body = r#"{"ok": true, "result": [{"update_id": 1, "message": null}]}"#;
        let parsed: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = unwrap_api(parsed).unwrap();
        assert!(updates[0].message.is_none());
    }
}
