use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

/// Delivery seam for the reminder job. Failures are reported as `false`, never raised.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> bool;
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    description: Option<String>,
}

/// Recent inbound events plus the bot's own profile, used to look up group chat ids.
#[derive(Serialize, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BotUpdates {
    pub updates: Vec<Value>,
    pub bot_info: Option<Value>,
}

pub struct TelegramBot {
    client: Client,
    api_url: Option<String>,
}

impl TelegramBot {
    /// A bot without a token stays usable; every call just fails softly.
    pub fn new(bot_token: Option<&str>, api_base: &str) -> Self {
        let api_url = bot_token.map(|token| format!("{}/bot{}", api_base.trim_end_matches('/'), token));
        TelegramBot {
            client: Client::new(),
            api_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_url.is_some()
    }

    async fn call(&self, method: &str, body: Option<Value>) -> Result<Value, String> {
        let api_url = self
            .api_url
            .as_ref()
            .ok_or_else(|| "TELEGRAM_BOT_TOKEN is not set".to_string())?;
        let url = format!("{}/{}", api_url, method);

        let request = match body {
            Some(body) => self.client.post(&url).json(&body),
            None => self.client.get(&url),
        };
        let response_text = request
            .send()
            .await
            .map_err(|e| format!("Telegram request failed: {}", e))?
            .text()
            .await
            .map_err(|e| format!("Failed to read Telegram response: {}", e))?;

        let response: TelegramResponse = serde_json::from_str(&response_text)
            .map_err(|e| format!("Failed to parse Telegram response: {}", e))?;

        if response.ok {
            Ok(response.result.unwrap_or(Value::Null))
        } else {
            Err(format!("Telegram API error: {:?}", response.description))
        }
    }

    /// Drops any webhook so `getUpdates` works, then returns recent updates and `getMe`.
    pub async fn bot_updates(&self) -> BotUpdates {
        if !self.is_configured() {
            return BotUpdates::default();
        }

        let fetched: Result<BotUpdates, String> = async {
            self.call("deleteWebhook", Some(serde_json::json!({}))).await?;
            let updates = match self.call("getUpdates", None).await? {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            let bot_info = self.call("getMe", None).await?;
            Ok::<_, String>(BotUpdates {
                updates,
                bot_info: Some(bot_info),
            })
        }
        .await;

        fetched.unwrap_or_else(|e| {
            error!("Failed to get updates: {}", e);
            BotUpdates::default()
        })
    }
}

#[async_trait]
impl MessageTransport for TelegramBot {
    async fn send_message(&self, chat_id: &str, text: &str) -> bool {
        if !self.is_configured() {
            warn!("TELEGRAM_BOT_TOKEN is not set");
            return false;
        }

        let request = SendMessageRequest { chat_id, text };
        let body = match serde_json::to_value(&request) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to encode message for {}: {}", chat_id, e);
                return false;
            }
        };

        match self.call("sendMessage", Some(body)).await {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to send message to {}: {}", chat_id, e);
                false
            }
        }
    }
}
