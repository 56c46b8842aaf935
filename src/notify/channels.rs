//! Alert delivery channels
//!
//! Channels are fire-and-forget: each configured channel is attempted
//! independently, failures are logged with their cause, and nothing
//! propagates back into the check cycle. A lost alert is re-sent on the next
//! pass if the condition persists.

use super::AlertMessage;

const SLACK_API_BASE: &str = "https://slack.com/api";
const DISCORD_API_BASE: &str = "https://discord.com/api/v10";

/// One configured delivery channel
#[derive(Debug, Clone)]
pub enum Channel {
    /// Slack bot posting to a channel via `chat.postMessage`
    Slack { token: String, channel: String },
    /// Discord bot posting to a channel via the REST messages endpoint
    Discord { token: String, channel_id: u64 },
}

impl Channel {
    pub fn name(&self) -> &'static str {
        match self {
            Channel::Slack { .. } => "slack",
            Channel::Discord { .. } => "discord",
        }
    }
}

/// Dispatches alerts to every enabled channel
#[derive(Debug)]
pub struct Notifier {
    client: reqwest::Client,
    channels: Vec<Channel>,
    slack_api_base: String,
    discord_api_base: String,
}

impl Notifier {
    pub fn new(channels: Vec<Channel>) -> Self {
        Self {
            client: reqwest::Client::new(),
            channels,
            slack_api_base: SLACK_API_BASE.to_string(),
            discord_api_base: DISCORD_API_BASE.to_string(),
        }
    }

    /// Override the channel API base URLs (mock servers in tests)
    pub fn with_api_bases(mut self, slack: impl Into<String>, discord: impl Into<String>) -> Self {
        self.slack_api_base = slack.into();
        self.discord_api_base = discord.into();
        self
    }

    /// Whether any channel is configured
    pub fn is_enabled(&self) -> bool {
        !self.channels.is_empty()
    }

    /// Deliver an alert to every channel. Per-channel failures are logged
    /// and do not stop delivery to the remaining channels.
    pub async fn dispatch(&self, message: &AlertMessage) {
        let text = message.render();

        for channel in &self.channels {
            match self.send(channel, &text).await {
                Ok(()) => {
                    tracing::debug!(
                        channel = channel.name(),
                        target = %message.target,
                        "Alert delivered"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        channel = channel.name(),
                        target = %message.target,
                        error = %e,
                        "Alert delivery failed"
                    );
                }
            }
        }
    }

    async fn send(&self, channel: &Channel, text: &str) -> Result<(), NotifyError> {
        match channel {
            Channel::Slack { token, channel } => self.send_slack(token, channel, text).await,
            Channel::Discord { token, channel_id } => {
                self.send_discord(token, *channel_id, text).await
            }
        }
    }

    async fn send_slack(&self, token: &str, channel: &str, text: &str) -> Result<(), NotifyError> {
        let url = format!("{}/chat.postMessage", self.slack_api_base);
        let payload = serde_json::json!({ "channel": channel, "text": text });

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        // Slack reports failures as HTTP 200 with `"ok": false`
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        if !body.get("ok").and_then(serde_json::Value::as_bool).unwrap_or(false) {
            let reason = body
                .get("error")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown");
            return Err(NotifyError::Rejected(reason.to_string()));
        }

        Ok(())
    }

    async fn send_discord(
        &self,
        token: &str,
        channel_id: u64,
        text: &str,
    ) -> Result<(), NotifyError> {
        let url = format!("{}/channels/{}/messages", self.discord_api_base, channel_id);
        let payload = serde_json::json!({ "content": text });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bot {}", token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}

/// Channel delivery errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Delivery error: {0}")]
    Delivery(String),

    #[error("Channel API returned status {0}")]
    Status(u16),

    #[error("Channel API rejected the message: {0}")]
    Rejected(String),
}
