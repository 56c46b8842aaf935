//! Runtime configuration read from the environment
//!
//! Channel credentials are read once at startup. A channel whose credentials
//! are absent is silently disabled; running with no channels at all is valid
//! (alerts then only reach the log).

use crate::notify::Channel;

/// Default persisted target document
pub const DEFAULT_STATE_FILE: &str = "apis.json";
/// Default check interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Optional chat-channel credentials
#[derive(Debug, Clone, Default)]
pub struct ChannelSettings {
    slack: Option<(String, String)>,
    discord: Option<(String, u64)>,
}

impl ChannelSettings {
    /// Read channel credentials from the environment:
    /// `SLACK_BOT_TOKEN`/`SLACK_CHANNEL_ID` and
    /// `DISCORD_BOT_TOKEN`/`DISCORD_CHANNEL_ID`.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("SLACK_BOT_TOKEN").ok(),
            std::env::var("SLACK_CHANNEL_ID").ok(),
            std::env::var("DISCORD_BOT_TOKEN").ok(),
            std::env::var("DISCORD_CHANNEL_ID").ok(),
        )
    }

    fn from_vars(
        slack_token: Option<String>,
        slack_channel: Option<String>,
        discord_token: Option<String>,
        discord_channel: Option<String>,
    ) -> Self {
        let slack = match (non_empty(slack_token), non_empty(slack_channel)) {
            (Some(token), Some(channel)) => Some((token, channel)),
            _ => None,
        };

        let discord = match (non_empty(discord_token), non_empty(discord_channel)) {
            (Some(token), Some(channel)) => match channel.parse::<u64>() {
                Ok(id) => Some((token, id)),
                Err(_) => {
                    tracing::warn!(
                        value = %channel,
                        "DISCORD_CHANNEL_ID is not a numeric id, Discord channel disabled"
                    );
                    None
                }
            },
            _ => None,
        };

        Self { slack, discord }
    }

    /// The channels enabled by these credentials
    pub fn channels(&self) -> Vec<Channel> {
        let mut channels = Vec::new();
        if let Some((token, channel)) = &self.slack {
            channels.push(Channel::Slack {
                token: token.clone(),
                channel: channel.clone(),
            });
        }
        if let Some((token, channel_id)) = &self.discord {
            channels.push(Channel::Discord {
                token: token.clone(),
                channel_id: *channel_id,
            });
        }
        channels
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
