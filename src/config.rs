//! Configuration types.
//!
//! Everything is read once at startup and handed to the router; nothing
//! below is consulted per request.

use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use secrecy::SecretString;

use crate::error::ConfigError;

/// Default Telegram Bot API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Default HTTP port for the relay.
pub const DEFAULT_PORT: u16 = 3000;

/// Default pause between consecutive chunks of one message.
pub const DEFAULT_CHUNK_DELAY: Duration = Duration::from_millis(100);

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Bot credential (`BOT_TOKEN`).
    pub bot_token: Option<SecretString>,
    /// Destination for the detailed report (`PRIVATE_CHAT_ID`).
    pub private_chat_id: Option<String>,
    /// Destination for the short summary (`GROUP_CHAT_ID`).
    pub group_chat_id: Option<String>,
    /// Bot API base URL, overridable for tests and self-hosted API servers.
    pub api_base: String,
    /// Listen port.
    pub port: u16,
    /// Pause between chunks of one message.
    pub chunk_delay: Duration,
    /// Offset used when rendering submission dates.
    pub report_offset: FixedOffset,
}

/// Complete set of credentials needed to dispatch a submission.
#[derive(Debug, Clone)]
pub struct TelegramCredentials {
    pub bot_token: SecretString,
    pub private_chat_id: String,
    pub group_chat_id: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            private_chat_id: None,
            group_chat_id: None,
            api_base: DEFAULT_API_BASE.to_string(),
            port: DEFAULT_PORT,
            chunk_delay: DEFAULT_CHUNK_DELAY,
            report_offset: utc(),
        }
    }
}

impl RelayConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base = get("TELEGRAM_API_BASE")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let port: u16 = get("QUIZ_RELAY_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let chunk_delay = get("QUIZ_RELAY_CHUNK_DELAY_MS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_CHUNK_DELAY);

        let report_offset = match get("REPORT_UTC_OFFSET_MINUTES") {
            Some(raw) => parse_offset(&raw)?,
            None => utc(),
        };

        Ok(Self {
            bot_token: get("BOT_TOKEN").map(SecretString::from),
            private_chat_id: get("PRIVATE_CHAT_ID"),
            group_chat_id: get("GROUP_CHAT_ID"),
            api_base,
            port,
            chunk_delay,
            report_offset,
        })
    }

    /// Return the full credential set, or name every missing variable.
    pub fn credentials(&self) -> Result<TelegramCredentials, ConfigError> {
        let mut missing = Vec::new();
        if self.bot_token.is_none() {
            missing.push("BOT_TOKEN");
        }
        if self.private_chat_id.is_none() {
            missing.push("PRIVATE_CHAT_ID");
        }
        if self.group_chat_id.is_none() {
            missing.push("GROUP_CHAT_ID");
        }

        match (&self.bot_token, &self.private_chat_id, &self.group_chat_id) {
            (Some(token), Some(private), Some(group)) => Ok(TelegramCredentials {
                bot_token: token.clone(),
                private_chat_id: private.clone(),
                group_chat_id: group.clone(),
            }),
            _ => Err(ConfigError::MissingRequired {
                key: missing.join(", "),
                hint: "Set the Telegram bot token and both chat ids in the environment.".into(),
            }),
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: "REPORT_UTC_OFFSET_MINUTES".into(),
        message,
    };
    let minutes: i32 = raw
        .parse()
        .map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| invalid(format!("{minutes} minutes is out of range")))
}
