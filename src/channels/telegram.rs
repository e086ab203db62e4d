//! Telegram channel — delivers HTML messages through the Bot API.
//!
//! Long texts are split to fit `sendMessage`'s limit and the parts are
//! posted strictly in order, with a short pause between them to stay
//! under the per-chat rate limit.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::channels::Channel;
use crate::config::DEFAULT_CHUNK_DELAY;
use crate::error::ChannelError;

/// Maximum message length for Telegram's sendMessage API, in UTF-16 code units.
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

const CHANNEL_NAME: &str = "Telegram";

/// Telegram channel — posts to the Bot API over HTTPS.
pub struct TelegramChannel {
    bot_token: SecretString,
    api_base: String,
    chunk_delay: Duration,
    client: reqwest::Client,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramChannel {
    pub fn new(bot_token: SecretString, api_base: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), bot_token, api_base)
    }

    /// Build on an existing HTTP client so connections are pooled.
    pub fn with_client(
        client: reqwest::Client,
        bot_token: SecretString,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            bot_token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            chunk_delay: DEFAULT_CHUNK_DELAY,
            client,
        }
    }

    /// Override the pause between consecutive chunks.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base,
            self.bot_token.expose_secret()
        )
    }

    /// Send a single chunk (≤4096 units) with HTML parse mode.
    async fn send_message_chunk(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "HTML"
        });

        let resp = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await
            // The URL carries the bot token; never let it reach logs.
            .map_err(|e| ChannelError::Http(e.without_url().to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let raw = resp.text().await.unwrap_or_default();
        let description = serde_json::from_str::<ApiResponse>(&raw)
            .ok()
            .and_then(|r| r.description);
        warn!(
            status = status.as_u16(),
            chat_id,
            description = description.as_deref().unwrap_or(""),
            "Telegram sendMessage rejected"
        );

        Err(ChannelError::Api {
            name: CHANNEL_NAME.into(),
            status: status.as_u16(),
            description,
        })
    }
}

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), ChannelError> {
        let chunks = split_message(text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let total = chunks.len();
        let mut sent_any = false;

        for (index, chunk) in chunks.iter().enumerate() {
            // The API rejects blank text; a split can leave a lone trailing newline.
            if chunk.trim().is_empty() {
                continue;
            }
            if sent_any && !self.chunk_delay.is_zero() {
                tokio::time::sleep(self.chunk_delay).await;
            }
            self.send_message_chunk(chat_id, chunk).await?;
            sent_any = true;
            debug!(chat_id, part = index + 1, total, "Telegram message part delivered");
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ChannelError> {
        let resp = self
            .client
            .get(self.api_url("getMe"))
            .send()
            .await
            .map_err(|e| ChannelError::Http(e.without_url().to_string()))?;

        let status = resp.status();
        let body: ApiResponse = resp
            .json()
            .await
            .map_err(|e| ChannelError::InvalidResponse {
                name: CHANNEL_NAME.into(),
                reason: e.without_url().to_string(),
            })?;

        if status.is_success() && body.ok {
            Ok(())
        } else {
            Err(ChannelError::Api {
                name: CHANNEL_NAME.into(),
                status: status.as_u16(),
                description: body.description,
            })
        }
    }
}

// ── Splitting ───────────────────────────────────────────────────────

fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Split a message into chunks that fit Telegram's length limit.
///
/// Lines are packed greedily, joined by `\n`. A line that is itself too
/// long is packed word by word, joined by a space; a single word longer
/// than the limit becomes its own oversized chunk rather than being cut.
/// Content and order are never altered: only the separator at each chunk
/// boundary is dropped.
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text_len(text) <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current: Option<OpenChunk> = None;

    for line in text.split('\n') {
        let line_len = text_len(line);
        if line_len <= max_len {
            pack(&mut chunks, &mut current, line, line_len, '\n', max_len);
            continue;
        }

        if let Some(done) = current.take() {
            chunks.push(done.text);
        }
        for word in line.split(' ') {
            pack(&mut chunks, &mut current, word, text_len(word), ' ', max_len);
        }
    }

    if let Some(done) = current {
        chunks.push(done.text);
    }
    chunks
}

/// Chunk being filled, with its length kept alongside so it is never re-counted.
struct OpenChunk {
    text: String,
    len: usize,
}

/// Append `piece` to the open chunk if it fits, else close it and start anew.
fn pack(
    chunks: &mut Vec<String>,
    current: &mut Option<OpenChunk>,
    piece: &str,
    piece_len: usize,
    separator: char,
    max_len: usize,
) {
    if let Some(open) = current.as_mut() {
        if open.len + 1 + piece_len <= max_len {
            open.text.push(separator);
            open.text.push_str(piece);
            open.len += 1 + piece_len;
            return;
        }
    }
    let fresh = OpenChunk {
        text: piece.to_string(),
        len: piece_len,
    };
    if let Some(done) = current.replace(fresh) {
        chunks.push(done.text);
    }
}

// ── Tests ───────────────────────────────────────────────────────────
