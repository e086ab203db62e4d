//! Submission relay — formats a submission and hands both reports to the channel.

use std::sync::Arc;

use chrono::FixedOffset;
use tracing::info;

use crate::channels::{Channel, TelegramChannel};
use crate::config::RelayConfig;
use crate::error::{ChannelError, ConfigError};
use crate::report::{Submission, detailed_report, short_report};

/// Where each report goes.
#[derive(Debug, Clone)]
pub struct Destinations {
    /// Receives the detailed per-question report.
    pub private_chat_id: String,
    /// Receives the short summary.
    pub group_chat_id: String,
}

/// Sends the two renderings of a submission, detailed report first.
pub struct SubmissionRelay {
    channel: Arc<dyn Channel>,
    destinations: Destinations,
    report_offset: FixedOffset,
}

impl SubmissionRelay {
    pub fn new(
        channel: Arc<dyn Channel>,
        destinations: Destinations,
        report_offset: FixedOffset,
    ) -> Self {
        Self {
            channel,
            destinations,
            report_offset,
        }
    }

    /// Build a Telegram-backed relay, failing if any credential is missing.
    pub fn from_config(config: &RelayConfig, client: reqwest::Client) -> Result<Self, ConfigError> {
        let creds = config.credentials()?;
        let channel = TelegramChannel::with_client(client, creds.bot_token, config.api_base.as_str())
            .with_chunk_delay(config.chunk_delay);

        Ok(Self::new(
            Arc::new(channel),
            Destinations {
                private_chat_id: creds.private_chat_id,
                group_chat_id: creds.group_chat_id,
            },
            config.report_offset,
        ))
    }

    pub fn channel(&self) -> &dyn Channel {
        self.channel.as_ref()
    }

    /// Deliver the detailed report, then the summary. Stops at the first
    /// failure; a failed private report means the group never hears of it.
    pub async fn relay(&self, submission: &Submission) -> Result<(), ChannelError> {
        let private_message = detailed_report(submission, &self.report_offset);
        self.channel
            .send_message(&self.destinations.private_chat_id, &private_message)
            .await?;
        info!(
            channel = self.channel.name(),
            "Detailed report delivered to private chat"
        );

        let group_message = short_report(submission);
        self.channel
            .send_message(&self.destinations.group_chat_id, &group_message)
            .await?;
        info!(channel = self.channel.name(), "Summary delivered to group chat");

        Ok(())
    }
}
