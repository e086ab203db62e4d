//! Channel trait: pure outbound I/O, no formatting.

use async_trait::async_trait;

use crate::error::ChannelError;

/// A destination-addressed text sink.
///
/// Implementations deliver arbitrary-length text, splitting it as their
/// transport requires, and preserve ordering within one call.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Channel name (e.g. "telegram").
    fn name(&self) -> &str;

    /// Deliver `text` to `destination`. Fails on the first rejected part;
    /// later parts are not sent.
    async fn send_message(&self, destination: &str, text: &str) -> Result<(), ChannelError>;

    /// Verify the channel's credentials against the remote service.
    async fn health_check(&self) -> Result<(), ChannelError>;
}
