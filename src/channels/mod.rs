//! Outbound messaging channels.

pub mod channel;
pub mod telegram;

pub use channel::Channel;
pub use telegram::TelegramChannel;
