//! Quiz relay — forwards completed quiz submissions to Telegram.

pub mod channels;
pub mod config;
pub mod error;
pub mod relay;
pub mod report;
