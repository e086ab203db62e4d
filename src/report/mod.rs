//! Quiz submission model and its message renderings.

pub mod format;
pub mod model;

pub use format::{PerformanceTier, detailed_report, format_elapsed, short_report};
pub use model::{AnswerResult, Submission};
