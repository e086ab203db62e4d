//! Inbound quiz submission shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One completed quiz attempt, as posted by the quiz front end.
///
/// Every field defaults when absent so that any JSON object can be
/// formatted; validation beyond that is left to the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Submission {
    pub student_name: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Seconds spent on the quiz.
    pub time_spent: u64,
    /// Percentage, 0-100. Display only.
    pub score: f64,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerResult>,
}

/// Outcome of a single question.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerResult {
    pub direct_speech: String,
    /// The reported-speech prompt shown to the student.
    pub question: String,
    pub user_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

impl AnswerResult {
    /// The student's answer, treating blank input as unanswered.
    pub fn answered(&self) -> Option<&str> {
        self.user_answer
            .as_deref()
            .filter(|answer| !answer.trim().is_empty())
    }
}

/// Accept epoch milliseconds (number or numeric string) or an RFC 3339
/// string. Anything unrecognised becomes `None` rather than an error.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|ms| ms as i64))
            .and_then(DateTime::from_timestamp_millis),
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| s.parse::<i64>().ok().and_then(DateTime::from_timestamp_millis))
        }
        _ => None,
    }))
}
