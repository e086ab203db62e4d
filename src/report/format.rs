//! Telegram HTML renderings of a submission.
//!
//! Two renderings exist: a detailed per-question report for the instructor's
//! private chat and a four-line summary for the class group. Both are pure
//! functions of the submission and the display offset.

use chrono::FixedOffset;

use super::model::Submission;

const SEPARATOR: &str = "────────────────────";

/// Placeholder shown when a question was left blank.
pub const NOT_ANSWERED: &str = "Not answered";

/// Qualitative performance band derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    /// [90, ∞)
    Excellent,
    /// [75, 90)
    VeryGood,
    /// [60, 75)
    Good,
    /// [50, 60)
    Fair,
    /// Everything below 50, including NaN.
    NeedsImprovement,
}

impl PerformanceTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 75.0 {
            Self::VeryGood
        } else if score >= 60.0 {
            Self::Good
        } else if score >= 50.0 {
            Self::Fair
        } else {
            Self::NeedsImprovement
        }
    }

    /// The closing remark appended to the detailed report.
    pub fn remark(self) -> &'static str {
        match self {
            Self::Excellent => {
                "🏆 <b>Excellent!</b> Outstanding understanding of reported speech."
            }
            Self::VeryGood => {
                "👍 <b>Very Good!</b> Strong grasp with minor areas for improvement."
            }
            Self::Good => "📚 <b>Good!</b> Solid foundation, some practice needed.",
            Self::Fair => "💡 <b>Fair.</b> Basic understanding, needs more practice.",
            Self::NeedsImprovement => {
                "🔍 <b>Needs Improvement.</b> Review reported speech rules and practice more."
            }
        }
    }
}

/// Render elapsed seconds as `m:ss`. Minutes are not wrapped into hours.
pub fn format_elapsed(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn format_date(submission: &Submission, offset: &FixedOffset) -> String {
    match submission.timestamp {
        Some(ts) => ts
            .with_timezone(offset)
            .format("%-m/%-d/%Y, %-I:%M:%S %p")
            .to_string(),
        None => "Unknown date".to_string(),
    }
}

/// Full report for the private chat: header, score, one block per answer,
/// and a performance remark.
pub fn detailed_report(submission: &Submission, offset: &FixedOffset) -> String {
    let mut message = String::from("📊 <b>DETAILED TEST REPORT - Reported Speech</b>\n\n");
    message.push_str(&format!(
        "👤 <b>Student:</b> {}\n",
        escape_html(&submission.student_name)
    ));
    message.push_str(&format!(
        "⏱️ <b>Time Spent:</b> {}\n",
        format_elapsed(submission.time_spent)
    ));
    message.push_str(&format!(
        "📅 <b>Date:</b> {}\n\n",
        format_date(submission, offset)
    ));
    message.push_str(&format!(
        "🎯 <b>Score:</b> {}% ({}/{})\n\n",
        submission.score, submission.correct_answers, submission.total_questions
    ));

    message.push_str("<b>QUESTION DETAILS:</b>\n");
    message.push_str(SEPARATOR);
    message.push('\n');

    for (index, result) in submission.answers.iter().enumerate() {
        let status = if result.is_correct { "✅" } else { "❌" };
        message.push_str(&format!("\n<b>Q{}:</b> {}\n", index + 1, status));
        message.push_str(&format!(
            "<i>Direct:</i> {}\n",
            escape_html(&result.direct_speech)
        ));
        message.push_str(&format!(
            "<i>Reported:</i> {}\n",
            escape_html(&result.question)
        ));
        message.push_str(&format!(
            "<b>Student's Answer:</b> {}\n",
            escape_html(result.answered().unwrap_or(NOT_ANSWERED))
        ));
        message.push_str(&format!(
            "<b>Correct Answer:</b> {}\n",
            escape_html(&result.correct_answer)
        ));
        message.push_str(SEPARATOR);
        message.push('\n');
    }

    message.push_str("\n<b>PERFORMANCE ANALYSIS:</b>\n");
    message.push_str(PerformanceTier::from_score(submission.score).remark());
    message.push('\n');

    message
}

/// Four-line summary for the group chat.
pub fn short_report(submission: &Submission) -> String {
    let mut message = String::from("📚 <b>Test Completed - Reported Speech</b>\n\n");
    message.push_str(&format!(
        "👤 <b>Student:</b> {}\n",
        escape_html(&submission.student_name)
    ));
    message.push_str(&format!(
        "🎯 <b>Score:</b> {}/{}\n",
        submission.correct_answers, submission.total_questions
    ));
    message.push_str(&format!(
        "⏱️ <b>Time:</b> {}\n",
        format_elapsed(submission.time_spent)
    ));
    message.push_str(&format!("📊 <b>Percentage:</b> {}%", submission.score));
    message
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Offset, Utc};

    use super::*;
    use crate::report::model::AnswerResult;

    fn utc() -> FixedOffset {
        Utc.fix()
    }

    fn answer(n: usize, correct: bool, user_answer: Option<&str>) -> AnswerResult {
        AnswerResult {
            direct_speech: format!("\"I like tea {n},\" he said."),
            question: format!("He said that ... ({n})"),
            user_answer: user_answer.map(str::to_string),
            correct_answer: format!("he liked tea {n}"),
            is_correct: correct,
        }
    }

    fn sample() -> Submission {
        Submission {
            student_name: "Alice".into(),
            timestamp: DateTime::from_timestamp_millis(1_700_000_000_000),
            time_spent: 125,
            score: 80.0,
            correct_answers: 4,
            total_questions: 5,
            answers: vec![
                answer(1, true, Some("he liked tea 1")),
                answer(2, true, Some("he liked tea 2")),
                answer(3, false, None),
                answer(4, true, Some("he liked tea 4")),
                answer(5, true, Some("he liked tea 5")),
            ],
        }
    }

    // ── Elapsed time ───────────────────────────────────────────────

    #[test]
    fn elapsed_zero() {
        assert_eq!(format_elapsed(0), "0:00");
    }

    #[test]
    fn elapsed_pads_seconds() {
        assert_eq!(format_elapsed(65), "1:05");
        assert_eq!(format_elapsed(9), "0:09");
    }

    #[test]
    fn elapsed_does_not_roll_into_hours() {
        assert_eq!(format_elapsed(3600), "60:00");
    }

    // ── Tiers ──────────────────────────────────────────────────────

    #[test]
    fn tier_boundaries() {
        use PerformanceTier::*;
        let cases = [
            (0.0, NeedsImprovement),
            (49.0, NeedsImprovement),
            (49.99, NeedsImprovement),
            (50.0, Fair),
            (59.0, Fair),
            (60.0, Good),
            (74.0, Good),
            (75.0, VeryGood),
            (89.0, VeryGood),
            (90.0, Excellent),
            (100.0, Excellent),
        ];
        for (score, expected) in cases {
            assert_eq!(PerformanceTier::from_score(score), expected, "score {score}");
        }
    }

    #[test]
    fn tier_is_total_outside_range() {
        assert_eq!(
            PerformanceTier::from_score(f64::NAN),
            PerformanceTier::NeedsImprovement
        );
        assert_eq!(
            PerformanceTier::from_score(-5.0),
            PerformanceTier::NeedsImprovement
        );
        assert_eq!(
            PerformanceTier::from_score(120.0),
            PerformanceTier::Excellent
        );
    }

    // ── Detailed report ────────────────────────────────────────────

    #[test]
    fn detailed_report_header_and_score() {
        let report = detailed_report(&sample(), &utc());
        assert!(report.starts_with("📊 <b>DETAILED TEST REPORT - Reported Speech</b>\n\n"));
        assert!(report.contains("👤 <b>Student:</b> Alice\n"));
        assert!(report.contains("⏱️ <b>Time Spent:</b> 2:05\n"));
        assert!(report.contains("📅 <b>Date:</b> 11/14/2023, 10:13:20 PM\n\n"));
        assert!(report.contains("🎯 <b>Score:</b> 80% (4/5)\n\n"));
    }

    #[test]
    fn detailed_report_blocks_in_order() {
        let report = detailed_report(&sample(), &utc());
        let positions: Vec<usize> = (1..=5)
            .map(|n| report.find(&format!("<b>Q{n}:</b>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(report.matches(SEPARATOR).count(), 6);
        assert!(report.contains("\n<b>Q3:</b> ❌\n"));
        assert!(report.contains("\n<b>Q1:</b> ✅\n"));
    }

    #[test]
    fn detailed_report_placeholder_for_missing_answer() {
        let report = detailed_report(&sample(), &utc());
        assert!(report.contains("<b>Student's Answer:</b> Not answered\n"));
        assert_eq!(report.matches(NOT_ANSWERED).count(), 1);
    }

    #[test]
    fn detailed_report_ends_with_single_tier() {
        let report = detailed_report(&sample(), &utc());
        assert!(report.ends_with(
            "\n<b>PERFORMANCE ANALYSIS:</b>\n👍 <b>Very Good!</b> Strong grasp with minor areas for improvement.\n"
        ));
        let remarks = ["Excellent!", "Very Good!", "Good!", "Fair.", "Needs Improvement."]
            .iter()
            .filter(|r| report.contains(&format!("<b>{r}</b>")))
            .count();
        assert_eq!(remarks, 1);
    }

    #[test]
    fn detailed_report_empty_answers() {
        let sub = Submission {
            student_name: "Bob".into(),
            ..Default::default()
        };
        let report = detailed_report(&sub, &utc());
        assert!(!report.contains("<b>Q1:</b>"));
        assert!(report.contains("<b>QUESTION DETAILS:</b>"));
        assert!(report.contains("🎯 <b>Score:</b> 0% (0/0)"));
        assert!(report.contains("⏱️ <b>Time Spent:</b> 0:00"));
        assert!(report.contains("📅 <b>Date:</b> Unknown date"));
        assert!(report.contains("Needs Improvement."));
    }

    #[test]
    fn detailed_report_uses_offset() {
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        let report = detailed_report(&sample(), &offset);
        assert!(report.contains("📅 <b>Date:</b> 11/15/2023, 1:13:20 AM\n"));
    }

    #[test]
    fn detailed_report_escapes_student_text() {
        let mut sub = sample();
        sub.student_name = "<b>Eve</b> & co".into();
        let report = detailed_report(&sub, &utc());
        assert!(report.contains("👤 <b>Student:</b> &lt;b&gt;Eve&lt;/b&gt; &amp; co\n"));
    }

    #[test]
    fn fractional_score_rendered_as_is() {
        let mut sub = sample();
        sub.score = 83.5;
        assert!(detailed_report(&sub, &utc()).contains("83.5% (4/5)"));
        assert!(short_report(&sub).ends_with("83.5%"));
    }

    // ── Short report ───────────────────────────────────────────────

    #[test]
    fn short_report_exact() {
        assert_eq!(
            short_report(&sample()),
            "📚 <b>Test Completed - Reported Speech</b>\n\n\
             👤 <b>Student:</b> Alice\n\
             🎯 <b>Score:</b> 4/5\n\
             ⏱️ <b>Time:</b> 2:05\n\
             📊 <b>Percentage:</b> 80%"
        );
    }

    #[test]
    fn short_report_has_no_answer_detail() {
        let report = short_report(&sample());
        assert!(!report.contains("Q1"));
        assert!(!report.contains(SEPARATOR));
    }
}
