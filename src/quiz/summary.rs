use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::session::QuizSession;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuizSummary {
    pub score: u32,
    pub total: usize,
    pub skipped: usize,
    pub finished: bool,
    /// Set only once the last question has been passed.
    pub finished_at: Option<DateTime<Utc>>,
    pub questions: Vec<QuestionOutcome>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    Skipped,
    Unanswered,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub index: usize,
    pub source_text: String,
    pub outcome: Outcome,
}

impl QuizSummary {
    pub fn from_session(session: &QuizSession) -> Self {
        let questions: Vec<QuestionOutcome> = session
            .lessons()
            .iter()
            .enumerate()
            .map(|(index, lesson)| {
                let outcome = match session.snapshot(index) {
                    Some(s) if s.is_correct => Outcome::Correct,
                    Some(_) => Outcome::Skipped,
                    None => Outcome::Unanswered,
                };
                QuestionOutcome {
                    index,
                    source_text: lesson.source_text.clone(),
                    outcome,
                }
            })
            .collect();

        let finished = session.is_finished();
        Self {
            score: session.score(),
            total: session.total(),
            skipped: questions
                .iter()
                .filter(|q| q.outcome == Outcome::Skipped)
                .count(),
            finished,
            finished_at: finished.then(Utc::now),
            questions,
        }
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64 * 100.0
    }
}
