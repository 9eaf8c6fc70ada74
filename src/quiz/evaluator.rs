use crate::quiz::answer::{SelectedWord, VersionId};
use crate::quiz::session::{QuestionSnapshot, QuizSession};

pub const PERFECT_FEEDBACK: &str = "Perfect! All versions are correct!";

/// Case-insensitive, order-sensitive comparison of an answer against the
/// target tokens. Length mismatch fails before any string work.
pub fn answer_matches(selected: &[SelectedWord], target: &[String]) -> bool {
    if selected.len() != target.len() {
        return false;
    }
    let given = selected
        .iter()
        .map(|s| s.word.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let expected = target.join(" ").to_lowercase();
    given == expected
}

impl QuizSession {
    pub fn check_version(&self, id: VersionId) -> bool {
        let Some(version) = self
            .lessons
            .get(id.question)
            .and_then(|l| l.versions.get(id.version))
        else {
            return false;
        };
        self.answer(id)
            .is_some_and(|answer| answer_matches(answer.entries(), &version.tokens))
    }

    /// True when every version of the question is filled and correct. A
    /// question without versions never completes on its own.
    pub fn check_question_complete(&self, question: usize) -> bool {
        let Some(lesson) = self.lessons.get(question) else {
            return false;
        };
        if lesson.versions.is_empty() {
            return false;
        }
        lesson.versions.iter().enumerate().all(|(v, version)| {
            let id = VersionId::new(question, v);
            self.answer(id)
                .is_some_and(|a| a.entries().len() == version.tokens.len())
                && self.check_version(id)
        })
    }

    /// Freezes the question's answers. Only the first call for a question
    /// has any effect, so score is awarded at most once.
    pub fn finalize_question(&mut self, question: usize, correct: bool, feedback: &str) -> bool {
        if question >= self.lessons.len() || self.completed.contains_key(&question) {
            return false;
        }
        let answers = self.live.get(&question).cloned().unwrap_or_default();
        if correct {
            self.score += 1;
        }
        self.completed.insert(
            question,
            QuestionSnapshot {
                answers,
                is_correct: correct,
                feedback: feedback.to_string(),
            },
        );
        tracing::info!(question, correct, score = self.score, "question finalized");
        true
    }
}
