use crate::quiz::answer::{SelectedWord, VersionId, VersionStatus};
use crate::quiz::session::QuizSession;

/// Everything the renderer needs to draw the current state.
#[derive(Clone, Debug, PartialEq)]
pub enum Phase {
    Question(QuestionView),
    Results(ResultsView),
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub source_text: String,
    pub versions: Vec<VersionView>,
    pub active: Option<usize>,
    pub feedback: Option<Feedback>,
    pub offer_skip: bool,
    pub offer_next: bool,
    pub can_go_previous: bool,
    pub can_go_next: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VersionView {
    pub id: VersionId,
    pub label: String,
    pub entries: Vec<SelectedWord>,
    pub slots: Vec<SlotView>,
    pub status: VersionStatus,
    /// Target sentence, shown once the version is solved or the question
    /// was skipped.
    pub revealed: Option<String>,
    pub editable: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotView {
    pub slot: usize,
    pub word: String,
    pub available: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResultsView {
    pub score: u32,
    pub total: usize,
}

impl QuizSession {
    pub fn view(&self) -> Phase {
        if self.nav.is_finished() {
            return Phase::Results(ResultsView {
                score: self.score,
                total: self.total(),
            });
        }

        let q = self.nav.current();
        let lesson = &self.lessons[q];
        let snapshot = self.snapshot(q);
        let frozen = snapshot.is_some();
        let skipped = snapshot.is_some_and(|s| !s.is_correct);

        let versions = lesson
            .versions
            .iter()
            .enumerate()
            .filter_map(|(v, version)| {
                let id = VersionId::new(q, v);
                let answer = self.answer(id)?;
                let status = answer.status();
                let revealed =
                    (skipped || status == VersionStatus::Correct).then(|| version.sentence());
                Some(VersionView {
                    id,
                    label: format!("Version {}", version.label),
                    entries: answer.entries().to_vec(),
                    slots: answer
                        .slots()
                        .iter()
                        .enumerate()
                        .map(|(slot, word)| SlotView {
                            slot,
                            word: word.clone(),
                            available: !frozen && !answer.is_consumed(slot),
                        })
                        .collect(),
                    status,
                    revealed,
                    editable: !frozen,
                })
            })
            .collect();

        Phase::Question(QuestionView {
            index: q,
            total: self.total(),
            score: self.score,
            source_text: lesson.source_text.clone(),
            versions,
            active: self.active.map(|id| id.version),
            feedback: snapshot.map(|s| Feedback {
                text: s.feedback.clone(),
                is_correct: s.is_correct,
            }),
            offer_skip: self.offers_skip(),
            offer_next: self.offers_next(),
            can_go_previous: self.nav.can_go_previous(),
            can_go_next: self.nav.can_go_next(),
        })
    }
}
