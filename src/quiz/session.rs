use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::lesson::Lesson;
use crate::quiz::answer::{VersionAnswer, VersionId, VersionStatus};
use crate::quiz::evaluator::PERFECT_FEEDBACK;
use crate::quiz::navigation::Navigator;
use crate::quiz::timer::Deadline;

pub const SKIPPED_FEEDBACK: &str = "Question skipped";
pub const VERSION_ADVANCE_DELAY: Duration = Duration::from_millis(200);

/// Frozen copy of a finalized question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionSnapshot {
    pub answers: Vec<VersionAnswer>,
    pub is_correct: bool,
    pub feedback: String,
}

/// Decides the presentation order of a version's tokens. Returns a
/// permutation: `arrange(tokens)[slot]` is the token index shown in `slot`.
pub trait SlotOrder {
    fn arrange(&mut self, tokens: &[String]) -> Vec<usize>;
}

/// Canonical order, for tests and `--no-shuffle`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InOrder;

impl SlotOrder for InOrder {
    fn arrange(&mut self, tokens: &[String]) -> Vec<usize> {
        (0..tokens.len()).collect()
    }
}

pub struct Shuffled {
    rng: SmallRng,
}

impl Shuffled {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng }
    }
}

impl SlotOrder for Shuffled {
    fn arrange(&mut self, tokens: &[String]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..tokens.len()).collect();
        order.shuffle(&mut self.rng);
        order
    }
}

/// All quiz state for one run through a lesson set. Every mutation is a
/// method here; invalid requests leave the state untouched and report
/// `false`.
pub struct QuizSession {
    pub(crate) lessons: Vec<Lesson>,
    pub(crate) nav: Navigator,
    pub(crate) score: u32,
    pub(crate) live: HashMap<usize, Vec<VersionAnswer>>,
    pub(crate) completed: BTreeMap<usize, QuestionSnapshot>,
    pub(crate) active: Option<VersionId>,
    version_advance: Deadline,
    version_advance_delay: Duration,
    order: Box<dyn SlotOrder>,
}

impl QuizSession {
    pub fn new(order: impl SlotOrder + 'static) -> Self {
        Self {
            lessons: Vec::new(),
            nav: Navigator::new(0),
            score: 0,
            live: HashMap::new(),
            completed: BTreeMap::new(),
            active: None,
            version_advance: Deadline::default(),
            version_advance_delay: VERSION_ADVANCE_DELAY,
            order: Box::new(order),
        }
    }

    pub fn with_version_advance_delay(mut self, delay: Duration) -> Self {
        self.version_advance_delay = delay;
        self
    }

    pub fn start_game(&mut self, lessons: Vec<Lesson>) {
        tracing::info!(questions = lessons.len(), "starting quiz");
        self.nav = Navigator::new(lessons.len());
        self.lessons = lessons;
        self.reset();
    }

    pub fn restart(&mut self) {
        tracing::info!(score = self.score, "restarting quiz");
        self.nav.restart();
        self.reset();
    }

    fn reset(&mut self) {
        self.score = 0;
        self.live.clear();
        self.completed.clear();
        self.enter_question();
    }

    /// Brings the current question on screen: builds its live state on
    /// first visit and makes its first version active.
    fn enter_question(&mut self) {
        self.version_advance.cancel();
        if self.nav.is_finished() {
            self.active = None;
            return;
        }
        let q = self.nav.current();
        if !self.completed.contains_key(&q) && !self.live.contains_key(&q) {
            let answers = self.lessons[q]
                .versions
                .iter()
                .map(|version| {
                    let order = self.order.arrange(&version.tokens);
                    VersionAnswer::new(
                        order
                            .into_iter()
                            .map(|i| version.tokens[i].clone())
                            .collect(),
                    )
                })
                .collect();
            self.live.insert(q, answers);
        }
        self.active = (!self.lessons[q].versions.is_empty()).then(|| VersionId::new(q, 0));
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.nav.current()
    }

    pub fn total(&self) -> usize {
        self.nav.total()
    }

    pub fn is_finished(&self) -> bool {
        self.nav.is_finished()
    }

    pub fn visited(&self) -> &BTreeSet<usize> {
        self.nav.visited()
    }

    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.lessons.get(self.nav.current())
    }

    pub fn is_completed(&self, question: usize) -> bool {
        self.completed.contains_key(&question)
    }

    pub fn snapshot(&self, question: usize) -> Option<&QuestionSnapshot> {
        self.completed.get(&question)
    }

    pub fn active_version(&self) -> Option<VersionId> {
        self.active
    }

    /// Current answer for a version: frozen once its question is completed,
    /// live otherwise.
    pub fn answer(&self, id: VersionId) -> Option<&VersionAnswer> {
        match self.completed.get(&id.question) {
            Some(snapshot) => snapshot.answers.get(id.version),
            None => self.live.get(&id.question)?.get(id.version),
        }
    }

    pub fn active_answer(&self) -> Option<&VersionAnswer> {
        self.answer(self.active?)
    }

    /// Joined target sentence of a version, for speech.
    pub fn sentence(&self, id: VersionId) -> Option<String> {
        let version = self.lessons.get(id.question)?.versions.get(id.version)?;
        Some(version.sentence())
    }

    pub fn active_sentence(&self) -> Option<String> {
        self.sentence(self.active?)
    }

    pub fn offers_skip(&self) -> bool {
        !self.nav.is_finished() && !self.is_completed(self.nav.current())
    }

    pub fn offers_next(&self) -> bool {
        !self.nav.is_finished() && self.is_completed(self.nav.current())
    }

    fn live_answer_mut(&mut self, id: VersionId) -> Option<&mut VersionAnswer> {
        if id.question != self.nav.current() || self.completed.contains_key(&id.question) {
            return None;
        }
        self.live.get_mut(&id.question)?.get_mut(id.version)
    }

    /// Pointer or keyboard selection of a slot. Filling a version evaluates
    /// it; once every version of the question is correct the question is
    /// finalized.
    pub fn select(&mut self, id: VersionId, slot: usize, now: Instant) -> bool {
        let Some(answer) = self.live_answer_mut(id) else {
            return false;
        };
        if !answer.select(slot) {
            return false;
        }
        tracing::debug!(?id, slot, "selected slot");

        let filled = answer.is_full();
        if filled {
            let correct = self.check_version(id);
            let status = if correct {
                VersionStatus::Correct
            } else {
                VersionStatus::Incorrect
            };
            if let Some(answer) = self.live_answer_mut(id) {
                answer.mark(status);
            }
            tracing::debug!(?id, ?status, "version filled");

            if self.check_question_complete(id.question) {
                self.finalize_question(id.question, true, PERFECT_FEEDBACK);
            }

            let last = self.lessons[id.question].versions.len().saturating_sub(1);
            if id.version < last {
                self.version_advance
                    .schedule(now, self.version_advance_delay);
            }
        }
        true
    }

    pub fn remove_at(&mut self, id: VersionId, position: usize) -> bool {
        let Some(answer) = self.live_answer_mut(id) else {
            return false;
        };
        let removed = answer.remove_at(position);
        if let Some(word) = &removed {
            tracing::debug!(?id, position, slot = word.slot, "removed word");
        }
        removed.is_some()
    }

    pub fn remove_last(&mut self, id: VersionId) -> bool {
        let len = match self.live_answer_mut(id) {
            Some(answer) => answer.entries().len(),
            None => return false,
        };
        len > 0 && self.remove_at(id, len - 1)
    }

    pub fn clear_version(&mut self, id: VersionId) -> bool {
        let Some(answer) = self.live_answer_mut(id) else {
            return false;
        };
        answer.clear();
        tracing::debug!(?id, "cleared version");
        true
    }

    /// Gives up on the current question. Never awards score.
    pub fn skip(&mut self) -> bool {
        if !self.offers_skip() {
            return false;
        }
        self.finalize_question(self.nav.current(), false, SKIPPED_FEEDBACK)
    }

    /// Moves past a completed question, unlocking the next one.
    pub fn advance(&mut self) -> bool {
        if !self.offers_next() || !self.nav.advance() {
            return false;
        }
        if self.nav.is_finished() {
            tracing::info!(score = self.score, total = self.total(), "quiz finished");
        }
        self.enter_question();
        true
    }

    pub fn go_next(&mut self) -> bool {
        if !self.nav.go_next() {
            return false;
        }
        tracing::debug!(question = self.nav.current(), "revisiting next question");
        self.enter_question();
        true
    }

    pub fn go_previous(&mut self) -> bool {
        if !self.nav.go_previous() {
            return false;
        }
        tracing::debug!(question = self.nav.current(), "revisiting previous question");
        self.enter_question();
        true
    }

    pub fn set_active_version(&mut self, id: VersionId) -> bool {
        let valid = !self.nav.is_finished()
            && id.question == self.nav.current()
            && id.version < self.lessons[id.question].versions.len();
        if !valid {
            return false;
        }
        self.version_advance.cancel();
        self.active = Some(id);
        true
    }

    pub fn switch_to_next_version(&mut self) -> bool {
        self.step_version(1)
    }

    pub fn switch_to_previous_version(&mut self) -> bool {
        self.step_version(-1)
    }

    fn step_version(&mut self, step: isize) -> bool {
        let Some(id) = self.active else {
            return false;
        };
        let count = match self.lessons.get(id.question) {
            Some(lesson) if !lesson.versions.is_empty() => lesson.versions.len() as isize,
            _ => return false,
        };
        let version = (id.version as isize + step).rem_euclid(count) as usize;
        self.set_active_version(VersionId::new(id.question, version))
    }

    /// Fires the post-completion version switch when it falls due.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.version_advance.fire(now) && self.switch_to_next_version()
    }
}
