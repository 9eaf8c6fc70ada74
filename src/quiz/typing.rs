//! Keyboard-driven word selection.
//!
//! Printable keys accumulate in a short-lived buffer that is matched against
//! the active version's unselected slots. A session ends after a quiet
//! period or on any navigation key, and yields at most one selection.

use std::time::{Duration, Instant};

use crate::quiz::answer::VersionId;
use crate::quiz::session::QuizSession;
use crate::quiz::timer::Deadline;

pub const TYPING_IDLE_TIMEOUT: Duration = Duration::from_millis(300);

/// Keys the quiz understands, already decoded from the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Escape,
    Tab,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Backspace,
    /// Empties the active version.
    Clear,
    Speak,
    Other,
}

/// Surrounding UI state that decides whether keys reach the quiz at all.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputContext {
    pub modal_open: bool,
    pub text_entry_focused: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    UniquePrefix,
    AmbiguousPrefix,
    Substring,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Swallowed without touching any state.
    Ignored,
    /// Consumed; quiz or typing state may have changed.
    Handled,
    Selected {
        version: VersionId,
        slot: usize,
        tier: MatchTier,
    },
    Speak(String),
}

/// Resolves `buffer` (already lowercase) against candidate `(slot, word)`
/// pairs given in presentation order. First applicable tier wins.
pub fn find_match<'a>(
    buffer: &str,
    candidates: impl IntoIterator<Item = (usize, &'a str)>,
) -> Option<(usize, MatchTier)> {
    if buffer.is_empty() {
        return None;
    }
    let folded: Vec<(usize, String)> = candidates
        .into_iter()
        .map(|(slot, word)| (slot, word.to_lowercase()))
        .collect();

    if let Some((slot, _)) = folded.iter().find(|(_, w)| w == buffer) {
        return Some((*slot, MatchTier::Exact));
    }

    let len = buffer.chars().count();
    let prefixed: Vec<usize> = folded
        .iter()
        .filter(|(_, w)| w.starts_with(buffer))
        .map(|(slot, _)| *slot)
        .collect();

    match prefixed.as_slice() {
        [only] => Some((*only, MatchTier::UniquePrefix)),
        [first, ..] if len >= 2 => Some((*first, MatchTier::AmbiguousPrefix)),
        [_, ..] => None,
        [] if len >= 3 => folded
            .iter()
            .find(|(_, w)| w.contains(buffer))
            .map(|(slot, _)| (*slot, MatchTier::Substring)),
        [] => None,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypingSession {
    buffer: String,
    has_matched: bool,
    active: bool,
}

impl TypingSession {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn has_matched(&self) -> bool {
        self.has_matched
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn begin(&mut self) {
        self.buffer.clear();
        self.has_matched = false;
        self.active = true;
    }

    fn end(&mut self) {
        *self = Self::default();
    }
}

/// Routes decoded keys into a [`QuizSession`], owning the typing buffer
/// and its idle timer.
pub struct KeyboardDriver {
    typing: TypingSession,
    idle: Deadline,
    idle_timeout: Duration,
}

impl Default for KeyboardDriver {
    fn default() -> Self {
        Self::new(TYPING_IDLE_TIMEOUT)
    }
}

impl KeyboardDriver {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            typing: TypingSession::default(),
            idle: Deadline::default(),
            idle_timeout,
        }
    }

    pub fn typing(&self) -> &TypingSession {
        &self.typing
    }

    /// Buffer to show in the typing indicator, if a session is running.
    pub fn indicator(&self) -> Option<&str> {
        self.typing.is_active().then(|| self.typing.buffer())
    }

    pub fn end_session(&mut self) {
        self.idle.cancel();
        self.typing.end();
    }

    /// Ends the typing session once the idle timeout elapses. Returns true
    /// when a session was closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.idle.fire(now) {
            tracing::trace!(buffer = %self.typing.buffer(), "typing session timed out");
            self.typing.end();
            return true;
        }
        false
    }

    pub fn handle_key(
        &mut self,
        session: &mut QuizSession,
        key: KeyInput,
        ctx: InputContext,
        now: Instant,
    ) -> KeyOutcome {
        if ctx.modal_open || ctx.text_entry_focused {
            return KeyOutcome::Ignored;
        }
        let Some(active) = session.active_version() else {
            return KeyOutcome::Ignored;
        };

        match key {
            KeyInput::Char(ch) if !ch.is_control() => self.type_char(session, active, ch, now),
            KeyInput::Char(_) | KeyInput::Other => KeyOutcome::Ignored,
            KeyInput::Speak => match session.active_sentence() {
                Some(text) => KeyOutcome::Speak(text),
                None => KeyOutcome::Ignored,
            },
            KeyInput::Escape => self.terminate(|| session.skip()),
            KeyInput::Tab | KeyInput::Down => self.terminate(|| session.switch_to_next_version()),
            KeyInput::Up => self.terminate(|| session.switch_to_previous_version()),
            KeyInput::Enter => self.terminate(|| session.advance()),
            KeyInput::Left => self.terminate(|| session.go_previous()),
            KeyInput::Right => self.terminate(|| session.go_next()),
            KeyInput::Backspace => self.terminate(|| session.remove_last(active)),
            KeyInput::Clear => self.terminate(|| session.clear_version(active)),
        }
    }

    fn terminate(&mut self, action: impl FnOnce() -> bool) -> KeyOutcome {
        action();
        self.end_session();
        KeyOutcome::Handled
    }

    fn type_char(
        &mut self,
        session: &mut QuizSession,
        active: VersionId,
        ch: char,
        now: Instant,
    ) -> KeyOutcome {
        if !self.typing.is_active() {
            self.idle.cancel();
            self.typing.begin();
        }
        self.typing.buffer.extend(ch.to_lowercase());
        self.idle.schedule(now, self.idle_timeout);

        if self.typing.has_matched() {
            return KeyOutcome::Handled;
        }

        let found = session
            .active_answer()
            .and_then(|answer| find_match(self.typing.buffer(), answer.remaining()));
        if let Some((slot, tier)) = found {
            if session.select(active, slot, now) {
                tracing::debug!(buffer = %self.typing.buffer(), slot, ?tier, "typed match");
                self.typing.has_matched = true;
                return KeyOutcome::Selected {
                    version: active,
                    slot,
                    tier,
                };
            }
        }
        KeyOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lesson::{Lesson, Version};
    use crate::quiz::session::InOrder;

    fn candidates<'a>(words: &'a [&'a str]) -> impl Iterator<Item = (usize, &'a str)> {
        words.iter().copied().enumerate()
    }

    #[test]
    fn exact_match_wins_regardless_of_length() {
        let words = ["at", "a", "an"];
        assert_eq!(find_match("a", candidates(&words)), Some((1, MatchTier::Exact)));
    }

    #[test]
    fn exact_match_is_case_insensitive() {
        let words = ["The", "cat"];
        assert_eq!(find_match("the", candidates(&words)), Some((0, MatchTier::Exact)));
    }

    #[test]
    fn unique_prefix_fires_at_one_char() {
        let words = ["dog", "cat"];
        assert_eq!(
            find_match("c", candidates(&words)),
            Some((1, MatchTier::UniquePrefix))
        );
    }

    #[test]
    fn ambiguous_prefix_needs_two_chars() {
        let words = ["cat", "car", "cats"];
        assert_eq!(find_match("c", candidates(&words)), None);
        assert_eq!(
            find_match("ca", candidates(&words)),
            Some((0, MatchTier::AmbiguousPrefix))
        );
    }

    #[test]
    fn ambiguous_prefix_uses_presentation_order() {
        let words = ["cars", "cat"];
        assert_eq!(
            find_match("ca", candidates(&words)),
            Some((0, MatchTier::AmbiguousPrefix))
        );
    }

    #[test]
    fn substring_needs_three_chars_and_no_prefix() {
        let words = ["sleeping", "keeps"];
        assert_eq!(find_match("ee", candidates(&words)), None);
        assert_eq!(
            find_match("eep", candidates(&words)),
            Some((0, MatchTier::Substring))
        );
    }

    #[test]
    fn substring_is_skipped_when_a_prefix_exists() {
        let words = ["reap", "apple", "apricot"];
        // "ap" prefixes two words; substring "reap" is never considered
        assert_eq!(
            find_match("ap", candidates(&words)),
            Some((1, MatchTier::AmbiguousPrefix))
        );
    }

    #[test]
    fn multibyte_buffer_length_counts_chars() {
        let words = ["đẹp", "đi"];
        assert_eq!(
            find_match("đ", candidates(&words)),
            None,
            "two prefix matches at length one"
        );
        assert_eq!(
            find_match("đẹ", candidates(&words)),
            Some((0, MatchTier::UniquePrefix))
        );
    }

    fn session(tokens: &[&str]) -> QuizSession {
        let mut s = QuizSession::new(InOrder);
        s.start_game(vec![Lesson::new(
            "src",
            vec![Version::new(
                tokens.iter().map(|t| t.to_string()).collect(),
                "1",
            )],
        )]);
        s
    }

    fn press(
        driver: &mut KeyboardDriver,
        s: &mut QuizSession,
        keys: &str,
        now: Instant,
    ) -> Vec<KeyOutcome> {
        keys.chars()
            .map(|c| driver.handle_key(s, KeyInput::Char(c), InputContext::default(), now))
            .collect()
    }

    #[test]
    fn one_selection_per_session() {
        let t0 = Instant::now();
        let mut s = session(&["cat", "dog", "sleeps"]);
        let mut d = KeyboardDriver::default();
        let outcomes = press(&mut d, &mut s, "cd", t0);
        assert!(matches!(outcomes[0], KeyOutcome::Selected { slot: 0, .. }));
        assert_eq!(outcomes[1], KeyOutcome::Handled);
        assert_eq!(s.active_answer().unwrap().entries().len(), 1);
        assert_eq!(d.indicator(), Some("cd"));
    }

    #[test]
    fn idle_timeout_starts_fresh_session() {
        let t0 = Instant::now();
        let mut s = session(&["cat", "dog", "sleeps"]);
        let mut d = KeyboardDriver::default();
        press(&mut d, &mut s, "c", t0);
        assert!(!d.tick(t0 + Duration::from_millis(299)));
        assert!(d.tick(t0 + Duration::from_millis(300)));
        assert_eq!(d.indicator(), None);

        let later = t0 + Duration::from_millis(400);
        let outcomes = press(&mut d, &mut s, "d", later);
        assert!(matches!(outcomes[0], KeyOutcome::Selected { slot: 1, .. }));
    }

    #[test]
    fn each_keystroke_restarts_idle_timer() {
        let t0 = Instant::now();
        let mut s = session(&["alpha", "beta"]);
        let mut d = KeyboardDriver::default();
        press(&mut d, &mut s, "x", t0);
        press(&mut d, &mut s, "y", t0 + Duration::from_millis(200));
        assert!(!d.tick(t0 + Duration::from_millis(400)));
        assert_eq!(d.indicator(), Some("xy"));
        assert!(d.tick(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn terminator_key_ends_session() {
        let t0 = Instant::now();
        let mut s = session(&["cat", "dog", "sleeps"]);
        let mut d = KeyboardDriver::default();
        press(&mut d, &mut s, "c", t0);
        d.handle_key(&mut s, KeyInput::Tab, InputContext::default(), t0);
        assert_eq!(d.indicator(), None);
        assert!(!d.tick(t0 + Duration::from_secs(1)));
        let outcomes = press(&mut d, &mut s, "d", t0);
        assert!(matches!(outcomes[0], KeyOutcome::Selected { slot: 1, .. }));
    }

    #[test]
    fn backspace_removes_last_word_and_ends_session() {
        let t0 = Instant::now();
        let mut s = session(&["cat", "dog", "sleeps"]);
        let mut d = KeyboardDriver::default();
        press(&mut d, &mut s, "c", t0);
        let outcome = d.handle_key(&mut s, KeyInput::Backspace, InputContext::default(), t0);
        assert_eq!(outcome, KeyOutcome::Handled);
        assert!(s.active_answer().unwrap().entries().is_empty());
        assert!(!d.typing().is_active());
    }

    #[test]
    fn clear_empties_active_version_and_ends_session() {
        let t0 = Instant::now();
        let mut s = session(&["cat", "dog", "sleeps"]);
        let mut d = KeyboardDriver::default();
        let id = s.active_version().unwrap();
        s.select(id, 1, t0);
        press(&mut d, &mut s, "c", t0);
        assert_eq!(s.active_answer().unwrap().entries().len(), 2);

        let outcome = d.handle_key(&mut s, KeyInput::Clear, InputContext::default(), t0);
        assert_eq!(outcome, KeyOutcome::Handled);
        assert!(s.active_answer().unwrap().entries().is_empty());
        assert!(!d.typing().is_active());
        let outcomes = press(&mut d, &mut s, "d", t0);
        assert!(matches!(outcomes[0], KeyOutcome::Selected { slot: 1, .. }));
    }

    #[test]
    fn swallowed_while_modal_or_text_entry() {
        let t0 = Instant::now();
        let mut s = session(&["cat"]);
        let mut d = KeyboardDriver::default();
        for ctx in [
            InputContext {
                modal_open: true,
                text_entry_focused: false,
            },
            InputContext {
                modal_open: false,
                text_entry_focused: true,
            },
        ] {
            assert_eq!(
                d.handle_key(&mut s, KeyInput::Char('c'), ctx, t0),
                KeyOutcome::Ignored
            );
        }
        assert!(!d.typing().is_active());
        assert!(s.active_answer().unwrap().entries().is_empty());
    }

    #[test]
    fn other_named_keys_do_not_start_a_session() {
        let t0 = Instant::now();
        let mut s = session(&["cat"]);
        let mut d = KeyboardDriver::default();
        assert_eq!(
            d.handle_key(&mut s, KeyInput::Other, InputContext::default(), t0),
            KeyOutcome::Ignored
        );
        assert!(!d.typing().is_active());
    }

    #[test]
    fn no_active_version_swallows_input() {
        let t0 = Instant::now();
        let mut s = session(&["cat"]);
        s.skip();
        s.advance();
        let mut d = KeyboardDriver::default();
        assert_eq!(
            d.handle_key(&mut s, KeyInput::Char('c'), InputContext::default(), t0),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn escape_skips_and_enter_advances() {
        let t0 = Instant::now();
        let mut s = session(&["cat"]);
        let mut d = KeyboardDriver::default();
        d.handle_key(&mut s, KeyInput::Escape, InputContext::default(), t0);
        assert!(s.is_completed(0));
        assert_eq!(s.score(), 0);
        d.handle_key(&mut s, KeyInput::Enter, InputContext::default(), t0);
        assert!(s.is_finished());
    }

    #[test]
    fn speak_reports_active_sentence() {
        let t0 = Instant::now();
        let mut s = session(&["The", "cat"]);
        let mut d = KeyboardDriver::default();
        assert_eq!(
            d.handle_key(&mut s, KeyInput::Speak, InputContext::default(), t0),
            KeyOutcome::Speak("The cat".to_string())
        );
    }
}
