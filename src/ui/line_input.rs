use std::path::{MAIN_SEPARATOR, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Entries read per directory before giving up on completion.
const SCAN_LIMIT: usize = 1000;
const MAX_CANDIDATES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Tab-completion cycle started from the text typed before the first Tab.
#[derive(Debug, Default)]
struct Completion {
    candidates: Vec<String>,
    index: usize,
}

/// Single-line editor for the lesson file prompt. Completion offers
/// directories and `.txt` files only.
#[derive(Debug, Default)]
pub struct LineInput {
    chars: Vec<char>,
    cursor: usize,
    completion: Option<Completion>,
    /// Last completion attempt could not read the directory.
    pub completion_error: bool,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self {
            cursor: chars.len(),
            chars,
            ..Self::default()
        }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// The typed path with a leading `~` expanded.
    pub fn path(&self) -> PathBuf {
        expand_home(self.value().trim())
    }

    /// Text before the cursor, the char under it, and the rest.
    pub fn render_parts(&self) -> (String, Option<char>, String) {
        let before = self.chars[..self.cursor].iter().collect();
        let at = self.chars.get(self.cursor).copied();
        let after = self
            .chars
            .get(self.cursor + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default();
        (before, at, after)
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if !matches!(key.code, KeyCode::Tab | KeyCode::BackTab) {
            self.completion = None;
            self.completion_error = false;
        }
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.chars.len(),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
            }
            KeyCode::Delete if self.cursor < self.chars.len() => {
                self.chars.remove(self.cursor);
            }
            KeyCode::Tab => self.complete(true),
            KeyCode::BackTab => self.complete(false),
            KeyCode::Char('a') if ctrl => self.cursor = 0,
            KeyCode::Char('e') if ctrl => self.cursor = self.chars.len(),
            KeyCode::Char('u') if ctrl => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl => {
                self.chars.insert(self.cursor, ch);
                self.cursor += 1;
            }
            _ => {}
        }
        InputResult::Continue
    }

    fn delete_word_back(&mut self) {
        let mut start = self.cursor;
        while start > 0 && self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    fn set_text(&mut self, text: &str) {
        self.chars = text.chars().collect();
        self.cursor = self.chars.len();
    }

    fn complete(&mut self, forward: bool) {
        if self.cursor < self.chars.len() {
            return;
        }
        let next = match self.completion.as_mut() {
            Some(c) => {
                let n = c.candidates.len();
                c.index = if forward {
                    (c.index + 1) % n
                } else {
                    (c.index + n - 1) % n
                };
                c.candidates[c.index].clone()
            }
            None => {
                let candidates = match scan(&self.value()) {
                    Ok(candidates) => candidates,
                    Err(err) => {
                        tracing::debug!(%err, "path completion failed");
                        self.completion_error = true;
                        return;
                    }
                };
                let Some(first) = candidates.first().cloned() else {
                    return;
                };
                self.completion = Some(Completion {
                    candidates,
                    index: 0,
                });
                first
            }
        };
        self.set_text(&next);
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => {
            home.join(rest.trim_start_matches(['/', MAIN_SEPARATOR]))
        }
        _ => PathBuf::from(path),
    }
}

fn split_seed(seed: &str) -> (&str, &str) {
    match seed.rfind(['/', '\\']) {
        Some(pos) => (&seed[..=pos], &seed[pos + 1..]),
        None => ("", seed),
    }
}

fn scan(seed: &str) -> std::io::Result<Vec<String>> {
    let (dir, partial) = split_seed(seed);
    let read_from = if dir.is_empty() {
        PathBuf::from(".")
    } else {
        expand_home(dir)
    };
    let entries = std::fs::read_dir(read_from)?.map(|entry| {
        let entry = entry?;
        let is_dir = entry.file_type()?.is_dir();
        Ok((entry.file_name().to_string_lossy().into_owned(), is_dir))
    });
    filter_candidates(entries, dir, partial)
}

fn is_lesson_file(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("txt"))
}

/// Keeps directories and lesson files starting with `partial`, directories
/// first. Hidden entries only show when `partial` starts with a dot.
fn filter_candidates(
    entries: impl Iterator<Item = std::io::Result<(String, bool)>>,
    dir: &str,
    partial: &str,
) -> std::io::Result<Vec<String>> {
    let show_hidden = partial.starts_with('.');
    let mut found: Vec<(bool, String)> = Vec::new();
    for entry in entries.take(SCAN_LIMIT) {
        let (name, is_dir) = entry?;
        if (!show_hidden && name.starts_with('.')) || !name.starts_with(partial) {
            continue;
        }
        if is_dir {
            found.push((true, format!("{dir}{name}{MAIN_SEPARATOR}")));
        } else if is_lesson_file(&name) {
            found.push((false, format!("{dir}{name}")));
        }
    }
    found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    found.truncate(MAX_CANDIDATES);
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_str(input: &mut LineInput, s: &str) {
        for ch in s.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn editing_in_the_middle() {
        let mut input = LineInput::new("lesons.txt");
        input.handle(key(KeyCode::Home));
        for _ in 0..3 {
            input.handle(key(KeyCode::Right));
        }
        type_str(&mut input, "s");
        assert_eq!(input.value(), "lessons.txt");
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "lesons.txt");
    }

    #[test]
    fn multibyte_text_is_edited_by_char() {
        let mut input = LineInput::new("bài học");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "bài hc");
        let (before, at, after) = input.render_parts();
        assert_eq!(before, "bài h");
        assert_eq!(at, Some('c'));
        assert_eq!(after, "");
    }

    #[test]
    fn boundaries_do_not_panic() {
        let mut input = LineInput::new("");
        input.handle(key(KeyCode::Backspace));
        input.handle(key(KeyCode::Delete));
        input.handle(key(KeyCode::Left));
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "");
        assert_eq!(input.render_parts(), (String::new(), None, String::new()));
    }

    #[test]
    fn ctrl_w_and_ctrl_u() {
        let mut input = LineInput::new("my lessons  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "my ");
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn submit_and_cancel() {
        let mut input = LineInput::new("a.txt");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
        assert_eq!(input.handle(key(KeyCode::Char('x'))), InputResult::Continue);
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/l.txt"), home.join("l.txt"));
        }
        assert_eq!(expand_home("rel/l.txt"), PathBuf::from("rel/l.txt"));
    }

    #[test]
    fn completion_offers_dirs_and_lesson_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("beta.txt"), "").unwrap();
        std::fs::write(dir.path().join("alpha.TXT"), "").unwrap();
        std::fs::write(dir.path().join("notes.md"), "").unwrap();
        std::fs::create_dir(dir.path().join("zeta")).unwrap();
        let seed = format!("{}/", dir.path().display());

        let mut input = LineInput::new(&seed);
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with(&format!("zeta{MAIN_SEPARATOR}")));
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with("alpha.TXT"));
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with("beta.txt"));
        input.handle(key(KeyCode::Tab));
        assert!(input.value().ends_with(&format!("zeta{MAIN_SEPARATOR}")));
        input.handle(key(KeyCode::BackTab));
        assert!(input.value().ends_with("beta.txt"));
    }

    #[test]
    fn typing_resets_the_completion_cycle() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.txt"), "").unwrap();
        let mut input = LineInput::new(&format!("{}/", dir.path().display()));
        input.handle(key(KeyCode::Tab));
        assert!(input.completion.is_some());
        input.handle(key(KeyCode::Char('x')));
        assert!(input.completion.is_none());
        assert!(input.value().ends_with("one.txtx"));
    }

    #[test]
    fn unreadable_directory_flags_error_until_next_edit() {
        let mut input = LineInput::new("/no/such/dir/zzz/");
        input.handle(key(KeyCode::Tab));
        assert!(input.completion_error);
        assert_eq!(input.value(), "/no/such/dir/zzz/");
        input.handle(key(KeyCode::Left));
        assert!(!input.completion_error);
    }

    #[test]
    fn tab_away_from_end_does_nothing() {
        let mut input = LineInput::new("abc");
        input.handle(key(KeyCode::Home));
        input.handle(key(KeyCode::Tab));
        assert_eq!(input.value(), "abc");
        assert!(!input.completion_error);
    }

    #[test]
    fn hidden_entries_need_a_dot_prefix() {
        let entries = || {
            vec![
                Ok((".secret.txt".to_string(), false)),
                Ok(("plain.txt".to_string(), false)),
            ]
            .into_iter()
        };
        assert_eq!(filter_candidates(entries(), "", "").unwrap(), vec!["plain.txt"]);
        assert_eq!(
            filter_candidates(entries(), "", ".s").unwrap(),
            vec![".secret.txt"]
        );
    }

    #[test]
    fn read_error_mid_scan_is_reported() {
        let entries = vec![
            Ok(("a.txt".to_string(), false)),
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied")),
        ];
        assert!(filter_candidates(entries.into_iter(), "", "").is_err());
    }

    #[test]
    fn candidate_list_is_capped() {
        let entries = (0..300).map(|i| Ok((format!("l{i:03}.txt"), false)));
        assert_eq!(filter_candidates(entries, "", "").unwrap().len(), MAX_CANDIDATES);
    }
}
