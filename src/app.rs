use std::path::{Path, PathBuf};
use std::time::Instant;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, ModifierKeyCode, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use reword::config::Config;
use reword::lesson::{self, Lesson};
use reword::quiz::summary::QuizSummary;
use reword::quiz::view::QuestionView;
use reword::quiz::{InputContext, KeyInput, KeyOutcome, KeyboardDriver, Phase, QuizSession};
use reword::speech::{self, Speaker};

use crate::ui::components::version_panel::{self, HitTarget, PanelGeometry};
use crate::ui::layout::{QuizLayout, wrap_hints};
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LessonSource {
    Bundled,
    File(PathBuf),
}

impl LessonSource {
    pub fn label(&self) -> String {
        match self {
            LessonSource::Bundled => "starter lessons".to_string(),
            LessonSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }
}

/// Maps a terminal key to the quiz vocabulary.
pub fn decode(key: KeyEvent) -> KeyInput {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('s') if ctrl => KeyInput::Speak,
        KeyCode::Char('x') if ctrl => KeyInput::Clear,
        KeyCode::Char(_) if ctrl || alt => KeyInput::Other,
        KeyCode::Char(ch) => KeyInput::Char(ch),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => {
            KeyInput::Speak
        }
        KeyCode::Esc => KeyInput::Escape,
        KeyCode::Tab => KeyInput::Tab,
        KeyCode::BackTab => KeyInput::Up,
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        KeyCode::Left => KeyInput::Left,
        KeyCode::Right => KeyInput::Right,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Delete => KeyInput::Clear,
        _ => KeyInput::Other,
    }
}

pub struct App {
    pub session: QuizSession,
    pub keys: KeyboardDriver,
    pub config: Config,
    pub theme: &'static Theme,
    pub lesson_source: LessonSource,
    pub help_open: bool,
    pub path_input: Option<LineInput>,
    pub path_error: Option<String>,
    pub status: Option<String>,
    /// Config changed during the run and should be written on exit.
    pub config_dirty: bool,
    pub should_quit: bool,
    /// Last drawn frame size; mouse hit-testing lays out against it.
    pub area: Rect,
    speaker: Box<dyn Speaker>,
}

impl App {
    pub fn new(
        mut session: QuizSession,
        lessons: Vec<Lesson>,
        lesson_source: LessonSource,
        config: Config,
        theme: &'static Theme,
        speaker: Box<dyn Speaker>,
    ) -> Self {
        session.start_game(lessons);
        Self {
            session,
            keys: KeyboardDriver::new(config.typing_idle()),
            config,
            theme,
            lesson_source,
            help_open: false,
            path_input: None,
            path_error: None,
            status: None,
            config_dirty: false,
            should_quit: false,
            area: Rect::default(),
            speaker,
        }
    }

    pub fn summary(&self) -> QuizSummary {
        QuizSummary::from_session(&self.session)
    }

    pub fn input_context(&self) -> InputContext {
        InputContext {
            modal_open: self.help_open,
            text_entry_focused: self.path_input.is_some(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        if let Some(input) = self.path_input.as_mut() {
            match input.handle(key) {
                InputResult::Continue => {}
                InputResult::Cancel => self.close_path_prompt(),
                InputResult::Submit => {
                    let path = input.path();
                    self.open_lessons(&path);
                }
            }
            return;
        }

        self.status = None;
        match key.code {
            KeyCode::F(1) => {
                self.help_open = !self.help_open;
                self.keys.end_session();
                return;
            }
            KeyCode::Esc if self.help_open => {
                self.help_open = false;
                return;
            }
            KeyCode::Char('o') if ctrl => {
                self.open_path_prompt();
                return;
            }
            KeyCode::F(5) => {
                self.change_speech_rate(-1);
                return;
            }
            KeyCode::F(6) => {
                self.change_speech_rate(1);
                return;
            }
            _ => {}
        }

        if self.session.is_finished() && !self.help_open {
            match key.code {
                KeyCode::Char('r') | KeyCode::Enter => self.session.restart(),
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                _ => {}
            }
            return;
        }

        let ctx = self.input_context();
        if let KeyOutcome::Speak(text) =
            self.keys
                .handle_key(&mut self.session, decode(key), ctx, now)
        {
            self.speaker.speak(&text);
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        if self.help_open || self.path_input.is_some() {
            return;
        }
        // Right click reads a version aloud without touching its answer.
        let speak = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => false,
            MouseEventKind::Down(MouseButton::Right) => true,
            _ => return,
        };
        let Phase::Question(view) = self.session.view() else {
            return;
        };
        let panels = self.version_panels(&view);
        let Some(target) = version_panel::hit_test(&panels, &view.versions, mouse.column, mouse.row)
        else {
            return;
        };

        if speak {
            if let Some(text) = self.session.sentence(target.version()) {
                self.speaker.speak(&text);
            }
            return;
        }

        self.keys.end_session();
        match target {
            HitTarget::Panel(id) => {
                self.session.set_active_version(id);
            }
            HitTarget::Slot(id, slot) => {
                self.session.set_active_version(id);
                self.session.select(id, slot, now);
            }
            HitTarget::Entry(id, pos) => {
                self.session.set_active_version(id);
                self.session.remove_at(id, pos);
            }
        }
    }

    fn change_speech_rate(&mut self, steps: i32) {
        let rate = speech::step_rate(self.config.speech_rate, steps);
        self.config.speech_rate = rate;
        self.config_dirty = true;
        self.speaker.set_rate(rate);
        self.status = Some(format!("Speech rate {rate:.2}x"));
    }

    pub fn tick(&mut self, now: Instant) {
        self.keys.tick(now);
        self.session.tick(now);
    }

    /// Key hints for the question screen, in display order.
    pub fn hints(view: &QuestionView) -> Vec<&'static str> {
        let mut hints = Vec::new();
        if view.offer_next {
            hints.push("[Enter] Next");
        }
        if view.offer_skip {
            hints.push("[Esc] Skip");
            hints.push("[Del] Clear");
        }
        if view.versions.len() > 1 {
            hints.push("[Tab/↑↓] Version");
        }
        if view.can_go_previous || view.can_go_next {
            hints.push("[←/→] Revisit");
        }
        hints.extend(["[Ctrl+S] Speak", "[F5/F6] Rate", "[F1] Help", "[Ctrl+Q] Quit"]);
        hints
    }

    pub fn footer_lines(&self, view: &QuestionView) -> Vec<String> {
        wrap_hints(&Self::hints(view), self.area.width as usize)
    }

    pub fn quiz_layout(&self, view: &QuestionView) -> QuizLayout {
        QuizLayout::new(self.area, self.footer_lines(view).len() as u16)
    }

    /// Placement of the version blocks, shared by drawing and clicking.
    pub fn version_panels(&self, view: &QuestionView) -> Vec<PanelGeometry> {
        let layout = self.quiz_layout(view);
        version_panel::layout_versions(layout.versions, &view.versions, view.active)
    }

    fn open_path_prompt(&mut self) {
        self.keys.end_session();
        let seed = match &self.lesson_source {
            LessonSource::File(path) => path
                .parent()
                .map(|p| format!("{}{}", p.display(), std::path::MAIN_SEPARATOR))
                .unwrap_or_default(),
            LessonSource::Bundled => String::new(),
        };
        self.path_input = Some(LineInput::new(&seed));
        self.path_error = None;
    }

    fn close_path_prompt(&mut self) {
        self.path_input = None;
        self.path_error = None;
    }

    /// Replaces the running quiz with lessons from `path`. On failure the
    /// prompt stays open with the error.
    pub fn open_lessons(&mut self, path: &Path) {
        match lesson::load_file(path) {
            Ok(lessons) => {
                let count = lessons.len();
                self.keys.end_session();
                self.session.start_game(lessons);
                self.lesson_source = LessonSource::File(path.to_path_buf());
                self.config.lessons_path = Some(path.display().to_string());
                self.config_dirty = true;
                self.close_path_prompt();
                self.status = Some(format!("Loaded {count} questions from {}", path.display()));
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "could not open lessons");
                self.path_error = Some(err.to_string());
            }
        }
    }
}
