mod app;
mod event;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use reword::config::Config;
use reword::lesson::{self, Lesson};
use reword::quiz::view::QuestionView;
use reword::quiz::{InOrder, Phase, QuizSession, Shuffled};

use app::{App, LessonSource};
use event::{AppEvent, EventHandler, TICK_RATE};
use ui::components::help::HelpModal;
use ui::components::path_prompt::{PROMPT_HEIGHT, PathPrompt};
use ui::components::progress_bar::ProgressBar;
use ui::components::results::ResultsScreen;
use ui::components::typing_indicator::TypingIndicator;
use ui::components::version_panel::VersionPanel;
use ui::line_input::expand_home;
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "reword", version, about = "Terminal sentence-reconstruction drill")]
struct Cli {
    #[arg(help = "Lesson file to play (defaults to the last one opened, then the starter set)")]
    lessons: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Seed for the word shuffle")]
    seed: Option<u64>,

    #[arg(long, help = "Show words in their original order")]
    no_shuffle: bool,

    #[arg(long, help = "Print a JSON summary of the run on exit")]
    summary: bool,

    #[arg(long, help = "List available themes and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    if let Err(err) = init_logging() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "unreadable config, using defaults");
        Config::default()
    });
    if let Some(theme) = &cli.theme {
        config.theme = theme.clone();
    }
    if cli.no_shuffle {
        config.shuffle = false;
    }

    let (lessons, source) = load_lessons(&cli, &config)?;

    let theme = Theme::load(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "unknown theme, using default");
        Theme::default()
    });
    let theme: &'static Theme = Box::leak(Box::new(theme));

    let session = if config.shuffle {
        QuizSession::new(Shuffled::new(cli.seed))
    } else {
        QuizSession::new(InOrder)
    };
    let session = session.with_version_advance_delay(config.version_advance());
    let speaker = reword::speech::from_config(&config);
    let mut app = App::new(session, lessons, source, config, theme, speaker);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Needed to see a bare Shift press; terminals without it still get Ctrl+S.
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
        )
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    if app.config_dirty {
        if let Err(err) = app.config.save() {
            tracing::warn!(%err, "could not save config");
        }
    }

    if cli.summary {
        println!("{}", serde_json::to_string_pretty(&app.summary())?);
    }

    Ok(())
}

/// Logs go to a file; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("reword");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("reword.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .try_init()?;
    Ok(())
}

/// Command-line path, then the last opened file, then the starter set. Only
/// a bad command-line path is fatal.
fn load_lessons(cli: &Cli, config: &Config) -> Result<(Vec<Lesson>, LessonSource)> {
    if let Some(path) = &cli.lessons {
        let lessons = lesson::load_file(path)
            .with_context(|| format!("loading lessons from {}", path.display()))?;
        return Ok((lessons, LessonSource::File(path.clone())));
    }
    if let Some(saved) = config.lessons_path.as_deref() {
        let path = expand_home(saved);
        match lesson::load_file(&path) {
            Ok(lessons) => return Ok((lessons, LessonSource::File(path))),
            Err(err) => tracing::warn!(path = %path.display(), %err, "falling back to starter lessons"),
        }
    }
    Ok((lesson::bundled()?, LessonSource::Bundled))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            app.area = frame.area();
            render(frame, app);
        })?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key, Instant::now()),
            AppEvent::Mouse(mouse) => app.handle_mouse(mouse, Instant::now()),
            AppEvent::Tick | AppEvent::Resize => {}
        }
        app.tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.session.view() {
        Phase::Question(view) => render_question(frame, app, &view),
        Phase::Results(_) => render_results(frame, app),
    }

    if app.help_open {
        let modal = ui::layout::centered_rect(64, HelpModal::height(), area);
        frame.render_widget(HelpModal::new(app.theme), modal);
    }
    if let Some(input) = &app.path_input {
        let modal = ui::layout::centered_rect(72, PROMPT_HEIGHT, area);
        frame.render_widget(
            PathPrompt::new(input, app.path_error.as_deref(), app.theme),
            modal,
        );
    }
}

fn render_question(frame: &mut ratatui::Frame, app: &App, view: &QuestionView) {
    let colors = &app.theme.colors;
    let layout = app.quiz_layout(view);

    let header_info = format!(
        " Question {}/{} | Score {} | {}",
        view.index + 1,
        view.total,
        view.score,
        app.lesson_source.label(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " reword ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(header_info, Style::default().fg(colors.muted()).bg(colors.header_bg())),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    if layout.progress.height > 0 {
        let skipped = (0..view.total)
            .filter_map(|q| app.session.snapshot(q))
            .filter(|s| !s.is_correct)
            .count();
        let progress = ProgressBar::new(view.score as usize, skipped, view.total, app.theme);
        frame.render_widget(progress, layout.progress);
    }

    let source = Paragraph::new(Line::from(Span::styled(
        view.source_text.as_str(),
        Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
    )))
    .wrap(Wrap { trim: true })
    .block(
        Block::bordered()
            .title(" Translate ")
            .border_style(Style::default().fg(colors.border())),
    );
    frame.render_widget(source, layout.source);

    for panel in app.version_panels(view) {
        let version = &view.versions[panel.version];
        let active = view.active == Some(panel.version);
        frame.render_widget(
            VersionPanel::new(version, &panel, active, app.theme),
            panel.area,
        );
    }

    let feedback = match (&view.feedback, &app.status) {
        (Some(fb), _) => {
            let color = if fb.is_correct {
                colors.correct()
            } else {
                colors.warning()
            };
            Span::styled(
                format!(" {}", fb.text),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        }
        (None, Some(status)) => Span::styled(format!(" {status}"), Style::default().fg(colors.muted())),
        (None, None) => Span::raw(""),
    };
    frame.render_widget(Paragraph::new(Line::from(feedback)), layout.feedback);
    if let Some(buffer) = app.keys.indicator() {
        frame.render_widget(TypingIndicator::new(buffer, app.theme), layout.feedback);
    }

    let footer: Vec<Line> = app
        .footer_lines(view)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.accent()))))
        .collect();
    frame.render_widget(Paragraph::new(footer), layout.footer);
}

fn render_results(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let summary = app.summary();
    let height = (summary.questions.len() as u16).saturating_add(8);
    let centered = ui::layout::centered_rect(72, height, area);
    frame.render_widget(ResultsScreen::new(&summary, app.theme), centered);
}
