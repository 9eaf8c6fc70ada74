use std::process::{Child, Command, Stdio};

use crate::config::Config;

const BASE_WORDS_PER_MINUTE: f32 = 175.0;

pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;
pub const RATE_STEP: f32 = 0.25;

/// Reads a sentence aloud. Implementations must not block on playback.
pub trait Speaker {
    fn speak(&mut self, text: &str);

    /// Applies to the next utterance.
    fn set_rate(&mut self, _rate: f32) {}
}

/// Moves `rate` by `steps` increments of [`RATE_STEP`], kept within
/// [`MIN_RATE`, `MAX_RATE`].
pub fn step_rate(rate: f32, steps: i32) -> f32 {
    let stepped = (rate / RATE_STEP).round() + steps as f32;
    (stepped * RATE_STEP).clamp(MIN_RATE, MAX_RATE)
}

/// Used when no speech command is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl Speaker for Silent {
    fn speak(&mut self, text: &str) {
        tracing::debug!(%text, "speech disabled");
    }
}

/// Runs an external TTS program (`say`, `espeak`) per utterance. A new
/// utterance cuts off the previous one.
pub struct CommandSpeaker {
    program: String,
    rate: f32,
    current: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>, rate: f32) -> Self {
        Self {
            program: program.into(),
            rate,
            current: None,
        }
    }

    pub fn words_per_minute(&self) -> u32 {
        (BASE_WORDS_PER_MINUTE * self.rate).round() as u32
    }

    fn args(&self, text: &str) -> Vec<String> {
        let rate_flag = if self.program.ends_with("say") { "-r" } else { "-s" };
        vec![
            rate_flag.to_string(),
            self.words_per_minute().to_string(),
            text.to_string(),
        ]
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str) {
        self.stop();
        let spawned = Command::new(&self.program)
            .args(self.args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.current = Some(child),
            Err(err) => tracing::warn!(program = %self.program, %err, "speech command failed"),
        }
    }

    fn set_rate(&mut self, rate: f32) {
        tracing::debug!(rate, "speech rate changed");
        self.rate = rate;
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn from_config(config: &Config) -> Box<dyn Speaker> {
    match &config.speech_command {
        Some(program) => Box::new(CommandSpeaker::new(program.clone(), config.speech_rate)),
        None => Box::new(Silent),
    }
}
