pub mod parser;

use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use parser::parse;

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

pub const BUNDLED_LESSON_FILE: &str = "starter.txt";

/// A source sentence and every accepted reconstruction of it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub source_text: String,
    pub versions: Vec<Version>,
}

/// One accepted paraphrase. `tokens` is the canonical order and may contain
/// the same word more than once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub tokens: Vec<String>,
    pub label: String,
}

impl Version {
    pub fn new(tokens: Vec<String>, label: impl Into<String>) -> Self {
        Self {
            tokens,
            label: label.into(),
        }
    }

    pub fn sentence(&self) -> String {
        self.tokens.join(" ")
    }
}

impl Lesson {
    pub fn new(source_text: impl Into<String>, versions: Vec<Version>) -> Self {
        Self {
            source_text: source_text.into(),
            versions,
        }
    }
}

#[derive(Debug, Error)]
pub enum LessonError {
    #[error("failed to read lesson file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no lessons found (expected numbered lines followed by `- [word] ...` versions)")]
    NoLessons,

    #[error("bundled lesson file {0} is missing or not UTF-8")]
    Bundled(String),
}

pub fn load_file(path: &Path) -> Result<Vec<Lesson>, LessonError> {
    let content = fs::read_to_string(path).map_err(|source| LessonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lessons = parse(&content)?;
    tracing::info!(path = %path.display(), count = lessons.len(), "loaded lessons");
    Ok(lessons)
}

/// The starter set compiled into the binary.
pub fn bundled() -> Result<Vec<Lesson>, LessonError> {
    let file = LessonAssets::get(BUNDLED_LESSON_FILE)
        .ok_or_else(|| LessonError::Bundled(BUNDLED_LESSON_FILE.to_string()))?;
    let content = std::str::from_utf8(file.data.as_ref())
        .map_err(|_| LessonError::Bundled(BUNDLED_LESSON_FILE.to_string()))?;
    parse(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_lessons_parse() {
        let lessons = bundled().unwrap();
        assert!(!lessons.is_empty());
        assert!(lessons.iter().all(|l| !l.versions.is_empty()));
    }

    #[test]
    fn load_file_reads_and_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1. Con mèo ngủ.").unwrap();
        writeln!(file, "- [The] [cat] [sleeps]").unwrap();
        let lessons = load_file(file.path()).unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].versions[0].sentence(), "The cat sleeps");
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, LessonError::Io { .. }));
    }
}
