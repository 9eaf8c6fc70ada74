//! Plain-text lesson format.
//!
//! ```text
//! 1. Tôi vui.
//! - [I] [am] [happy]
//! - [I'm] [happy]
//! ```
//!
//! A numbered line opens a lesson; the dash lines directly under it are its
//! versions, one bracketed group per token. Anything else is skipped.

use std::sync::LazyLock;

use icu_normalizer::ComposingNormalizerBorrowed;
use regex::Regex;

use super::{Lesson, LessonError, Version};

static QUESTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s+").expect("valid question regex"));
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid token regex"));

pub fn parse(content: &str) -> Result<Vec<Lesson>, LessonError> {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    let normalized = nfc.normalize(content);

    let lines: Vec<&str> = normalized
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let mut lessons = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let Some(found) = QUESTION_LINE.find(lines[i]) else {
            i += 1;
            continue;
        };
        let source_text = lines[i][found.end()..].to_string();
        i += 1;

        let mut versions = Vec::new();
        while i < lines.len() && lines[i].starts_with('-') {
            let tokens = parse_tokens(lines[i]);
            if !tokens.is_empty() {
                let label = (versions.len() + 1).to_string();
                versions.push(Version::new(tokens, label));
            }
            i += 1;
        }

        if versions.is_empty() {
            tracing::debug!(source = %source_text, "dropping lesson without versions");
        } else {
            lessons.push(Lesson::new(source_text, versions));
        }
    }

    if lessons.is_empty() {
        return Err(LessonError::NoLessons);
    }
    Ok(lessons)
}

fn parse_tokens(line: &str) -> Vec<String> {
    TOKEN
        .captures_iter(line)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_questions_and_versions() {
        let text = "\
1. Tôi vui.
- [I] [am] [happy]
- [I'm] [happy]

2. Con mèo ngủ.
- [The] [cat] [sleeps]
";
        let lessons = parse(text).unwrap();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].source_text, "Tôi vui.");
        assert_eq!(lessons[0].versions.len(), 2);
        assert_eq!(lessons[0].versions[0].tokens, vec!["I", "am", "happy"]);
        assert_eq!(lessons[0].versions[1].label, "2");
        assert_eq!(lessons[1].versions[0].tokens, vec!["The", "cat", "sleeps"]);
    }

    #[test]
    fn duplicate_tokens_are_kept() {
        let lessons = parse("1. x\n- [the] [dog] [saw] [the] [cat]").unwrap();
        assert_eq!(lessons[0].versions[0].tokens.len(), 5);
    }

    #[test]
    fn empty_versions_and_lessons_are_dropped() {
        let text = "\
1. Nothing here
- no brackets
2. Kept
- []
- [a] [b]
";
        let lessons = parse(text).unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].source_text, "Kept");
        assert_eq!(lessons[0].versions.len(), 1);
        assert_eq!(lessons[0].versions[0].label, "1");
    }

    #[test]
    fn stray_lines_are_skipped() {
        let text = "# heading\nnotes\n1. Hi\n- [Hello]\ntrailing";
        let lessons = parse(text).unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].versions[0].tokens, vec!["Hello"]);
    }

    #[test]
    fn numbered_line_requires_whitespace_after_dot() {
        assert!(matches!(parse("1.Hi\n- [Hello]"), Err(LessonError::NoLessons)));
    }

    #[test]
    fn empty_input_has_no_lessons() {
        assert!(matches!(parse("   \n\n"), Err(LessonError::NoLessons)));
    }

    #[test]
    fn decomposed_text_is_normalized() {
        // "e" + combining circumflex + combining dot below
        let lessons = parse("1. Ti\u{65}\u{302}\u{323}ng\n- [ti\u{65}\u{302}\u{323}ng]").unwrap();
        assert_eq!(lessons[0].source_text, "Ti\u{1ec7}ng");
        assert_eq!(lessons[0].versions[0].tokens[0], "ti\u{1ec7}ng");
    }
}
