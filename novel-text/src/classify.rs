//! Line classification for chapter bodies: escaping, annotation markup, and
//! the poem heuristics.

use crate::patterns::ANNOTATION_SPAN;
use serde::Serialize;

/// Lines shorter than this (in characters) may be poem lines.
pub const SHORT_LINE_THRESHOLD: usize = 40;

/// A line starting with one of these introduces a poem.
const POEM_INTRO_PREFIXES: &[&str] = &["诗曰"];

/// A line ending with one of these introduces a poem.
const POEM_INTRO_SUFFIXES: &[&str] = &["云：", "道是：", "曰："];

/// Sentence-final punctuation that marks a short line as verse.
const VERSE_ENDINGS: &[char] = &['。', '，', '？', '！'];

const COMMENT_OPEN: &str = r#"<span class="comment">"#;
const COMMENT_CLOSE: &str = "</span>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Announces the verse that follows
    PoemIntro,
    /// Short verse line, rendered centered
    PoemLine,
    Paragraph,
}

/// A classified line of chapter text.
///
/// `text` is already escaped and carries comment markup, so it can be placed
/// into XHTML as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypedLine {
    pub kind: LineKind,
    pub text: String,
}

/// Escape `&`, `<` and `>`.
///
/// This is a plain substitution: escaping already-escaped text escapes it again.
pub fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap every `【…】` span in a comment marker, keeping the brackets.
pub fn mark_annotations(text: &str) -> String {
    ANNOTATION_SPAN
        .replace_all(text, |caps: &regex::Captures| {
            format!("{COMMENT_OPEN}{}{COMMENT_CLOSE}", &caps[0])
        })
        .into_owned()
}

/// Classify the lines of a chapter body.
///
/// Empty and whitespace-only lines are dropped. Output order follows input order.
pub fn classify(text: &str) -> Vec<TypedLine> {
    let marked = mark_annotations(&escape_markup(text));

    marked
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| TypedLine {
            kind: line_kind(line),
            text: line.to_string(),
        })
        .collect()
}

/// Decide the kind of a single trimmed line. Markup counts toward its length.
fn line_kind(line: &str) -> LineKind {
    if is_poem_intro(line) {
        LineKind::PoemIntro
    } else if line.chars().count() < SHORT_LINE_THRESHOLD && line.ends_with(VERSE_ENDINGS) {
        LineKind::PoemLine
    } else {
        LineKind::Paragraph
    }
}

fn is_poem_intro(line: &str) -> bool {
    POEM_INTRO_PREFIXES.iter().any(|p| line.starts_with(p))
        || POEM_INTRO_SUFFIXES.iter().any(|s| line.ends_with(s))
}
