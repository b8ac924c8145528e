//! Compiled patterns for chapter headings, TOC listings, and annotations.
//!
//! Patterns are compiled once on first use. Every chapter-numeral match in the
//! crate goes through this module so the heuristics live in one place.

use once_cell::sync::Lazy;
use regex::Regex;

/// Traditional numerals allowed between `第` and `回`.
pub const NUMERALS: &str = "一二三四五六七八九十百";

/// A line that opens a chapter: `第 <numerals> 回` followed by whitespace.
///
/// Interior spacing may be any horizontal whitespace (ASCII or full-width).
/// Start of text counts as a line start.
pub static CHAPTER_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?m)^第[^\S\n]*[{NUMERALS}]+[^\S\n]*回\s")).unwrap()
});

/// A full chapter header line: numeral token, whitespace, title.
pub static CHAPTER_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<numeral>第[^\S\n]*[{NUMERALS}]+[^\S\n]*回)\s+(?P<title>.*)$"
    ))
    .unwrap()
});

/// A TOC listing line: numeral token, title, optional trailing page number.
pub static TOC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?P<numeral>第\s*[{NUMERALS}]+\s*回)\s+(?P<title>.*?)(?:\s+(?P<page>[0-9]+))?$"
    ))
    .unwrap()
});

/// Bracketed annotation span, nearest closing bracket wins.
pub static ANNOTATION_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"【.*?】").unwrap());

/// Two or more consecutive whitespace characters inside a title.
pub static WIDE_GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

/// Remove every whitespace character from a numeral token.
///
/// `"第  一  回"` and `"第　一　回"` both become `"第一回"`.
pub fn normalize_numeral(token: &str) -> String {
    token.chars().filter(|c| !c.is_whitespace()).collect()
}
