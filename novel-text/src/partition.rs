//! Splitting a raw transcript into front matter and titled chapters.
//!
//! The transcript is expected to look like:
//!
//! ```text
//! <table of contents>
//! 扉页题诗：<front matter>
//! 第一回　<title>
//! <body>
//! 第二回　<title>
//! <body>
//! ```
//!
//! Everything before the marker is treated as the TOC region. When the marker is
//! missing the first chapter heading is used as the split point instead.

use crate::diagnostic::Diagnostic;
use crate::patterns::{CHAPTER_HEADER, CHAPTER_OPENING, WIDE_GAP, normalize_numeral};
use crate::toc::{TocEntry, parse_toc};
use serde::Serialize;
use std::ops::RangeInclusive;

/// Number of leading characters used as the numeral when a heading is malformed.
const FALLBACK_NUMERAL_CHARS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterHeader {
    /// Position in the transcript, starting at 1
    pub ordinal: usize,
    /// Chapter numeral with whitespace removed, e.g. `第一回`
    pub numeral_text: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterRecord {
    pub header: ChapterHeader,
    pub body: String,
}

impl ChapterRecord {
    /// Heading as shown to readers: numeral and title separated by a space.
    pub fn display_title(&self) -> String {
        format!("{} {}", self.header.numeral_text, self.header.title)
    }
}

/// Text that precedes the first chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontMatterRecord {
    pub label: String,
    pub body: String,
}

/// Knobs for [`partition_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionOptions {
    /// Literal that separates the TOC region from the body
    pub marker: String,
    /// Label for text between the marker and the first chapter
    pub front_matter_label: String,
    /// Label for the single section kept when no chapter is found
    pub full_text_label: String,
}

impl Default for PartitionOptions {
    fn default() -> Self {
        Self {
            marker: "扉页题诗：".to_string(),
            front_matter_label: "扉页".to_string(),
            full_text_label: "全文".to_string(),
        }
    }
}

/// Result of partitioning a transcript.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Partition {
    pub front_matter: Option<FrontMatterRecord>,
    pub chapters: Vec<ChapterRecord>,
    /// Entries listed in the TOC region, not linked to `chapters`
    pub toc: Vec<TocEntry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Partition {
    /// Chapters whose ordinal lies in `range`.
    pub fn select(&self, range: RangeInclusive<usize>) -> Vec<&ChapterRecord> {
        self.chapters
            .iter()
            .filter(|c| range.contains(&c.header.ordinal))
            .collect()
    }
}

/// Partition `raw` with the default marker and labels.
pub fn partition(raw: &str) -> Partition {
    partition_with(raw, &PartitionOptions::default())
}

/// Partition `raw` into front matter and chapters.
///
/// Never fails: irregular input yields a degraded result with diagnostics.
pub fn partition_with(raw: &str, options: &PartitionOptions) -> Partition {
    let text = normalize_input(raw);
    let mut result = Partition::default();

    let Some((offset, via_marker)) = locate_body(&text, options, &mut result.diagnostics) else {
        keep_whole_text(&mut result, &text, options);
        return result;
    };

    let (preamble, body) = text.split_at(offset);
    result.toc = parse_toc(preamble);

    let boundaries: Vec<usize> = CHAPTER_OPENING.find_iter(body).map(|m| m.start()).collect();
    let Some(&first) = boundaries.first() else {
        keep_whole_text(&mut result, &text, options);
        return result;
    };

    let lead = &body[..first];
    let lead = if via_marker {
        lead.strip_prefix(options.marker.as_str()).unwrap_or(lead)
    } else {
        lead
    };
    let lead = lead.trim();
    if !lead.is_empty() {
        result.front_matter = Some(FrontMatterRecord {
            label: options.front_matter_label.clone(),
            body: lead.to_string(),
        });
    }

    for (i, &start) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1).copied().unwrap_or(body.len());
        let chapter = build_chapter(i + 1, body[start..end].trim(), &mut result.diagnostics);
        result.chapters.push(chapter);
    }

    log::debug!(
        "partitioned {} chapters (front matter: {}, toc entries: {})",
        result.chapters.len(),
        result.front_matter.is_some(),
        result.toc.len()
    );

    result
}

/// Strip a byte-order mark and unify line endings to `\n`.
fn normalize_input(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Find where the body starts. Returns the byte offset and whether the marker was used.
fn locate_body(
    text: &str,
    options: &PartitionOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<(usize, bool)> {
    if !options.marker.is_empty() {
        if let Some(pos) = text.find(options.marker.as_str()) {
            return Some((pos, true));
        }
    }

    record(
        diagnostics,
        Diagnostic::MissingMarker {
            marker: options.marker.clone(),
        },
    );

    CHAPTER_OPENING.find(text).map(|m| (m.start(), false))
}

/// No chapter heading anywhere: keep `text` as one section.
fn keep_whole_text(result: &mut Partition, text: &str, options: &PartitionOptions) {
    record(&mut result.diagnostics, Diagnostic::NoChaptersFound);

    let text = text.trim();
    if !text.is_empty() {
        result.front_matter = Some(FrontMatterRecord {
            label: options.full_text_label.clone(),
            body: text.to_string(),
        });
    }
}

fn build_chapter(ordinal: usize, chunk: &str, diagnostics: &mut Vec<Diagnostic>) -> ChapterRecord {
    let (header_line, rest) = chunk.split_once('\n').unwrap_or((chunk, ""));
    let header_line = header_line.trim();

    let Some(caps) = CHAPTER_HEADER.captures(header_line) else {
        record(
            diagnostics,
            Diagnostic::MalformedHeader {
                ordinal,
                line: header_line.to_string(),
            },
        );
        let numeral: String = header_line.chars().take(FALLBACK_NUMERAL_CHARS).collect();
        return ChapterRecord {
            header: ChapterHeader {
                ordinal,
                numeral_text: normalize_numeral(&numeral),
                title: header_line.to_string(),
            },
            body: rest.trim().to_string(),
        };
    };

    let title = caps["title"].trim();

    // A wide gap after the title means the body starts on the heading line.
    let (title, body) = match WIDE_GAP.find(title) {
        Some(gap) => {
            let spill = &title[gap.end()..];
            (&title[..gap.start()], format!("{spill}\n{rest}"))
        }
        None => (title, rest.to_string()),
    };

    ChapterRecord {
        header: ChapterHeader {
            ordinal,
            numeral_text: normalize_numeral(&caps["numeral"]),
            title: title.to_string(),
        },
        body: body.trim().to_string(),
    }
}

fn record(diagnostics: &mut Vec<Diagnostic>, diagnostic: Diagnostic) {
    log::warn!("{diagnostic}");
    diagnostics.push(diagnostic);
}
