//! Parsing of a table-of-contents listing (one chapter per line).

use crate::patterns::{TOC_LINE, normalize_numeral};
use serde::Serialize;

/// One line of a TOC listing.
///
/// Ordinals count matched lines only and are not tied to the ordinals of
/// partitioned chapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Running count of matched lines, starting at 1
    pub ordinal: usize,
    /// Chapter numeral with whitespace removed, e.g. `第一回`
    pub numeral_text: String,
    pub title: String,
    /// Page number printed at the end of the line, if any
    pub declared_page: Option<u32>,
}

/// Parse every non-empty line of `listing` that looks like a TOC entry.
///
/// Lines that don't match are skipped.
pub fn parse_toc(listing: &str) -> Vec<TocEntry> {
    let mut entries = Vec::new();

    for line in listing.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some(caps) = TOC_LINE.captures(line) else {
            continue;
        };

        entries.push(TocEntry {
            ordinal: entries.len() + 1,
            numeral_text: normalize_numeral(&caps["numeral"]),
            title: caps["title"].trim().to_string(),
            declared_page: caps.name("page").and_then(|m| m.as_str().parse().ok()),
        });
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
癸酉本石头记
目  录

第  一  回  甄士隐梦幻识通灵　贾雨村风尘怀闺秀\t1
第  二  回  贾夫人仙逝扬州城　冷子兴演说荣国府\t9
这一行不是目录
第  三  回  托内兄如海酬训教　接外孙贾母惜孤女
";

    #[test]
    fn test_parse_toc_entries() {
        let entries = parse_toc(LISTING);
        assert_eq!(entries.len(), 3);

        assert_eq!(entries[0].ordinal, 1);
        assert_eq!(entries[0].numeral_text, "第一回");
        assert_eq!(entries[0].title, "甄士隐梦幻识通灵　贾雨村风尘怀闺秀");
        assert_eq!(entries[0].declared_page, Some(1));

        assert_eq!(entries[1].numeral_text, "第二回");
        assert_eq!(entries[1].declared_page, Some(9));
    }

    #[test]
    fn test_ordinals_skip_unmatched_lines() {
        let entries = parse_toc(LISTING);
        let ordinals: Vec<usize> = entries.iter().map(|e| e.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(entries[2].numeral_text, "第三回");
        assert_eq!(entries[2].declared_page, None);
    }

    #[test]
    fn test_empty_listing() {
        assert!(parse_toc("").is_empty());
        assert!(parse_toc("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_oversized_page_number_is_dropped() {
        let entries = parse_toc("第一回 标题 99999999999999999999");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "标题");
        assert_eq!(entries[0].declared_page, None);
    }

    #[test]
    fn test_page_needs_separating_whitespace() {
        let entries = parse_toc("第一回 回目123\n第二回 回目\t45");
        assert_eq!(entries[0].title, "回目123");
        assert_eq!(entries[0].declared_page, None);
        assert_eq!(entries[1].title, "回目");
        assert_eq!(entries[1].declared_page, Some(45));
    }
}
