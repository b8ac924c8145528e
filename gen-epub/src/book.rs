//! Assembly of a partitioned transcript into XHTML sections.

use crate::pages::{self, ListingItem};
use novel_text::{ChapterRecord, Partition, TocEntry, classify};
use std::ops::RangeInclusive;

/// A generated content page.
#[derive(Debug, Clone)]
pub struct Section {
    /// Manifest id, e.g. `chap_3`
    pub id: String,
    /// File name inside OEBPS
    pub filename: String,
    /// Title shown in headings and navigation
    pub title: String,
    /// Rendered page
    pub xhtml: String,
}

/// All content pages in reading order plus the listing rows.
#[derive(Debug, Clone, Default)]
pub struct Book {
    pub sections: Vec<Section>,
    pub listing: Vec<ListingItem>,
}

/// What to take from a partition.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    /// Only chapters whose ordinal is in this range
    pub chapters: Option<RangeInclusive<usize>>,
    /// Separate TOC listing; when present it drives the listing page
    pub toc: Option<&'a [TocEntry]>,
}

/// Build the content pages for `partition`.
pub fn assemble(partition: &Partition, selection: &Selection) -> Book {
    let mut book = Book::default();

    if let Some(front) = &partition.front_matter {
        let (id, filename) = if partition.chapters.is_empty() {
            ("full", "full.html")
        } else {
            ("intro", "intro.html")
        };
        book.sections.push(Section {
            id: id.to_string(),
            filename: filename.to_string(),
            title: front.label.clone(),
            xhtml: pages::content_page(&front.label, &classify(&front.body)),
        });
    }

    let chapters: Vec<&ChapterRecord> = match &selection.chapters {
        Some(range) => {
            let selected = partition.select(range.clone());
            if selected.is_empty() && !partition.chapters.is_empty() {
                log::warn!(
                    "Chapter range {}-{} selects none of the {} chapters",
                    range.start(),
                    range.end(),
                    partition.chapters.len()
                );
            }
            selected
        }
        None => partition.chapters.iter().collect(),
    };

    for chapter in &chapters {
        let ordinal = chapter.header.ordinal;
        let title = chapter.display_title();
        log::debug!("Rendering {title}");
        book.sections.push(Section {
            id: format!("chap_{ordinal}"),
            filename: format!("chapter_{ordinal}.html"),
            xhtml: pages::content_page(&title, &classify(&chapter.body)),
            title,
        });
    }

    book.listing = match selection.toc {
        Some(entries) => listing_from_toc(&book.sections, &chapters, entries),
        None => book
            .sections
            .iter()
            .map(|s| ListingItem {
                label: s.title.clone(),
                href: Some(s.filename.clone()),
            })
            .collect(),
    };

    book
}

/// Listing rows for a separate TOC: every entry is listed, and entries whose
/// numeral matches a rendered chapter link to it.
fn listing_from_toc(
    sections: &[Section],
    chapters: &[&ChapterRecord],
    entries: &[TocEntry],
) -> Vec<ListingItem> {
    let mut items: Vec<ListingItem> = sections
        .iter()
        .filter(|s| !s.id.starts_with("chap_"))
        .map(|s| ListingItem {
            label: s.title.clone(),
            href: Some(s.filename.clone()),
        })
        .collect();

    for entry in entries {
        let href = chapters
            .iter()
            .find(|c| c.header.numeral_text == entry.numeral_text)
            .map(|c| format!("chapter_{}.html", c.header.ordinal));
        if href.is_none() {
            log::debug!("{} has no chapter text yet", entry.numeral_text);
        }
        items.push(ListingItem {
            label: format!("{} {}", entry.numeral_text, entry.title),
            href,
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use novel_text::{parse_toc, partition};

    const TRANSCRIPT: &str = "\
扉页题诗：
浮生着甚苦奔忙，盛席华筵终散场。
第一回　甄士隐梦幻识通灵　贾雨村风尘怀闺秀
此开卷第一回也。
第二回　贾夫人仙逝扬州城　冷子兴演说荣国府
诗云：
第三回　托内兄如海酬训教　接外孙贾母惜孤女
却说雨村忙回头看时。
";

    #[test]
    fn test_assemble_all() {
        let book = assemble(&partition(TRANSCRIPT), &Selection::default());
        let ids: Vec<&str> = book.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["intro", "chap_1", "chap_2", "chap_3"]);
        assert_eq!(book.sections[0].title, "扉页");
        assert_eq!(book.sections[1].filename, "chapter_1.html");
        assert_eq!(
            book.sections[1].title,
            "第一回 甄士隐梦幻识通灵　贾雨村风尘怀闺秀"
        );
        assert!(book.sections[2].xhtml.contains(r#"<p class="poem-intro">诗云：</p>"#));

        assert_eq!(book.listing.len(), 4);
        assert_eq!(book.listing[3].href.as_deref(), Some("chapter_3.html"));
    }

    #[test]
    fn test_assemble_range_keeps_ordinals() {
        let selection = Selection {
            chapters: Some(2..=3),
            toc: None,
        };
        let book = assemble(&partition(TRANSCRIPT), &selection);
        let files: Vec<&str> = book.sections.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(files, vec!["intro.html", "chapter_2.html", "chapter_3.html"]);
    }

    #[test]
    fn test_assemble_range_past_last_chapter() {
        let selection = Selection {
            chapters: Some(50..=60),
            toc: None,
        };
        let book = assemble(&partition(TRANSCRIPT), &selection);
        let ids: Vec<&str> = book.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["intro"]);
        assert_eq!(book.listing.len(), 1);
    }

    #[test]
    fn test_listing_from_separate_toc() {
        let toc = parse_toc(
            "第  一  回  甄士隐梦幻识通灵　贾雨村风尘怀闺秀\t1\n第  四  回  薄命女偏逢薄命郎\t40\n",
        );
        let selection = Selection {
            chapters: None,
            toc: Some(&toc),
        };
        let book = assemble(&partition(TRANSCRIPT), &selection);

        assert_eq!(book.listing.len(), 3);
        assert_eq!(book.listing[0].label, "扉页");
        assert_eq!(book.listing[1].href.as_deref(), Some("chapter_1.html"));
        assert_eq!(book.listing[2].label, "第四回 薄命女偏逢薄命郎");
        assert!(book.listing[2].href.is_none());
        // Sections still follow the transcript.
        assert_eq!(book.sections.len(), 4);
    }

    #[test]
    fn test_assemble_without_chapters() {
        let book = assemble(&partition("只有一段文字。"), &Selection::default());
        assert_eq!(book.sections.len(), 1);
        assert_eq!(book.sections[0].id, "full");
        assert_eq!(book.sections[0].filename, "full.html");
        assert_eq!(book.sections[0].title, "全文");
    }
}
