//! EPUB 2 package documents: container.xml, content.opf and toc.ncx.

use crate::archive::Entry;
use crate::book::Book;
use crate::pages::{self, LISTING_TITLE, escape_xml};

/// Stylesheet packaged when none is configured.
pub const DEFAULT_STYLESHEET: &str = include_str!("../assets/style.css");

pub const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

/// Dublin Core metadata for the package document.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub title: String,
    pub author: String,
    pub language: String,
    pub identifier: String,
    /// Publication date, `YYYY-MM-DD`
    pub date: String,
}

/// A cover image with its detected format.
#[derive(Debug, Clone)]
pub struct CoverImage {
    pub data: Vec<u8>,
    /// Path inside OEBPS, e.g. `images/cover.png`
    pub href: &'static str,
    pub media_type: &'static str,
}

impl CoverImage {
    pub fn new(data: Vec<u8>) -> Self {
        let (href, media_type) = detect_cover_format(&data);
        Self {
            data,
            href,
            media_type,
        }
    }
}

/// Detect cover image format from magic bytes.
fn detect_cover_format(data: &[u8]) -> (&'static str, &'static str) {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        ("images/cover.png", "image/png")
    } else if data.starts_with(b"GIF") {
        ("images/cover.gif", "image/gif")
    } else {
        // JPEG is the most common cover format
        ("images/cover.jpg", "image/jpeg")
    }
}

/// Static files that accompany the generated pages.
#[derive(Debug, Clone)]
pub struct Assets {
    pub stylesheet: String,
    pub cover: Option<CoverImage>,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            stylesheet: DEFAULT_STYLESHEET.to_string(),
            cover: None,
        }
    }
}

/// Every archive entry of the EPUB, `mimetype` first.
pub fn package(book: &Book, metadata: &Metadata, assets: &Assets) -> Vec<Entry> {
    let mut entries = vec![
        Entry::new("mimetype", "application/epub+zip"),
        Entry::new("META-INF/container.xml", CONTAINER_XML),
        Entry::new("OEBPS/content.opf", content_opf(book, metadata, assets.cover.as_ref())),
        Entry::new("OEBPS/toc.ncx", toc_ncx(book, metadata, assets.cover.is_some())),
        Entry::new("OEBPS/style.css", assets.stylesheet.as_str()),
        Entry::new("OEBPS/toc.html", pages::listing_page(&book.listing)),
    ];

    if let Some(cover) = &assets.cover {
        entries.push(Entry::new("OEBPS/cover.html", pages::cover_page(cover.href)));
        entries.push(Entry::new(format!("OEBPS/{}", cover.href), cover.data.clone()));
    }

    for section in &book.sections {
        entries.push(Entry::new(
            format!("OEBPS/{}", section.filename),
            section.xhtml.as_str(),
        ));
    }

    entries
}

/// The OPF package document.
pub fn content_opf(book: &Book, metadata: &Metadata, cover: Option<&CoverImage>) -> String {
    let mut manifest = vec![
        r#"<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>"#.to_string(),
        r#"<item id="style" href="style.css" media-type="text/css"/>"#.to_string(),
    ];
    let mut spine = Vec::new();
    let mut cover_meta = String::new();

    if let Some(cover) = cover {
        manifest.push(
            r#"<item id="cover" href="cover.html" media-type="application/xhtml+xml"/>"#
                .to_string(),
        );
        manifest.push(format!(
            r#"<item id="cover-image" href="{}" media-type="{}"/>"#,
            cover.href, cover.media_type
        ));
        spine.push(r#"<itemref idref="cover" linear="yes"/>"#.to_string());
        cover_meta = "\n        <meta name=\"cover\" content=\"cover-image\"/>".to_string();
    }

    manifest.push(
        r#"<item id="toc" href="toc.html" media-type="application/xhtml+xml"/>"#.to_string(),
    );
    spine.push(r#"<itemref idref="toc"/>"#.to_string());

    for section in &book.sections {
        manifest.push(format!(
            r#"<item id="{}" href="{}" media-type="application/xhtml+xml"/>"#,
            section.id, section.filename
        ));
        spine.push(format!(r#"<itemref idref="{}"/>"#, section.id));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" unique-identifier="BookId" version="2.0">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
        <dc:title>{}</dc:title>
        <dc:creator opf:role="aut">{}</dc:creator>
        <dc:language>{}</dc:language>
        <dc:identifier id="BookId" opf:scheme="UUID">{}</dc:identifier>
        <dc:date>{}</dc:date>{cover_meta}
    </metadata>
    <manifest>
        {}
    </manifest>
    <spine toc="ncx">
        {}
    </spine>
</package>"#,
        escape_xml(&metadata.title),
        escape_xml(&metadata.author),
        escape_xml(&metadata.language),
        escape_xml(&metadata.identifier),
        escape_xml(&metadata.date),
        manifest.join("\n        "),
        spine.join("\n        "),
    )
}

/// The NCX navigation document. Play order runs from 1: cover, listing, sections.
pub fn toc_ncx(book: &Book, metadata: &Metadata, has_cover: bool) -> String {
    let mut nav_points = Vec::new();
    let mut order = 0;
    let mut next = || {
        order += 1;
        order
    };

    if has_cover {
        nav_points.push(nav_point("navPoint-cover", next(), "封面", "cover.html"));
    }
    nav_points.push(nav_point("navPoint-toc", next(), LISTING_TITLE, "toc.html"));

    for section in &book.sections {
        nav_points.push(nav_point(
            &format!("navPoint-{}", section.id),
            next(),
            &section.title,
            &section.filename,
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
    <head>
        <meta name="dtb:uid" content="{}"/>
        <meta name="dtb:depth" content="1"/>
        <meta name="dtb:totalPageCount" content="0"/>
        <meta name="dtb:maxPageNumber" content="0"/>
    </head>
    <docTitle><text>{}</text></docTitle>
    <navMap>
        {}
    </navMap>
</ncx>"#,
        escape_xml(&metadata.identifier),
        escape_xml(&metadata.title),
        nav_points.join("\n        "),
    )
}

fn nav_point(id: &str, order: usize, label: &str, src: &str) -> String {
    format!(
        r#"<navPoint id="{id}" playOrder="{order}">
            <navLabel><text>{}</text></navLabel>
            <content src="{src}"/>
        </navPoint>"#,
        escape_xml(label)
    )
}
