//! XHTML page templates.

use novel_text::{LineKind, TypedLine, escape_markup};

/// Title of the listing page.
pub const LISTING_TITLE: &str = "目录";

/// Suffix for listing entries that have no generated page.
pub const PENDING_SUFFIX: &str = "(待补)";

const XHTML_PROLOGUE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml">"#;

/// One row of the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    pub label: String,
    /// Target page; None renders the label as pending.
    pub href: Option<String>,
}

/// Escape text for XML content and attribute values.
pub fn escape_xml(text: &str) -> String {
    escape_markup(text).replace('"', "&quot;")
}

/// Render a single classified line as a paragraph.
pub fn render_line(line: &TypedLine) -> String {
    match line.kind {
        LineKind::PoemIntro => format!(r#"<p class="poem-intro">{}</p>"#, line.text),
        LineKind::PoemLine => format!(
            r#"<p class="poem-line" style="text-align:center;">{}</p>"#,
            line.text
        ),
        LineKind::Paragraph => format!("<p>{}</p>", line.text),
    }
}

/// A content page: heading plus classified lines.
pub fn content_page(title: &str, lines: &[TypedLine]) -> String {
    let title = escape_xml(title);
    let body: Vec<String> = lines.iter().map(render_line).collect();

    format!(
        r#"{XHTML_PROLOGUE}
<head>
    <title>{title}</title>
    <link rel="stylesheet" href="style.css" type="text/css"/>
</head>
<body>
    <h1>{title}</h1>
    {}
</body>
</html>"#,
        body.join("\n    ")
    )
}

/// The linked listing page (`toc.html`).
pub fn listing_page(items: &[ListingItem]) -> String {
    let rows: Vec<String> = items
        .iter()
        .map(|item| {
            let label = escape_xml(&item.label);
            match &item.href {
                Some(href) => format!(r#"<li><a href="{}">{label}</a></li>"#, escape_xml(href)),
                None => format!("<li>{label} {PENDING_SUFFIX}</li>"),
            }
        })
        .collect();

    format!(
        r#"{XHTML_PROLOGUE}
<head>
    <title>{LISTING_TITLE}</title>
    <link rel="stylesheet" href="style.css" type="text/css"/>
</head>
<body>
    <h1>{LISTING_TITLE}</h1>
    <nav id="toc">
        <ol>
            {}
        </ol>
    </nav>
</body>
</html>"#,
        rows.join("\n            ")
    )
}

/// Full-page cover showing `image_href`.
pub fn cover_page(image_href: &str) -> String {
    format!(
        r#"{XHTML_PROLOGUE}
<head>
    <title>Cover</title>
    <style type="text/css">
        body {{ margin: 0; padding: 0; text-align: center; }}
        img {{ max-width: 100%; max-height: 100%; }}
    </style>
</head>
<body>
    <div style="text-align: center; padding: 0pt; margin: 0pt;">
        <img src="{}" alt="Cover"/>
    </div>
</body>
</html>"#,
        escape_xml(image_href)
    )
}
