use serde::Serialize;
use thiserror::Error;

/// A recoverable condition met while partitioning a transcript.
///
/// None of these abort a parse; each one describes a degraded but valid result.
/// A TOC line that does not match the listing pattern is skipped silently and
/// has no variant here.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("front matter marker {marker:?} not found; split at the first chapter heading instead")]
    MissingMarker { marker: String },

    #[error("no chapter headings found; the whole text was kept as a single section")]
    NoChaptersFound,

    #[error("chapter {ordinal} has a malformed heading {line:?}; numeral taken from its first characters")]
    MalformedHeader { ordinal: usize, line: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_marker() {
        let d = Diagnostic::MissingMarker {
            marker: "扉页题诗：".to_string(),
        };
        assert!(d.to_string().contains("扉页题诗："));
    }

    #[test]
    fn test_display_malformed_header() {
        let d = Diagnostic::MalformedHeader {
            ordinal: 3,
            line: "第三回".to_string(),
        };
        let msg = d.to_string();
        assert!(msg.starts_with("chapter 3"));
        assert!(msg.contains("第三回"));
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_string(&Diagnostic::NoChaptersFound).unwrap();
        assert_eq!(json, r#"{"kind":"no_chapters_found"}"#);
    }
}
