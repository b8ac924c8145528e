//! Structure for plain-text novel transcripts.
//!
//! Two independent pieces:
//! - [`partition`] splits a transcript into optional front matter and an
//!   ordered list of titled chapters, recovering from irregular formatting
//! - [`classify`] turns one chapter body into escaped, typed lines
//!   (paragraph, poem introduction, centered poem line)
//!
//! Neither returns an error. Recoverable problems are reported as
//! [`Diagnostic`]s on the [`Partition`] and logged through the `log` facade.

pub mod classify;
pub mod diagnostic;
pub mod partition;
pub mod patterns;
pub mod toc;

pub use classify::{LineKind, TypedLine, classify, escape_markup, mark_annotations};
pub use diagnostic::Diagnostic;
pub use partition::{
    ChapterHeader, ChapterRecord, FrontMatterRecord, Partition, PartitionOptions, partition,
    partition_with,
};
pub use toc::{TocEntry, parse_toc};
