//! Domain types for plaintext pending/done task lists.
//!
//! Everything in this crate is pure: lists are parsed from and rendered to
//! text, but reading and writing files is left to the store crates.

/// Completion date stamps added and removed when tasks move between lists.
pub mod completion;
/// Line-based differences between two list revisions.
pub mod diff;
/// Two-slot undo buffer.
pub mod history;
/// Task list values and list identifiers.
pub mod list;
/// Numbered, tag-filtered listings.
pub mod listing;
/// Line range addresses.
pub mod range;
/// Per-tag aggregation and table rendering.
pub mod report;
/// Tag scanning, matching and expansion.
pub mod tag;

pub use diff::{Diff, DiffLine};
pub use history::History;
pub use list::{ListId, TaskList};
pub use listing::NumberedLine;
pub use range::{Address, LineRange, RangeError};
pub use report::{Report, ReportEntry, ReportRow, ReportTable};
pub use tag::TagMatcher;
