use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

use crate::list::TaskList;
use crate::tag::{has_priority, scan_tags};

const HEADERS: [&str; 4] = ["tag", "pri", "todo", "done"];
const COUNT_WIDTH: usize = 5;
/// Rendered in place of a zero count.
const BLANK_CELL: &str = " ";

/// Per-tag counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    /// Pending lines carrying the tag and a priority marker.
    pub priority: usize,
    /// Occurrences of the tag in the pending list.
    pub pending: usize,
    /// Occurrences of the tag in the completed list.
    pub completed: usize,
}

/// Tag counts across both lists, keyed by tag as written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: BTreeMap<String, ReportEntry>,
}

impl Report {
    /// Scan both lists and tally every tag.
    ///
    /// Pending and completed counts are raw token occurrences. A pending line
    /// with a priority marker adds one priority point to each distinct tag on
    /// that line.
    #[must_use]
    pub fn aggregate(pending: &TaskList, completed: &TaskList) -> Self {
        let mut report = Self::default();
        for line in pending.lines() {
            let mut on_line = BTreeSet::new();
            for tag in scan_tags(line) {
                report.entry(tag).pending += 1;
                on_line.insert(tag);
            }
            if has_priority(line) {
                for tag in on_line {
                    report.entry(tag).priority += 1;
                }
            }
        }
        for line in completed.lines() {
            for tag in scan_tags(line) {
                report.entry(tag).completed += 1;
            }
        }
        report
    }

    fn entry(&mut self, tag: &str) -> &mut ReportEntry {
        self.entries.entry(tag.to_owned()).or_default()
    }

    /// Counts for one tag.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&ReportEntry> {
        self.entries.get(tag)
    }

    /// Every tag seen in either list.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tag was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows sorted case-insensitively by tag, with column widths.
    #[must_use]
    pub fn table(&self) -> ReportTable {
        let mut rows: Vec<ReportRow> = self
            .entries
            .iter()
            .map(|(tag, entry)| ReportRow {
                tag: tag.clone(),
                entry: *entry,
            })
            .collect();
        rows.sort_by(|a, b| {
            a.tag
                .to_lowercase()
                .cmp(&b.tag.to_lowercase())
                .then_with(|| a.tag.cmp(&b.tag))
        });
        let longest = rows.iter().map(|row| display_width(&row.tag)).max().unwrap_or(0);
        ReportTable {
            tag_width: longest.max(display_width(HEADERS[0])) + 1,
            rows,
        }
    }
}

/// One tag and its counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Tag as written in the lists.
    pub tag: String,
    /// Counts for the tag.
    #[serde(flatten)]
    pub entry: ReportEntry,
}

/// Report rows ready for a text sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    tag_width: usize,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    /// Width of the right-aligned tag column.
    #[must_use]
    pub const fn tag_width(&self) -> usize {
        self.tag_width
    }

    /// Width of each count column.
    #[must_use]
    pub const fn count_width(&self) -> usize {
        COUNT_WIDTH
    }

    /// Rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Header, dashed separator, then one line per tag.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(self.format_cells(&HEADERS.map(str::to_owned)));
        lines.push(
            self.widths()
                .map(|width| "-".repeat(width))
                .join(" "),
        );
        for row in &self.rows {
            lines.push(self.format_cells(&[
                row.tag.clone(),
                count_cell(row.entry.priority),
                count_cell(row.entry.pending),
                count_cell(row.entry.completed),
            ]));
        }
        lines
    }

    const fn widths(&self) -> [usize; 4] {
        [self.tag_width, COUNT_WIDTH, COUNT_WIDTH, COUNT_WIDTH]
    }

    fn format_cells(&self, cells: &[String; 4]) -> String {
        cells
            .iter()
            .zip(self.widths())
            .map(|(cell, width)| pad_left(cell, width))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn count_cell(count: usize) -> String {
    if count == 0 {
        BLANK_CELL.to_owned()
    } else {
        count.to_string()
    }
}

fn pad_left(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(text));
    format!("{}{text}", " ".repeat(padding))
}

fn display_width(text: &str) -> usize {
    text.graphemes(true).count()
}
