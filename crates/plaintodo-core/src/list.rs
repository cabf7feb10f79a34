use std::fmt;

use serde::{Deserialize, Serialize};

use crate::range::LineRange;

/// Identifies one of the two task lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListId {
    /// Tasks that are not done yet.
    Pending,
    /// Finished tasks, each prefixed with its completion date.
    Completed,
}

impl ListId {
    /// Both lists, pending first.
    pub const ALL: [Self; 2] = [Self::Pending, Self::Completed];

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, 1-indexed sequence of task lines.
///
/// Parsing and rendering round-trip byte for byte: a missing final newline is
/// remembered until the list is mutated, after which the list is written with
/// a trailing newline like a line editor would.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl TaskList {
    /// Empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            trailing_newline: false,
        }
    }

    /// Build a list from individual lines.
    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let trailing_newline = !lines.is_empty();
        Self {
            lines,
            trailing_newline,
        }
    }

    /// Parse the raw content of a list resource.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        let (body, trailing_newline) = text
            .strip_suffix('\n')
            .map_or((text, false), |body| (body, true));
        Self {
            lines: body.split('\n').map(str::to_owned).collect(),
            trailing_newline,
        }
    }

    /// Render the list back to text.
    #[must_use]
    pub fn to_text(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        if self.trailing_newline {
            text.push('\n');
        }
        text
    }

    /// Number of lines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the list has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line by 1-indexed number.
    #[must_use]
    pub fn get(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    /// Iterate lines together with their 1-indexed numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| (index + 1, line.as_str()))
    }

    /// Copy the lines selected by `range`.
    #[must_use]
    pub fn slice(&self, range: &LineRange) -> Vec<String> {
        self.lines[range.resolve(self.len())].to_vec()
    }

    /// Replace the lines selected by `range` with `replacement` and return the
    /// removed lines.
    ///
    /// An empty replacement deletes the selection. When the range selects no
    /// existing line the list is left untouched.
    pub fn replace_range(&mut self, range: &LineRange, replacement: Vec<String>) -> Vec<String> {
        let selected = range.resolve(self.len());
        if selected.is_empty() {
            return Vec::new();
        }
        let removed: Vec<String> = self.lines.splice(selected, replacement).collect();
        self.trailing_newline = true;
        removed
    }

    /// Append lines to the end of the list.
    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.len();
        self.lines.extend(lines);
        if self.len() != before {
            self.trailing_newline = true;
        }
    }
}

impl fmt::Display for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
