use std::fmt;

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// Unchanged lines shown around each change in unified output.
const CONTEXT_LINES: usize = 3;

const DEFAULT_OLD_LABEL: &str = "before";
const DEFAULT_NEW_LABEL: &str = "after";

/// One line of an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "text", rename_all = "lowercase")]
pub enum DiffLine {
    /// Present in both revisions.
    Context(String),
    /// Only present in the old revision.
    Removed(String),
    /// Only present in the new revision.
    Added(String),
}

impl DiffLine {
    /// Text of the line without any marker.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Context(text) | Self::Removed(text) | Self::Added(text) => text,
        }
    }

    /// Whether the line is an insertion or a deletion.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Context(_))
    }
}

/// Line-based difference between two revisions of a list.
///
/// Displays as a unified diff; an empty diff displays as nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diff {
    old_label: String,
    new_label: String,
    lines: Vec<DiffLine>,
    #[serde(skip)]
    old_text: String,
    #[serde(skip)]
    new_text: String,
}

impl Default for Diff {
    fn default() -> Self {
        Self {
            old_label: DEFAULT_OLD_LABEL.to_owned(),
            new_label: DEFAULT_NEW_LABEL.to_owned(),
            lines: Vec::new(),
            old_text: String::new(),
            new_text: String::new(),
        }
    }
}

impl Diff {
    /// Compute the difference from `old` to `new`.
    #[must_use]
    pub fn between(old: &[String], new: &[String]) -> Self {
        let old_text = terminated(old);
        let new_text = terminated(new);
        let lines = TextDiff::from_lines(&old_text, &new_text)
            .iter_all_changes()
            .map(|change| {
                let value = change.value();
                let text = value.strip_suffix('\n').unwrap_or(value).to_owned();
                match change.tag() {
                    ChangeTag::Equal => DiffLine::Context(text),
                    ChangeTag::Delete => DiffLine::Removed(text),
                    ChangeTag::Insert => DiffLine::Added(text),
                }
            })
            .collect();

        Self {
            lines,
            old_text,
            new_text,
            ..Self::default()
        }
    }

    /// Set the labels printed in the `---`/`+++` header.
    #[must_use]
    pub fn with_labels(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old_label = old.into();
        self.new_label = new.into();
        self
    }

    /// True when the two revisions hold the same lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.lines.iter().any(DiffLine::is_change)
    }

    /// Full edit script, context included.
    #[must_use]
    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    /// Lines only present in the new revision.
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            DiffLine::Added(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Lines only present in the old revision.
    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            DiffLine::Removed(text) => Some(text.as_str()),
            _ => None,
        })
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        let diff = TextDiff::from_lines(&self.old_text, &self.new_text);
        write!(
            f,
            "{}",
            diff.unified_diff()
                .context_radius(CONTEXT_LINES)
                .header(&self.old_label, &self.new_label)
        )
    }
}

/// Every line newline-terminated, so a missing final newline never shows up
/// as a change.
fn terminated(lines: &[String]) -> String {
    lines.iter().fold(String::new(), |mut text, line| {
        text.push_str(line);
        text.push('\n');
        text
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_owned()).collect()
    }

    #[test]
    fn identical_revisions_produce_empty_diff() {
        let both = lines(&["a", "b"]);
        let diff = Diff::between(&both, &both);
        assert!(diff.is_empty());
        assert_eq!(diff.to_string(), "");
        assert!(Diff::default().is_empty());
        assert_eq!(Diff::default().to_string(), "");
    }

    #[test]
    fn keeps_common_lines_as_context() {
        let diff = Diff::between(&lines(&["a", "b", "c", "d"]), &lines(&["a", "c", "d", "e"]));
        assert_eq!(diff.removed().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(diff.added().collect::<Vec<_>>(), vec!["e"]);
        assert_eq!(diff.lines().iter().filter(|line| !line.is_change()).count(), 3);
    }

    #[test]
    fn renders_unified_hunk() {
        let diff = Diff::between(&lines(&["a", "b", "c"]), &lines(&["a", "c"]))
            .with_labels(".todo.txt.bkp", "todo.txt");
        let expected = "--- .todo.txt.bkp\n+++ todo.txt\n@@ -1,3 +1,2 @@\n a\n-b\n c\n";
        assert_eq!(diff.to_string(), expected);
    }

    #[test]
    fn distant_changes_split_into_hunks() {
        let old: Vec<String> = (1..=12).map(|n| n.to_string()).collect();
        let mut new = old.clone();
        new[1] = "two".into();
        new.remove(10);

        let rendered = Diff::between(&old, &new).to_string();
        let headers: Vec<_> = rendered.lines().filter(|line| line.starts_with("@@")).collect();
        assert_eq!(headers, vec!["@@ -1,5 +1,5 @@", "@@ -8,5 +8,4 @@"]);
    }

    #[test]
    fn insertion_into_empty_list() {
        let diff = Diff::between(&[], &lines(&["first"]));
        assert_eq!(diff.to_string(), "--- before\n+++ after\n@@ -0,0 +1 @@\n+first\n");
    }

    #[test]
    fn carriage_returns_stay_in_line_text() {
        let diff = Diff::between(&lines(&["a\r"]), &lines(&["b\r"]));
        assert_eq!(diff.removed().collect::<Vec<_>>(), vec!["a\r"]);
        assert_eq!(diff.added().collect::<Vec<_>>(), vec!["b\r"]);
    }

    #[test]
    fn serializes_edit_script() -> anyhow::Result<()> {
        let diff = Diff::between(&lines(&["a"]), &lines(&["b"]));
        let json = serde_json::to_value(&diff)?;
        assert_eq!(json["lines"][0]["op"], "removed");
        assert_eq!(json["lines"][1]["text"], "b");
        assert!(json.get("old_text").is_none());
        Ok(())
    }
}
