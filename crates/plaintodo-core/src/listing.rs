use std::fmt;

use serde::Serialize;

use crate::list::TaskList;
use crate::tag::TagMatcher;

/// A line together with its position in the list it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberedLine {
    /// 1-indexed line number, usable as a range address.
    pub number: usize,
    /// Line content.
    pub text: String,
}

impl fmt::Display for NumberedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}\t{}", self.number, self.text)
    }
}

/// Number every line of `list`, keeping only lines that carry `tag` when one
/// is given. Numbers always refer to positions in the full list.
#[must_use]
pub fn filter(list: &TaskList, tag: Option<&str>) -> Vec<NumberedLine> {
    let matcher = tag.and_then(TagMatcher::new);
    list.numbered()
        .filter(|(_, text)| matcher.as_ref().is_none_or(|matcher| matcher.matches(text)))
        .map(|(number, text)| NumberedLine {
            number,
            text: text.to_owned(),
        })
        .collect()
}
