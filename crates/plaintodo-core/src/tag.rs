use std::sync::LazyLock;

use regex::Regex;

/// Character that flags a line as high priority.
pub const PRIORITY_MARKER: char = '!';

/// `@` or `+` followed by anything up to whitespace or a priority marker.
#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[@+][^\s!]+").expect("tag pattern must compile"));

/// Every tag occurrence in `line`, in order, duplicates included.
pub fn scan_tags(line: &str) -> impl Iterator<Item = &str> {
    TAG_PATTERN.find_iter(line).map(|found| found.as_str())
}

/// Whether `line` carries at least one priority marker.
#[must_use]
pub fn has_priority(line: &str) -> bool {
    line.contains(PRIORITY_MARKER)
}

/// Expand `partial` to the first known tag it prefixes, ignoring case.
///
/// Candidates are sorted lexicographically first so the outcome does not
/// depend on the order of `known`. `partial` is returned unchanged when it is
/// blank, when nothing matches, or when the match is `partial` itself.
pub fn expand_tag<'a, I>(partial: &str, known: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    if partial.trim().is_empty() {
        return partial.to_owned();
    }
    let mut candidates: Vec<&str> = known.into_iter().collect();
    candidates.sort_unstable();
    candidates.dedup();

    let needle = partial.to_lowercase();
    candidates
        .into_iter()
        .find(|tag| tag.to_lowercase().starts_with(&needle))
        .filter(|tag| *tag != partial)
        .map_or_else(|| partial.to_owned(), str::to_owned)
}

/// Case-insensitive tag matcher for filtering lines.
///
/// A line matches when it contains the tag and the tag ends at a word
/// boundary, so `@home` matches `@home` and `@Home,` but not `@homework`.
pub struct TagMatcher {
    needle: String,
}

impl TagMatcher {
    /// Normalize a tag into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(tag: &str) -> Option<Self> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_ascii_lowercase(),
        })
    }

    /// Determine whether `line` contains the tag.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        let haystack = line.to_ascii_lowercase();
        haystack.match_indices(&self.needle).any(|(start, found)| {
            haystack[start + found.len()..]
                .chars()
                .next()
                .is_none_or(|next| !is_word_char(next))
        })
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
