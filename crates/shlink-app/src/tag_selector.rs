//! Tag selection logic shared by the tags filter and its widget
//!
//! Selections are plain ordered lists of lower-case tag names. Every operation
//! returns the complete new selection, which the caller hands to its
//! `on_change` action.

use crate::state::MountId;

/// Minimum query length before suggestions are offered
pub const MIN_SUGGESTION_QUERY_LEN: usize = 1;

/// Characters that turn the current input into tokens
pub const TAG_DELIMITERS: &[char] = &[','];

/// Split raw input into normalized tag names.
///
/// Lower-cases, splits on commas, trims every fragment and drops empty ones.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .split(TAG_DELIMITERS)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Add the tags found in `input` to `selected`.
///
/// The result is the first-seen union of `selected` followed by the parsed
/// fragments, so it never holds the same name twice even when `selected` did.
pub fn add_tags(selected: &[String], input: &str) -> Vec<String> {
    let mut next: Vec<String> = Vec::with_capacity(selected.len());
    for tag in selected.iter().cloned().chain(parse_tags(input)) {
        if !next.contains(&tag) {
            next.push(tag);
        }
    }
    next
}

/// Remove the tag at `index`. Out-of-range indices leave the selection unchanged.
pub fn remove_tag(selected: &[String], index: usize) -> Vec<String> {
    selected
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, t)| t.clone())
        .collect()
}

/// Known tags matching `query` that are not selected yet
pub fn suggestions<'a>(known: &'a [String], selected: &[String], query: &str) -> Vec<&'a str> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < MIN_SUGGESTION_QUERY_LEN {
        return Vec::new();
    }
    known
        .iter()
        .filter(|tag| !selected.contains(tag))
        .filter(|tag| tag.to_lowercase().contains(&query))
        .map(String::as_str)
        .collect()
}

/// Selection the open selector edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagsSelectorTarget {
    /// Tag filter of the short URLs list
    #[default]
    Filter,
    /// Tags of the short URL being created
    NewShortUrl,
}

/// Open tags selector
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagsSelectorState {
    /// Token issued when the selector was opened. Owns the tags request.
    pub mount: MountId,
    pub target: TagsSelectorTarget,
    /// Tags currently selected
    pub selected: Vec<String>,
    /// Text typed after the last token
    pub input: String,
    /// Highlighted suggestion, if the list is focused
    pub suggestion: Option<usize>,
}

impl TagsSelectorState {
    pub fn new(mount: MountId, selected: Vec<String>) -> Self {
        Self {
            mount,
            target: TagsSelectorTarget::Filter,
            selected,
            input: String::new(),
            suggestion: None,
        }
    }

    pub fn with_target(mut self, target: TagsSelectorTarget) -> Self {
        self.target = target;
        self
    }
}
