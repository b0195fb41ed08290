//! Tag list types

use serde::{Deserialize, Serialize};

/// Usage statistics for a single tag
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagStats {
    pub tag: String,
    #[serde(default)]
    pub short_urls_count: u64,
    #[serde(default)]
    pub visits_count: u64,
}

/// Known tags of the selected server
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagsList {
    /// Unique, lower-case tag names in server order
    pub tags: Vec<String>,
    pub stats: Vec<TagStats>,
    /// Search filter applied by the tags view
    pub search_term: String,
    pub loading: bool,
    pub error: bool,
}

impl TagsList {
    /// Replace tags, keeping names unique by first occurrence
    pub fn with_tags(tags: Vec<String>, stats: Vec<TagStats>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        Self {
            tags: unique,
            stats,
            ..Default::default()
        }
    }

    pub fn stats_for(&self, tag: &str) -> Option<&TagStats> {
        self.stats.iter().find(|s| s.tag == tag)
    }

    /// Tags matching the search term (case-insensitive)
    pub fn filtered(&self) -> Vec<&str> {
        let needle = self.search_term.trim().to_lowercase();
        self.tags
            .iter()
            .filter(|t| needle.is_empty() || t.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }
}
