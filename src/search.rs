//! Sidebar filtering and command palette search over a loaded document

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::constants::MAX_SEARCH_RESULTS;
use crate::spec::{Operation, SpecIndex};

/// Delays applying rapid input until a quiet window has passed
#[derive(Clone, Debug)]
pub struct Debouncer {
    window: Duration,
    due: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Debouncer { window, due: None }
    }

    /// Record input activity at `now`, pushing the deadline back
    pub fn touch(&mut self, now: Instant) {
        self.due = Some(now + self.window);
    }

    /// True once per burst, when the quiet window has elapsed
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}

/// One line of the sidebar tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarRow {
    Tag {
        tag: usize,
        name: String,
        visible: usize,
        expanded: bool,
    },
    Operation {
        tag: usize,
        operation: usize,
    },
}

/// Sidebar tree state: applied filter, expanded tags and the cursor
#[derive(Clone, Debug, Default)]
pub struct Sidebar {
    filter: String,
    expanded: BTreeSet<String>,
    cursor: usize,
}

fn matches_filter(operation: &Operation, query: &str) -> bool {
    query.is_empty()
        || operation.path.to_lowercase().contains(query)
        || operation.method.as_lower().contains(query)
        || operation.display_name().to_lowercase().contains(query)
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_expanded(&self, tag: &str) -> bool {
        self.expanded.contains(tag)
    }

    /// Apply a filter; tags with matches are expanded while it is non-empty
    pub fn set_filter(&mut self, index: &SpecIndex, filter: &str) {
        self.filter = filter.trim().to_lowercase();
        if !self.filter.is_empty() {
            for tag in &index.tags {
                if index.tag_operations(tag).any(|op| matches_filter(op, &self.filter)) {
                    self.expanded.insert(tag.name.clone());
                }
            }
        }
        self.cursor = 0;
    }

    /// Accordion toggle: expanding a tag collapses every other one
    pub fn toggle_tag(&mut self, name: &str) {
        if self.expanded.remove(name) {
            return;
        }
        self.expanded.clear();
        self.expanded.insert(name.to_string());
    }

    /// Forget everything tied to the previous document
    pub fn reset(&mut self) {
        self.expanded.clear();
        self.cursor = 0;
    }

    /// Operation indices of `tag` that pass the filter
    pub fn visible_operations(&self, index: &SpecIndex, tag: usize) -> Vec<usize> {
        index
            .tags
            .get(tag)
            .map(|t| {
                t.operations
                    .iter()
                    .copied()
                    .filter(|&i| {
                        index
                            .operations
                            .get(i)
                            .map(|op| matches_filter(op, &self.filter))
                            .unwrap_or(false)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Flattened tree; tags without visible operations are hidden
    pub fn rows(&self, index: &SpecIndex) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        for (tag_index, tag) in index.tags.iter().enumerate() {
            let visible = self.visible_operations(index, tag_index);
            if visible.is_empty() {
                continue;
            }
            let expanded = self.is_expanded(&tag.name);
            rows.push(SidebarRow::Tag {
                tag: tag_index,
                name: tag.name.clone(),
                visible: visible.len(),
                expanded,
            });
            if expanded {
                rows.extend(visible.into_iter().map(|operation| SidebarRow::Operation {
                    tag: tag_index,
                    operation,
                }));
            }
        }
        rows
    }

    pub fn move_cursor(&mut self, down: bool, row_count: usize) {
        if row_count == 0 {
            self.cursor = 0;
        } else if down {
            self.cursor = (self.cursor + 1).min(row_count - 1);
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    pub fn clamp_cursor(&mut self, row_count: usize) {
        self.cursor = self.cursor.min(row_count.saturating_sub(1));
    }
}

/// Command palette: query input plus the current result selection
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandPalette {
    pub query: String,
    /// Indices into the search index
    pub results: Vec<usize>,
    pub selected: usize,
}

impl CommandPalette {
    pub fn update(&mut self, index: &SpecIndex) {
        self.results = palette_search(index, &self.query);
        self.selected = 0;
    }

    pub fn move_selection(&mut self, down: bool) {
        if self.results.is_empty() {
            return;
        }
        if down {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    pub fn selected_result(&self) -> Option<usize> {
        self.results.get(self.selected).copied()
    }
}

/// Substring search over the flat search index, capped at the result limit.
/// An empty query yields nothing.
pub fn palette_search(index: &SpecIndex, query: &str) -> Vec<usize> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    index
        .search_index
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.text.contains(&query))
        .map(|(i, _)| i)
        .take(MAX_SEARCH_RESULTS)
        .collect()
}
