//! Open operation tabs for the current document group

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{GlobalParam, HttpMethod};
use crate::spec::{Operation, SpecIndex};
use crate::workspace::panel::TabPanel;

/// Tab identity; a pure function of method and path
pub fn tab_id(method: HttpMethod, path: &str) -> String {
    format!("{}:{}", method.as_lower(), path)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tab {
    pub id: String,
    pub path: String,
    pub method: HttpMethod,
    pub title: String,
    pub operation: Arc<Operation>,
}

impl Tab {
    pub fn new(operation: Arc<Operation>) -> Self {
        Tab {
            id: tab_id(operation.method, &operation.path),
            path: operation.path.clone(),
            method: operation.method,
            title: operation.title().to_string(),
            operation,
        }
    }
}

/// Saved tab set of a group, restored when the group is selected again
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabSnapshot {
    pub tabs: Vec<Tab>,
    pub active: Option<String>,
}

/// Open tabs, the active one and their lazily built panels.
///
/// With no active tab the overview is shown; open tabs are kept.
#[derive(Debug, Default)]
pub struct TabWorkspace {
    tabs: Vec<Tab>,
    active: Option<String>,
    panels: HashMap<String, TabPanel>,
}

impl TabWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        let id = self.active.as_deref()?;
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn active_index(&self) -> Option<usize> {
        let id = self.active.as_deref()?;
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn is_overview(&self) -> bool {
        self.active.is_none()
    }

    /// Open an operation, reusing its tab when already open. Returns the tab id.
    pub fn open(&mut self, operation: Arc<Operation>) -> String {
        let id = tab_id(operation.method, &operation.path);
        if !self.tabs.iter().any(|t| t.id == id) {
            tracing::debug!(tab = %id, "Opening tab");
            self.tabs.push(Tab::new(operation));
        }
        self.active = Some(id.clone());
        id
    }

    /// Close a tab and drop its panel. When the active tab closes, the tab now
    /// at the same position (or the new last one) becomes active.
    pub fn close(&mut self, id: &str) -> bool {
        let Some(index) = self.tabs.iter().position(|t| t.id == id) else {
            return false;
        };
        self.tabs.remove(index);
        self.panels.remove(id);
        tracing::debug!(tab = %id, remaining = self.tabs.len(), "Closed tab");

        if self.active.as_deref() == Some(id) {
            self.active = if self.tabs.is_empty() {
                None
            } else {
                let next = index.min(self.tabs.len() - 1);
                Some(self.tabs[next].id.clone())
            };
        }
        true
    }

    pub fn close_active(&mut self) -> bool {
        match self.active.clone() {
            Some(id) => self.close(&id),
            None => false,
        }
    }

    pub fn show_overview(&mut self) {
        self.active = None;
    }

    /// Cycle through overview and tabs in strip order
    pub fn cycle(&mut self, forward: bool) {
        let slots = self.tabs.len() + 1;
        let current = self.active_index().map(|i| i + 1).unwrap_or(0);
        let next = if forward {
            (current + 1) % slots
        } else {
            (current + slots - 1) % slots
        };
        self.active = next.checked_sub(1).map(|i| self.tabs[i].id.clone());
    }

    /// Build the active tab's panel on first activation
    pub fn ensure_panel(&mut self, index: &SpecIndex, globals: &[GlobalParam]) {
        let Some(tab) = self.active_tab() else {
            return;
        };
        if self.panels.contains_key(&tab.id) {
            return;
        }
        let panel = TabPanel::new(&tab.operation, &index.resolver(), globals);
        let id = tab.id.clone();
        self.panels.insert(id, panel);
    }

    pub fn panel(&self, id: &str) -> Option<&TabPanel> {
        self.panels.get(id)
    }

    pub fn panel_mut(&mut self, id: &str) -> Option<&mut TabPanel> {
        self.panels.get_mut(id)
    }

    pub fn active_panel(&self) -> Option<&TabPanel> {
        self.panels.get(self.active.as_deref()?)
    }

    pub fn active_panel_mut(&mut self) -> Option<&mut TabPanel> {
        let id = self.active.as_deref()?;
        self.panels.get_mut(id)
    }

    /// Reseed every built panel's global inputs after the stored set changed
    pub fn sync_globals(&mut self, globals: &[GlobalParam]) {
        for panel in self.panels.values_mut() {
            panel.globals = globals.to_vec();
            let count = panel.fields().len();
            panel.field = panel.field.min(count.saturating_sub(1));
        }
    }

    pub fn snapshot(&self) -> TabSnapshot {
        TabSnapshot {
            tabs: self.tabs.clone(),
            active: self.active.clone(),
        }
    }

    /// Replace the working set with a snapshot, relinking every tab against
    /// a freshly parsed index. Tabs whose operation vanished are dropped.
    pub fn restore(&mut self, snapshot: TabSnapshot, index: &SpecIndex) {
        self.panels.clear();
        self.tabs = snapshot
            .tabs
            .into_iter()
            .filter_map(|tab| index.find(tab.method, &tab.path).cloned())
            .map(Tab::new)
            .collect();
        self.active = snapshot
            .active
            .filter(|id| self.tabs.iter().any(|t| &t.id == id));
    }

    /// Forget everything; used when the incoming group has nothing saved
    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
        self.panels.clear();
    }
}
