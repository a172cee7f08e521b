//! Configured document groups, the current selection and per-group tab state

use std::collections::HashMap;

use crate::models::DocumentGroup;
use crate::workspace::TabSnapshot;

/// Sidebar state for the current group's document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// What the caller needs to fetch after a switch begins
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwitchTicket {
    pub generation: u64,
    pub group: DocumentGroup,
}

#[derive(Debug, Default)]
pub struct GroupStore {
    groups: Vec<DocumentGroup>,
    current: Option<usize>,
    snapshots: HashMap<String, TabSnapshot>,
    /// Incoming group's saved tabs, held until its document arrives
    pending: Option<TabSnapshot>,
    generation: u64,
    status: LoadStatus,
}

impl GroupStore {
    pub fn new(groups: Vec<DocumentGroup>) -> Self {
        GroupStore {
            groups,
            ..Default::default()
        }
    }

    pub fn groups(&self) -> &[DocumentGroup] {
        &self.groups
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&DocumentGroup> {
        self.groups.get(self.current?)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Start switching to `index` (or reloading it when already current).
    ///
    /// The outgoing group's tabs are saved under its name; the incoming
    /// group's saved tabs are held until [`GroupStore::complete`].
    pub fn begin_switch(&mut self, index: usize, outgoing: TabSnapshot) -> Option<SwitchTicket> {
        let group = self.groups.get(index)?.clone();
        if let Some(previous) = self.current().map(|g| g.name.clone()) {
            // A load still in flight never populated the workspace, and a
            // failed one already put its tabs back
            match self.pending.take() {
                Some(pending) => {
                    self.snapshots.insert(previous, pending);
                }
                None if !matches!(self.status, LoadStatus::Failed(_)) => {
                    self.snapshots.insert(previous, outgoing);
                }
                None => {}
            }
        }
        self.current = Some(index);
        self.pending = Some(self.snapshots.get(&group.name).cloned().unwrap_or_default());
        self.generation += 1;
        self.status = LoadStatus::Loading;
        tracing::info!(group = %group.name, generation = self.generation, "Switching group");
        Some(SwitchTicket {
            generation: self.generation,
            group,
        })
    }

    /// Document for `generation` loaded; hands back the tabs to restore
    pub fn complete(&mut self, generation: u64) -> Option<TabSnapshot> {
        if !self.is_current(generation) {
            return None;
        }
        self.status = LoadStatus::Loaded;
        Some(self.pending.take().unwrap_or_default())
    }

    /// Document for `generation` failed; saved tabs stay saved
    pub fn fail(&mut self, generation: u64, message: String) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        if let (Some(group), Some(pending)) = (self.current().map(|g| g.name.clone()), self.pending.take()) {
            self.snapshots.insert(group, pending);
        }
        self.status = LoadStatus::Failed(message);
        true
    }
}
