//! Per-group global parameters applied to every outgoing request

use crate::constants::DEFAULT_GROUP_KEY;
use crate::error::GlobalParamError;
use crate::models::{GlobalParam, GlobalParamKind};
use crate::storage::{GroupParamMap, Storage};

/// Group-keyed global parameters plus the group-independent enable toggle.
///
/// Every successful mutation writes the whole map back to storage.
#[derive(Debug)]
pub struct GlobalParamStore {
    all: GroupParamMap,
    group: String,
    enabled: bool,
    storage: Storage,
}

impl GlobalParamStore {
    pub fn load(storage: Storage) -> Self {
        GlobalParamStore {
            all: storage.load_global_params(),
            group: String::from(DEFAULT_GROUP_KEY),
            enabled: true,
            storage,
        }
    }

    pub fn switch_group(&mut self, group: &str) {
        self.group = group.to_string();
    }

    /// Current group's parameters in insertion order
    pub fn params(&self) -> &[GlobalParam] {
        self.all.get(&self.group).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    pub fn add(&mut self, name: &str, value: &str, kind: GlobalParamKind) -> Result<(), GlobalParamError> {
        let param = validate(name, value, kind)?;
        self.ensure_unique(&param, None)?;
        self.all.entry(self.group.clone()).or_default().push(param);
        self.persist();
        Ok(())
    }

    pub fn update(
        &mut self,
        index: usize,
        name: &str,
        value: &str,
        kind: GlobalParamKind,
    ) -> Result<(), GlobalParamError> {
        let param = validate(name, value, kind)?;
        if index >= self.params().len() {
            return Err(GlobalParamError::OutOfRange(index));
        }
        self.ensure_unique(&param, Some(index))?;
        if let Some(slot) = self.all.get_mut(&self.group).and_then(|p| p.get_mut(index)) {
            *slot = param;
        }
        self.persist();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<GlobalParam, GlobalParamError> {
        let params = self
            .all
            .get_mut(&self.group)
            .filter(|p| index < p.len())
            .ok_or(GlobalParamError::OutOfRange(index))?;
        let removed = params.remove(index);
        self.persist();
        Ok(removed)
    }

    fn ensure_unique(&self, param: &GlobalParam, skip: Option<usize>) -> Result<(), GlobalParamError> {
        let clash = self
            .params()
            .iter()
            .enumerate()
            .any(|(i, p)| Some(i) != skip && p.name == param.name && p.kind == param.kind);
        if clash {
            return Err(GlobalParamError::Duplicate {
                name: param.name.clone(),
                kind: param.kind.as_str(),
            });
        }
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save_global_params(&self.all) {
            tracing::warn!(error = %e, "Failed to persist global parameters");
        }
    }
}

fn validate(name: &str, value: &str, kind: GlobalParamKind) -> Result<GlobalParam, GlobalParamError> {
    let name = name.trim();
    let value = value.trim();
    if name.is_empty() {
        return Err(GlobalParamError::EmptyName);
    }
    if value.is_empty() {
        return Err(GlobalParamError::EmptyValue);
    }
    Ok(GlobalParam::new(name, value, kind))
}
