use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, STORAGE_KEY_GLOBAL_PARAMS, STORAGE_KEY_SIDEBAR, STORAGE_KEY_THEME,
};
use crate::models::{GlobalParam, Theme};

/// Group name -> that group's ordered global parameters
pub type GroupParamMap = BTreeMap<String, Vec<GlobalParam>>;

/// Durable key/value storage, one JSON file per key
#[derive(Clone, Debug)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    /// Storage under the user's config directory
    pub fn new() -> Self {
        let dir = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        Storage { dir }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Storage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Ensure storage directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .with_context(|| format!("creating {}", self.dir.display()))?;
        }
        Ok(())
    }

    /// Read a value; missing or unreadable entries come back as `None`
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring corrupt stored value");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(self.path_for(key), content)?;
        Ok(())
    }

    pub fn load_theme(&self) -> Option<Theme> {
        self.get(STORAGE_KEY_THEME)
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.set(STORAGE_KEY_THEME, &theme)
    }

    /// Whether the sidebar was left collapsed
    pub fn load_sidebar_collapsed(&self) -> bool {
        self.get::<String>(STORAGE_KEY_SIDEBAR)
            .map(|s| s == "collapsed")
            .unwrap_or(false)
    }

    pub fn save_sidebar_collapsed(&self, collapsed: bool) -> Result<()> {
        let value = if collapsed { "collapsed" } else { "expanded" };
        self.set(STORAGE_KEY_SIDEBAR, &value)
    }

    pub fn load_global_params(&self) -> GroupParamMap {
        self.get(STORAGE_KEY_GLOBAL_PARAMS).unwrap_or_default()
    }

    pub fn save_global_params(&self, params: &GroupParamMap) -> Result<()> {
        self.set(STORAGE_KEY_GLOBAL_PARAMS, params)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GlobalParamKind;

    #[test]
    fn test_missing_values_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path().join("nested"));
        assert_eq!(storage.load_theme(), None);
        assert!(!storage.load_sidebar_collapsed());
        assert!(storage.load_global_params().is_empty());
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::with_dir(dir.path());
        storage.save_theme(Theme::Light).unwrap();
        storage.save_sidebar_collapsed(true).unwrap();

        let mut params = GroupParamMap::new();
        params.insert(
            "v1".into(),
            vec![GlobalParam::new("X-Tenant", "42", GlobalParamKind::Header)],
        );
        storage.save_global_params(&params).unwrap();

        let reopened = Storage::with_dir(dir.path());
        assert_eq!(reopened.load_theme(), Some(Theme::Light));
        assert!(reopened.load_sidebar_collapsed());
        assert_eq!(reopened.load_global_params(), params);
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("global-params-v2.json"), "{not json").unwrap();
        let storage = Storage::with_dir(dir.path());
        assert!(storage.load_global_params().is_empty());
    }
}
