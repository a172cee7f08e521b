//! Host-supplied configuration: document sources, theme, accent and feature toggles

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILE_NAME, DEFAULT_DOCUMENT_TITLE, DEFAULT_ORIGIN,
    DEFAULT_PRIMARY_COLOR, DEFAULT_TIMEOUT_SECS,
};
use crate::models::{DocumentGroup, Theme};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub urls: Vec<DocumentGroup>,
    pub origin: String,
    pub default_theme: Theme,
    pub primary_color: String,
    pub document_title: String,
    pub enable_search: bool,
    pub enable_code_copy: bool,
    pub bearer_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            urls: Vec::new(),
            origin: String::from(DEFAULT_ORIGIN),
            default_theme: Theme::Auto,
            primary_color: String::from(DEFAULT_PRIMARY_COLOR),
            document_title: String::from(DEFAULT_DOCUMENT_TITLE),
            enable_search: true,
            enable_code_copy: true,
            bearer_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load a config file, JSON when the extension says so, YAML otherwise
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("parsing config {}", path.display()))?
        };
        Ok(config)
    }

    /// Find and load the config the way the launcher does
    pub fn discover(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Config::load(Path::new(&path));
        }
        if let Some(path) = default_config_path().filter(|p| p.exists()) {
            return Config::load(&path);
        }
        Ok(Config::default())
    }

    /// Bearer token, ignoring blank values
    pub fn bearer(&self) -> Option<&str> {
        self.bearer_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Resolve a possibly relative URL against the configured origin
    pub fn resolve_url(&self, url: &str) -> Result<url::Url> {
        let base = url::Url::parse(&self.origin)
            .with_context(|| format!("invalid origin {}", self.origin))?;
        base.join(url)
            .with_context(|| format!("invalid URL {}", url))
    }

    /// Accent color as RGB, falling back to the default accent
    pub fn accent_rgb(&self) -> (u8, u8, u8) {
        parse_hex_color(&self.primary_color)
            .or_else(|| parse_hex_color(DEFAULT_PRIMARY_COLOR))
            .unwrap_or((93, 135, 255))
    }
}

/// `<config dir>/swagger-console/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Parse `#RRGGBB` or `#RGB`
pub fn parse_hex_color(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.trim().strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let mut parts = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some((parts.next()??, parts.next()??, parts.next()??))
        }
        _ => None,
    }
}

/// Command line arguments understood by the launcher
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchArgs {
    pub config_path: Option<PathBuf>,
    pub fragment: Option<String>,
    pub document_url: Option<String>,
    /// Arguments matching no known form, reported once logging is up
    pub ignored: Vec<String>,
}

impl LaunchArgs {
    pub fn parse<I, S>(args: I) -> LaunchArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = LaunchArgs::default();
        for arg in args {
            let arg = arg.as_ref();
            if arg.starts_with('#') {
                parsed.fragment = Some(arg.to_string());
            } else if arg.starts_with("http://") || arg.starts_with("https://") {
                parsed.document_url = Some(arg.to_string());
            } else if arg.ends_with(".yaml") || arg.ends_with(".yml") || arg.ends_with(".json") {
                parsed.config_path = Some(PathBuf::from(arg));
            } else {
                parsed.ignored.push(arg.to_string());
            }
        }
        parsed
    }

    /// Apply ad-hoc overrides on top of a loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.document_url {
            config.urls = vec![DocumentGroup::new("default", url.clone())];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_config_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            r#"
urls:
  - name: v1
    url: /swagger/v1/swagger.json
default_theme: dark
bearer_token: "  "
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.urls, vec![DocumentGroup::new("v1", "/swagger/v1/swagger.json")]);
        assert_eq!(config.default_theme, Theme::Dark);
        assert!(config.enable_search);
        assert_eq!(config.bearer(), None);
        assert_eq!(config.origin, DEFAULT_ORIGIN);
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"urls":[{"name":"a","url":"http://x/a.json"}],"enable_code_copy":false}"#).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.urls.len(), 1);
        assert!(!config.enable_code_copy);
    }

    #[test]
    fn test_resolve_relative_document_url() {
        let config = Config {
            origin: "http://api.local:5000/app/".into(),
            ..Config::default()
        };
        let url = config.resolve_url("/swagger/v1/swagger.json").unwrap();
        assert_eq!(url.as_str(), "http://api.local:5000/swagger/v1/swagger.json");
        let absolute = config.resolve_url("https://other.host/doc.json").unwrap();
        assert_eq!(absolute.as_str(), "https://other.host/doc.json");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#5D87FF"), Some((0x5d, 0x87, 0xff)));
        assert_eq!(parse_hex_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("blue"), None);
    }

    #[test]
    fn test_launch_args() {
        let args = LaunchArgs::parse(["#GET/api/users", "--verbose", "https://h/doc.json", "cfg.yml"]);
        assert_eq!(args.fragment.as_deref(), Some("#GET/api/users"));
        assert_eq!(args.config_path, Some(PathBuf::from("cfg.yml")));
        assert_eq!(args.ignored, vec![String::from("--verbose")]);

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.urls, vec![DocumentGroup::new("default", "https://h/doc.json")]);
    }
}
