//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use std::time::Duration;

/// Application name
pub const APP_NAME: &str = "Swagger Console";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL that operation paths and relative document URLs resolve against
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Default accent color
pub const DEFAULT_PRIMARY_COLOR: &str = "#5D87FF";

/// Default document title
pub const DEFAULT_DOCUMENT_TITLE: &str = "API Documentation";

/// Default HTTP timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Tag given to operations that declare none
pub const DEFAULT_TAG: &str = "default";

/// Group key used for global parameters when no group is selected
pub const DEFAULT_GROUP_KEY: &str = "default";

/// Nesting bound for schema flattening and example synthesis
pub const MAX_SCHEMA_DEPTH: usize = 3;

/// Maximum `$ref` hops followed before giving up
pub const MAX_REF_HOPS: usize = 8;

/// Maximum command palette results
pub const MAX_SEARCH_RESULTS: usize = 20;

/// Quiet window before filter input is applied
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(200);

/// Lifetime of a transient notification
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// App actor housekeeping tick
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Durable storage keys
pub const STORAGE_KEY_THEME: &str = "theme";
pub const STORAGE_KEY_SIDEBAR: &str = "sidebar";
pub const STORAGE_KEY_GLOBAL_PARAMS: &str = "global-params-v2";

/// Config directory name
pub const CONFIG_DIR_NAME: &str = "swagger-console";

/// Config file looked up in the config directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SWAGGER_CONSOLE_CONFIG";

/// Log file name
pub const LOG_FILE_NAME: &str = "swagger-console.log";
