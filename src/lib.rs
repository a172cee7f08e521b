//! # Swagger Console
//!
//! A terminal console for browsing and exercising APIs described by an
//! OpenAPI 3 document.
//!
//! ## Features
//! - Several named document groups, each with its own saved tabs
//! - Operations grouped by tag, with a live filter and a command palette
//! - Tabbed workspace with `#METHOD/path` deep links
//! - Per-operation documentation and a debug form with request execution
//! - Global headers and query parameters, persisted per group
//! - cURL export and JSON syntax highlighting
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod config;
pub mod constants;
pub mod curl;
pub mod error;
pub mod global_params;
pub mod groups;
pub mod messages;
pub mod models;
pub mod network;
pub mod notify;
pub mod request;
pub mod search;
pub mod spec;
pub mod storage;
pub mod ui;
pub mod workspace;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use config::{Config, LaunchArgs};
pub use curl::to_curl;
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use models::{DocumentGroup, ExecutionResult, GlobalParam, GlobalParamKind, HttpMethod, Theme};
pub use network::NetworkActor;
pub use request::{BuiltRequest, RequestBuilder};
pub use spec::{Operation, SpecIndex};
