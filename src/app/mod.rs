//! App layer - the single owner of console state
//!
//! The App actor turns UI events and network responses into state
//! transitions, then emits network commands and a fresh render state.

pub mod actor;
pub mod commands;
pub mod state;

pub use actor::AppActor;
pub use state::AppState;
