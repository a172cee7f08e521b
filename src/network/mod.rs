//! Network layer - document fetches and request execution
//!
//! The Network actor receives fetch/execute commands and sends back responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
