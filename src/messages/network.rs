//! Network messages - communication between App and Network layers

use serde_json::Value;

use crate::error::LoadError;
use crate::models::ExecutionResult;
use crate::request::BuiltRequest;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Fetch and decode an OpenAPI document for a group switch
    FetchDocument { generation: u64, url: String },
    /// Execute a built request on behalf of a tab
    Execute {
        id: u64,
        tab_id: String,
        request: BuiltRequest,
    },
    /// Shutdown the network actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug)]
pub enum NetworkResponse {
    DocumentLoaded { generation: u64, document: Value },
    DocumentFailed { generation: u64, error: LoadError },
    Executed {
        id: u64,
        tab_id: String,
        result: ExecutionResult,
    },
}
