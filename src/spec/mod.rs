//! OpenAPI document model
//!
//! Parses a raw document into operations grouped by tag, resolves `$ref`
//! indirection and turns schemas into documentation rows and example bodies.

pub mod index;
pub mod operation;
pub mod schema;

pub use index::{MethodCounts, SpecIndex};
pub use operation::{Operation, OperationDoc, Parameter, RequestBodySpec, ResponseSpec, SearchEntry, Tag};
pub use schema::{PropertyRow, SchemaKind, SchemaResolver};
