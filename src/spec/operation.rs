//! Operation records and their documentation views

use indexmap::IndexMap;
use serde_json::Value;

use crate::models::{HttpMethod, ParameterLocation};
use crate::spec::schema::{display_value, pretty_json, PropertyRow, SchemaKind, SchemaResolver};

/// One HTTP method handler on one path, as declared in the document
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub path: String,
    pub method: HttpMethod,
    pub operation_id: String,
    pub summary: String,
    pub description: String,
    /// Declared tags in order, duplicates removed
    pub tags: Vec<String>,
    pub deprecated: bool,
    /// Raw parameter objects (possibly `$ref`), path-level ones merged in
    pub parameters: Vec<Value>,
    pub request_body: Option<Value>,
    pub responses: IndexMap<String, Value>,
}

impl Operation {
    /// Sidebar label: summary, else operationId, else path
    pub fn display_name(&self) -> &str {
        if !self.summary.is_empty() {
            &self.summary
        } else if !self.operation_id.is_empty() {
            &self.operation_id
        } else {
            &self.path
        }
    }

    /// Tab title: summary, else path
    pub fn title(&self) -> &str {
        if self.summary.is_empty() {
            &self.path
        } else {
            &self.summary
        }
    }

    pub fn is(&self, method: HttpMethod, path: &str) -> bool {
        self.method == method && self.path == path
    }
}

/// A named grouping of operations (indices into the operation list)
#[derive(Clone, Debug, PartialEq)]
pub struct Tag {
    pub name: String,
    pub description: String,
    pub operations: Vec<usize>,
}

/// Flat search record for substring search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchEntry {
    pub path: String,
    pub method: HttpMethod,
    pub summary: String,
    /// Lowercased `method path summary description`
    pub text: String,
}

/// A declared parameter after `$ref` resolution
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub description: String,
    pub param_type: String,
    pub format: Option<String>,
    pub default: Option<String>,
    pub example: Option<String>,
    pub enum_values: Option<Vec<String>>,
}

impl Parameter {
    /// Hint shown in an empty input
    pub fn placeholder(&self) -> &str {
        self.example
            .as_deref()
            .or(self.default.as_deref())
            .unwrap_or(&self.description)
    }
}

/// Request body as documented for one operation
#[derive(Clone, Debug, PartialEq)]
pub struct RequestBodySpec {
    pub content_type: String,
    pub required: bool,
    /// Whether the schema declares any structured fields
    pub has_schema: bool,
    pub rows: Vec<PropertyRow>,
    pub example: String,
}

/// One documented response
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseSpec {
    pub status: String,
    pub description: String,
    pub is_array: bool,
    pub rows: Vec<PropertyRow>,
}

/// Everything the documentation view shows for an operation
#[derive(Clone, Debug, PartialEq)]
pub struct OperationDoc {
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBodySpec>,
    pub responses: Vec<ResponseSpec>,
}

impl OperationDoc {
    pub fn build(operation: &Operation, resolver: &SchemaResolver<'_>) -> OperationDoc {
        OperationDoc {
            parameters: resolve_parameters(operation, resolver),
            request_body: resolve_request_body(operation, resolver),
            responses: resolve_responses(operation, resolver),
        }
    }
}

pub fn resolve_parameters(operation: &Operation, resolver: &SchemaResolver<'_>) -> Vec<Parameter> {
    operation
        .parameters
        .iter()
        .filter_map(|raw| resolve_parameter(raw, resolver))
        .collect()
}

fn resolve_parameter(raw: &Value, resolver: &SchemaResolver<'_>) -> Option<Parameter> {
    let param = resolver.resolve_ref(raw);
    let name = param.get("name")?.as_str()?.to_string();
    let location = ParameterLocation::parse(param.get("in")?.as_str()?)?;
    let schema = param.get("schema").map(|s| resolver.resolve_ref(s));
    let schema_str = |key: &str| {
        schema
            .and_then(|s| s.get(key))
            .and_then(Value::as_str)
            .map(String::from)
    };

    let param_type = match schema.map(SchemaKind::of) {
        Some(SchemaKind::Array(Some(items))) => {
            format!("array<{}>", resolver.kind(items).type_name())
        }
        _ => schema_str("type").unwrap_or_else(|| String::from("string")),
    };

    Some(Parameter {
        name,
        location,
        required: param.get("required").and_then(Value::as_bool).unwrap_or(false),
        description: param
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_string(),
        param_type,
        format: schema_str("format"),
        default: schema.and_then(|s| s.get("default")).map(display_value),
        example: schema
            .and_then(|s| s.get("example"))
            .or_else(|| param.get("example"))
            .map(display_value),
        enum_values: schema
            .and_then(|s| s.get("enum"))
            .and_then(Value::as_array)
            .map(|values| values.iter().map(display_value).collect()),
    })
}

pub fn resolve_request_body(
    operation: &Operation,
    resolver: &SchemaResolver<'_>,
) -> Option<RequestBodySpec> {
    let body = resolver.resolve_ref(operation.request_body.as_ref()?);
    let content = body.get("content").and_then(Value::as_object)?;
    let required = body.get("required").and_then(Value::as_bool).unwrap_or(false);

    if let Some(json) = content.get("application/json") {
        let schema = json.get("schema").map(|s| resolver.resolve_ref(s));
        let example = match (json.get("example"), schema) {
            (Some(example), _) => pretty_json(example),
            (None, Some(schema)) => resolver.example_body(schema),
            (None, None) => String::new(),
        };
        return Some(RequestBodySpec {
            content_type: String::from("application/json"),
            required,
            has_schema: schema.map(has_fields).unwrap_or(false),
            rows: schema
                .map(|s| resolver.flatten_properties(s, false, 0, ""))
                .unwrap_or_default(),
            example,
        });
    }

    let (content_type, media) = content.iter().next()?;
    let schema = media.get("schema").map(|s| resolver.resolve_ref(s));
    Some(RequestBodySpec {
        content_type: content_type.clone(),
        required,
        has_schema: schema.map(has_fields).unwrap_or(false),
        rows: schema
            .map(|s| resolver.flatten_properties(s, false, 0, ""))
            .unwrap_or_default(),
        example: String::new(),
    })
}

fn has_fields(schema: &Value) -> bool {
    SchemaKind::of(schema).properties().is_some()
}

pub fn resolve_responses(operation: &Operation, resolver: &SchemaResolver<'_>) -> Vec<ResponseSpec> {
    operation
        .responses
        .iter()
        .map(|(status, raw)| {
            let response = resolver.resolve_ref(raw);
            let schema = response
                .get("content")
                .and_then(|c| c.get("application/json"))
                .and_then(|json| json.get("schema"))
                .map(|s| resolver.resolve_ref(s));
            let is_array = matches!(schema.map(SchemaKind::of), Some(SchemaKind::Array(_)));
            ResponseSpec {
                status: status.clone(),
                description: response
                    .get("description")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string(),
                is_array,
                rows: schema
                    .map(|s| resolver.flatten_properties(s, true, 0, ""))
                    .unwrap_or_default(),
            }
        })
        .collect()
}
