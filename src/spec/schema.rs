//! Schema resolution: `$ref` lookup, documentation rows and example synthesis
//!
//! Schema nodes stay borrowed `serde_json::Value`s from the loaded document;
//! [`SchemaKind`] classifies a node once so every consumer matches on the
//! same variants instead of probing for keys.

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

use crate::constants::{MAX_REF_HOPS, MAX_SCHEMA_DEPTH};

/// Shape of a schema node, decided by its `type` (or `$ref`) discriminant
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SchemaKind<'v> {
    /// A `$ref` pointer that has not been (or could not be) followed
    Reference(&'v str),
    /// `type: object`, or untyped with declared properties
    Object(Option<&'v Map<String, Value>>),
    Array(Option<&'v Value>),
    String,
    Number,
    Integer,
    Boolean,
    /// Anything else: untyped, unknown type names, non-object nodes
    Opaque(Option<&'v str>),
}

impl<'v> SchemaKind<'v> {
    pub fn of(node: &'v Value) -> SchemaKind<'v> {
        if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
            return SchemaKind::Reference(reference);
        }
        let properties = node.get("properties").and_then(Value::as_object);
        match node.get("type").and_then(Value::as_str) {
            Some("object") => SchemaKind::Object(properties),
            Some("array") => SchemaKind::Array(node.get("items")),
            Some("string") => SchemaKind::String,
            Some("number") => SchemaKind::Number,
            Some("integer") => SchemaKind::Integer,
            Some("boolean") => SchemaKind::Boolean,
            Some(other) => SchemaKind::Opaque(Some(other)),
            None if properties.is_some() => SchemaKind::Object(properties),
            None => SchemaKind::Opaque(None),
        }
    }

    /// Declared properties, if this is an object that has any
    pub fn properties(&self) -> Option<&'v Map<String, Value>> {
        match self {
            SchemaKind::Object(props) => *props,
            _ => None,
        }
    }

    /// Bare type name as documented
    pub fn type_name(&self) -> String {
        match self {
            SchemaKind::Reference(r) => ref_name(r).to_string(),
            SchemaKind::Object(_) => String::from("object"),
            SchemaKind::Array(_) => String::from("array"),
            SchemaKind::String => String::from("string"),
            SchemaKind::Number => String::from("number"),
            SchemaKind::Integer => String::from("integer"),
            SchemaKind::Boolean => String::from("boolean"),
            SchemaKind::Opaque(Some(t)) => t.to_string(),
            SchemaKind::Opaque(None) => String::from("object"),
        }
    }
}

/// Last segment of a reference, used to label references that do not resolve
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}

/// One documentation row produced by [`SchemaResolver::flatten_properties`]
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyRow {
    pub name: String,
    /// Dotted path from the root, `[]` marking array items
    pub key_path: String,
    pub depth: usize,
    pub type_label: String,
    pub required: bool,
    pub nullable: bool,
    /// Required marker in request context, nullable marker in response context
    pub marked: bool,
    pub description: String,
    pub enum_values: Vec<String>,
}

/// Resolves schemas against one loaded document
#[derive(Clone, Copy, Debug)]
pub struct SchemaResolver<'d> {
    document: &'d Value,
}

impl<'d> SchemaResolver<'d> {
    pub fn new(document: &'d Value) -> Self {
        SchemaResolver { document }
    }

    /// Follow `$ref` pointers through the document.
    ///
    /// Ref-free nodes come back untouched. A pointer whose path is missing
    /// returns the last node that did resolve, so a dangling reference stays
    /// an opaque reference node.
    pub fn resolve_ref<'a>(&self, node: &'a Value) -> &'a Value
    where
        'd: 'a,
    {
        let mut current = node;
        for _ in 0..MAX_REF_HOPS {
            let Some(reference) = current.get("$ref").and_then(Value::as_str) else {
                return current;
            };
            match self.lookup(reference) {
                Some(target) => current = target,
                None => return current,
            }
        }
        current
    }

    fn lookup(&self, reference: &str) -> Option<&'d Value> {
        let pointer = reference.strip_prefix('#')?;
        let pointer = pointer.strip_prefix('/').unwrap_or(pointer);
        let mut current = self.document;
        if pointer.is_empty() {
            return Some(current);
        }
        for segment in pointer.split('/') {
            let key = decode_pointer_segment(segment);
            current = match current {
                Value::Object(map) => map.get(&key)?,
                Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
                _ => return None,
            };
            if current.is_null() {
                return None;
            }
        }
        Some(current)
    }

    /// Resolve then classify
    pub fn kind<'a>(&self, node: &'a Value) -> SchemaKind<'a>
    where
        'd: 'a,
    {
        SchemaKind::of(self.resolve_ref(node))
    }

    /// Display label: `type (format)`, or `array<itemType>` for arrays
    pub fn type_label(&self, node: &Value) -> String {
        let resolved = self.resolve_ref(node);
        match SchemaKind::of(resolved) {
            SchemaKind::Array(Some(items)) => {
                format!("array<{}>", self.kind(items).type_name())
            }
            kind => {
                let mut label = kind.type_name();
                if let Some(format) = resolved.get("format").and_then(Value::as_str) {
                    label.push_str(&format!(" ({})", format));
                }
                label
            }
        }
    }

    /// Flatten an object schema (or an array of objects) into documentation rows.
    ///
    /// Properties keep the document's declared order. Nested objects and
    /// arrays of objects are expanded below their parent until `depth`
    /// reaches [`MAX_SCHEMA_DEPTH`].
    pub fn flatten_properties(
        &self,
        schema: &Value,
        is_response: bool,
        depth: usize,
        parent_key: &str,
    ) -> Vec<PropertyRow> {
        let mut rows = Vec::new();
        self.flatten_into(&mut rows, schema, is_response, depth, parent_key);
        rows
    }

    fn flatten_into(
        &self,
        rows: &mut Vec<PropertyRow>,
        schema: &Value,
        is_response: bool,
        depth: usize,
        parent_key: &str,
    ) {
        let mut target = self.resolve_ref(schema);
        if let SchemaKind::Array(Some(items)) = SchemaKind::of(target) {
            target = self.resolve_ref(items);
        }
        let Some(properties) = SchemaKind::of(target).properties() else {
            return;
        };
        let required: Vec<&str> = target
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        for (name, prop) in properties {
            let resolved = self.resolve_ref(prop);
            let key_path = if parent_key.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", parent_key, name)
            };
            let is_required = required.contains(&name.as_str());
            let nullable = resolved.get("nullable").and_then(Value::as_bool) == Some(true);
            let description = resolved
                .get("description")
                .or_else(|| resolved.get("title"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            let enum_values = resolved
                .get("enum")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(display_value).collect())
                .unwrap_or_default();

            rows.push(PropertyRow {
                name: name.clone(),
                key_path: key_path.clone(),
                depth,
                type_label: self.type_label(resolved),
                required: is_required,
                nullable,
                marked: if is_response { nullable } else { is_required },
                description,
                enum_values,
            });

            if depth >= MAX_SCHEMA_DEPTH {
                continue;
            }
            match SchemaKind::of(resolved) {
                SchemaKind::Object(Some(_)) => {
                    self.flatten_into(rows, resolved, is_response, depth + 1, &key_path);
                }
                SchemaKind::Array(Some(items)) => {
                    let item = self.resolve_ref(items);
                    if matches!(SchemaKind::of(item), SchemaKind::Object(Some(_))) {
                        let item_key = format!("{}[]", key_path);
                        self.flatten_into(rows, item, is_response, depth + 1, &item_key);
                    }
                }
                _ => {}
            }
        }
    }

    /// Example value for a schema: explicit example, else default, else a
    /// value built from declared properties, else a zero value for the type.
    pub fn synthesize_example(&self, schema: &Value) -> Value {
        self.synthesize_at(schema, 0)
    }

    fn synthesize_at(&self, schema: &Value, depth: usize) -> Value {
        let resolved = self.resolve_ref(schema);
        if let Some(example) = resolved.get("example") {
            return example.clone();
        }
        if let Some(default) = resolved.get("default") {
            return default.clone();
        }
        match SchemaKind::of(resolved) {
            SchemaKind::Object(Some(properties)) if depth < MAX_SCHEMA_DEPTH => {
                let object = properties
                    .iter()
                    .map(|(name, prop)| (name.clone(), self.synthesize_at(prop, depth + 1)))
                    .collect::<Map<String, Value>>();
                Value::Object(object)
            }
            SchemaKind::Object(_) => Value::Object(Map::new()),
            SchemaKind::Array(_) => Value::Array(Vec::new()),
            SchemaKind::String => {
                if resolved.get("format").and_then(Value::as_str) == Some("date-time") {
                    Value::String(
                        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                    )
                } else {
                    Value::String(String::new())
                }
            }
            SchemaKind::Number | SchemaKind::Integer => Value::from(0),
            SchemaKind::Boolean => Value::Bool(false),
            SchemaKind::Reference(_) | SchemaKind::Opaque(_) => Value::Null,
        }
    }

    /// Text seeded into the body editor for a request schema.
    ///
    /// String examples are used verbatim; objects (and arrays of objects)
    /// are pretty-printed; anything else yields an empty editor.
    pub fn example_body(&self, schema: &Value) -> String {
        let resolved = self.resolve_ref(schema);
        if let Some(example) = resolved.get("example") {
            return match example {
                Value::String(s) => s.clone(),
                other => pretty_json(other),
            };
        }
        match SchemaKind::of(resolved) {
            SchemaKind::Object(Some(_)) => pretty_json(&self.synthesize_example(resolved)),
            SchemaKind::Array(Some(items))
                if matches!(self.kind(items), SchemaKind::Object(Some(_))) =>
            {
                pretty_json(&Value::Array(vec![self.synthesize_at(items, 1)]))
            }
            _ => String::new(),
        }
    }
}

/// Two-space indented JSON
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render a JSON scalar the way documentation shows it (strings unquoted)
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "components": {
                "schemas": {
                    "User": {
                        "type": "object",
                        "required": ["id", "name"],
                        "properties": {
                            "id": {"type": "integer", "format": "int64"},
                            "name": {"type": "string", "description": "Display name"},
                            "email": {"type": "string", "nullable": true},
                            "role": {"type": "string", "enum": ["admin", "user"]},
                            "address": {"$ref": "#/components/schemas/Address"},
                            "tags": {"type": "array", "items": {"type": "string"}},
                            "friends": {"type": "array", "items": {"$ref": "#/components/schemas/User"}}
                        }
                    },
                    "Address": {
                        "type": "object",
                        "properties": {
                            "city": {"type": "string"},
                            "zip": {"type": "string", "example": "10001"}
                        }
                    },
                    "Alias": {"$ref": "#/components/schemas/Address"},
                    "a/b": {"type": "boolean"}
                }
            }
        })
    }

    #[test]
    fn test_resolve_ref_follows_pointer() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let node = json!({"$ref": "#/components/schemas/Address"});
        let resolved = resolver.resolve_ref(&node);
        assert_eq!(resolved, &doc["components"]["schemas"]["Address"]);
    }

    #[test]
    fn test_resolve_ref_is_idempotent_on_plain_nodes() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let node = json!({"type": "string"});
        assert_eq!(resolver.resolve_ref(&node), &node);
        let once = resolver.resolve_ref(&doc["components"]["schemas"]["Alias"]);
        assert_eq!(resolver.resolve_ref(once), once);
    }

    #[test]
    fn test_dangling_ref_returns_original_node() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let node = json!({"$ref": "#/components/schemas/Missing"});
        assert_eq!(resolver.resolve_ref(&node), &node);
        assert_eq!(resolver.type_label(&node), "Missing");
        let external = json!({"$ref": "other.json#/User"});
        assert_eq!(resolver.resolve_ref(&external), &external);
    }

    #[test]
    fn test_ref_chain_and_escaped_segments() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let alias = json!({"$ref": "#/components/schemas/Alias"});
        assert_eq!(
            resolver.resolve_ref(&alias),
            &doc["components"]["schemas"]["Address"]
        );
        let escaped = json!({"$ref": "#/components/schemas/a~1b"});
        assert_eq!(resolver.resolve_ref(&escaped), &json!({"type": "boolean"}));
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(SchemaKind::of(&json!({"type": "integer"})), SchemaKind::Integer);
        assert_eq!(SchemaKind::of(&json!({"$ref": "#/x"})), SchemaKind::Reference("#/x"));
        assert_eq!(SchemaKind::of(&json!({})), SchemaKind::Opaque(None));
        assert!(SchemaKind::of(&json!({"properties": {"a": {}}})).properties().is_some());
    }

    #[test]
    fn test_flatten_request_rows() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let schema = json!({"$ref": "#/components/schemas/User"});
        let rows = resolver.flatten_properties(&schema, false, 0, "");

        let keys: Vec<&str> = rows.iter().map(|r| r.key_path.as_str()).collect();
        assert_eq!(
            &keys[..9],
            &[
                "id",
                "name",
                "email",
                "role",
                "address",
                "address.city",
                "address.zip",
                "tags",
                "friends",
            ]
        );
        assert_eq!(rows[0].type_label, "integer (int64)");
        assert!(rows[0].marked);
        assert!(!rows[2].marked);
        assert_eq!(rows[1].description, "Display name");
        assert_eq!(rows[3].enum_values, vec!["admin", "user"]);
        assert_eq!(rows[7].type_label, "array<string>");
        assert_eq!(rows[8].type_label, "array<object>");
        assert_eq!(rows[9].key_path, "friends[].id");
        assert_eq!(rows[9].depth, 1);
    }

    #[test]
    fn test_flatten_response_marks_nullable() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let schema = json!({"type": "array", "items": {"$ref": "#/components/schemas/User"}});
        let rows = resolver.flatten_properties(&schema, true, 0, "");
        let email = rows.iter().find(|r| r.key_path == "email").unwrap();
        assert!(email.marked);
        let id = rows.iter().find(|r| r.key_path == "id").unwrap();
        assert!(!id.marked);
    }

    #[test]
    fn test_self_reference_is_depth_bounded() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let schema = json!({"$ref": "#/components/schemas/User"});
        let rows = resolver.flatten_properties(&schema, false, 0, "");
        assert!(rows.iter().all(|r| r.depth <= MAX_SCHEMA_DEPTH));
        assert!(rows.iter().any(|r| r.key_path == "friends[].friends[].friends[].id"));
        assert!(!rows.iter().any(|r| r.key_path.starts_with("friends[].friends[].friends[].friends[]")));
    }

    #[test]
    fn test_synthesize_example() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let value = resolver.synthesize_example(&json!({"$ref": "#/components/schemas/User"}));
        assert_eq!(value["id"], json!(0));
        assert_eq!(value["name"], json!(""));
        assert_eq!(value["address"], json!({"city": "", "zip": "10001"}));
        assert_eq!(value["tags"], json!([]));

        let explicit = json!({"type": "object", "example": {"a": 1}});
        assert_eq!(resolver.synthesize_example(&explicit), json!({"a": 1}));
        assert_eq!(resolver.synthesize_example(&json!({"type": "boolean"})), json!(false));
        assert_eq!(resolver.synthesize_example(&json!({"type": "integer", "default": 5})), json!(5));
        assert_eq!(resolver.synthesize_example(&json!({})), Value::Null);
    }

    #[test]
    fn test_date_time_example_is_iso() {
        let doc = json!({});
        let resolver = SchemaResolver::new(&doc);
        let value = resolver.synthesize_example(&json!({"type": "string", "format": "date-time"}));
        let text = value.as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(text).is_ok());
    }

    #[test]
    fn test_example_body() {
        let doc = document();
        let resolver = SchemaResolver::new(&doc);
        let body = resolver.example_body(&json!({"$ref": "#/components/schemas/Address"}));
        assert_eq!(body, "{\n  \"city\": \"\",\n  \"zip\": \"10001\"\n}");
        assert_eq!(resolver.example_body(&json!({"type": "string", "example": "raw"})), "raw");
        assert_eq!(resolver.example_body(&json!({"type": "integer"})), "");
    }
}
