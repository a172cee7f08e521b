//! Document ingestion: operations, tag groups and the search index

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::constants::DEFAULT_TAG;
use crate::models::HttpMethod;
use crate::spec::operation::{Operation, SearchEntry, Tag};
use crate::spec::schema::SchemaResolver;

/// Parsed view of one OpenAPI document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpecIndex {
    pub document: Arc<Value>,
    pub title: Option<String>,
    pub version: Option<String>,
    pub operations: Vec<Arc<Operation>>,
    pub tags: Vec<Tag>,
    pub search_index: Vec<SearchEntry>,
}

/// Per-method operation counts shown on the overview
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MethodCounts {
    pub total: usize,
    pub get: usize,
    pub post: usize,
    pub put: usize,
    pub delete: usize,
    pub other: usize,
}

impl SpecIndex {
    /// Build a fresh index from a document. Pure: the same document always
    /// yields the same operations, tags and search entries.
    pub fn parse(document: Value) -> SpecIndex {
        let document = Arc::new(document);
        let mut operations = Vec::new();
        let mut search_index = Vec::new();
        let mut tag_map: IndexMap<String, Vec<usize>> = IndexMap::new();

        if let Some(paths) = document.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths {
                let path_params = path_item
                    .get("parameters")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();

                for method in HttpMethod::ALL {
                    let Some(raw) = path_item.get(method.as_lower()).filter(|v| v.is_object())
                    else {
                        continue;
                    };
                    let operation = build_operation(&document, path, method, raw, &path_params);
                    let index = operations.len();

                    search_index.push(SearchEntry {
                        path: path.clone(),
                        method,
                        summary: operation.summary.clone(),
                        text: format!(
                            "{} {} {} {}",
                            method.as_lower(),
                            path,
                            operation.summary,
                            operation.description
                        )
                        .to_lowercase(),
                    });
                    for tag in &operation.tags {
                        tag_map.entry(tag.clone()).or_default().push(index);
                    }
                    operations.push(Arc::new(operation));
                }
            }
        }

        let tags = tag_map
            .into_iter()
            .map(|(name, ops)| Tag {
                description: tag_description(&document, &name),
                name,
                operations: ops,
            })
            .collect();

        let info = document.get("info");
        let info_str = |key: &str| {
            info.and_then(|i| i.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };

        SpecIndex {
            title: info_str("title"),
            version: info_str("version"),
            document: Arc::clone(&document),
            operations,
            tags,
            search_index,
        }
    }

    pub fn resolver(&self) -> SchemaResolver<'_> {
        SchemaResolver::new(&self.document)
    }

    pub fn find(&self, method: HttpMethod, path: &str) -> Option<&Arc<Operation>> {
        self.operations.iter().find(|op| op.is(method, path))
    }

    pub fn tag_operations<'a>(&'a self, tag: &'a Tag) -> impl Iterator<Item = &'a Arc<Operation>> {
        tag.operations.iter().filter_map(|&i| self.operations.get(i))
    }

    pub fn method_counts(&self) -> MethodCounts {
        let mut counts = MethodCounts {
            total: self.operations.len(),
            ..MethodCounts::default()
        };
        for op in &self.operations {
            match op.method {
                HttpMethod::GET => counts.get += 1,
                HttpMethod::POST => counts.post += 1,
                HttpMethod::PUT => counts.put += 1,
                HttpMethod::DELETE => counts.delete += 1,
                _ => counts.other += 1,
            }
        }
        counts
    }
}

fn build_operation(
    document: &Value,
    path: &str,
    method: HttpMethod,
    raw: &Value,
    path_params: &[Value],
) -> Operation {
    let text = |key: &str| raw.get(key).and_then(Value::as_str).unwrap_or("").to_string();

    let mut tags: Vec<String> = Vec::new();
    if let Some(declared) = raw.get("tags").and_then(Value::as_array) {
        for tag in declared.iter().filter_map(Value::as_str) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
    }
    if tags.is_empty() {
        tags.push(String::from(DEFAULT_TAG));
    }

    let mut parameters: Vec<Value> = raw
        .get("parameters")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    // Path-level parameters apply unless the operation redeclares them
    let resolver = SchemaResolver::new(document);
    let identity = |p: &Value| {
        let p = resolver.resolve_ref(p);
        (
            p.get("name").and_then(Value::as_str).map(String::from),
            p.get("in").and_then(Value::as_str).map(String::from),
        )
    };
    let declared: Vec<_> = parameters.iter().map(identity).collect();
    for param in path_params {
        if !declared.contains(&identity(param)) {
            parameters.push(param.clone());
        }
    }

    let operation_id = raw
        .get("operationId")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| format!("{}_{}", method.as_lower(), path));

    let responses = raw
        .get("responses")
        .and_then(Value::as_object)
        .map(|r| r.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default();

    Operation {
        path: path.to_string(),
        method,
        operation_id,
        summary: text("summary"),
        description: text("description"),
        tags,
        deprecated: raw.get("deprecated").and_then(Value::as_bool).unwrap_or(false),
        parameters,
        request_body: raw.get("requestBody").cloned(),
        responses,
    }
}

fn tag_description(document: &Value, name: &str) -> String {
    document
        .get("tags")
        .and_then(Value::as_array)
        .and_then(|tags| {
            tags.iter()
                .find(|t| t.get("name").and_then(Value::as_str) == Some(name))
        })
        .and_then(|t| t.get("description"))
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn users_document() -> Value {
        json!({
            "openapi": "3.0.1",
            "info": {"title": "Users", "version": "v1"},
            "tags": [{"name": "用户管理", "description": "User management"}],
            "paths": {
                "/api/users/{id}": {
                    "get": {
                        "tags": ["用户管理"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}}
                        ],
                        "responses": {"200": {"description": "OK"}}
                    }
                }
            }
        })
    }

    #[test]
    fn test_single_operation_document() {
        let index = SpecIndex::parse(users_document());
        assert_eq!(index.operations.len(), 1);
        assert_eq!(index.tags.len(), 1);
        assert_eq!(index.tags[0].name, "用户管理");
        assert_eq!(index.tags[0].description, "User management");
        assert_eq!(index.tags[0].operations, vec![0]);
        assert_eq!(index.search_index.len(), 1);
        assert!(index.search_index[0].text.contains("get /api/users/{id}"));
        assert_eq!(index.operations[0].operation_id, "get_/api/users/{id}");
        assert_eq!(index.title.as_deref(), Some("Users"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let first = SpecIndex::parse(users_document());
        let second = SpecIndex::parse(users_document());
        assert_eq!(first.operations, second.operations);
        assert_eq!(first.tags, second.tags);
        assert_eq!(first.search_index, second.search_index);
    }

    #[test]
    fn test_defaults_and_multi_tag_grouping() {
        let index = SpecIndex::parse(json!({
            "paths": {
                "/b": {
                    "post": {"tags": ["beta", "alpha"], "summary": "Create B", "description": "Makes a B"},
                    "get": {},
                    "parameters": [],
                    "x-extension": {"get": {}}
                },
                "/a": {
                    "delete": {"tags": ["alpha"], "deprecated": true}
                }
            }
        }));

        // method scan order within a path: get, post, put, delete, patch, options, head
        let ids: Vec<_> = index
            .operations
            .iter()
            .map(|op| (op.method, op.path.as_str()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (HttpMethod::GET, "/b"),
                (HttpMethod::POST, "/b"),
                (HttpMethod::DELETE, "/a"),
            ]
        );

        let names: Vec<_> = index.tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["default", "beta", "alpha"]);
        assert_eq!(index.tags[2].operations, vec![1, 2]);
        assert!(index.operations[2].deprecated);
        assert_eq!(index.search_index[1].text, "post /b create b makes a b");

        let counts = index.method_counts();
        assert_eq!((counts.total, counts.get, counts.post, counts.delete), (3, 1, 1, 1));
    }

    #[test]
    fn test_path_level_parameters_merge() {
        let index = SpecIndex::parse(json!({
            "paths": {
                "/orgs/{org}/repos": {
                    "parameters": [
                        {"name": "org", "in": "path", "required": true},
                        {"name": "page", "in": "query"}
                    ],
                    "get": {
                        "parameters": [{"name": "page", "in": "query", "description": "override"}]
                    }
                }
            }
        }));
        let op = &index.operations[0];
        assert_eq!(op.parameters.len(), 2);
        assert_eq!(op.parameters[0]["description"], "override");
        assert_eq!(op.parameters[1]["name"], "org");
    }

    #[test]
    fn test_find_and_empty_document() {
        let index = SpecIndex::parse(users_document());
        assert!(index.find(HttpMethod::GET, "/api/users/{id}").is_some());
        assert!(index.find(HttpMethod::POST, "/api/users/{id}").is_none());

        let empty = SpecIndex::parse(json!({}));
        assert!(empty.operations.is_empty());
        assert!(empty.tags.is_empty());
    }
}
