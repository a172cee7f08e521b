//! Turns an operation plus user input into a concrete HTTP request

use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

use crate::models::{GlobalParam, GlobalParamKind, HttpMethod, ParameterLocation};
use crate::spec::{Operation, Parameter};

/// Characters `encodeURIComponent` leaves alone
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A fully resolved request, ready to send or to render as a shell command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl BuiltRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Values collected from a tab's debug form
#[derive(Clone, Copy, Debug)]
pub struct RequestInputs<'a> {
    pub parameters: &'a [Parameter],
    /// Index-aligned with `parameters`
    pub values: &'a [String],
    /// Global parameter inputs shown in the form; empty when it shows none
    pub live_globals: &'a [GlobalParam],
    pub stored_globals: &'a [GlobalParam],
    pub globals_enabled: bool,
    pub body: &'a str,
}

#[derive(Clone, Debug)]
pub struct RequestBuilder {
    origin: Url,
    bearer: Option<String>,
}

impl RequestBuilder {
    pub fn new(origin: &str, bearer: Option<&str>) -> Result<Self> {
        let origin = Url::parse(origin).with_context(|| format!("invalid origin {}", origin))?;
        Ok(RequestBuilder {
            origin,
            bearer: bearer.map(String::from),
        })
    }

    pub fn build(&self, operation: &Operation, inputs: &RequestInputs<'_>) -> Result<BuiltRequest> {
        let filled = || {
            inputs
                .parameters
                .iter()
                .zip(inputs.values)
                .map(|(param, value)| (param, value.trim()))
                .filter(|(_, value)| !value.is_empty())
        };

        let mut path = operation.path.clone();
        for (param, value) in filled().filter(|(p, _)| p.location == ParameterLocation::Path) {
            let token = format!("{{{}}}", param.name);
            let encoded = utf8_percent_encode(value, COMPONENT).to_string();
            path = path.replacen(&token, &encoded, 1);
        }
        let mut url = self
            .origin
            .join(&path)
            .with_context(|| format!("invalid request path {}", path))?;

        let mut headers = vec![(String::from("Accept"), String::from("application/json"))];
        if let Some(token) = &self.bearer {
            set_header(&mut headers, "Authorization", &format!("Bearer {}", token));
        }
        let mut query: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        if inputs.globals_enabled {
            if inputs.live_globals.is_empty() {
                for param in inputs.stored_globals {
                    apply_global(&mut headers, &mut query, param, &param.value);
                }
            } else {
                for param in inputs.live_globals {
                    let value = param.value.trim();
                    if !value.is_empty() {
                        apply_global(&mut headers, &mut query, param, value);
                    }
                }
            }
        }

        for (param, value) in filled() {
            match param.location {
                ParameterLocation::Query => set_pair(&mut query, &param.name, value),
                ParameterLocation::Header => set_header(&mut headers, &param.name, value),
                ParameterLocation::Path | ParameterLocation::Cookie => {}
            }
        }

        if query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&query);
        }

        let body = inputs.body.trim();
        let body = if body.is_empty() {
            None
        } else {
            set_header(&mut headers, "Content-Type", "application/json");
            Some(body.to_string())
        };

        Ok(BuiltRequest {
            method: operation.method,
            url: url.to_string(),
            headers,
            body,
        })
    }
}

fn apply_global(
    headers: &mut Vec<(String, String)>,
    query: &mut Vec<(String, String)>,
    param: &GlobalParam,
    value: &str,
) {
    match param.kind {
        GlobalParamKind::Header => set_header(headers, &param.name, value),
        GlobalParamKind::Query => set_pair(query, &param.name, value),
    }
}

/// Set a header, replacing any existing one of the same name
fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: &str) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(existing) => existing.1 = value.to_string(),
        None => headers.push((name.to_string(), value.to_string())),
    }
}

/// Query `set` semantics: the first entry keeps its position, duplicates go
fn set_pair(pairs: &mut Vec<(String, String)>, name: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == name) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut i = 0;
            pairs.retain(|(k, _)| {
                let keep = k != name || i == first;
                i += 1;
                keep
            });
        }
        None => pairs.push((name.to_string(), value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SpecIndex;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn index() -> SpecIndex {
        SpecIndex::parse(json!({
            "paths": {
                "/api/users/{id}": {
                    "get": {
                        "tags": ["用户管理"],
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}},
                            {"name": "page", "in": "query"},
                            {"name": "X-Tenant", "in": "header"}
                        ]
                    }
                }
            }
        }))
    }

    fn params(index: &SpecIndex) -> Vec<Parameter> {
        crate::spec::operation::resolve_parameters(&index.operations[0], &index.resolver())
    }

    fn inputs<'a>(
        parameters: &'a [Parameter],
        values: &'a [String],
        live: &'a [GlobalParam],
        stored: &'a [GlobalParam],
        enabled: bool,
        body: &'a str,
    ) -> RequestInputs<'a> {
        RequestInputs {
            parameters,
            values,
            live_globals: live,
            stored_globals: stored,
            globals_enabled: enabled,
            body,
        }
    }

    #[test]
    fn test_path_param_only() {
        let index = index();
        let parameters = params(&index);
        let values = vec!["7".to_string(), String::new(), String::new()];
        let stored = [GlobalParam::new("X-Global", "1", GlobalParamKind::Header)];
        let builder = RequestBuilder::new("http://localhost:8080", None).unwrap();

        let built = builder
            .build(&index.operations[0], &inputs(&parameters, &values, &[], &stored, false, ""))
            .unwrap();
        assert_eq!(built.url, "http://localhost:8080/api/users/7");
        assert_eq!(
            built.headers,
            vec![("Accept".to_string(), "application/json".to_string())]
        );
        assert_eq!(built.body, None);
    }

    #[test]
    fn test_declared_params_override_globals() {
        let index = index();
        let parameters = params(&index);
        let values = vec!["a b/c".to_string(), "2".to_string(), "acme".to_string()];
        let stored = [
            GlobalParam::new("page", "1", GlobalParamKind::Query),
            GlobalParam::new("X-Tenant", "global", GlobalParamKind::Header),
            GlobalParam::new("lang", "zh", GlobalParamKind::Query),
        ];
        let builder = RequestBuilder::new("http://localhost:8080", Some("tok")).unwrap();

        let built = builder
            .build(
                &index.operations[0],
                &inputs(&parameters, &values, &[], &stored, true, " {\"a\":1} "),
            )
            .unwrap();
        assert_eq!(built.url, "http://localhost:8080/api/users/a%20b%2Fc?page=2&lang=zh");
        assert_eq!(built.header("Authorization"), Some("Bearer tok"));
        assert_eq!(built.header("X-Tenant"), Some("acme"));
        assert_eq!(built.header("Content-Type"), Some("application/json"));
        assert_eq!(built.body.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_live_globals_win_over_stored() {
        let index = index();
        let parameters = params(&index);
        let values = vec![String::new(); 3];
        let stored = [
            GlobalParam::new("X-Tenant", "stored", GlobalParamKind::Header),
            GlobalParam::new("lang", "zh", GlobalParamKind::Query),
        ];
        let live = [
            GlobalParam::new("X-Tenant", "edited", GlobalParamKind::Header),
            GlobalParam::new("lang", "  ", GlobalParamKind::Query),
        ];
        let builder = RequestBuilder::new("http://localhost:8080", None).unwrap();

        let built = builder
            .build(&index.operations[0], &inputs(&parameters, &values, &live, &stored, true, ""))
            .unwrap();
        assert_eq!(built.header("X-Tenant"), Some("edited"));
        // blank live inputs are skipped rather than falling back
        assert_eq!(built.url, "http://localhost:8080/api/users/%7Bid%7D");
    }

    #[test]
    fn test_set_pair_semantics() {
        let mut pairs = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "3".to_string()),
        ];
        set_pair(&mut pairs, "a", "9");
        assert_eq!(
            pairs,
            vec![("a".to_string(), "9".to_string()), ("b".to_string(), "2".to_string())]
        );
    }
}
