use serde::{Deserialize, Serialize};

/// HTTP method of an operation
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
}

impl HttpMethod {
    /// The seven methods an OpenAPI path item may declare, in scan order
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::DELETE,
        HttpMethod::PATCH,
        HttpMethod::OPTIONS,
        HttpMethod::HEAD,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }

    /// Key used for this method inside an OpenAPI path item
    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::GET => "get",
            HttpMethod::POST => "post",
            HttpMethod::PUT => "put",
            HttpMethod::DELETE => "delete",
            HttpMethod::PATCH => "patch",
            HttpMethod::OPTIONS => "options",
            HttpMethod::HEAD => "head",
        }
    }

    /// Case-insensitive parse
    pub fn parse(s: &str) -> Option<HttpMethod> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::DELETE => reqwest::Method::DELETE,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::OPTIONS => reqwest::Method::OPTIONS,
            HttpMethod::HEAD => reqwest::Method::HEAD,
        }
    }
}

/// Where a declared parameter travels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }

    pub fn parse(s: &str) -> Option<ParameterLocation> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

/// How a global parameter is attached to outgoing requests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalParamKind {
    #[default]
    Header,
    Query,
}

impl GlobalParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalParamKind::Header => "header",
            GlobalParamKind::Query => "query",
        }
    }

    pub fn toggle(&self) -> GlobalParamKind {
        match self {
            GlobalParamKind::Header => GlobalParamKind::Query,
            GlobalParamKind::Query => GlobalParamKind::Header,
        }
    }
}

/// User-defined header or query value applied to every request of a group
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalParam {
    pub name: String,
    pub value: String,
    pub kind: GlobalParamKind,
}

impl GlobalParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: GlobalParamKind) -> Self {
        GlobalParam {
            name: name.into(),
            value: value.into(),
            kind,
        }
    }
}

/// One selectable OpenAPI document source
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGroup {
    pub name: String,
    pub url: String,
}

impl DocumentGroup {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        DocumentGroup {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Color theme choice
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

impl Theme {
    /// A terminal has no system preference to follow, so `auto` renders dark.
    pub fn is_dark(&self) -> bool {
        !matches!(self, Theme::Light)
    }

    pub fn toggle(&self) -> Theme {
        if self.is_dark() {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// How an executed request ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A response arrived, whatever its status code
    Status { code: u16, text: String },
    /// Transport or body decoding failure
    Failed,
}

/// Captured result of one request execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionResult {
    pub outcome: Outcome,
    pub elapsed_ms: u64,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub curl: String,
}

impl ExecutionResult {
    pub fn status_label(&self) -> String {
        match &self.outcome {
            Outcome::Status { code, text } if text.is_empty() => code.to_string(),
            Outcome::Status { code, text } => format!("{} {}", code, text),
            Outcome::Failed => String::from("Error"),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.outcome {
            Outcome::Status { code, .. } => Some(code),
            Outcome::Failed => None,
        }
    }
}
