//! Location fragment routing: `#<METHOD><path>` deep links

use std::sync::OnceLock;

use regex::Regex;

use crate::models::HttpMethod;

/// Fragment for an operation: upper-case method glued to the path
pub fn route(method: HttpMethod, path: &str) -> String {
    format!("#{}{}", method.as_str(), path)
}

fn method_prefix() -> Option<&'static Regex> {
    static METHOD_PREFIX: OnceLock<Option<Regex>> = OnceLock::new();
    METHOD_PREFIX
        .get_or_init(|| Regex::new(r"(?i)^(GET|POST|PUT|DELETE|PATCH|OPTIONS|HEAD)").ok())
        .as_ref()
}

/// Split a fragment (with or without the leading `#`) into method and path.
/// Returns `None` for empty or malformed fragments.
pub fn parse_fragment(fragment: &str) -> Option<(HttpMethod, String)> {
    let content = fragment.strip_prefix('#').unwrap_or(fragment);
    if content.is_empty() {
        return None;
    }
    let token = method_prefix()?.find(content)?;
    let method = HttpMethod::parse(token.as_str())?;
    Some((method, content[token.end()..].to_string()))
}

/// Current location of the console.
///
/// In-app activations call [`Router::replace`], which only records the new
/// location. Externally supplied locations go through [`Router::navigate`],
/// whose result the caller dispatches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Router {
    location: String,
}

impl Router {
    pub fn new(initial: Option<String>) -> Self {
        Router {
            location: initial.unwrap_or_default(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn replace(&mut self, method: HttpMethod, path: &str) {
        self.location = route(method, path);
    }

    pub fn clear(&mut self) {
        self.location.clear();
    }

    /// Fragment-change event: record the location and return its target
    pub fn navigate(&mut self, fragment: &str) -> Option<(HttpMethod, String)> {
        let fragment = fragment.trim();
        self.location = if fragment.is_empty() || fragment.starts_with('#') {
            fragment.to_string()
        } else {
            format!("#{}", fragment)
        };
        self.target()
    }

    /// Operation the current location points at, if it parses
    pub fn target(&self) -> Option<(HttpMethod, String)> {
        parse_fragment(&self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_round_trip() {
        let paths = ["/api/users/{id}", "/", "/v1/orders/{orderId}/items", "/健康检查"];
        for method in HttpMethod::ALL {
            for path in paths {
                let fragment = route(method, path);
                assert_eq!(parse_fragment(&fragment), Some((method, path.to_string())));
            }
        }
    }

    #[test]
    fn test_route_format() {
        assert_eq!(route(HttpMethod::GET, "/api/users/{id}"), "#GET/api/users/{id}");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            parse_fragment("#delete/api/users/1"),
            Some((HttpMethod::DELETE, "/api/users/1".to_string()))
        );
        assert_eq!(
            parse_fragment("Patch/x"),
            Some((HttpMethod::PATCH, "/x".to_string()))
        );
    }

    #[test]
    fn test_malformed_fragments() {
        assert_eq!(parse_fragment(""), None);
        assert_eq!(parse_fragment("#"), None);
        assert_eq!(parse_fragment("#FETCH/api"), None);
        assert_eq!(parse_fragment("#/api/users"), None);
    }

    #[test]
    fn test_replace_and_navigate() {
        let mut router = Router::new(None);
        router.replace(HttpMethod::POST, "/api/users");
        assert_eq!(router.location(), "#POST/api/users");

        let target = router.navigate("GET/api/users/{id}");
        assert_eq!(router.location(), "#GET/api/users/{id}");
        assert_eq!(target, Some((HttpMethod::GET, "/api/users/{id}".to_string())));

        assert_eq!(router.navigate(""), None);
        assert_eq!(router.location(), "");
    }
}
