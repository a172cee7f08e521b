use crate::request::BuiltRequest;

/// Format a built request as a copyable cURL command
pub fn to_curl(request: &BuiltRequest) -> String {
    let mut parts = vec![format!(
        "curl -X {} '{}'",
        request.method.as_str(),
        request.url
    )];

    for (name, value) in &request.headers {
        parts.push(format!("-H '{}: {}'", name, value));
    }

    if let Some(body) = &request.body {
        parts.push(format!("-d '{}'", body.replace('\'', "'\\''")));
    }

    parts.join(" \\\n  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_without_body() {
        let request = BuiltRequest {
            method: HttpMethod::GET,
            url: "http://localhost:8080/api/users/7".into(),
            headers: vec![("Accept".into(), "application/json".into())],
            body: None,
        };
        assert_eq!(
            to_curl(&request),
            "curl -X GET 'http://localhost:8080/api/users/7' \\\n  -H 'Accept: application/json'"
        );
    }

    #[test]
    fn test_body_quotes_are_escaped() {
        let request = BuiltRequest {
            method: HttpMethod::POST,
            url: "http://h/api/notes".into(),
            headers: vec![
                ("Accept".into(), "application/json".into()),
                ("Content-Type".into(), "application/json".into()),
            ],
            body: Some(r#"{"text":"it's"}"#.into()),
        };
        assert_eq!(
            to_curl(&request),
            "curl -X POST 'http://h/api/notes' \\\n  -H 'Accept: application/json' \\\n  -H 'Content-Type: application/json' \\\n  -d '{\"text\":\"it'\\''s\"}'"
        );
    }
}
