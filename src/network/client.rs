//! HTTP client wrapper - fetches documents, executes requests and formats responses

use std::time::{Duration, Instant};

use serde_json::Value;

use crate::curl::to_curl;
use crate::error::LoadError;
use crate::models::{ExecutionResult, Outcome};
use crate::request::BuiltRequest;
use crate::spec::schema::pretty_json;

/// Create an HTTP client with the configured timeout
pub fn create_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

fn transport_error(e: reqwest::Error, timeout_secs: u64) -> LoadError {
    if e.is_timeout() {
        LoadError::Timeout(timeout_secs)
    } else if e.is_connect() {
        LoadError::Connection(e.to_string())
    } else {
        LoadError::Transport(e.to_string())
    }
}

/// Fetch an OpenAPI document and decode it as JSON
pub async fn fetch_document(
    client: &reqwest::Client,
    url: &str,
    timeout_secs: u64,
) -> Result<Value, LoadError> {
    let url = reqwest::Url::parse(url).map_err(|e| LoadError::InvalidUrl(format!("{}: {}", url, e)))?;
    let resp = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| transport_error(e, timeout_secs))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status(status.as_u16()));
    }

    let text = resp.text().await.map_err(|e| transport_error(e, timeout_secs))?;
    let document: Value =
        serde_json::from_str(&text).map_err(|e| LoadError::Malformed(e.to_string()))?;
    if !document.is_object() {
        return Err(LoadError::Malformed(String::from("document is not a JSON object")));
    }
    Ok(document)
}

/// Execute a built request. Any received response is a success whatever its
/// status; transport and decoding failures come back as `Outcome::Failed`.
pub async fn execute(client: &reqwest::Client, request: &BuiltRequest, timeout_secs: u64) -> ExecutionResult {
    let curl = to_curl(request);
    let start = Instant::now();

    let mut req_builder = client.request(request.method.to_reqwest(), &request.url);
    for (name, value) in &request.headers {
        req_builder = req_builder.header(name, value);
    }
    if let Some(body) = &request.body {
        req_builder = req_builder.body(body.clone());
    }

    let result = match req_builder.send().await {
        Ok(resp) => read_response(resp, timeout_secs).await,
        Err(e) => Err(transport_error(e, timeout_secs)),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok((outcome, headers, body)) => ExecutionResult {
            outcome,
            elapsed_ms,
            headers,
            body,
            curl,
        },
        Err(e) => ExecutionResult {
            outcome: Outcome::Failed,
            elapsed_ms,
            headers: Vec::new(),
            body: e.to_string(),
            curl,
        },
    }
}

async fn read_response(
    resp: reqwest::Response,
    timeout_secs: u64,
) -> Result<(Outcome, Vec<(String, String)>, String), LoadError> {
    let status = resp.status();
    let headers: Vec<(String, String)> = resp
        .headers()
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();
    let is_json = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let text = resp.text().await.map_err(|e| transport_error(e, timeout_secs))?;
    let body = if is_json && !text.trim().is_empty() {
        let json: Value = serde_json::from_str(&text)
            .map_err(|e| LoadError::Transport(format!("Invalid JSON response: {}", e)))?;
        pretty_json(&json)
    } else {
        text
    };

    let outcome = Outcome::Status {
        code: status.as_u16(),
        text: status.canonical_reason().unwrap_or("").to_string(),
    };
    Ok((outcome, headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn get(url: String) -> BuiltRequest {
        BuiltRequest {
            method: HttpMethod::GET,
            url,
            headers: vec![("Accept".into(), "application/json".into())],
            body: None,
        }
    }

    #[tokio::test]
    async fn test_json_response_is_pretty_printed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users/7"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"a":1}"#, "application/json"))
            .mount(&server)
            .await;

        let result = execute(&create_client(5), &get(format!("{}/api/users/7", server.uri())), 5).await;
        assert_eq!(result.status_code(), Some(200));
        assert_eq!(result.status_label(), "200 OK");
        assert_eq!(result.body, "{\n  \"a\": 1\n}");
        assert!(result
            .headers
            .iter()
            .any(|(k, v)| k == "content-type" && v == "application/json"));
        assert!(result.curl.starts_with("curl -X GET '"));
    }

    #[tokio::test]
    async fn test_text_response_is_verbatim_and_errors_still_succeed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_raw("{\"a\":1}", "text/plain"))
            .mount(&server)
            .await;

        let result = execute(&create_client(5), &get(server.uri()), 5).await;
        assert_eq!(result.status_label(), "404 Not Found");
        assert_eq!(result.body, "{\"a\":1}");
    }

    #[tokio::test]
    async fn test_headers_and_body_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users"))
            .and(header("X-Tenant", "acme"))
            .and(body_string("{\"name\":\"a\"}"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let request = BuiltRequest {
            method: HttpMethod::POST,
            url: format!("{}/api/users", server.uri()),
            headers: vec![
                ("Accept".into(), "application/json".into()),
                ("X-Tenant".into(), "acme".into()),
                ("Content-Type".into(), "application/json".into()),
            ],
            body: Some("{\"name\":\"a\"}".into()),
        };
        let result = execute(&create_client(5), &request, 5).await;
        assert_eq!(result.status_code(), Some(201));
    }

    #[tokio::test]
    async fn test_connection_failure() {
        let result = execute(&create_client(5), &get("http://127.0.0.1:1/".into()), 5).await;
        assert_eq!(result.outcome, Outcome::Failed);
        assert_eq!(result.status_label(), "Error");
        assert!(result.headers.is_empty());
        assert!(result.body.starts_with("Connection failed"), "{}", result.body);
    }

    #[tokio::test]
    async fn test_invalid_json_counts_as_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("not json", "application/json"))
            .mount(&server)
            .await;

        let result = execute(&create_client(5), &get(server.uri()), 5).await;
        assert_eq!(result.outcome, Outcome::Failed);
        assert_eq!(result.status_label(), "Error");
        assert!(result.headers.is_empty());
        assert!(
            result.body.starts_with("Request failed: Invalid JSON response"),
            "{}",
            result.body
        );
    }

    #[tokio::test]
    async fn test_empty_json_body_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "application/json"))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204).insert_header("content-type", "application/json"))
            .mount(&server)
            .await;

        let client = create_client(5);
        let mut head = get(server.uri());
        head.method = HttpMethod::HEAD;
        let result = execute(&client, &head, 5).await;
        assert_eq!(result.status_code(), Some(200));
        assert_eq!(result.body, "");

        let mut delete = get(server.uri());
        delete.method = HttpMethod::DELETE;
        let result = execute(&client, &delete, 5).await;
        assert_eq!(result.status_label(), "204 No Content");
        assert_eq!(result.body, "");
    }

    #[tokio::test]
    async fn test_timeout_has_its_own_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let result = execute(&create_client(1), &get(server.uri()), 1).await;
        assert_eq!(result.outcome, Outcome::Failed);
        assert_eq!(result.body, "Request timed out (1s)");
    }

    #[tokio::test]
    async fn test_fetch_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/swagger/v1.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"paths":{}}"#, "application/json"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken.json"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
            .mount(&server)
            .await;

        let client = create_client(5);
        let doc = fetch_document(&client, &format!("{}/swagger/v1.json", server.uri()), 5)
            .await
            .unwrap();
        assert!(doc.get("paths").is_some());

        let missing = fetch_document(&client, &format!("{}/nope.json", server.uri()), 5).await;
        assert!(matches!(missing, Err(LoadError::Status(404))));

        let broken = fetch_document(&client, &format!("{}/broken.json", server.uri()), 5).await;
        assert!(matches!(broken, Err(LoadError::Malformed(_))));

        let invalid = fetch_document(&client, "not a url", 5).await;
        assert!(matches!(invalid, Err(LoadError::InvalidUrl(_))));
    }
}
