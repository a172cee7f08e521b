//! Network actor - fetches documents and runs requests in the Tokio runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::{create_client, execute, fetch_document};

/// Network actor that processes document fetches and request executions
pub struct NetworkActor {
    client: reqwest::Client,
    timeout_secs: u64,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(response_tx: mpsc::UnboundedSender<NetworkResponse>, timeout_secs: u64) -> Self {
        NetworkActor {
            client: create_client(timeout_secs),
            timeout_secs,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::FetchDocument { generation, url }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let timeout_secs = self.timeout_secs;

                            self.active_requests.spawn(async move {
                                tracing::info!(generation, url = %url, "Fetching document");
                                let response = match fetch_document(&client, &url, timeout_secs).await {
                                    Ok(document) => NetworkResponse::DocumentLoaded { generation, document },
                                    Err(error) => NetworkResponse::DocumentFailed { generation, error },
                                };
                                let _ = response_tx.send(response);
                            });
                        }

                        Some(NetworkCommand::Execute { id, tab_id, request }) => {
                            let response_tx = self.response_tx.clone();
                            let client = self.client.clone();
                            let timeout_secs = self.timeout_secs;

                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %request.url, method = request.method.as_str(), "Executing request");
                                let result = execute(&client, &request, timeout_secs).await;
                                tracing::info!(id, status = %result.status_label(), elapsed_ms = result.elapsed_ms, "Request completed");
                                let _ = response_tx.send(NetworkResponse::Executed { id, tab_id, result });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Reap completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpMethod;
    use crate::request::BuiltRequest;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_actor_replies_with_tagged_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"paths":{}}"#, "application/json"))
            .mount(&server)
            .await;

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let actor = tokio::spawn(NetworkActor::new(resp_tx, 5).run(cmd_rx));

        cmd_tx
            .send(NetworkCommand::FetchDocument { generation: 3, url: format!("{}/doc.json", server.uri()) })
            .unwrap();
        match resp_rx.recv().await.unwrap() {
            NetworkResponse::DocumentLoaded { generation, .. } => assert_eq!(generation, 3),
            other => panic!("unexpected {:?}", other),
        }

        let request = BuiltRequest {
            method: HttpMethod::GET,
            url: server.uri(),
            headers: Vec::new(),
            body: None,
        };
        cmd_tx
            .send(NetworkCommand::Execute { id: 9, tab_id: "get:/".into(), request })
            .unwrap();
        match resp_rx.recv().await.unwrap() {
            NetworkResponse::Executed { id, tab_id, result } => {
                assert_eq!(id, 9);
                assert_eq!(tab_id, "get:/");
                assert_eq!(result.status_code(), Some(200));
            }
            other => panic!("unexpected {:?}", other),
        }

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        actor.await.unwrap();
    }
}
