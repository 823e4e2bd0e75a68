//! Client for the remote task API.
//!
//! The API is a plain REST resource: `GET <base>` lists tasks, `POST <base>`
//! creates one and returns it with its assigned id, `DELETE <base>/<id>`
//! removes one. Requests are never retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::task::{Task, TaskId};

pub const DEFAULT_API_URL: &str =
    "https://106api-b0bnggbsgnezbzcz.westus3-01.azurewebsites.net/api/tasks";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Failures talking to the task API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid api url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned {status}")]
    Status {
        method: &'static str,
        url: String,
        status: StatusCode,
    },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("created task has no id")]
    MissingId,
    #[error("{0}")]
    Other(String),
}

/// Operations the board needs from a task store.
#[async_trait]
pub trait TaskApi {
    async fn list(&self) -> Result<Vec<Task>, ApiError>;
    async fn create(&self, task: &Task) -> Result<Task, ApiError>;
    async fn delete(&self, id: &TaskId) -> Result<(), ApiError>;
}

/// Task API reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: Client,
    base: Url,
}

/// Decode list records one by one.
///
/// The task resource is shared, so records written by other clients may not
/// fit `Task`; those are skipped rather than failing the whole list.
pub fn decode_tasks(records: Vec<Value>) -> Vec<Task> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<Task>(record) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(index, error = %e, "skipping malformed task record");
                None
            }
        })
        .collect()
}

impl HttpTaskApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Other(format!("building http client: {e}")))?;
        Self::with_client(base_url, client)
    }

    fn with_client(base_url: &str, client: Client) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim_end_matches('/')).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "not a base url".to_string(),
            });
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn item_url(&self, id: &TaskId) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url
    }

    /// Issue a plain `GET <base>` to check the API is reachable.
    #[instrument(name = "api_ping", skip(self), fields(url = %self.base))]
    pub async fn ping(&self) -> Result<StatusCode, ApiError> {
        let url = self.base.to_string();
        let resp = self
            .client
            .get(self.base.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status { method: "GET", url, status });
        }
        Ok(status)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    #[instrument(name = "api_list", skip(self), fields(url = %self.base))]
    async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let url = self.base.to_string();
        let resp = self
            .client
            .get(self.base.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { method: "GET", url, status: resp.status() });
        }
        let records: Vec<Value> = resp
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        let tasks = decode_tasks(records);
        debug!(count = tasks.len(), "tasks retrieved");
        Ok(tasks)
    }

    #[instrument(name = "api_create", skip(self, task), fields(url = %self.base))]
    async fn create(&self, task: &Task) -> Result<Task, ApiError> {
        let url = self.base.to_string();
        debug!(?task, "posting task");
        let resp = self
            .client
            .post(self.base.clone())
            .json(task)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { method: "POST", url, status: resp.status() });
        }
        let created: Task = resp
            .json()
            .await
            .map_err(|source| ApiError::Decode { url, source })?;
        if created.id.is_none() {
            return Err(ApiError::MissingId);
        }
        Ok(created)
    }

    #[instrument(name = "api_delete", skip(self, id), fields(url = %self.base, id = %id))]
    async fn delete(&self, id: &TaskId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        let url_text = url.to_string();
        let resp = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url_text.clone(), source })?;
        if !resp.status().is_success() {
            return Err(ApiError::Status { method: "DELETE", url: url_text, status: resp.status() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const GOOD_RECORD: &str = r##"{"id":1,"title":"Buy milk","description":"Get milk from the store","color":"#00b4d8","date":"2030-01-05T09:30","status":"new","budget":9.5,"name":"Robert"}"##;

    fn response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let body_len = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + body_len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    /// Serve one canned response on a local port; the handle yields the raw request.
    async fn serve_once(reply: String) -> (HttpTaskApi, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let api = HttpTaskApi::with_client(&format!("http://{addr}/api/tasks"), client).unwrap();
        (api, handle)
    }

    #[tokio::test]
    async fn test_list_decodes_array_and_skips_malformed_records() {
        let body = format!(
            r#"[{GOOD_RECORD},{{"id":2,"title":"Other","description":"Someone else's","date":null,"budget":null,"name":"Alice"}}]"#
        );
        let (api, server) = serve_once(response("200 OK", &body)).await;

        let tasks = api.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, Some(TaskId::from("1")));
        assert_eq!(tasks[0].name.as_deref(), Some("Robert"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /api/tasks HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_list_maps_error_status() {
        let (api, _server) = serve_once(response("500 Internal Server Error", "")).await;
        match api.list().await {
            Err(ApiError::Status { method, status, .. }) => {
                assert_eq!(method, "GET");
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_rejects_non_array_body() {
        let (api, _server) = serve_once(response("200 OK", r#"{"error":"nope"}"#)).await;
        assert!(matches!(api.list().await, Err(ApiError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_create_posts_json_and_returns_assigned_id() {
        let (api, server) = serve_once(response("201 Created", GOOD_RECORD)).await;
        let mut task: Task = serde_json::from_str(GOOD_RECORD).unwrap();
        task.id = None;

        let created = api.create(&task).await.unwrap();
        assert_eq!(created.id, Some(TaskId::from("1")));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/tasks HTTP/1.1"));
        let body = &request[request.find("\r\n\r\n").unwrap() + 4..];
        let sent: Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["budget"], 9.5);
        assert!(sent.get("id").is_none());
    }

    #[tokio::test]
    async fn test_create_without_id_in_response_is_an_error() {
        let no_id = r##"{"title":"Buy milk","description":"Get milk from the store","date":"2030-01-05T09:30","budget":9.5}"##;
        let (api, _server) = serve_once(response("200 OK", no_id)).await;
        let task: Task = serde_json::from_str(no_id).unwrap();
        assert!(matches!(api.create(&task).await, Err(ApiError::MissingId)));
    }

    #[tokio::test]
    async fn test_delete_targets_item_url_and_maps_not_found() {
        let (api, server) = serve_once(response("404 Not Found", "")).await;
        match api.delete(&TaskId::from("42")).await {
            Err(ApiError::Status { method, status, url }) => {
                assert_eq!(method, "DELETE");
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(url.ends_with("/api/tasks/42"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
        let request = server.await.unwrap();
        assert!(request.starts_with("DELETE /api/tasks/42 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_ping_reports_status() {
        let (api, _server) = serve_once(response("200 OK", "[]")).await;
        assert_eq!(api.ping().await.unwrap(), StatusCode::OK);

        let (api, _server) = serve_once(response("503 Service Unavailable", "")).await;
        assert!(matches!(
            api.ping().await,
            Err(ApiError::Status { status, .. }) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
    }

    #[test]
    fn test_decode_tasks_keeps_only_valid_records() {
        let records: Vec<Value> = serde_json::from_str(&format!(
            r#"[{GOOD_RECORD}, 7, {{"id":3,"title":"No budget"}}]"#
        ))
        .unwrap();
        let tasks = decode_tasks(records);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[test]
    fn test_item_url_appends_escaped_id() {
        let api = HttpTaskApi::new("https://example.com/api/tasks/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "https://example.com/api/tasks");
        assert_eq!(
            api.item_url(&TaskId::from("42")).as_str(),
            "https://example.com/api/tasks/42"
        );
        assert_eq!(
            api.item_url(&TaskId::from("a b/c")).as_str(),
            "https://example.com/api/tasks/a%20b%2Fc"
        );
    }

    #[test]
    fn test_rejects_unusable_urls() {
        assert!(matches!(
            HttpTaskApi::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpTaskApi::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(ApiError::InvalidUrl { .. })
        ));
    }
}
