use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ApiFuture, PaperApi, RequestError};
use crate::model::{BookmarkCreate, BookmarkRecord, PaperDetail, PaperListResponse, PaperSummary};

/// Fixed path prefix under which the backend mounts its routes.
const API_BASE: &str = "/api";

/// HTTP implementation of [`PaperApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base: String,
    timeout: Duration,
}

impl ApiClient {
    /// `base_url` is the server origin, e.g. `http://127.0.0.1:8000`.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, timeout)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base: format!("{}{}", base_url.trim_end_matches('/'), API_BASE),
            timeout,
        }
    }

    /// Full URL prefix every request path is appended to.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Send one request and normalize the response.
    ///
    /// Returns `Ok(None)` for `204 No Content`, the decoded body for any
    /// other success, and a [`RequestError`] for everything else.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Option<T>, RequestError> {
        let url = format!("{}{}", self.base, path);
        tracing::debug!(%method, path, "api request");

        let mut req = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.timeout);
        if let Some(body) = body {
            req = req.body(body.to_string());
        }

        let result = match req.send().await {
            Ok(resp) => decode_response(resp).await,
            Err(e) => Err(e.into()),
        };
        if let Err(ref err) = result {
            tracing::warn!(%method, path, error = %err, "api request failed");
        }
        result
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Map an HTTP response onto the single [`RequestError`] contract.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Option<T>, RequestError> {
    let status = resp.status();
    if !status.is_success() {
        // Validation errors carry a list in `detail`; only a plain string is shown.
        let detail = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.detail)
            .and_then(|detail| match detail {
                serde_json::Value::String(s) if !s.is_empty() => Some(s),
                _ => None,
            });
        return Err(RequestError::new(
            detail.unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
        ));
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    resp.json::<T>().await.map(Some).map_err(RequestError::from)
}

fn require<T>(payload: Option<T>) -> Result<T, RequestError> {
    payload.ok_or_else(|| RequestError::new("empty response body"))
}

impl PaperApi for ApiClient {
    fn list_papers(
        &self,
        limit: u32,
        offset: u32,
        bookmarked_only: bool,
    ) -> ApiFuture<'_, PaperListResponse> {
        Box::pin(async move {
            let path = format!("/papers?limit={limit}&offset={offset}&bookmarked={bookmarked_only}");
            let resp: PaperListResponse = require(self.request(Method::GET, &path, None).await?)?;
            tracing::debug!(
                returned = resp.papers.len(),
                total = ?resp.total,
                "listed papers"
            );
            Ok(resp)
        })
    }

    fn get_paper(&self, id: i64) -> ApiFuture<'_, PaperDetail> {
        Box::pin(async move {
            let path = format!("/papers/{id}");
            let paper: PaperDetail = require(self.request(Method::GET, &path, None).await?)?;
            Ok(paper)
        })
    }

    fn search_papers<'a>(
        &'a self,
        query: &'a str,
        limit: u32,
    ) -> ApiFuture<'a, Vec<PaperSummary>> {
        Box::pin(async move {
            let path = format!(
                "/papers/search?q={}&limit={limit}",
                urlencoding::encode(query)
            );
            let papers: Vec<PaperSummary> =
                require(self.request(Method::GET, &path, None).await?)?;
            Ok(papers)
        })
    }

    fn add_bookmark<'a>(
        &'a self,
        id: i64,
        notes: Option<&'a str>,
    ) -> ApiFuture<'a, Option<BookmarkRecord>> {
        Box::pin(async move {
            let body = serde_json::to_value(BookmarkCreate {
                paper_id: id,
                notes: notes.map(String::from),
            })
            .map_err(|e| RequestError::new(e.to_string()))?;
            self.request::<BookmarkRecord>(Method::POST, "/bookmarks/", Some(body))
                .await
        })
    }

    fn remove_bookmark(&self, id: i64) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let path = format!("/bookmarks/{id}");
            self.request::<serde_json::Value>(Method::DELETE, &path, None)
                .await
                .map(|_| ())
        })
    }

    fn list_bookmarks(&self) -> ApiFuture<'_, Vec<PaperSummary>> {
        Box::pin(async move {
            let papers: Vec<PaperSummary> =
                require(self.request(Method::GET, "/bookmarks/", None).await?)?;
            Ok(papers)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        let http_resp = http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        reqwest::Response::from(http_resp)
    }

    // ── decode_response ────────────────────────────────────────────────

    #[tokio::test]
    async fn error_detail_is_used_as_message() {
        let resp = response(404, r#"{"detail": "Paper not found"}"#);
        let err = decode_response::<PaperDetail>(resp).await.unwrap_err();
        assert_eq!(err.message(), "Paper not found");
    }

    #[tokio::test]
    async fn error_without_body_falls_back_to_status() {
        let resp = response(500, "");
        let err = decode_response::<PaperDetail>(resp).await.unwrap_err();
        assert_eq!(err.message(), "HTTP 500");
    }

    #[tokio::test]
    async fn error_with_non_string_detail_falls_back_to_status() {
        let resp = response(422, r#"{"detail": [{"loc": ["query", "q"], "msg": "too short"}]}"#);
        let err = decode_response::<Vec<PaperSummary>>(resp).await.unwrap_err();
        assert_eq!(err.message(), "HTTP 422");
    }

    #[tokio::test]
    async fn error_without_detail_field_falls_back_to_status() {
        let resp = response(400, r#"{"message": "nope"}"#);
        let err = decode_response::<PaperDetail>(resp).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 400");
    }

    #[tokio::test]
    async fn no_content_returns_none_without_decoding() {
        let resp = response(204, "");
        let decoded = decode_response::<PaperDetail>(resp).await.unwrap();
        assert!(decoded.is_none());
    }

    #[tokio::test]
    async fn success_decodes_body() {
        let resp = response(200, r#"[{"id": 1, "title": "A"}, {"id": 2, "title": "B"}]"#);
        let papers = decode_response::<Vec<PaperSummary>>(resp)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(papers.len(), 2);
        assert_eq!(papers[1].title, "B");
    }

    #[tokio::test]
    async fn undecodable_success_body_is_a_request_error() {
        let resp = response(200, "<html>oops</html>");
        assert!(decode_response::<Vec<PaperSummary>>(resp).await.is_err());
    }

    // ── ApiClient ──────────────────────────────────────────────────────

    #[test]
    fn base_appends_api_prefix_once() {
        let client = ApiClient::new("http://127.0.0.1:8000/", Duration::from_secs(5));
        assert_eq!(client.base(), "http://127.0.0.1:8000/api");

        let client = ApiClient::new("http://example.org", Duration::from_secs(5));
        assert_eq!(client.base(), "http://example.org/api");
    }

    #[test]
    fn require_rejects_empty_payload() {
        assert_eq!(require(Some(3)).unwrap(), 3);
        assert_eq!(
            require::<u8>(None).unwrap_err().message(),
            "empty response body"
        );
    }

    #[tokio::test]
    async fn transport_failure_is_a_request_error() {
        // Port 1 on loopback refuses connections.
        let client = ApiClient::new("http://127.0.0.1:1", Duration::from_secs(2));
        let err = client.list_bookmarks().await.unwrap_err();
        assert!(!err.message().is_empty());
    }

    // ── Request building ───────────────────────────────────────────────

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn json_reply(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    const NO_CONTENT: &str = "HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n";

    /// Whether `raw` holds the full head and the body announced by
    /// `content-length`.
    fn request_complete(raw: &[u8]) -> bool {
        let text = String::from_utf8_lossy(raw);
        let Some(end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        raw.len() >= end + 4 + length
    }

    /// Accept one connection, answer it with `reply`, and hand back the raw
    /// request text.
    async fn serve_once(reply: String) -> (ApiClient, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&raw) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8(raw).unwrap()
        });
        (ApiClient::new(&origin, Duration::from_secs(5)), handle)
    }

    fn request_line(raw: &str) -> &str {
        raw.lines().next().unwrap_or_default()
    }

    fn body_of(raw: &str) -> &str {
        raw.split_once("\r\n\r\n").map(|(_, body)| body).unwrap_or_default()
    }

    fn has_json_content_type(raw: &str) -> bool {
        raw.to_ascii_lowercase()
            .lines()
            .any(|line| line.trim() == "content-type: application/json")
    }

    #[tokio::test]
    async fn list_papers_sends_paging_query() {
        let (client, server) = serve_once(json_reply(r#"{"papers": [], "total": 0}"#)).await;
        let resp = client.list_papers(5, 10, true).await.unwrap();
        let raw = server.await.unwrap();

        assert!(resp.papers.is_empty());
        assert_eq!(
            request_line(&raw),
            "GET /api/papers?limit=5&offset=10&bookmarked=true HTTP/1.1"
        );
        assert!(has_json_content_type(&raw));
    }

    #[tokio::test]
    async fn search_percent_encodes_query() {
        let (client, server) = serve_once(json_reply(r#"[{"id": 4, "title": "Nets"}]"#)).await;
        let hits = client.search_papers("neural nets & more", 7).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(hits[0].id, 4);
        assert_eq!(
            request_line(&raw),
            "GET /api/papers/search?q=neural%20nets%20%26%20more&limit=7 HTTP/1.1"
        );
        assert!(has_json_content_type(&raw));
    }

    #[tokio::test]
    async fn get_paper_requests_by_id() {
        let detail = r#"{"id": 9, "title": "T", "arxiv_id": "2401.00009",
            "published_date": "2024-01-01", "primary_category": "cs.LG",
            "pdf_url": "u", "abstract": "a"}"#;
        let (client, server) = serve_once(json_reply(detail)).await;
        let paper = client.get_paper(9).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(paper.id, 9);
        assert_eq!(request_line(&raw), "GET /api/papers/9 HTTP/1.1");
    }

    #[tokio::test]
    async fn add_bookmark_posts_json_body() {
        let record = r#"{"id": 1, "paper_id": 12, "notes": null}"#;
        let (client, server) = serve_once(json_reply(record)).await;
        let created = client.add_bookmark(12, None).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(created.map(|r| r.paper_id), Some(12));
        assert_eq!(request_line(&raw), "POST /api/bookmarks/ HTTP/1.1");
        assert!(has_json_content_type(&raw));
        let body: serde_json::Value = serde_json::from_str(body_of(&raw)).unwrap();
        assert_eq!(body, serde_json::json!({"paper_id": 12, "notes": null}));
    }

    #[tokio::test]
    async fn add_bookmark_sends_note() {
        let record = r#"{"id": 2, "paper_id": 3, "notes": "later"}"#;
        let (client, server) = serve_once(json_reply(record)).await;
        client.add_bookmark(3, Some("later")).await.unwrap();
        let raw = server.await.unwrap();

        let body: serde_json::Value = serde_json::from_str(body_of(&raw)).unwrap();
        assert_eq!(body, serde_json::json!({"paper_id": 3, "notes": "later"}));
    }

    #[tokio::test]
    async fn remove_bookmark_deletes_by_paper_id() {
        let (client, server) = serve_once(NO_CONTENT.to_string()).await;
        client.remove_bookmark(12).await.unwrap();
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "DELETE /api/bookmarks/12 HTTP/1.1");
        assert!(body_of(&raw).is_empty());
    }

    #[tokio::test]
    async fn list_bookmarks_hits_collection_path() {
        let (client, server) = serve_once(json_reply("[]")).await;
        assert!(client.list_bookmarks().await.unwrap().is_empty());
        let raw = server.await.unwrap();

        assert_eq!(request_line(&raw), "GET /api/bookmarks/ HTTP/1.1");
    }
}
