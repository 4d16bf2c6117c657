use std::time::Duration;

use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};

use crate::filename::content_disposition_filename;
use crate::{
    ApiFailure, Company, ExportDownload, HistoryItem, ProgressSnapshot, SearchReply, SearchRequest,
};

/// How much of an unparseable response body is kept for diagnosis.
const EXCERPT_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Covers the whole request. Searches can legitimately run for tens of
    /// seconds while the backend fans out to directories.
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(90),
        }
    }
}

/// The backend surface the controller consumes. A trait so tests and the
/// shell can swap the transport.
#[async_trait::async_trait]
pub trait ApiClient: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchReply, ApiFailure>;
    async fn progress(&self) -> Result<ProgressSnapshot, ApiFailure>;
    /// `kind` filters by search type when given.
    async fn history(&self, kind: Option<&str>) -> Result<Vec<HistoryItem>, ApiFailure>;
    async fn append_history(
        &self,
        kind: &str,
        query: &str,
        industry_filter: &str,
    ) -> Result<(), ApiFailure>;
    async fn export(
        &self,
        companies: &[Company],
        search_query: &str,
    ) -> Result<ExportDownload, ApiFailure>;
}

#[derive(Debug, Clone)]
pub struct HttpApiClient {
    client: reqwest::Client,
    settings: ClientSettings,
}

#[derive(Debug, serde::Deserialize, Default)]
struct HistoryPage {
    #[serde(default)]
    history: Vec<HistoryItem>,
}

#[derive(Debug, serde::Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

impl HttpApiClient {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiFailure> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ApiFailure::Transport(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn post_json(
        &self,
        path: &str,
        body: &impl serde::Serialize,
    ) -> Result<reqwest::Response, ApiFailure> {
        let payload =
            serde_json::to_vec(body).map_err(|err| ApiFailure::Transport(err.to_string()))?;
        self.client
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_transport)
    }
}

#[async_trait::async_trait]
impl ApiClient for HttpApiClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchReply, ApiFailure> {
        let response = self.post_json("/api/search", request).await?;
        let status = response.status();
        // Body first: an empty body and a malformed body are distinct
        // failures, and a non-OK status still carries the server's error
        // message when the body does parse.
        let text = response.text().await.map_err(map_transport)?;
        if text.trim().is_empty() {
            return Err(ApiFailure::EmptyBody);
        }
        let reply: SearchReply = match serde_json::from_str(&text) {
            Ok(reply) => reply,
            Err(_) => {
                return Err(ApiFailure::MalformedBody {
                    excerpt: excerpt(&text),
                })
            }
        };
        if !status.is_success() {
            return Err(ApiFailure::Http {
                status: status.as_u16(),
                message: reply
                    .error
                    .unwrap_or_else(|| "Failed to search companies".to_string()),
            });
        }
        Ok(reply)
    }

    async fn progress(&self) -> Result<ProgressSnapshot, ApiFailure> {
        let response = self
            .client
            .get(self.url("/api/progress"))
            .send()
            .await
            .map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiFailure::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }
        let text = response.text().await.map_err(map_transport)?;
        serde_json::from_str(&text).map_err(|_| ApiFailure::MalformedBody {
            excerpt: excerpt(&text),
        })
    }

    async fn history(&self, kind: Option<&str>) -> Result<Vec<HistoryItem>, ApiFailure> {
        let mut request = self.client.get(self.url("/api/history"));
        if let Some(kind) = kind {
            request = request.query(&[("type", kind)]);
        }
        let response = request.send().await.map_err(map_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiFailure::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }
        let text = response.text().await.map_err(map_transport)?;
        let page: HistoryPage = serde_json::from_str(&text).map_err(|_| {
            ApiFailure::MalformedBody {
                excerpt: excerpt(&text),
            }
        })?;
        Ok(page.history)
    }

    async fn append_history(
        &self,
        kind: &str,
        query: &str,
        industry_filter: &str,
    ) -> Result<(), ApiFailure> {
        let body = serde_json::json!({
            "type": kind,
            "query": query.trim(),
            "industry_filter": industry_filter.trim(),
        });
        let response = self.post_json("/api/history", &body).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiFailure::Http {
                status: status.as_u16(),
                message: status.to_string(),
            });
        }
        Ok(())
    }

    async fn export(
        &self,
        companies: &[Company],
        search_query: &str,
    ) -> Result<ExportDownload, ApiFailure> {
        let body = serde_json::json!({
            "companies": companies,
            "search_query": search_query,
        });
        let response = self.post_json("/api/export", &body).await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let parsed: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
            return Err(ApiFailure::Http {
                status: status.as_u16(),
                message: parsed
                    .error
                    .unwrap_or_else(|| "Failed to export".to_string()),
            });
        }
        let filename = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(content_disposition_filename);
        let bytes = response
            .bytes()
            .await
            .map_err(map_transport)?
            .to_vec();
        Ok(ExportDownload { filename, bytes })
    }
}

fn map_transport(err: reqwest::Error) -> ApiFailure {
    ApiFailure::Transport(err.to_string())
}

fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LIMIT).collect()
}
