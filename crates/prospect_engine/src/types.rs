use serde::{Deserialize, Serialize};

/// One company record on the wire. Optional fields are omitted from
/// serialized payloads so the export sheet only carries what the search
/// actually returned; unknown backend fields are ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub country: String,
}

/// One stored search as the backend returns it. The timestamp stays a raw
/// string here; parsing is the presentation layer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct HistoryItem {
    #[serde(default)]
    pub id: i64,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub industry_filter: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Point-in-time status of an in-flight search. Every field is optional on
/// the wire; the backend omits them freely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ProgressSnapshot {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(default)]
    pub companies_found: u32,
    #[serde(default)]
    pub current_step_num: u32,
    #[serde(default)]
    pub total_steps: u32,
    #[serde(default)]
    pub details: Vec<ProgressDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ProgressDetail {
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub message: String,
}

/// Body for `POST /api/search`, shaped by search type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchRequest {
    Industry {
        industry: String,
        search_type: &'static str,
    },
    Product {
        product: String,
        search_type: &'static str,
        industry_filter: String,
    },
}

impl SearchRequest {
    pub fn industry(query: impl Into<String>) -> Self {
        SearchRequest::Industry {
            industry: query.into(),
            search_type: "industry",
        }
    }

    pub fn product(query: impl Into<String>, industry_filter: impl Into<String>) -> Self {
        SearchRequest::Product {
            product: query.into(),
            search_type: "product",
            industry_filter: industry_filter.into(),
        }
    }
}

/// Parsed body of a `/api/search` response. `error` can accompany a
/// non-empty company list (partial success).
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct SearchReply {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw spreadsheet bytes as returned by `/api/export`, before they are
/// persisted to the download directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDownload {
    /// Filename from the `Content-Disposition` header, when present.
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

/// Ways a backend call can fail. Best-effort callers (progress polling,
/// badge refresh) log these and move on; the search path surfaces them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiFailure {
    #[error("{0}")]
    Transport(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Empty response from server. Please check server logs for errors.")]
    EmptyBody,
    #[error("Invalid response from server. Please check server logs. Response: {excerpt}")]
    MalformedBody { excerpt: String },
}
