//! Prospect engine: typed HTTP client for the company-search backend and
//! the command/event bridge that runs it on a dedicated tokio runtime.
mod client;
mod engine;
mod filename;
mod persist;
mod types;

pub use client::{ApiClient, ClientSettings, HttpApiClient};
pub use engine::{EngineCommander, EngineConfig, EngineEvent, EngineHandle, SavedExport};
pub use filename::{content_disposition_filename, default_export_filename};
pub use persist::{ensure_download_dir, DownloadWriter, PersistError};
pub use types::{
    ApiFailure, Company, ExportDownload, HistoryItem, ProgressDetail, ProgressSnapshot,
    SearchReply, SearchRequest,
};
