use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use client_logging::{client_debug, client_warn};

use crate::client::{ApiClient, ClientSettings, HttpApiClient};
use crate::filename::default_export_filename;
use crate::persist::DownloadWriter;
use crate::{ApiFailure, Company, HistoryItem, ProgressSnapshot, SearchReply, SearchRequest};

/// Everything the engine thread needs. The `today` closure supplies the
/// date stamp for fallback export filenames, injected so tests stay
/// deterministic.
pub struct EngineConfig {
    pub settings: ClientSettings,
    pub download_dir: PathBuf,
    pub today: Arc<dyn Fn() -> String + Send + Sync>,
}

impl EngineConfig {
    pub fn new(
        settings: ClientSettings,
        download_dir: PathBuf,
        today: Arc<dyn Fn() -> String + Send + Sync>,
    ) -> Self {
        Self {
            settings,
            download_dir,
            today,
        }
    }
}

enum EngineCommand {
    Search(SearchRequest),
    FetchProgress,
    FetchHistory { kind: Option<String> },
    AppendHistory {
        kind: String,
        query: String,
        industry_filter: String,
    },
    RefreshBadges,
    Export {
        companies: Vec<Company>,
        query: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SearchFinished(Result<SearchReply, ApiFailure>),
    /// Emitted only for successful polls; failures are advisory and logged.
    ProgressFetched(ProgressSnapshot),
    /// Fail-open: transport or parse trouble yields an empty list.
    HistoryFetched {
        kind: Option<String>,
        items: Vec<HistoryItem>,
    },
    BadgeCounts { industry: usize, product: usize },
    /// The spreadsheet has already been written to the download directory.
    ExportFinished(Result<SavedExport, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedExport {
    pub filename: String,
    pub path: PathBuf,
}

/// Clonable sender half for issuing commands from any thread.
#[derive(Clone)]
pub struct EngineCommander {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineCommander {
    pub fn search(&self, request: SearchRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Search(request));
    }

    pub fn fetch_progress(&self) {
        let _ = self.cmd_tx.send(EngineCommand::FetchProgress);
    }

    pub fn fetch_history(&self, kind: Option<&str>) {
        let _ = self.cmd_tx.send(EngineCommand::FetchHistory {
            kind: kind.map(ToOwned::to_owned),
        });
    }

    pub fn append_history(&self, kind: &str, query: &str, industry_filter: &str) {
        let _ = self.cmd_tx.send(EngineCommand::AppendHistory {
            kind: kind.to_string(),
            query: query.to_string(),
            industry_filter: industry_filter.to_string(),
        });
    }

    pub fn refresh_badges(&self) {
        let _ = self.cmd_tx.send(EngineCommand::RefreshBadges);
    }

    pub fn export(&self, companies: Vec<Company>, query: String) {
        let _ = self.cmd_tx.send(EngineCommand::Export { companies, query });
    }
}

pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, ApiFailure> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(HttpApiClient::new(config.settings.clone())?);
        let download_dir = config.download_dir.clone();
        let today = config.today.clone();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                let download_dir = download_dir.clone();
                let today = today.clone();
                runtime.spawn(async move {
                    handle_command(client.as_ref(), command, event_tx, download_dir, today).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn commander(&self) -> EngineCommander {
        EngineCommander {
            cmd_tx: self.cmd_tx.clone(),
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

async fn handle_command(
    client: &dyn ApiClient,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
    download_dir: PathBuf,
    today: Arc<dyn Fn() -> String + Send + Sync>,
) {
    match command {
        EngineCommand::Search(request) => {
            let result = client.search(&request).await;
            let _ = event_tx.send(EngineEvent::SearchFinished(result));
        }
        EngineCommand::FetchProgress => match client.progress().await {
            Ok(snapshot) => {
                let _ = event_tx.send(EngineEvent::ProgressFetched(snapshot));
            }
            Err(err) => {
                // Progress is advisory; it must never disturb the search.
                client_debug!("progress poll failed: {err}");
            }
        },
        EngineCommand::FetchHistory { kind } => {
            let items = match client.history(kind.as_deref()).await {
                Ok(items) => items,
                Err(err) => {
                    client_warn!("history fetch failed: {err}");
                    Vec::new()
                }
            };
            let _ = event_tx.send(EngineEvent::HistoryFetched { kind, items });
        }
        EngineCommand::AppendHistory {
            kind,
            query,
            industry_filter,
        } => {
            // Failures are fire-and-forget; a stored search bumps the badge
            // counts right away instead of waiting for the next refresh.
            match client.append_history(&kind, &query, &industry_filter).await {
                Ok(()) => emit_badge_counts(client, &event_tx).await,
                Err(err) => client_warn!("history append failed: {err}"),
            }
        }
        EngineCommand::RefreshBadges => emit_badge_counts(client, &event_tx).await,
        EngineCommand::Export { companies, query } => {
            let result = run_export(client, &companies, &query, &download_dir, &today).await;
            let _ = event_tx.send(EngineEvent::ExportFinished(result));
        }
    }
}

/// Counts are only reported when both reads succeed; a partial failure
/// leaves the shell's badges untouched.
async fn emit_badge_counts(client: &dyn ApiClient, event_tx: &mpsc::Sender<EngineEvent>) {
    let industry = client.history(Some("industry")).await;
    let product = client.history(Some("product")).await;
    match (industry, product) {
        (Ok(industry), Ok(product)) => {
            let _ = event_tx.send(EngineEvent::BadgeCounts {
                industry: industry.len(),
                product: product.len(),
            });
        }
        (industry, product) => {
            if let Err(err) = industry.and(product) {
                client_debug!("badge refresh failed: {err}");
            }
        }
    }
}

async fn run_export(
    client: &dyn ApiClient,
    companies: &[Company],
    query: &str,
    download_dir: &Path,
    today: &Arc<dyn Fn() -> String + Send + Sync>,
) -> Result<SavedExport, String> {
    let download = client
        .export(companies, query)
        .await
        .map_err(|err| err.to_string())?;
    let filename = download
        .filename
        .unwrap_or_else(|| default_export_filename(&(today.as_ref())()));
    let writer = DownloadWriter::new(download_dir.to_path_buf());
    let path = writer
        .write_bytes(&filename, &download.bytes)
        .map_err(|err| err.to_string())?;
    Ok(SavedExport { filename, path })
}
