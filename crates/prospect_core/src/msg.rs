use std::fmt;
use std::path::PathBuf;

use crate::{AlertToken, Company, HistoryEntry, InputField, SearchKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Shell wrote text into one of the three input fields.
    InputChanged { field: InputField, text: String },
    /// User switched the active search tab.
    TabSelected(SearchKind),
    /// User submitted the active search form.
    SearchSubmitted,
    /// The search request settled, one way or the other.
    SearchSettled(Result<SearchReply, SearchFailure>),
    /// Poll timer fired while a search is active.
    ProgressTick,
    /// A progress snapshot arrived from the backend.
    ProgressReported(ProgressUpdate),
    /// User opened the history modal for a search kind.
    HistoryOpened(SearchKind),
    /// History list arrived for the modal (fail-open: may be empty).
    HistoryLoaded {
        kind: SearchKind,
        entries: Vec<HistoryEntry>,
    },
    /// User picked the n-th entry in the open modal (newest first).
    HistoryEntryChosen(usize),
    HistoryClosed,
    /// Badge refresh timer fired (every 30 s for the page lifetime).
    BadgeRefreshTick,
    BadgeCountsLoaded { industry: usize, product: usize },
    /// User asked for a spreadsheet export of the current results.
    ExportRequested,
    ExportSettled(Result<ExportOutcome, String>),
    /// Deferred dismissal for the success alert with the given token.
    AlertDismissElapsed(AlertToken),
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Parsed body of a `/api/search` response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchReply {
    pub companies: Vec<Company>,
    pub count: usize,
    pub error: Option<String>,
}

/// Ways a search request can fail outright (no usable reply).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    /// The request itself never produced a body.
    Transport(String),
    /// Non-OK status; message is server-supplied when available.
    Http { message: String },
    /// A body was obtained but it was empty.
    EmptyBody,
    /// A body was obtained but it was not JSON; carries a truncated excerpt
    /// of the raw text for diagnosis.
    MalformedBody { excerpt: String },
}

impl fmt::Display for SearchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFailure::Transport(message) => write!(f, "{message}"),
            SearchFailure::Http { message } => write!(f, "{message}"),
            SearchFailure::EmptyBody => {
                write!(f, "Empty response from server. Please check server logs for errors.")
            }
            SearchFailure::MalformedBody { excerpt } => write!(
                f,
                "Invalid response from server. Please check server logs. Response: {excerpt}"
            ),
        }
    }
}

/// Point-in-time status of an in-flight backend search. Ephemeral; each
/// update replaces the previous pane contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressUpdate {
    pub status: Option<String>,
    pub current_step: Option<String>,
    pub companies_found: u32,
    pub current_step_num: u32,
    pub total_steps: u32,
    pub details: Vec<ProgressDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressDetail {
    pub time: String,
    pub message: String,
}

/// A spreadsheet landed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub filename: String,
    pub path: PathBuf,
}
