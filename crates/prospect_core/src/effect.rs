use crate::{AlertToken, Company, SearchKind};

/// Side effects requested by `update`. The shell's effect runner owns the
/// timers and the HTTP engine; the core never performs IO itself.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue the search request described by `spec`.
    StartSearch(SearchSpec),
    /// Arm the 1-second progress poll timer.
    StartProgressPolling,
    /// Disarm the poll timer. An already-issued poll request may still
    /// resolve afterwards; its update is applied anyway.
    StopProgressPolling,
    /// Best-effort GET of the current progress snapshot.
    FetchProgress,
    /// Fetch history filtered by kind for the modal. Fails open.
    LoadHistory { kind: SearchKind },
    /// Fire-and-forget history append; the caller never observes failure.
    AppendHistory {
        kind: SearchKind,
        query: String,
        industry_filter: String,
    },
    /// Re-fetch both per-kind history counts. Errors are swallowed.
    RefreshBadges,
    /// POST the current result set to the export endpoint and download the
    /// returned spreadsheet.
    StartExport {
        companies: Vec<Company>,
        query: String,
    },
    /// Deliver `AlertDismissElapsed(token)` after the toast delay (4 s).
    DismissAlertLater { token: AlertToken },
}

/// What to send to `/api/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSpec {
    pub kind: SearchKind,
    pub query: String,
    /// Only meaningful for product searches; empty otherwise.
    pub industry_filter: String,
}
