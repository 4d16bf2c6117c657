use chrono::{DateTime, Utc};

use crate::progress::LogLine;

/// Monotonic identifier for an alert, used to match deferred dismissals
/// against the alert that scheduled them.
pub type AlertToken = u64;

/// Which search form the user is working with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    #[default]
    Industry,
    Product,
}

impl SearchKind {
    /// Wire name used by the backend (`type` / `search_type` fields).
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Industry => "industry",
            SearchKind::Product => "product",
        }
    }
}

/// Input fields the shell can write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Industry,
    Product,
    ProductIndustry,
}

/// One company record as displayed and exported. Owned by the controller for
/// the duration of a results view; the renderer and export path read it only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Company {
    pub name: String,
    pub industry: String,
    pub business_type: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub country: String,
}

/// A prior search the user can replay from the history modal.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub kind: SearchKind,
    pub query: String,
    /// Empty string means no filter; the backend stores it that way.
    pub industry_filter: String,
    /// None when the server-supplied timestamp could not be parsed.
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSeverity {
    Error,
    Success,
}

/// The single alert area. Errors persist until replaced; successes are
/// dismissed by a deferred `AlertDismissElapsed` carrying the same token.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
    pub token: AlertToken,
}

/// Visible progress pane contents, rebuilt from each polled snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressPane {
    pub status_line: String,
    pub companies_found: u32,
    pub bar_percent: u8,
    pub log: Vec<LogLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryModal {
    pub kind: SearchKind,
    pub entries: Vec<HistoryEntry>,
    pub loaded: bool,
}

/// The search the controller is currently waiting on. Captured at submit so
/// the settle handler sees the query as it was sent, not the current input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingSearch {
    pub kind: SearchKind,
    pub query: String,
    pub industry_filter: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) active_tab: SearchKind,
    pub(crate) industry_input: String,
    pub(crate) product_input: String,
    pub(crate) product_industry_input: String,
    pub(crate) phase: SearchPhase,
    /// Most recently successfully displayed result set, partial ones
    /// included. This is the exact payload an export sends.
    pub(crate) companies: Vec<Company>,
    /// Server-reported count for the visible result set; None hides the
    /// results panel.
    pub(crate) results_count: Option<usize>,
    /// Literal query string of the last fully successful search, used to name
    /// the export file.
    pub(crate) last_query: String,
    pub(crate) pending: Option<PendingSearch>,
    pub(crate) alert: Option<Alert>,
    pub(crate) alert_seq: AlertToken,
    pub(crate) progress: ProgressPane,
    pub(crate) industry_history_count: usize,
    pub(crate) product_history_count: usize,
    pub(crate) history_modal: Option<HistoryModal>,
    pub(crate) exporting: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a search request is in flight.
    pub fn searching(&self) -> bool {
        self.phase == SearchPhase::Searching
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn input_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::Industry => &mut self.industry_input,
            InputField::Product => &mut self.product_input,
            InputField::ProductIndustry => &mut self.product_industry_input,
        }
    }

    pub(crate) fn show_error(&mut self, message: impl Into<String>) -> AlertToken {
        self.set_alert(AlertSeverity::Error, message.into())
    }

    pub(crate) fn show_success(&mut self, message: impl Into<String>) -> AlertToken {
        self.set_alert(AlertSeverity::Success, message.into())
    }

    fn set_alert(&mut self, severity: AlertSeverity, message: String) -> AlertToken {
        self.alert_seq += 1;
        let token = self.alert_seq;
        self.alert = Some(Alert {
            severity,
            message,
            token,
        });
        self.mark_dirty();
        token
    }
}
