use chrono::{DateTime, Utc};

use crate::progress::LogLine;
use crate::state::AppState;
use crate::timefmt::format_relative;
use crate::{AlertSeverity, Company, SearchKind};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub active_tab: SearchKind,
    pub industry_input: String,
    pub product_input: String,
    pub product_industry_input: String,
    /// Loading indicator is visible and the submit control disabled while
    /// a search is in flight.
    pub searching: bool,
    pub alert: Option<AlertView>,
    pub progress: ProgressPaneView,
    pub results: Option<ResultsView>,
    pub industry_history_count: usize,
    pub product_history_count: usize,
    pub history_modal: Option<HistoryModalView>,
    pub export_enabled: bool,
    pub export_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertView {
    pub severity: AlertSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressPaneView {
    pub status_line: String,
    pub companies_found: u32,
    pub bar_percent: u8,
    pub log: Vec<LogLine>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultsView {
    /// Server-reported count, which may exceed the companies actually
    /// returned.
    pub count: usize,
    pub companies: Vec<Company>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryModalView {
    pub kind: SearchKind,
    pub loaded: bool,
    pub rows: Vec<HistoryRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub query: String,
    pub kind: SearchKind,
    /// None when the entry has no filter.
    pub industry_filter: Option<String>,
    /// "Just now" / "3m ago" / calendar date; empty when the server's
    /// timestamp was unparseable.
    pub when: String,
}

impl AppState {
    /// Snapshot for rendering. `now` anchors the relative timestamps.
    pub fn view(&self, now: DateTime<Utc>) -> AppViewModel {
        AppViewModel {
            active_tab: self.active_tab,
            industry_input: self.industry_input.clone(),
            product_input: self.product_input.clone(),
            product_industry_input: self.product_industry_input.clone(),
            searching: self.searching(),
            alert: self.alert.as_ref().map(|a| AlertView {
                severity: a.severity,
                message: a.message.clone(),
            }),
            progress: ProgressPaneView {
                status_line: self.progress.status_line.clone(),
                companies_found: self.progress.companies_found,
                bar_percent: self.progress.bar_percent,
                log: self.progress.log.clone(),
            },
            results: self.results_count.map(|count| ResultsView {
                count,
                companies: self.companies.clone(),
            }),
            industry_history_count: self.industry_history_count,
            product_history_count: self.product_history_count,
            history_modal: self.history_modal.as_ref().map(|modal| HistoryModalView {
                kind: modal.kind,
                loaded: modal.loaded,
                rows: modal
                    .entries
                    .iter()
                    .map(|entry| HistoryRowView {
                        query: entry.query.clone(),
                        kind: entry.kind,
                        industry_filter: if entry.industry_filter.is_empty() {
                            None
                        } else {
                            Some(entry.industry_filter.clone())
                        },
                        when: entry
                            .timestamp
                            .map(|ts| format_relative(ts, now))
                            .unwrap_or_default(),
                    })
                    .collect(),
            }),
            export_enabled: !self.exporting,
            export_label: if self.exporting {
                "Exporting...".to_string()
            } else {
                "Export to Excel".to_string()
            },
        }
    }
}
