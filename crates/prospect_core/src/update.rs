use crate::progress::{bar_percent, classify_detail, status_line, LogLine, DETAIL_WINDOW};
use crate::state::{HistoryModal, PendingSearch, ProgressPane};
use crate::{AppState, Effect, Msg, ProgressUpdate, SearchKind, SearchPhase, SearchSpec};

/// Companies threshold below which a reply carrying an error message is
/// treated as a partial failure rather than a full success.
const PARTIAL_RESULT_THRESHOLD: usize = 10;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged { field, text } => {
            *state.input_mut(field) = text;
            state.mark_dirty();
            Vec::new()
        }
        Msg::TabSelected(kind) => {
            state.active_tab = kind;
            state.mark_dirty();
            // An open history modal follows the active tab.
            if let Some(modal) = state.history_modal.as_mut() {
                modal.kind = kind;
                modal.entries.clear();
                modal.loaded = false;
                vec![Effect::LoadHistory { kind }]
            } else {
                Vec::new()
            }
        }
        Msg::SearchSubmitted => submit_search(&mut state),
        Msg::SearchSettled(result) => settle_search(&mut state, result),
        Msg::ProgressTick => {
            if state.phase == SearchPhase::Searching {
                vec![Effect::FetchProgress]
            } else {
                Vec::new()
            }
        }
        Msg::ProgressReported(update) => {
            apply_progress(&mut state, update);
            Vec::new()
        }
        Msg::HistoryOpened(kind) => {
            state.history_modal = Some(HistoryModal {
                kind,
                entries: Vec::new(),
                loaded: false,
            });
            state.mark_dirty();
            vec![Effect::LoadHistory { kind }]
        }
        Msg::HistoryLoaded { kind, entries } => {
            if let Some(modal) = state.history_modal.as_mut() {
                if modal.kind == kind {
                    modal.entries = entries;
                    modal.loaded = true;
                    state.mark_dirty();
                }
            }
            Vec::new()
        }
        Msg::HistoryEntryChosen(index) => choose_history_entry(&mut state, index),
        Msg::HistoryClosed => {
            if state.history_modal.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::BadgeRefreshTick => vec![Effect::RefreshBadges],
        Msg::BadgeCountsLoaded { industry, product } => {
            if state.industry_history_count != industry || state.product_history_count != product {
                state.industry_history_count = industry;
                state.product_history_count = product;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExportRequested => request_export(&mut state),
        Msg::ExportSettled(result) => {
            state.exporting = false;
            state.mark_dirty();
            match result {
                Ok(outcome) => {
                    let token = state.show_success(format!(
                        "Excel file downloaded successfully: {}",
                        outcome.filename
                    ));
                    vec![Effect::DismissAlertLater { token }]
                }
                Err(message) => {
                    state.show_error(format!("Error exporting to Excel: {message}"));
                    Vec::new()
                }
            }
        }
        Msg::AlertDismissElapsed(token) => {
            if state.alert.as_ref().is_some_and(|a| a.token == token) {
                state.alert = None;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_search(state: &mut AppState) -> Vec<Effect> {
    // The submit control is disabled while a request is in flight; a repeat
    // submission is ignored, same as request_export's guard.
    if state.phase == SearchPhase::Searching {
        return Vec::new();
    }
    let (raw, empty_message) = match state.active_tab {
        SearchKind::Industry => (state.industry_input.as_str(), "Please enter an industry name"),
        SearchKind::Product => (
            state.product_input.as_str(),
            "Please enter a product/object name",
        ),
    };
    let query = raw.trim().to_string();
    if query.is_empty() {
        state.show_error(empty_message);
        return Vec::new();
    }
    let industry_filter = match state.active_tab {
        SearchKind::Industry => String::new(),
        SearchKind::Product => state.product_industry_input.trim().to_string(),
    };

    state.phase = SearchPhase::Searching;
    state.alert = None;
    state.results_count = None;
    state.progress = ProgressPane::default();
    state.pending = Some(PendingSearch {
        kind: state.active_tab,
        query: query.clone(),
        industry_filter: industry_filter.clone(),
    });
    state.mark_dirty();

    vec![
        Effect::StartProgressPolling,
        Effect::StartSearch(SearchSpec {
            kind: state.active_tab,
            query,
            industry_filter,
        }),
    ]
}

fn settle_search(
    state: &mut AppState,
    result: Result<crate::SearchReply, crate::SearchFailure>,
) -> Vec<Effect> {
    // The poller is disarmed exactly once per search, whichever way the
    // request settled.
    let mut effects = vec![Effect::StopProgressPolling];
    state.phase = SearchPhase::Idle;
    let pending = state.pending.take();
    state.mark_dirty();

    match result {
        Err(failure) => {
            state.show_error(format!("Error searching for companies: {failure}"));
        }
        Ok(reply) => {
            let partial =
                reply.error.is_some() && reply.companies.len() < PARTIAL_RESULT_THRESHOLD;
            if partial {
                if let Some(message) = reply.error {
                    state.show_error(message);
                }
                if !reply.companies.is_empty() {
                    state.companies = reply.companies;
                    state.results_count = Some(reply.count);
                    if let Some(pending) = pending {
                        effects.push(append_history_effect(pending));
                    }
                }
            } else {
                state.companies = reply.companies;
                state.results_count = Some(reply.count);
                if let Some(pending) = pending {
                    state.last_query = pending.query.clone();
                    effects.push(append_history_effect(pending));
                }
            }
        }
    }

    effects
}

fn append_history_effect(pending: PendingSearch) -> Effect {
    Effect::AppendHistory {
        kind: pending.kind,
        query: pending.query,
        industry_filter: pending.industry_filter,
    }
}

fn apply_progress(state: &mut AppState, update: ProgressUpdate) {
    // No phase guard: a poll response that resolves after the timer was
    // disarmed is still applied, matching the behaviour this replaces.
    state.progress.status_line = status_line(&update);
    state.progress.companies_found = update.companies_found;
    state.progress.bar_percent = bar_percent(&update, state.progress.bar_percent);
    if !update.details.is_empty() {
        let skip = update.details.len().saturating_sub(DETAIL_WINDOW);
        state.progress.log = update
            .details
            .into_iter()
            .skip(skip)
            .map(|d| LogLine {
                tone: classify_detail(&d.message),
                time: d.time,
                message: d.message,
            })
            .collect();
    }
    state.mark_dirty();
}

fn choose_history_entry(state: &mut AppState, index: usize) -> Vec<Effect> {
    let Some(modal) = state.history_modal.take() else {
        return Vec::new();
    };
    let Some(entry) = modal.entries.get(index).cloned() else {
        state.history_modal = Some(modal);
        return Vec::new();
    };

    match entry.kind {
        SearchKind::Industry => {
            state.industry_input = entry.query;
        }
        SearchKind::Product => {
            state.product_input = entry.query;
            if !entry.industry_filter.is_empty() {
                state.product_industry_input = entry.industry_filter;
            }
        }
    }
    state.active_tab = entry.kind;
    state.mark_dirty();
    Vec::new()
}

fn request_export(state: &mut AppState) -> Vec<Effect> {
    if state.exporting {
        return Vec::new();
    }
    if state.companies.is_empty() {
        state.show_error("No companies to export. Please search for companies first.");
        return Vec::new();
    }
    state.exporting = true;
    state.mark_dirty();
    let query = if state.last_query.is_empty() {
        "companies".to_string()
    } else {
        state.last_query.clone()
    };
    vec![Effect::StartExport {
        companies: state.companies.clone(),
        query,
    }]
}
