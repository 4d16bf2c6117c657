//! Prospect core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod progress;
mod state;
mod timefmt;
mod update;
mod view_model;

pub use effect::{Effect, SearchSpec};
pub use msg::{ExportOutcome, Msg, ProgressDetail, ProgressUpdate, SearchFailure, SearchReply};
pub use progress::{classify_detail, status_line, LogLine, LogTone, DETAIL_WINDOW};
pub use state::{
    Alert, AlertSeverity, AlertToken, AppState, Company, HistoryEntry, InputField, SearchKind,
    SearchPhase,
};
pub use timefmt::{format_relative, parse_timestamp};
pub use update::update;
pub use view_model::{
    AlertView, AppViewModel, HistoryModalView, HistoryRowView, ProgressPaneView, ResultsView,
};
