use crate::msg::ProgressUpdate;

/// At most this many trailing detail lines are shown in the log.
pub const DETAIL_WINDOW: usize = 15;

/// Presentation tone of a log line, derived from its free-text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTone {
    Found,
    Error,
    Warning,
    Neutral,
}

/// One rendered line of the progress log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub time: String,
    pub message: String,
    pub tone: LogTone,
}

/// Ordered first-match classifier over the server's free-text progress
/// messages. The keyword sets are a presentation heuristic, not a protocol.
pub fn classify_detail(message: &str) -> LogTone {
    let lower = message.to_lowercase();
    if lower.contains("found:") {
        LogTone::Found
    } else if lower.contains("error") || lower.contains("timeout") {
        LogTone::Error
    } else if lower.contains("skipped") {
        LogTone::Warning
    } else {
        LogTone::Neutral
    }
}

/// Status text for the pane: explicit step label, then generic status, then
/// a default while the backend has nothing to say.
pub fn status_line(update: &ProgressUpdate) -> String {
    update
        .current_step
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| update.status.as_deref().filter(|s| !s.is_empty()))
        .unwrap_or("Searching...")
        .to_string()
}

/// Progress bar percentage. Prefers the explicit step ratio (clamped to
/// 100); absent that, estimates 2% per company found (clamped to 90);
/// absent both, keeps the previous value.
pub fn bar_percent(update: &ProgressUpdate, previous: u8) -> u8 {
    if update.total_steps > 0 {
        let ratio = u64::from(update.current_step_num) * 100 / u64::from(update.total_steps);
        ratio.min(100) as u8
    } else if update.companies_found > 0 {
        (u64::from(update.companies_found) * 2).min(90) as u8
    } else {
        previous
    }
}
