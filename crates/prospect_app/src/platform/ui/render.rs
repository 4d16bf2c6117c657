//! Terminal rendering of the view model. Pure string building so tests can
//! assert on the output.

use prospect_core::{AlertSeverity, AppViewModel, LogTone, SearchKind};

const BAR_WIDTH: usize = 20;

pub fn render_view(view: &AppViewModel) -> String {
    let mut out = String::new();

    out.push_str(&tabs_line(view));
    out.push('\n');

    if let Some(alert) = &view.alert {
        let prefix = match alert.severity {
            AlertSeverity::Error => "ERROR",
            AlertSeverity::Success => "OK",
        };
        out.push_str(&format!("[{prefix}] {}\n", alert.message));
    }

    if view.searching {
        out.push_str(&format!(
            "{} {} | {} companies found\n",
            bar(view.progress.bar_percent),
            view.progress.status_line,
            view.progress.companies_found
        ));
        for line in &view.progress.log {
            out.push_str(&format!(
                "  {} {} {}\n",
                tone_mark(line.tone),
                line.time,
                line.message
            ));
        }
    }

    if let Some(results) = &view.results {
        out.push_str(&format!(
            "Found {} companies ({} shown). [{}]\n",
            results.count,
            results.companies.len(),
            view.export_label
        ));
        for company in &results.companies {
            let mut extras = vec![company.industry.as_str()];
            if let Some(address) = &company.address {
                extras.push(address);
            }
            out.push_str(&format!(
                "  - {} [{}] {}\n",
                company.name,
                company.country,
                extras.join(" | ")
            ));
        }
    }

    if let Some(modal) = &view.history_modal {
        out.push_str(&format!("--- {} history ---\n", modal.kind.as_str()));
        if !modal.loaded {
            out.push_str("  loading...\n");
        } else if modal.rows.is_empty() {
            out.push_str("  (no previous searches)\n");
        } else {
            for (index, row) in modal.rows.iter().enumerate() {
                let filter = row
                    .industry_filter
                    .as_deref()
                    .map(|f| format!("  Filter: {f}"))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  {}. {}  ({}){}  {}\n",
                    index + 1,
                    row.query,
                    row.kind.as_str(),
                    filter,
                    row.when
                ));
            }
        }
        out.push_str("--- pick <n> to replay, close to dismiss ---\n");
    }

    out
}

fn tabs_line(view: &AppViewModel) -> String {
    let mark = |kind: SearchKind| {
        if view.active_tab == kind {
            "*"
        } else {
            " "
        }
    };
    format!(
        "[{}] Industry ({})   [{}] Product ({})",
        mark(SearchKind::Industry),
        view.industry_history_count,
        mark(SearchKind::Product),
        view.product_history_count
    )
}

fn bar(percent: u8) -> String {
    let filled = (usize::from(percent) * BAR_WIDTH) / 100;
    let mut bar = String::with_capacity(BAR_WIDTH + 6);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push_str(&format!("] {percent:>3}%"));
    bar
}

fn tone_mark(tone: LogTone) -> char {
    match tone {
        LogTone::Found => '+',
        LogTone::Error => 'x',
        LogTone::Warning => '!',
        LogTone::Neutral => '.',
    }
}
