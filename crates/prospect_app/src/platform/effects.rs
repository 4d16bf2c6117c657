use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use client_logging::client_info;
use prospect_core::{
    parse_timestamp, Company, Effect, ExportOutcome, HistoryEntry, Msg, ProgressDetail,
    ProgressUpdate, SearchFailure, SearchKind, SearchReply,
};
use prospect_engine::{
    ApiFailure, ClientSettings, EngineCommander, EngineConfig, EngineEvent, EngineHandle,
    SearchRequest,
};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const BADGE_INTERVAL: Duration = Duration::from_secs(30);
const TOAST_DELAY: Duration = Duration::from_secs(4);

/// Runs `Effect`s against the engine and feeds engine events and timer
/// ticks back into the core's message channel.
pub struct EffectRunner {
    commander: EngineCommander,
    poll_armed: Arc<AtomicBool>,
    msg_tx: mpsc::Sender<Msg>,
}

impl EffectRunner {
    pub fn new(
        msg_tx: mpsc::Sender<Msg>,
        settings: ClientSettings,
        download_dir: PathBuf,
    ) -> Result<Self, ApiFailure> {
        let config = EngineConfig::new(
            settings,
            download_dir,
            Arc::new(|| Utc::now().format("%Y-%m-%d").to_string()),
        );
        let engine = EngineHandle::new(config)?;
        let runner = Self {
            commander: engine.commander(),
            poll_armed: Arc::new(AtomicBool::new(false)),
            msg_tx,
        };
        runner.spawn_event_pump(engine);
        runner.spawn_poll_timer();
        runner.spawn_badge_timer();
        Ok(runner)
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartSearch(spec) => {
                    client_info!(
                        "search start kind={} query={}",
                        spec.kind.as_str(),
                        spec.query
                    );
                    let request = match spec.kind {
                        SearchKind::Industry => SearchRequest::industry(spec.query),
                        SearchKind::Product => {
                            SearchRequest::product(spec.query, spec.industry_filter)
                        }
                    };
                    self.commander.search(request);
                }
                Effect::StartProgressPolling => {
                    self.poll_armed.store(true, Ordering::SeqCst);
                }
                Effect::StopProgressPolling => {
                    self.poll_armed.store(false, Ordering::SeqCst);
                }
                Effect::FetchProgress => self.commander.fetch_progress(),
                Effect::LoadHistory { kind } => {
                    self.commander.fetch_history(Some(kind.as_str()));
                }
                Effect::AppendHistory {
                    kind,
                    query,
                    industry_filter,
                } => {
                    self.commander
                        .append_history(kind.as_str(), &query, &industry_filter);
                }
                Effect::RefreshBadges => self.commander.refresh_badges(),
                Effect::StartExport { companies, query } => {
                    client_info!("export start query={} rows={}", query, companies.len());
                    let companies = companies.iter().map(wire_company).collect();
                    self.commander.export(companies, query);
                }
                Effect::DismissAlertLater { token } => {
                    let msg_tx = self.msg_tx.clone();
                    thread::spawn(move || {
                        thread::sleep(TOAST_DELAY);
                        let _ = msg_tx.send(Msg::AlertDismissElapsed(token));
                    });
                }
            }
        }
    }

    fn spawn_event_pump(&self, engine: EngineHandle) {
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || loop {
            if let Some(event) = engine.try_recv() {
                if msg_tx.send(map_event(event)).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }

    fn spawn_poll_timer(&self) {
        let armed = self.poll_armed.clone();
        let msg_tx = self.msg_tx.clone();
        thread::spawn(move || loop {
            thread::sleep(POLL_INTERVAL);
            if !armed.load(Ordering::SeqCst) {
                continue;
            }
            if msg_tx.send(Msg::ProgressTick).is_err() {
                break;
            }
        });
    }

    fn spawn_badge_timer(&self) {
        let msg_tx = self.msg_tx.clone();
        // First tick fires immediately so the badges populate on startup.
        thread::spawn(move || {
            while msg_tx.send(Msg::BadgeRefreshTick).is_ok() {
                thread::sleep(BADGE_INTERVAL);
            }
        });
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::SearchFinished(result) => Msg::SearchSettled(
            result
                .map(|reply| SearchReply {
                    companies: reply.companies.iter().map(core_company).collect(),
                    count: reply.count,
                    error: reply.error,
                })
                .map_err(map_failure),
        ),
        EngineEvent::ProgressFetched(snapshot) => Msg::ProgressReported(ProgressUpdate {
            status: snapshot.status,
            current_step: snapshot.current_step,
            companies_found: snapshot.companies_found,
            current_step_num: snapshot.current_step_num,
            total_steps: snapshot.total_steps,
            details: snapshot
                .details
                .into_iter()
                .map(|detail| ProgressDetail {
                    time: detail.time,
                    message: detail.message,
                })
                .collect(),
        }),
        EngineEvent::HistoryFetched { kind, items } => Msg::HistoryLoaded {
            kind: map_kind(kind.as_deref()),
            entries: items
                .iter()
                .map(|item| HistoryEntry {
                    id: item.id,
                    kind: map_kind(Some(&item.kind)),
                    query: item.query.clone(),
                    industry_filter: item.industry_filter.clone(),
                    timestamp: parse_timestamp(&item.timestamp),
                })
                .collect(),
        },
        EngineEvent::BadgeCounts { industry, product } => {
            Msg::BadgeCountsLoaded { industry, product }
        }
        EngineEvent::ExportFinished(result) => Msg::ExportSettled(result.map(|saved| {
            ExportOutcome {
                filename: saved.filename,
                path: saved.path,
            }
        })),
    }
}

fn map_kind(kind: Option<&str>) -> SearchKind {
    match kind {
        Some("product") => SearchKind::Product,
        _ => SearchKind::Industry,
    }
}

fn map_failure(failure: ApiFailure) -> SearchFailure {
    match failure {
        ApiFailure::Transport(message) => SearchFailure::Transport(message),
        ApiFailure::Http { message, .. } => SearchFailure::Http { message },
        ApiFailure::EmptyBody => SearchFailure::EmptyBody,
        ApiFailure::MalformedBody { excerpt } => SearchFailure::MalformedBody { excerpt },
    }
}

fn core_company(company: &prospect_engine::Company) -> Company {
    Company {
        name: company.name.clone(),
        industry: company.industry.clone(),
        business_type: company.business_type.clone(),
        address: company.address.clone(),
        phone: company.phone.clone(),
        email: company.email.clone(),
        website: company.website.clone(),
        rating: company.rating,
        country: company.country.clone(),
    }
}

fn wire_company(company: &Company) -> prospect_engine::Company {
    prospect_engine::Company {
        name: company.name.clone(),
        industry: company.industry.clone(),
        business_type: company.business_type.clone(),
        address: company.address.clone(),
        phone: company.phone.clone(),
        email: company.email.clone(),
        website: company.website.clone(),
        rating: company.rating,
        country: company.country.clone(),
    }
}
