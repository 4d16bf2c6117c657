use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use chrono::Utc;
use client_logging::client_warn;
use prospect_core::{update, AppState, InputField, Msg, SearchKind};
use prospect_engine::{ClientSettings, DownloadWriter};

use super::command::{self, Command};
use super::effects::EffectRunner;
use super::logging;
use super::ui;

const RESULTS_PAGE: &str = "results.html";

enum ShellMsg {
    Command(Command),
    Core(Msg),
    Invalid(String),
}

pub fn run_app() -> anyhow::Result<()> {
    logging::initialize();

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("PROSPECT_API_URL").ok())
        .unwrap_or_else(|| ClientSettings::default().base_url);
    let settings = ClientSettings {
        base_url,
        ..ClientSettings::default()
    };
    let download_dir = std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("downloads");

    let (shell_tx, shell_rx) = mpsc::channel::<ShellMsg>();
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();

    // Engine events and timer ticks arrive as core messages; fold them into
    // the one shell inbox.
    {
        let shell_tx = shell_tx.clone();
        thread::spawn(move || {
            while let Ok(msg) = msg_rx.recv() {
                if shell_tx.send(ShellMsg::Core(msg)).is_err() {
                    break;
                }
            }
        });
    }

    spawn_stdin_reader(shell_tx);

    let runner = EffectRunner::new(msg_tx, settings, download_dir.clone())
        .context("starting the backend engine")?;
    let writer = DownloadWriter::new(download_dir);

    let mut state = AppState::new();
    println!("{}", command::HELP_TEXT);
    render(&mut state, &writer);

    while let Ok(shell_msg) = shell_rx.recv() {
        match shell_msg {
            ShellMsg::Command(Command::Quit) => break,
            ShellMsg::Command(Command::Help) => println!("{}", command::HELP_TEXT),
            ShellMsg::Command(cmd) => {
                for msg in messages_for(cmd) {
                    state = dispatch(state, msg, &runner);
                }
                render(&mut state, &writer);
            }
            ShellMsg::Core(msg) => {
                state = dispatch(state, msg, &runner);
                render(&mut state, &writer);
            }
            ShellMsg::Invalid(reason) => println!("{reason}"),
        }
    }

    Ok(())
}

fn spawn_stdin_reader(shell_tx: mpsc::Sender<ShellMsg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            let parsed = command::parse(&line);
            let quitting = parsed == Ok(Command::Quit);
            let shell_msg = match parsed {
                Ok(cmd) => ShellMsg::Command(cmd),
                Err(reason) => ShellMsg::Invalid(reason),
            };
            if shell_tx.send(shell_msg).is_err() || quitting {
                break;
            }
        }
    });
}

/// Expand a shell command into the core messages it stands for. Search
/// commands switch the tab, fill the inputs, then submit.
fn messages_for(cmd: Command) -> Vec<Msg> {
    match cmd {
        Command::SearchIndustry { query } => vec![
            Msg::TabSelected(SearchKind::Industry),
            Msg::InputChanged {
                field: InputField::Industry,
                text: query,
            },
            Msg::SearchSubmitted,
        ],
        Command::SearchProduct {
            query,
            industry_filter,
        } => vec![
            Msg::TabSelected(SearchKind::Product),
            Msg::InputChanged {
                field: InputField::Product,
                text: query,
            },
            Msg::InputChanged {
                field: InputField::ProductIndustry,
                text: industry_filter,
            },
            Msg::SearchSubmitted,
        ],
        Command::Tab(kind) => vec![Msg::TabSelected(kind)],
        Command::History(kind) => vec![Msg::HistoryOpened(kind)],
        Command::Pick(n) => vec![Msg::HistoryEntryChosen(n - 1)],
        Command::CloseHistory => vec![Msg::HistoryClosed],
        Command::Export => vec![Msg::ExportRequested],
        Command::Help | Command::Quit => Vec::new(),
    }
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}

fn render(state: &mut AppState, writer: &DownloadWriter) {
    if !state.consume_dirty() {
        return;
    }
    let view = state.view(Utc::now());
    print!("{}", ui::render::render_view(&view));
    let _ = io::stdout().flush();

    if let Some(results) = &view.results {
        let page = ui::markup::results_page(results);
        if let Err(err) = writer.write_bytes(RESULTS_PAGE, page.as_bytes()) {
            client_warn!("results page write failed: {err}");
        }
    }
}
