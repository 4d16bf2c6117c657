use std::sync::Once;

use chrono::{TimeZone, Utc};
use prospect_core::{
    update, AlertSeverity, AppState, AppViewModel, Company, Effect, InputField, Msg, SearchFailure,
    SearchKind, SearchReply, SearchSpec,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn view(state: &AppState) -> AppViewModel {
    state.view(Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap())
}

fn company(name: &str) -> Company {
    Company {
        name: name.to_string(),
        industry: "Trucking".to_string(),
        country: "USA".to_string(),
        ..Company::default()
    }
}

fn submit_industry(state: AppState, text: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(
        state,
        Msg::InputChanged {
            field: InputField::Industry,
            text: text.to_string(),
        },
    );
    update(state, Msg::SearchSubmitted)
}

#[test]
fn empty_industry_input_blocks_the_request() {
    init_logging();
    let (state, effects) = submit_industry(AppState::new(), "   ");

    assert!(effects.is_empty());
    let view = view(&state);
    assert!(!view.searching);
    let alert = view.alert.expect("validation alert");
    assert_eq!(alert.severity, AlertSeverity::Error);
    assert_eq!(alert.message, "Please enter an industry name");
}

#[test]
fn empty_product_input_blocks_with_its_own_message() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::TabSelected(SearchKind::Product));
    let (state, effects) = update(state, Msg::SearchSubmitted);

    assert!(effects.is_empty());
    assert_eq!(
        view(&state).alert.unwrap().message,
        "Please enter a product/object name"
    );
}

#[test]
fn industry_submit_trims_and_starts_polling() {
    init_logging();
    let (state, effects) = submit_industry(AppState::new(), "  trucking  ");

    assert_eq!(
        effects,
        vec![
            Effect::StartProgressPolling,
            Effect::StartSearch(SearchSpec {
                kind: SearchKind::Industry,
                query: "trucking".to_string(),
                industry_filter: String::new(),
            }),
        ]
    );
    let view = view(&state);
    assert!(view.searching);
    assert!(view.alert.is_none());
    assert!(view.results.is_none());
}

#[test]
fn product_submit_carries_the_trimmed_filter() {
    init_logging();
    let state = AppState::new();
    let (state, _) = update(state, Msg::TabSelected(SearchKind::Product));
    let (state, _) = update(
        state,
        Msg::InputChanged {
            field: InputField::Product,
            text: "brake pads".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::InputChanged {
            field: InputField::ProductIndustry,
            text: " automotive ".to_string(),
        },
    );
    let (_, effects) = update(state, Msg::SearchSubmitted);

    assert_eq!(
        effects[1],
        Effect::StartSearch(SearchSpec {
            kind: SearchKind::Product,
            query: "brake pads".to_string(),
            industry_filter: "automotive".to_string(),
        })
    );
}

#[test]
fn full_success_stores_results_and_appends_history() {
    init_logging();
    let (state, _) = submit_industry(AppState::new(), "trucking");
    let companies: Vec<_> = (0..12).map(|i| company(&format!("Co {i}"))).collect();
    let (state, effects) = update(
        state,
        Msg::SearchSettled(Ok(SearchReply {
            companies: companies.clone(),
            count: 12,
            error: None,
        })),
    );

    assert_eq!(effects[0], Effect::StopProgressPolling);
    assert_eq!(
        effects[1],
        Effect::AppendHistory {
            kind: SearchKind::Industry,
            query: "trucking".to_string(),
            industry_filter: String::new(),
        }
    );
    let view = view(&state);
    assert!(!view.searching);
    let results = view.results.expect("results visible");
    assert_eq!(results.count, 12);
    assert_eq!(results.companies, companies);
    assert!(view.alert.is_none());
}

#[test]
fn error_with_enough_companies_counts_as_success() {
    init_logging();
    let (state, _) = submit_industry(AppState::new(), "trucking");
    let companies: Vec<_> = (0..10).map(|i| company(&format!("Co {i}"))).collect();
    let (state, effects) = update(
        state,
        Msg::SearchSettled(Ok(SearchReply {
            companies,
            count: 10,
            error: Some("one source timed out".to_string()),
        })),
    );

    // At the threshold the error is not surfaced and history is appended.
    assert!(view(&state).alert.is_none());
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::AppendHistory { .. })));
}

#[test]
fn partial_success_shows_error_and_keeps_partial_results() {
    init_logging();
    let (state, _) = submit_industry(AppState::new(), "trucking");
    let companies = vec![company("Only Co"), company("Other Co")];
    let (state, effects) = update(
        state,
        Msg::SearchSettled(Ok(SearchReply {
            companies: companies.clone(),
            count: 2,
            error: Some("Only found 2 companies.".to_string()),
        })),
    );

    assert_eq!(effects[0], Effect::StopProgressPolling);
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::AppendHistory { .. })));
    let view = view(&state);
    assert_eq!(view.alert.unwrap().message, "Only found 2 companies.");
    assert_eq!(view.results.unwrap().companies, companies);
}

#[test]
fn partial_failure_without_results_keeps_previous_set() {
    init_logging();
    // Seed a successful result set first.
    let (state, _) = submit_industry(AppState::new(), "trucking");
    let seeded: Vec<_> = (0..11).map(|i| company(&format!("Seed {i}"))).collect();
    let (state, _) = update(
        state,
        Msg::SearchSettled(Ok(SearchReply {
            companies: seeded.clone(),
            count: 11,
            error: None,
        })),
    );

    let (state, _) = submit_industry(state, "aerospace");
    let (state, effects) = update(
        state,
        Msg::SearchSettled(Ok(SearchReply {
            companies: Vec::new(),
            count: 0,
            error: Some("Only found 0 companies.".to_string()),
        })),
    );

    // No companies came back, so no history append and no render of an
    // empty set; an export would still send the seeded companies.
    assert_eq!(effects, vec![Effect::StopProgressPolling]);
    let (_, effects) = update(state, Msg::ExportRequested);
    match &effects[0] {
        Effect::StartExport { companies, .. } => assert_eq!(*companies, seeded),
        other => panic!("expected StartExport, got {other:?}"),
    }
}

#[test]
fn transport_failure_wraps_the_message() {
    init_logging();
    let (state, _) = submit_industry(AppState::new(), "trucking");
    let (state, effects) = update(
        state,
        Msg::SearchSettled(Err(SearchFailure::Transport(
            "connection refused".to_string(),
        ))),
    );

    assert_eq!(effects, vec![Effect::StopProgressPolling]);
    let view = view(&state);
    assert!(!view.searching);
    assert_eq!(
        view.alert.unwrap().message,
        "Error searching for companies: connection refused"
    );
}

#[test]
fn empty_body_and_parse_failures_are_distinct() {
    init_logging();
    let (state, _) = submit_industry(AppState::new(), "trucking");
    let (state, _) = update(state, Msg::SearchSettled(Err(SearchFailure::EmptyBody)));
    assert!(view(&state)
        .alert
        .unwrap()
        .message
        .contains("Empty response from server"));

    let (state, _) = submit_industry(state, "trucking");
    let (state, _) = update(
        state,
        Msg::SearchSettled(Err(SearchFailure::MalformedBody {
            excerpt: "{not json".to_string(),
        })),
    );
    let message = view(&state).alert.unwrap().message;
    assert!(message.contains("Invalid response from server"));
    assert!(message.contains("{not json"));
}

#[test]
fn resubmit_while_searching_is_ignored() {
    init_logging();
    let (state, _) = submit_industry(AppState::new(), "trucking");

    // A second submit while the first is in flight launches nothing.
    let (state, effects) = submit_industry(state, "aerospace");
    assert!(effects.is_empty());
    assert!(view(&state).searching);

    // The in-flight search settles normally; its results and query land.
    let (state, _) = update(
        state,
        Msg::SearchSettled(Ok(SearchReply {
            companies: vec![company("Truck Co")],
            count: 1,
            error: None,
        })),
    );
    let results = view(&state).results.expect("results visible");
    assert_eq!(results.companies[0].name, "Truck Co");

    let (_, effects) = update(state, Msg::ExportRequested);
    match &effects[0] {
        Effect::StartExport { query, .. } => assert_eq!(query, "trucking"),
        other => panic!("expected StartExport, got {other:?}"),
    }
}

#[test]
fn submit_control_is_disabled_until_the_request_settles() {
    init_logging();
    let (state, _) = submit_industry(AppState::new(), "trucking");
    assert!(view(&state).searching);

    let (state, _) = update(
        state,
        Msg::SearchSettled(Err(SearchFailure::Http {
            message: "Failed to search companies".to_string(),
        })),
    );
    assert!(!view(&state).searching);
}
