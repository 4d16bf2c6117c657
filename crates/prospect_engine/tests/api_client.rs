use pretty_assertions::assert_eq;
use prospect_engine::{ApiClient, ApiFailure, ClientSettings, Company, HttpApiClient, SearchRequest};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpApiClient {
    HttpApiClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("client builds")
}

fn company(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "industry": "Trucking",
        "address": "1 Main St",
        "country": "USA",
    })
}

#[tokio::test]
async fn search_posts_the_industry_body_and_parses_the_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(json!({
            "industry": "trucking",
            "search_type": "industry",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 2,
            "companies": [company("Acme"), company("Zenith")],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .search(&SearchRequest::industry("trucking"))
        .await
        .expect("search ok");

    assert_eq!(reply.count, 2);
    assert_eq!(reply.companies.len(), 2);
    assert_eq!(reply.companies[0].name, "Acme");
    assert_eq!(reply.companies[0].address.as_deref(), Some("1 Main St"));
    assert!(reply.error.is_none());
}

#[tokio::test]
async fn product_search_body_carries_the_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .and(body_json(json!({
            "product": "brake pads",
            "search_type": "product",
            "industry_filter": "automotive",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 0,
            "companies": [],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .search(&SearchRequest::product("brake pads", "automotive"))
        .await
        .expect("search ok");
    assert!(reply.companies.is_empty());
}

#[tokio::test]
async fn empty_body_is_its_own_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("  "))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .search(&SearchRequest::industry("trucking"))
        .await
        .unwrap_err();
    assert_eq!(err, ApiFailure::EmptyBody);
}

#[tokio::test]
async fn malformed_body_carries_a_truncated_excerpt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .search(&SearchRequest::industry("trucking"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiFailure::MalformedBody {
            excerpt: "{not json".to_string()
        }
    );

    // A long body is cut at 200 characters.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(500)))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let err = client
        .search(&SearchRequest::industry("trucking"))
        .await
        .unwrap_err();
    match err {
        ApiFailure::MalformedBody { excerpt } => assert_eq!(excerpt.len(), 200),
        other => panic!("expected MalformedBody, got {other:?}"),
    }
}

#[tokio::test]
async fn non_ok_status_uses_the_server_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "No API keys configured",
            "companies": [],
            "count": 0,
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .search(&SearchRequest::industry("trucking"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiFailure::Http {
            status: 500,
            message: "No API keys configured".to_string()
        }
    );
}

#[tokio::test]
async fn non_ok_status_without_error_field_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/search"))
        .respond_with(ResponseTemplate::new(502).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .search(&SearchRequest::industry("trucking"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ApiFailure::Http {
            status: 502,
            message: "Failed to search companies".to_string()
        }
    );
}

#[tokio::test]
async fn progress_defaults_every_missing_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let snapshot = client.progress().await.expect("progress ok");
    assert_eq!(snapshot.companies_found, 0);
    assert!(snapshot.status.is_none());
    assert!(snapshot.details.is_empty());
}

#[tokio::test]
async fn progress_parses_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/progress"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "searching",
            "current_step": "Searching Google Places",
            "companies_found": 4,
            "details": [
                {"time": "10:15:30", "message": "Found: Acme Corp"},
            ],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let snapshot = client.progress().await.expect("progress ok");
    assert_eq!(snapshot.companies_found, 4);
    assert_eq!(snapshot.details[0].message, "Found: Acme Corp");
}

#[tokio::test]
async fn history_filter_travels_as_a_query_parameter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .and(query_param("type", "product"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "count": 1,
            "history": [{
                "id": 1715770000000i64,
                "type": "product",
                "query": "brake pads",
                "industry_filter": "automotive",
                "timestamp": "2024-05-15T11:26:40.000001",
            }],
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let items = client.history(Some("product")).await.expect("history ok");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].kind, "product");
    assert_eq!(items[0].query, "brake pads");
}

#[tokio::test]
async fn history_errors_propagate_to_the_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "disk"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.history(None).await.is_err());
}

#[tokio::test]
async fn append_history_posts_trimmed_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/history"))
        .and(body_json(json!({
            "type": "industry",
            "query": "trucking",
            "industry_filter": "",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .append_history("industry", "  trucking  ", "  ")
        .await
        .expect("append ok");
}

#[tokio::test]
async fn export_reads_the_content_disposition_filename() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    r#"attachment; filename="trucking_20240515.xlsx""#,
                )
                .set_body_bytes(b"PK\x03\x04sheet".to_vec()),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let companies = vec![Company {
        name: "Acme".to_string(),
        industry: "Trucking".to_string(),
        country: "USA".to_string(),
        ..Company::default()
    }];
    let download = client.export(&companies, "trucking").await.expect("export ok");
    assert_eq!(download.filename.as_deref(), Some("trucking_20240515.xlsx"));
    assert_eq!(download.bytes, b"PK\x03\x04sheet".to_vec());
}

#[tokio::test]
async fn export_without_header_leaves_filename_unset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/export"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1, 2, 3]))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let download = client
        .export(&[Company::default()], "companies")
        .await
        .expect("export ok");
    assert!(download.filename.is_none());
}

#[tokio::test]
async fn export_error_body_surfaces_its_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/export"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "No companies to export"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.export(&[], "companies").await.unwrap_err();
    assert_eq!(
        err,
        ApiFailure::Http {
            status: 400,
            message: "No companies to export".to_string()
        }
    );
}
