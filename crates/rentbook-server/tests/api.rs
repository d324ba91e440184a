//! End-to-end requests through the router, backed by the in-memory grid

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::BodyExt;
use hyper::{Method, Request, StatusCode};
use pretty_assertions::assert_eq;
use rentbook::{LedgerLayout, Rentbook, Target};
use rentbook_grid::{MemoryGrid, Rows};
use rentbook_server::{route, AppState, CorsPolicy, TokenGate};
use serde_json::{json, Value};

const TOKEN: &str = "test-token";

fn rows(data: &[&[&str]]) -> Rows {
    data.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn grid() -> Arc<MemoryGrid> {
    Arc::new(
        MemoryGrid::new()
            .with_sheet(
                "prod",
                "Summary",
                rows(&[
                    &["Floor", "Rent", "Deposit", "Rent total", "Electricity total", "Start", "Last"],
                    &["Flat-1", "5000", "10000", "0", "0", "01/04/2023"],
                ]),
            )
            .with_sheet(
                "prod",
                "FinancialReport",
                rows(&[&["Month", "Flat-1"], &["Jan", "10"], &["Feb", "5"], &["Mar", "7"]]),
            )
            .with_sheet("prod", "Flat-1", vec![])
            .with_sheet("prod", "Flat-2", vec![])
            .with_sheet("demo", "Summary", vec![])
            .with_sheet("demo", "Demo-1", vec![]),
    )
}

fn state_with(grid: Arc<MemoryGrid>, tokens: &[&str]) -> AppState {
    AppState {
        book: Rentbook::new(grid, LedgerLayout::default(), Target::new("prod", 5))
            .with_demo(Target::new("demo", 3)),
        gate: TokenGate::new(tokens.iter().copied()),
        cors: CorsPolicy::new(vec!["https://rent-directory.netlify.app".into()]),
        prefix: "/rent".into(),
    }
}

fn state() -> AppState {
    state_with(grid(), &[TOKEN])
}

async fn call(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = body
        .map(|b| Bytes::from(serde_json::to_vec(&b).unwrap()))
        .unwrap_or_default();
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .header("content-type", "application/json")
        .body(body)
        .unwrap();

    let reply = route(req, state).await;
    let status = reply.status();
    let bytes = reply.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_add_then_read_recent_entries() {
    let state = state();

    let (status, body) = call(
        &state,
        Method::POST,
        "/rent/add-rent-entry",
        Some(json!({ "sheet": "Flat-1", "values": [["01/2024", 5000, "paid"]] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "message": "Entry Successfully Added", "data": { "entriesAdded": 1 } })
    );

    call(
        &state,
        Method::POST,
        "/rent/add-rent-entry",
        Some(json!({
            "sheet": "Flat-1",
            "values": [["01/2024", "640", ""]],
            "isElectricBill": true
        })),
    )
    .await;
    call(
        &state,
        Method::POST,
        "/rent/add-rent-entry",
        Some(json!({ "sheet": "Flat-1", "values": [["02/2024", 5000]] })),
    )
    .await;

    let (status, body) = call(&state, Method::GET, "/rent/recent-entries?sheet=Flat-1", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["page"], 1);
    assert_eq!(data["pageSize"], 10);
    assert_eq!(data["totalEntries"], 2);
    assert_eq!(data["totalPages"], 1);
    assert_eq!(data["rows"][0]["rentData"]["monthYear"], "02/2024");
    assert!(data["rows"][0].get("electricityData").is_none());
    assert_eq!(data["rows"][1]["electricityData"]["monthYear"], "01/2024");
    assert_eq!(data["sheetSummary"]["floor"], "Flat-1");
    assert_eq!(data["sheetSummary"]["lastEntryDate"], "02/2024");
}

#[tokio::test]
async fn test_recent_entries_validation() {
    let state = state();

    let (status, body) = call(&state, Method::GET, "/rent/recent-entries", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "Sheet name is mandatory." }));

    for query in ["page=0", "pageSize=0", "page=abc", "pageSize=-2"] {
        let uri = format!("/rent/recent-entries?sheet=Flat-1&{query}");
        let (status, body) = call(&state, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid page or pageSize values"));
    }

    let (status, body) = call(
        &state,
        Method::GET,
        "/rent/recent-entries?sheet=Flat-1&page=4&pageSize=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rows"], json!([]));
    assert_eq!(body["data"]["sheetSummary"]["floor"], "Flat-1");

    let (status, _) = call(&state, Method::GET, "/rent/recent-entries?sheet=All-Units", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_amount_lifecycle() {
    let state = state();
    call(
        &state,
        Method::POST,
        "/rent/add-rent-entry",
        Some(json!({ "sheet": "Flat-2", "values": [["03/2024", 700, "meter"]], "isElectricBill": "true" })),
    )
    .await;

    let (status, body) = call(
        &state,
        Method::GET,
        "/rent/amount?sheet=Flat-2&monthYear=03%2F2024&isElectricBill=true",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["amount"],
        json!({ "monthYear": "03/2024", "amount": 700.0, "note": "meter" })
    );

    let (status, body) = call(
        &state,
        Method::PUT,
        "/rent/amount",
        Some(json!({
            "sheet": "Flat-2",
            "monthYear": "03/2024",
            "isElectricBill": true,
            "values": [["03/2024", 725.5, "corrected"]]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["entriesUpdated"], 1);

    let (_, body) = call(
        &state,
        Method::GET,
        "/rent/amount?sheet=Flat-2&monthYear=03/2024&isElectricBill=1",
        None,
    )
    .await;
    assert_eq!(body["data"]["amount"]["amount"], 725.5);
    assert_eq!(body["data"]["amount"]["note"], "corrected");

    let (status, _) = call(
        &state,
        Method::DELETE,
        "/rent/amount?sheet=Flat-2&monthYear=03/2024&isElectricBill=true",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // The rent block never held this key, and the cleared record is gone.
    for uri in [
        "/rent/amount?sheet=Flat-2&monthYear=03/2024",
        "/rent/amount?sheet=Flat-2&monthYear=03/2024&isElectricBill=true",
    ] {
        let (status, body) = call(&state, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "message": "No matching entry found for '03/2024'." }));
    }
}

#[tokio::test]
async fn test_missing_fields_are_rejected() {
    let state = state();

    let cases = [
        (Method::POST, "/rent/add-rent-entry", Some(json!({ "sheet": "Flat-1" }))),
        (Method::POST, "/rent/add-rent-entry", Some(json!({ "values": [["01/2024"]] }))),
        (Method::POST, "/rent/add-rent-entry", Some(json!({ "sheet": "Flat-1", "values": "x" }))),
        (Method::POST, "/rent/add-rent-entry", Some(json!({ "sheet": "Flat-1", "values": [["", 1]] }))),
        (Method::POST, "/rent/add-rent-entry", None),
        (Method::GET, "/rent/amount?sheet=Flat-1", None),
        (Method::PUT, "/rent/amount", Some(json!({ "sheet": "Flat-1", "monthYear": "01/2024" }))),
        (Method::DELETE, "/rent/amount?monthYear=01/2024", None),
        (Method::PUT, "/rent/update-summary", Some(json!({ "values": ["1"] }))),
        (Method::GET, "/rent/tenants/financial-total?from=Jan&to=Mar", None),
    ];
    for (method, uri, body) in cases {
        let label = format!("{method} {uri} {body:?}");
        let (status, reply) = call(&state, method, uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{label}");
        assert!(reply["message"].is_string(), "{label}");
    }
}

#[tokio::test]
async fn test_units_flats_and_totals() {
    let state = state();

    let (status, body) = call(&state, Method::GET, "/rent/tenants/formData", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "label": "All-Units", "value": "All-Units" },
            { "label": "Flat-1", "value": "Flat-1" },
            { "label": "Flat-2", "value": "Flat-2" },
        ])
    );

    let (_, body) = call(&state, Method::GET, "/rent/tenants/formData?demoLogin=true", None).await;
    assert_eq!(body["data"][1]["value"], "Demo-1");

    let (status, body) = call(&state, Method::GET, "/rent/all-flats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["floor"], "Flat-1");
    assert_eq!(body["data"][0]["rentPerMonth"], 5000.0);

    let (status, body) = call(
        &state,
        Method::GET,
        "/rent/tenants/financial-total?from=Jan&to=Mar&tenant=Flat-1",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 22.0);

    let (status, _) = call(
        &state,
        Method::GET,
        "/rent/tenants/financial-total?from=Jan&to=Mar&tenant=Nobody",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_summary() {
    let grid = grid();
    let state = state_with(grid.clone(), &[TOKEN]);

    let (status, body) = call(
        &state,
        Method::PUT,
        "/rent/update-summary",
        Some(json!({ "flat": "Flat-1", "values": [5200, 10400] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let summary = grid.sheet_rows("prod", "Summary").await.unwrap();
    assert_eq!(summary[1][..3], ["Flat-1", "5200", "10400"]);

    let (status, _) = call(
        &state,
        Method::PUT,
        "/rent/update-summary",
        Some(json!({ "flat": "Flat-9", "values": [1] })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_upstream_errors_pass_through() {
    let state = state();
    let (status, body) = call(&state, Method::GET, "/rent/recent-entries?sheet=Nope", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Unable to parse range: Nope!A7:Z");
}

#[tokio::test]
async fn test_auth_and_routing() {
    let state = state();

    let req = Request::builder()
        .uri("/rent/all-flats")
        .body(Bytes::new())
        .unwrap();
    let reply = route(req, &state).await;
    assert_eq!(reply.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder().uri("/health").body(Bytes::new()).unwrap();
    assert_eq!(route(req, &state).await.status(), StatusCode::OK);

    let (status, _) = call(&state, Method::GET, "/rent/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&state, Method::GET, "/all-flats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&state, Method::POST, "/rent/all-flats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let open = state_with(grid(), &[]);
    let req = Request::builder()
        .uri("/rent/all-flats")
        .body(Bytes::new())
        .unwrap();
    assert_eq!(route(req, &open).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cors_preflight_and_headers() {
    let state = state();

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/rent/add-rent-entry")
        .header("origin", "http://localhost:5173")
        .body(Bytes::new())
        .unwrap();
    let reply = route(req, &state).await;
    assert_eq!(reply.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        reply.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
    assert!(reply.headers().contains_key("access-control-allow-methods"));

    let req = Request::builder()
        .uri("/health")
        .header("origin", "https://rent-directory.netlify.app")
        .body(Bytes::new())
        .unwrap();
    let reply = route(req, &state).await;
    assert_eq!(
        reply.headers()["access-control-allow-credentials"],
        "true"
    );

    let req = Request::builder()
        .uri("/health")
        .header("origin", "https://elsewhere.example")
        .body(Bytes::new())
        .unwrap();
    let reply = route(req, &state).await;
    assert!(!reply.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_demo_flag_routes_to_demo_spreadsheet() {
    let grid = grid();
    let state = state_with(grid.clone(), &[TOKEN]);

    let (status, _) = call(
        &state,
        Method::POST,
        "/rent/add-rent-entry",
        Some(json!({ "sheet": "Demo-1", "values": [["01/2024", 1]], "demoLogin": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let demo = grid.sheet_rows("demo", "Demo-1").await.unwrap();
    assert_eq!(demo[6][0], "01/2024");

    // "false" keeps requests on production, where Demo-1 does not exist.
    let (status, _) = call(
        &state,
        Method::GET,
        "/rent/recent-entries?sheet=Demo-1&demoLogin=false",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
