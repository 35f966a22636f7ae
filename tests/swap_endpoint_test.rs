use auratax::api;
use auratax::ledger::{MemoryTransactionLog, TransactionLog};
use auratax::orchestration::TaxCollector;
use auratax::provider::{SettingsStore, TaxSettingsProvider};
use auratax::settlement::{MockSettlement, SettlementError};
use axum::http::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    log: Arc<MemoryTransactionLog>,
    settlement: Arc<MockSettlement>,
}

fn setup_test_app(settlement: MockSettlement, timeout: Duration) -> TestApp {
    let log = Arc::new(MemoryTransactionLog::new());
    let settlement = Arc::new(settlement);
    let settings = Arc::new(SettingsStore::default());
    let collector = TaxCollector::new(
        settings.clone() as Arc<dyn TaxSettingsProvider>,
        settlement.clone(),
        log.clone() as Arc<dyn TransactionLog>,
        timeout,
    );
    let app = api::create_router(api::AppState::new(collector, settings));
    TestApp {
        app,
        log,
        settlement,
    }
}

fn default_app() -> TestApp {
    setup_test_app(MockSettlement::succeeding(), Duration::from_secs(5))
}

async fn send(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn swap_body(wallet: &str, amount: f64, pair: &str, kind: &str) -> Value {
    json!({
        "userWallet": wallet,
        "fromToken": "SOL",
        "toToken": "AURA",
        "swapAmount": amount,
        "tradingPair": pair,
        "transactionType": kind,
    })
}

fn assert_close(actual: &Value, expected: f64) {
    let actual = actual.as_f64().expect("expected a JSON number");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[tokio::test]
async fn test_swap_tax_within_bounds() {
    let t = default_app();
    let (status, body) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 100.0, "SOL/AURA", "swap")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["isExempt"], false);
    assert_close(&body["taxAmount"], 2.0);
    assert_close(&body["taxRate"], 2.0);
    assert_close(&body["afterTaxAmount"], 98.0);
    assert_eq!(body["status"], "completed");
    assert_eq!(body["message"], "Tax collected successfully");
    assert_eq!(body["taxWallet"], "fa1ra81T7g5DzSn7XT6z36zNqupHpG1Eh7omB2F6GTh");
    assert!(body["transactionId"].as_str().unwrap().starts_with("tax_"));
    assert_eq!(t.log.len().await, 1);
}

#[tokio::test]
async fn test_swap_tax_clamped_to_minimum_and_maximum() {
    let t = default_app();

    let (_, small) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 0.01, "SOL/AURA", "swap")),
    )
    .await;
    assert_close(&small["taxAmount"], 0.001);
    assert_close(&small["afterTaxAmount"], 0.009);

    let (_, large) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 1000.0, "SOL/AURA", "swap")),
    )
    .await;
    assert_close(&large["taxAmount"], 10.0);
    assert_close(&large["afterTaxAmount"], 990.0);
}

#[tokio::test]
async fn test_buy_and_sell_use_their_own_rates() {
    let t = default_app();

    let (_, buy) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 100.0, "USDC/AURA", "buy")),
    )
    .await;
    assert_close(&buy["taxRate"], 1.5);
    assert_close(&buy["taxAmount"], 1.5);

    let (_, sell) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 100.0, "RAY/AURA", "sell")),
    )
    .await;
    assert_close(&sell["taxRate"], 2.5);
    assert_close(&sell["afterTaxAmount"], 97.5);
}

#[tokio::test]
async fn test_untaxed_pair_is_exempt_and_not_recorded() {
    let t = default_app();
    let (status, body) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 100.0, "SOL/USDC", "swap")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isExempt"], true);
    assert_eq!(body["exemptReason"], "Trading pair not subject to tax");
    assert_eq!(body["message"], "Trading pair exempt from tax");
    assert_close(&body["taxAmount"], 0.0);
    assert_close(&body["afterTaxAmount"], 100.0);
    assert!(body.get("transactionId").is_none());
    assert!(t.log.is_empty().await);
    assert_eq!(t.settlement.calls(), 0);
}

#[tokio::test]
async fn test_missing_field_rejected() {
    let t = default_app();
    let mut body = swap_body("wallet_a", 100.0, "SOL/AURA", "swap");
    body.as_object_mut().unwrap().remove("fromToken");

    let (status, body) = send(t.app.clone(), "POST", "/tax/swap", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required field: fromToken");
}

#[tokio::test]
async fn test_invalid_transaction_type_rejected() {
    let t = default_app();
    let (status, body) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 100.0, "SOL/AURA", "stake")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid transactionType. Must be: buy, sell, or swap");
    assert!(t.log.is_empty().await);
}

#[tokio::test]
async fn test_non_positive_amount_rejected() {
    let t = default_app();
    let (status, body) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 0.0, "SOL/AURA", "swap")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "swapAmount must be greater than zero");
}

#[tokio::test]
async fn test_amount_too_large_to_tax_rejected() {
    let t = default_app();
    let (status, body) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 7e28, "SOL/AURA", "swap")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "swapAmount is too large");
    assert!(t.log.is_empty().await);
    assert_eq!(t.settlement.calls(), 0);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let t = default_app();
    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/tax/swap")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let resp = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_failed_settlement_is_recorded_as_failed() {
    let t = setup_test_app(
        MockSettlement::failing(SettlementError::Rejected("insufficient funds".to_string())),
        Duration::from_secs(5),
    );
    let (status, body) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 100.0, "SOL/AURA", "swap")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Tax collection failed");
    assert_close(&body["taxAmount"], 2.0);
    assert_eq!(t.log.len().await, 1);
}

#[tokio::test]
async fn test_slow_settlement_times_out_as_failed() {
    let t = setup_test_app(
        MockSettlement::succeeding().with_delay(Duration::from_millis(500)),
        Duration::from_millis(20),
    );
    let (_, body) = send(
        t.app.clone(),
        "POST",
        "/tax/swap",
        Some(swap_body("wallet_a", 100.0, "SOL/AURA", "swap")),
    )
    .await;

    assert_eq!(body["status"], "failed");
}

#[tokio::test]
async fn test_swap_stats_window_and_wallet_filter() {
    let t = default_app();
    for wallet in ["wallet_a", "wallet_a", "wallet_b"] {
        send(
            t.app.clone(),
            "POST",
            "/tax/swap",
            Some(swap_body(wallet, 100.0, "SOL/AURA", "swap")),
        )
        .await;
    }

    let (status, body) = send(t.app.clone(), "GET", "/tax/swap?period=7d", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["period"], "7d");
    assert_eq!(data["totalTransactions"], 3);
    assert_eq!(data["completedTransactions"], 3);
    assert_close(&data["totalTaxCollected"], 6.0);
    assert_close(&data["averageTaxAmount"], 2.0);
    assert_close(&data["successRate"], 100.0);
    assert_eq!(data["transactions"].as_array().unwrap().len(), 3);
    assert_eq!(data["operationBreakdown"]["swap"]["count"], 3);

    let (_, body) = send(t.app.clone(), "GET", "/tax/swap?wallet=wallet_b", None).await;
    let data = &body["data"];
    assert_eq!(data["period"], "24h");
    assert_eq!(data["totalTransactions"], 1);
    assert_eq!(data["transactions"][0]["walletId"], "wallet_b");
    assert_eq!(data["globalStats"]["totalCount"], 3);
}

#[tokio::test]
async fn test_swap_stats_newest_first_and_limited() {
    let t = default_app();
    for _ in 0..55 {
        send(
            t.app.clone(),
            "POST",
            "/tax/swap",
            Some(swap_body("wallet_a", 100.0, "SOL/AURA", "swap")),
        )
        .await;
    }

    let (_, body) = send(t.app.clone(), "GET", "/tax/swap", None).await;
    let data = &body["data"];
    assert_eq!(data["totalTransactions"], 55);
    let transactions = data["transactions"].as_array().unwrap();
    assert_eq!(transactions.len(), 50);

    let first = transactions[0]["timestamp"].as_str().unwrap();
    let last = transactions[49]["timestamp"].as_str().unwrap();
    let first = chrono::DateTime::parse_from_rfc3339(first).unwrap();
    let last = chrono::DateTime::parse_from_rfc3339(last).unwrap();
    assert!(first >= last);
}

#[tokio::test]
async fn test_swap_stats_rejects_unknown_period() {
    let t = default_app();
    let (status, body) = send(t.app.clone(), "GET", "/tax/swap?period=1y", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health_and_ready() {
    let t = default_app();
    let (status, body) = send(t.app.clone(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(t.app.clone(), "GET", "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}
