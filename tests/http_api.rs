use fx_price_simulator::app::config::Config;
use fx_price_simulator::app::server::build_router;
use fx_price_simulator::services::{OpenExchangeRatesClient, SimulatorService};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_app(rates: &MockServer, fallback_rate: Option<f64>) -> String {
    spawn_app_with_timeout(rates, fallback_rate, Duration::from_secs(2)).await
}

async fn spawn_app_with_timeout(rates: &MockServer, fallback_rate: Option<f64>, timeout: Duration) -> String {
    let config = Config {
        app_id: "test-key".to_string(),
        rate_api_url: format!("{}/api/latest.json", rates.uri()),
        fallback_rate,
        ..Config::default()
    };
    let provider = OpenExchangeRatesClient::new(
        config.rate_api_url.clone(),
        config.app_id.clone(),
        timeout,
    )
    .unwrap();
    let service = Arc::new(SimulatorService::new(Arc::new(provider), &config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(service)).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn mount_rate(server: &MockServer, rate: f64) {
    Mock::given(method("GET"))
        .and(path("/api/latest.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "timestamp": 1_700_000_000,
            "base": "USD",
            "rates": { "VES": rate }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let rates = MockServer::start().await;
    let base = spawn_app(&rates, None).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn test_simulate_with_live_rate() {
    let rates = MockServer::start().await;
    mount_rate(&rates, 30.0).await;
    let base = spawn_app(&rates, None).await;

    let body: serde_json::Value = reqwest::get(format!(
        "{}/simulate?cost_per_unit=12&margin_percent=30&new_rate=35",
        base
    ))
    .await
    .unwrap()
    .json()
    .await
    .unwrap();

    assert_eq!(body["report"]["rate_source"], "live");
    assert_eq!(body["report"]["live_rate"], 30.0);
    assert_eq!(body["lines"][1], "Actual Price p/g: 514,29 Bs (17,14 USD)");
    assert_eq!(body["lines"][3], "New Price p/g: 600,00 Bs (17,14 USD)");
    assert_eq!(body["chart"]["series"][0]["values"][1], 420.0);
}

#[tokio::test]
async fn test_simulate_post_rejects_full_margin() {
    let rates = MockServer::start().await;
    mount_rate(&rates, 30.0).await;
    let base = spawn_app(&rates, None).await;

    let response = reqwest::Client::new()
        .post(format!("{}/simulate", base))
        .json(&serde_json::json!({ "cost_per_unit": 12.0, "margin_percent": 100.0 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("margin"));
}

#[tokio::test]
async fn test_upstream_failure_uses_fallback() {
    let rates = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&rates)
        .await;
    let base = spawn_app(&rates, Some(30.0)).await;

    let body: serde_json::Value = reqwest::get(format!("{}/simulate", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["report"]["rate_source"], "fallback");
    assert_eq!(body["report"]["actual"]["exchange_rate"], 30.0);

    let response = reqwest::get(format!("{}/rate", base)).await.unwrap();
    assert_eq!(response.status().as_u16(), 502);

    let metrics: serde_json::Value = reqwest::get(format!("{}/metrics", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(metrics["counters"]["fallback_used"], 1);
    assert_eq!(metrics["counters"]["rate_fetch_failed"], 2);
}

#[tokio::test]
async fn test_slow_upstream_uses_fallback() {
    let rates = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "rates": { "VES": 36.5 } }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&rates)
        .await;
    let base = spawn_app_with_timeout(&rates, Some(30.0), Duration::from_millis(200)).await;

    let response = reqwest::get(format!("{}/simulate", base)).await.unwrap();
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["report"]["rate_source"], "fallback");
    assert_eq!(body["report"]["actual"]["exchange_rate"], 30.0);
}

#[tokio::test]
async fn test_malformed_json_body_gets_json_error() {
    let rates = MockServer::start().await;
    let base = spawn_app(&rates, Some(30.0)).await;

    let response = reqwest::Client::new()
        .post(format!("{}/simulate", base))
        .header("content-type", "application/json")
        .body("{cost_per_unit: 12")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unparseable_query_gets_json_error() {
    let rates = MockServer::start().await;
    let base = spawn_app(&rates, Some(30.0)).await;

    let response = reqwest::get(format!("{}/simulate?cost_per_unit=abc", base))
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}
