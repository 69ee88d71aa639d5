//! End-to-end tests over a running server on an ephemeral port.

use beanhub_server::{AppConfig, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// Memory backend, no seed import: every test starts from an empty catalog.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.seed.enabled = false;
    config
}

async fn start_server(
    config: AppConfig,
) -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let app = build_app(&config).await.expect("build app");

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

fn bean_payload(name: &str, country: &str) -> Value {
    json!({
        "name": name,
        "colour": "dark roast",
        "country": country,
        "description": "integration test bean",
        "price": "12.50",
        "imageUrl": "https://example.com/bean.png",
    })
}

async fn create_bean(client: &reqwest::Client, base: &str, payload: &Value) -> Value {
    let resp = client
        .post(format!("{base}/coffeeBeans"))
        .json(payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    resp.json().await.unwrap()
}

#[tokio::test]
async fn service_endpoints_work() {
    beanhub_server::metrics::init_metrics();
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    // GET /
    let resp = client.get(format!("{base}/")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["service"], "BeanHub");
    assert_eq!(body["status"], "ok");

    // GET /healthz
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    // GET /readyz (memory backend always answers)
    let resp = client.get(format!("{base}/readyz")).send().await.unwrap();
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ready");

    // GET /metrics, after the requests above have been recorded
    let resp = client.get(format!("{base}/metrics")).send().await.unwrap();
    assert!(resp.status().is_success());
    let text = resp.text().await.unwrap();
    assert!(text.contains("http_requests_total"));

    // Every response mirrors a request id
    let resp = client.get(format!("{base}/healthz")).send().await.unwrap();
    assert!(resp.headers().get("x-request-id").is_some());

    // A caller-supplied request id is kept
    let resp = client
        .get(format!("{base}/healthz"))
        .header("x-request-id", "test-trace-7")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "test-trace-7"
    );

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn crud_roundtrip() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    // Create
    let created = create_bean(&client, &base, &bean_payload("Futuris", "Colombia")).await;
    let id = created["id"].as_i64().expect("assigned id");
    assert_eq!(created["name"], "Futuris");
    assert_eq!(created["price"], "12.50");
    assert_eq!(created["available"], true);

    // Read back
    let resp = client
        .get(format!("{base}/coffeeBeans/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);

    // Replace
    let mut updated = bean_payload("Futuris Reserve", "Colombia");
    updated["id"] = json!(id);
    updated["price"] = json!("14.00");
    let resp = client
        .put(format!("{base}/coffeeBeans/{id}"))
        .json(&updated)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Futuris Reserve");
    assert_eq!(body["price"], "14.00");

    // The item entry was invalidated, so the read reflects the update
    let resp = client
        .get(format!("{base}/coffeeBeans/{id}"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "Futuris Reserve");

    // Delete, then the item is gone
    let resp = client
        .delete(format!("{base}/coffeeBeans/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = client
        .get(format!("{base}/coffeeBeans/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = client
        .delete(format!("{base}/coffeeBeans/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn listing_reflects_writes_through_the_cache() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    let first = create_bean(&client, &base, &bean_payload("Zanity", "Kenya")).await;

    // Warm the listing cache
    let resp = client.get(format!("{base}/coffeeBeans")).send().await.unwrap();
    let listing: Value = resp.json().await.unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);

    // A create must drop the cached listing
    create_bean(&client, &base, &bean_payload("Turnabout", "Peru")).await;
    let resp = client.get(format!("{base}/coffeeBeans")).send().await.unwrap();
    let listing: Value = resp.json().await.unwrap();
    let names: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Zanity"));
    assert!(names.contains(&"Turnabout"));

    // A delete must drop it as well
    let resp = client
        .delete(format!(
            "{base}/coffeeBeans/{}",
            first["id"].as_i64().unwrap()
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 204);

    let resp = client.get(format!("{base}/coffeeBeans")).send().await.unwrap();
    let listing: Value = resp.json().await.unwrap();
    let names: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Turnabout"]);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn validation_failures_return_400_with_field_name() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    let mut payload = bean_payload("", "Colombia");
    payload["name"] = json!("   ");
    let resp = client
        .post(format!("{base}/coffeeBeans"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("name"));

    let mut payload = bean_payload("Futuris", "Colombia");
    payload["price"] = json!("-1.00");
    let resp = client
        .post(format!("{base}/coffeeBeans"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("price"));

    // Nothing was created by the failed requests
    let resp = client.get(format!("{base}/coffeeBeans")).send().await.unwrap();
    let listing: Value = resp.json().await.unwrap();
    assert!(listing.as_array().unwrap().is_empty());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn update_rejects_mismatched_body_id() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    let created = create_bean(&client, &base, &bean_payload("Isonus", "Ethiopia")).await;
    let id = created["id"].as_i64().unwrap();

    let mut payload = bean_payload("Isonus", "Ethiopia");
    payload["id"] = json!(id + 1);
    let resp = client
        .put(format!("{base}/coffeeBeans/{id}"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    let message = body["message"].as_str().unwrap();
    assert!(message.contains(&id.to_string()));
    assert!(message.contains(&(id + 1).to_string()));

    // Updating something that does not exist is a 404
    let resp = client
        .put(format!("{base}/coffeeBeans/{}", id + 50))
        .json(&bean_payload("Ghost", "Nowhere"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn search_is_case_insensitive_and_requires_query() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    create_bean(&client, &base, &bean_payload("Zanity", "Kenya")).await;
    create_bean(&client, &base, &bean_payload("Futuris", "Colombia")).await;

    let resp = client
        .get(format!("{base}/coffeeBeans/search?query=KEN"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let results: Value = resp.json().await.unwrap();
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Zanity");

    // Substring across fields: "rout" is not in any field, "olom" is
    let resp = client
        .get(format!("{base}/coffeeBeans/search?query=olom"))
        .send()
        .await
        .unwrap();
    let results: Value = resp.json().await.unwrap();
    assert_eq!(results.as_array().unwrap().len(), 1);

    // No query parameter at all is a 400
    let resp = client
        .get(format!("{base}/coffeeBeans/search"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("query"));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn bean_of_the_day_is_stable_across_calls() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    create_bean(&client, &base, &bean_payload("Zolarity", "Guatemala")).await;
    create_bean(&client, &base, &bean_payload("Combogene", "Costa Rica")).await;
    create_bean(&client, &base, &bean_payload("Xoggle", "Indonesia")).await;

    let resp = client
        .get(format!("{base}/coffeeBeans/bean-of-the-day"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let first: Value = resp.json().await.unwrap();
    assert!(first["id"].as_i64().is_some());

    for _ in 0..5 {
        let resp = client
            .get(format!("{base}/coffeeBeans/bean-of-the-day"))
            .send()
            .await
            .unwrap();
        let again: Value = resp.json().await.unwrap();
        assert_eq!(again["id"], first["id"]);
    }

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn bean_of_the_day_with_empty_catalog_is_a_generic_500() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/coffeeBeans/bean-of-the-day"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "internal_error");
    assert_eq!(body["message"], "An unexpected error occurred.");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn development_mode_passes_underlying_errors_through() {
    let mut config = test_config();
    config.server.development = true;
    let (base, shutdown_tx, handle) = start_server(config).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/coffeeBeans/bean-of-the-day"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "No coffee beans available to select from.");

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn not_found_and_bad_path_ids() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/coffeeBeans/999"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
    assert!(body["message"].as_str().unwrap().contains("999"));

    // A non-numeric id never reaches the handler
    let resp = client
        .get(format!("{base}/coffeeBeans/not-a-number"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 400);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn empty_query_matches_everything_including_unavailable() {
    let (base, shutdown_tx, handle) = start_server(test_config()).await;
    let client = reqwest::Client::new();

    create_bean(&client, &base, &bean_payload("Quarism", "Rwanda")).await;
    let mut hidden = bean_payload("Marcatura", "Honduras");
    hidden["available"] = json!(false);
    create_bean(&client, &base, &hidden).await;

    // The listing filters on availability
    let resp = client.get(format!("{base}/coffeeBeans")).send().await.unwrap();
    let listing: Value = resp.json().await.unwrap();
    assert_eq!(listing.as_array().unwrap().len(), 1);

    // Search does not
    let resp = client
        .get(format!("{base}/coffeeBeans/search?query="))
        .send()
        .await
        .unwrap();
    let results: Value = resp.json().await.unwrap();
    assert_eq!(results.as_array().unwrap().len(), 2);

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
