use lead_intake::{AppState, RateLimiter, app};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

// boot the router on an ephemeral port, returns base url
async fn spawn_server(rate_limit: u32, window: Duration) -> String {
    let limiter = Arc::new(RateLimiter::new(rate_limit, window));
    let state = Arc::new(AppState::new(limiter));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn post_lead(client: &reqwest::Client, base: &str, ip: Option<&str>, body: Value) -> (u16, Value) {
    let mut req = client.post(format!("{}/api/lead", base)).json(&body);
    if let Some(ip) = ip {
        req = req.header("x-forwarded-for", ip);
    }
    let res = req.send().await.unwrap();
    let status = res.status().as_u16();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn accepts_valid_lead() {
    let base = spawn_server(5, Duration::from_secs(60)).await;
    let client = reqwest::Client::new();

    let (status, body) = post_lead(
        &client,
        &base,
        Some("198.51.100.1"),
        json!({
            "company": " Acme SaaS ",
            "email": "founder@acme.io",
            "description": "B2B analytics",
            "offer_expires": "2025-12-20"
        }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true, "message": "Lead submitted successfully"}));
}

#[tokio::test]
async fn validation_failures_are_400_with_first_message() {
    let base = spawn_server(100, Duration::from_secs(60)).await;
    let client = reqwest::Client::new();

    let cases = [
        (json!({"company": "  ", "email": "a@b.com"}), "Company name is required"),
        (json!({"company": "Acme"}), "Email is required"),
        (json!({"company": "Acme", "email": "not-an-email"}), "Invalid email format"),
        (
            json!({"company": "Acme", "email": "a@b.com", "description": "x".repeat(251)}),
            "Description must be 250 characters or less",
        ),
        (
            json!({"email": "bad", "description": "x".repeat(251)}),
            "Company name is required",
        ),
    ];

    for (payload, message) in cases {
        let (status, body) = post_lead(&client, &base, Some("198.51.100.2"), payload).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({"error": message}));
    }
}

#[tokio::test]
async fn malformed_body_is_500() {
    let base = spawn_server(5, Duration::from_secs(60)).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/lead", base))
        .header("content-type", "application/json")
        .body("{\"company\": ")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn sixth_request_in_window_is_429() {
    let base = spawn_server(5, Duration::from_secs(60)).await;
    let client = reqwest::Client::new();
    let lead = json!({"company": "Acme", "email": "a@b.com"});

    for _ in 0..5 {
        let (status, _) = post_lead(&client, &base, Some("203.0.113.9"), lead.clone()).await;
        assert_eq!(status, 200);
    }

    let (status, body) = post_lead(&client, &base, Some("203.0.113.9"), lead.clone()).await;
    assert_eq!(status, 429);
    assert_eq!(body, json!({"error": "Too many requests. Please try again later."}));

    // other clients are unaffected
    let (status, _) = post_lead(&client, &base, Some("203.0.113.10"), lead).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn rejected_submissions_still_count_against_quota() {
    let base = spawn_server(2, Duration::from_secs(60)).await;
    let client = reqwest::Client::new();

    let (status, _) = post_lead(&client, &base, None, json!({"company": ""})).await;
    assert_eq!(status, 400);
    let (status, _) = post_lead(&client, &base, None, json!({"company": "Acme", "email": "a@b.com"})).await;
    assert_eq!(status, 200);

    // no header, so these share the "unknown" bucket
    let (status, _) = post_lead(&client, &base, None, json!({"company": "Other", "email": "o@b.com"})).await;
    assert_eq!(status, 429);
}

#[tokio::test]
async fn quota_comes_back_after_window() {
    let base = spawn_server(1, Duration::from_millis(200)).await;
    let client = reqwest::Client::new();
    let lead = json!({"company": "Acme", "email": "a@b.com"});

    let (status, _) = post_lead(&client, &base, Some("192.0.2.4"), lead.clone()).await;
    assert_eq!(status, 200);
    let (status, _) = post_lead(&client, &base, Some("192.0.2.4"), lead.clone()).await;
    assert_eq!(status, 429);

    tokio::time::sleep(Duration::from_millis(300)).await;

    let (status, _) = post_lead(&client, &base, Some("192.0.2.4"), lead).await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn health_and_metrics_endpoints() {
    let base = spawn_server(5, Duration::from_secs(60)).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", base)).send().await.unwrap();
    assert_eq!(res.status().as_u16(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");

    let (status, _) = post_lead(&client, &base, Some("192.0.2.50"), json!({"company": "Acme", "email": "a@b.com"})).await;
    assert_eq!(status, 200);

    let text = client
        .get(format!("{}/metrics", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(text.contains("lead_requests_total"));
    assert!(text.contains("lead_accepted_total"));
}

// value of a sample line such as `name{labels} 3`
fn metric_value(text: &str, series: &str) -> Option<f64> {
    text.lines()
        .find(|line| line.starts_with(series) && line[series.len()..].starts_with(' '))
        .and_then(|line| line[series.len()..].trim().parse().ok())
}

#[tokio::test]
async fn rejections_are_counted_by_reason() {
    let base = spawn_server(5, Duration::from_secs(60)).await;
    let client = reqwest::Client::new();

    let (status, _) = post_lead(&client, &base, Some("192.0.2.77"), json!({"company": "Acme", "email": "nope"})).await;
    assert_eq!(status, 400);

    let text = client
        .get(format!("{}/metrics", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    let invalid = metric_value(&text, "lead_rejected_total{reason=\"invalid_email\"}");
    assert!(invalid.is_some_and(|v| v >= 1.0), "{text}");

    // the rejected client is still tracked by the limiter
    let clients = metric_value(&text, "lead_rate_limit_clients");
    assert!(clients.is_some_and(|v| v >= 1.0), "{text}");
}
