//! End-to-end path relaying across real site servers.

use recursive_delay::lifecycle::Shutdown;
use serde_json::json;

mod common;

#[tokio::test]
async fn test_single_site_path_finishes_locally() {
    let shutdown = Shutdown::new();
    let a = common::start_site(1, &shutdown).await;

    let body = common::client()
        .post(a.url())
        .json(&json!({"id": "p1", "sites": [{"addr": "http://site-b"}]}))
        .send()
        .await
        .expect("site unreachable")
        .text()
        .await
        .unwrap();

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 2, "{}", body);
    assert!(lines[0].starts_with("site: http://site-b; queuing delay: "));
    assert!(lines[0].contains("; service time: "));
    assert_eq!(lines[1], "finished path p1");

    shutdown.trigger();
}

#[tokio::test]
async fn test_three_hop_path_accumulates_reports() {
    let shutdown = Shutdown::new();
    let a = common::start_site(2, &shutdown).await;
    let b = common::start_site(1, &shutdown).await;
    let c = common::start_site(0, &shutdown).await;

    let path = json!({
        "id": "chain",
        "sites": [
            {"addr": a.url(), "service-time": "5ms"},
            {"addr": b.url(), "service-time": "10ms"},
            {"addr": c.url(), "service-time-distribution": {"type": "poisson", "parameters": {"lambda": 1000}}},
        ]
    });

    let res = common::client().post(a.url()).json(&path).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();

    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines.len(), 4, "{}", body);
    assert!(lines[0].starts_with(&format!("site: {};", a.url())));
    assert!(lines[1].starts_with(&format!("site: {};", b.url())));
    assert!(lines[2].starts_with(&format!("site: {};", c.url())));
    assert_eq!(lines[3], "finished path chain");

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_next_hop_reported_as_text() {
    let shutdown = Shutdown::new();
    let a = common::start_site(1, &shutdown).await;

    let path = json!({
        "id": "broken",
        "sites": [{"addr": a.url()}, {"addr": "http://127.0.0.1:9"}]
    });
    let res = common::client().post(a.url()).json(&path).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let body = res.text().await.unwrap();

    assert!(body.starts_with(&format!("site: {};", a.url())));
    assert!(body.contains(&format!("Error occurred on site {} when forwarding:", a.url())));
    assert!(!body.contains("finished path"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_success_next_hop_is_a_forward_failure() {
    let shutdown = Shutdown::new();
    let a = common::start_site(1, &shutdown).await;
    let backend = common::start_fixed_backend("503 Service Unavailable", "overloaded").await;

    let path = json!({
        "id": "rejected",
        "sites": [{"addr": a.url()}, {"addr": format!("http://{}", backend)}]
    });
    let body = common::client()
        .post(a.url())
        .json(&path)
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("when forwarding:"), "{}", body);
    assert!(body.contains("503"));
    assert!(body.contains("overloaded"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_malformed_input_not_admitted() {
    let shutdown = Shutdown::new();
    let a = common::start_site(1, &shutdown).await;
    let client = common::client();

    let res = client.post(a.url()).body("{\"id\": 3").send().await.unwrap();
    assert_eq!(res.status(), 400);
    assert!(res.text().await.unwrap().starts_with("Error occurred on json decoding:"));

    let res = client
        .post(a.url())
        .json(&json!({"id": "none", "sites": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert_eq!(res.text().await.unwrap(), "You should at least specify one site\n");

    shutdown.trigger();
}

#[tokio::test]
async fn test_worker_count_endpoint() {
    let shutdown = Shutdown::new();
    let a = common::start_site(4, &shutdown).await;

    let body = common::client()
        .get(format!("{}/nrservers", a.url()))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "4\n");
    assert_eq!(a.site.scheduler().worker_count(), 4);

    shutdown.trigger();
}
