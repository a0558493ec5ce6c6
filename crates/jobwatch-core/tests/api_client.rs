//! `ApiClient` against a throwaway HTTP server on a loopback port.

use std::collections::HashMap;
use std::sync::Arc;

use jobwatch_core::actions::{self, ActionError};
use jobwatch_core::catalog::{self, NO_MODELS_LABEL};
use jobwatch_core::config::ServerConfig;
use jobwatch_core::{ApiClient, ClientError, JobKind, StatusEndpoint, StatusSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Routes = HashMap<&'static str, (u16, &'static str)>;

/// Serve canned responses keyed by request path. Unknown paths get a 404.
async fn serve(routes: Routes) -> ApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                let (status, body) = routes
                    .get(path.as_str())
                    .copied()
                    .unwrap_or((404, r#"{"error": "not found"}"#));

                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });

    ApiClient::new(&ServerConfig {
        base_url: Some(format!("http://{}/", addr)),
        request_timeout_secs: Some(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_status_accepts_string_and_integer_counts() {
    let client = serve(HashMap::from([
        (
            "/api/crawl-status/42",
            (200, r#"{"status": "running", "records_count": "812"}"#),
        ),
        (
            "/api/processing-status/7",
            (
                200,
                r#"{"status": "completed", "records_count": 1530, "end_time": "2024-01-01 10:00", "output_file": "processed_7.csv"}"#,
            ),
        ),
        (
            "/api/crawl-status/8",
            (200, r#"{"status": "running-page-2", "records_count": null}"#),
        ),
    ]))
    .await;

    let crawl = client
        .fetch_status(&StatusEndpoint::new(JobKind::Crawl, "42"))
        .await
        .unwrap();
    assert_eq!(crawl.records_display(), "812");
    assert!(crawl.is_running());

    let processing = client
        .fetch_status(&StatusEndpoint::new(JobKind::Processing, "7"))
        .await
        .unwrap();
    assert_eq!(processing.records_display(), "1530");
    assert_eq!(processing.output_file.as_deref(), Some("processed_7.csv"));
    assert!(!processing.is_running());

    let null_count = client
        .fetch_status(&StatusEndpoint::new(JobKind::Crawl, "8"))
        .await
        .unwrap();
    assert_eq!(null_count.records_display(), "0");
}

#[tokio::test]
async fn test_status_failures_are_classified() {
    let client = serve(HashMap::from([
        ("/api/crawl-status/1", (200, "<html>oops</html>")),
        ("/api/crawl-status/2", (500, r#"{"error": "boom"}"#)),
    ]))
    .await;

    let missing = client
        .fetch_status(&StatusEndpoint::new(JobKind::Crawl, "404"))
        .await
        .unwrap_err();
    assert!(matches!(missing, ClientError::HttpStatus { status: 404, .. }));

    let malformed = client
        .fetch_status(&StatusEndpoint::new(JobKind::Crawl, "1"))
        .await
        .unwrap_err();
    assert!(matches!(malformed, ClientError::Decode { .. }));

    let server_error = client
        .fetch_status(&StatusEndpoint::new(JobKind::Crawl, "2"))
        .await
        .unwrap_err();
    assert!(matches!(server_error, ClientError::HttpStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_operator_actions_hit_expected_paths() {
    let client = serve(HashMap::from([
        (
            "/api/check-stuck-crawlers",
            (200, r#"{"success": true, "updated_jobs": 2}"#),
        ),
        (
            "/api/reset-crawler/42",
            (
                200,
                r#"{"success": true, "message": "Crawler job 42 has been reset to completed"}"#,
            ),
        ),
        (
            "/api/reset-processing/7",
            (
                200,
                r#"{"success": false, "message": "Processing job 7 is not in running state"}"#,
            ),
        ),
        (
            "/api/force-update-records/42",
            (
                200,
                r#"{"success": true, "updated": true, "records_count": 900, "message": "Updated records count to 900"}"#,
            ),
        ),
    ]))
    .await;

    let stuck = actions::check_stuck_crawlers(&client).await.unwrap();
    assert_eq!(stuck.updated_jobs, 2);
    assert!(stuck.reload_required());

    let message = actions::reset_job(&client, JobKind::Crawl, "42").await.unwrap();
    assert_eq!(message, "Crawler job 42 has been reset to completed");

    let rejected = actions::reset_job(&client, JobKind::Processing, "7")
        .await
        .unwrap_err();
    assert!(matches!(rejected, ActionError::Rejected { .. }));

    let forced = actions::force_update_records(&client, "42").await.unwrap();
    assert!(forced.updated);
    assert_eq!(forced.records_count, Some(900));

    let unreachable = actions::force_update_records(&client, "99").await.unwrap_err();
    assert!(matches!(unreachable, ActionError::Client { .. }));
}

#[tokio::test]
async fn test_catalog_lookups() {
    let client = serve(HashMap::from([
        (
            "/api/get-models/3",
            (
                200,
                r#"{"success": true, "models": [{"id": 11, "name": "Camry"}, {"id": 12, "name": "Vios"}]}"#,
            ),
        ),
        ("/api/get-models/4", (200, r#"{"success": true, "models": []}"#)),
        (
            "/api/get-car-types/11",
            (200, r#"{"success": true, "car_types": [{"id": 2, "name": "Sedan"}]}"#),
        ),
    ]))
    .await;

    let models = catalog::fetch_models(&client, "3").await.unwrap();
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].value, "11");

    let empty = catalog::fetch_models(&client, "4").await.unwrap();
    assert_eq!(empty[0].label, NO_MODELS_LABEL);

    assert!(catalog::fetch_models(&client, "5").await.is_err());

    let types = catalog::fetch_car_types(&client, "11").await;
    assert_eq!(types.len(), 1);
    assert_eq!(types[0].value, "2");

    // 404 falls back to the built-in list
    let fallback = catalog::fetch_car_types(&client, "12").await;
    assert_eq!(fallback, catalog::default_car_types());
}
