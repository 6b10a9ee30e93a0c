//! DownloadClient against a local HTTP server.

use exfin_fetch::{ClientConfig, DownloadClient, DownloadError, Transport};
use httpmock::prelude::*;

fn client() -> DownloadClient {
    DownloadClient::new(ClientConfig::default()).unwrap()
}

#[tokio::test]
async fn test_download_returns_body() {
    let server = MockServer::start_async().await;
    let listing = server
        .mock_async(|when, then| {
            when.method(GET).path("/ticks/");
            then.status(200).body("header\r\n{ \"name\":\"EURUSD\",\"size\":1}\r\n");
        })
        .await;

    let body = client().get(&server.url("/ticks/")).await.unwrap();

    listing.assert_async().await;
    assert!(body.starts_with(b"header"));
}

#[tokio::test]
async fn test_download_reports_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ticks/EURUSD/2024/01/EURUSD_2024_01.zip");
            then.status(404);
        })
        .await;

    let result = client()
        .get(&server.url("/ticks/EURUSD/2024/01/EURUSD_2024_01.zip"))
        .await;

    assert!(matches!(result, Err(DownloadError::Status { status: 404 })));
}

/// Returns a local port that nothing is listening on.
fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_download_connection_refused() {
    let url = format!("http://127.0.0.1:{}/ticks/", closed_port());
    let result = client().get(&url).await;
    assert!(matches!(result, Err(DownloadError::Http(_))));
}
