// End-to-end tests for StructuredFetcher over the reqwest transport
// Uses mockito for HTTP mocking

use constructor_fetcher::fetch_error::FetchError;
use constructor_fetcher::fetcher::StructuredFetcher;
use constructor_fetcher::transport::HttpTransport;
use mockito::Server;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const CONSTRUCTORS_2021: &str = r#"{"MRData":{"xmlns":"http://ergast.com/mrd/1.5","series":"f1","url":"http://ergast.com/api/f1/2021/constructors.json","limit":"30","offset":"0","total":"3","ConstructorTable":{"season":"2021","Constructors":[{"constructorId":"ferrari","url":"http://en.wikipedia.org/wiki/Scuderia_Ferrari","name":"Ferrari","nationality":"Italian"},{"constructorId":"mercedes","url":"http://en.wikipedia.org/wiki/Mercedes-Benz_in_Formula_One","name":"Mercedes","nationality":"German"},{"constructorId":"red_bull","url":"http://en.wikipedia.org/wiki/Red_Bull_Racing","name":"Red Bull","nationality":"Austrian"}]}}}"#;

fn endpoint(server: &Server) -> String {
    format!("{}/api/f1/2021/constructors.json", server.url())
}

#[tokio::test]
async fn test_fetch_decodes_constructors() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/f1/2021/constructors.json")
        .with_status(200)
        .with_header("content-type", "application/json; charset=utf-8")
        .with_body(CONSTRUCTORS_2021)
        .create_async()
        .await;

    let fetcher = StructuredFetcher::with_http();
    let envelope = fetcher.fetch(&endpoint(&server)).await.unwrap();

    assert_eq!(envelope.series, "f1");
    assert_eq!(envelope.total, "3");
    assert_eq!(envelope.table.season, "2021");
    let ids: Vec<&str> = envelope
        .table
        .constructors
        .iter()
        .map(|c| c.constructor_id.as_str())
        .collect();
    assert_eq!(ids, vec!["ferrari", "mercedes", "red_bull"]);
    assert_eq!(envelope.table.constructors[2].nationality, "Austrian");

    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_twice_issues_two_requests() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/f1/2021/constructors.json")
        .with_status(200)
        .with_body(CONSTRUCTORS_2021)
        .expect(2)
        .create_async()
        .await;

    let fetcher = StructuredFetcher::with_http();
    let first = fetcher.fetch(&endpoint(&server)).await.unwrap();
    let second = fetcher.fetch(&endpoint(&server)).await.unwrap();

    assert_eq!(first, second);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_schema_drift_is_decode_error() {
    let mut server = Server::new_async().await;

    // "Constructors" renamed: every field is still present but at the wrong key
    let drifted = CONSTRUCTORS_2021.replace("\"Constructors\"", "\"constructors\"");
    let _mock = server
        .mock("GET", "/api/f1/2021/constructors.json")
        .with_status(200)
        .with_body(drifted)
        .create_async()
        .await;

    let fetcher = StructuredFetcher::with_http();
    let result = fetcher.fetch(&endpoint(&server)).await;

    assert!(matches!(result, Err(FetchError::DecodeError(_))));
}

#[tokio::test]
async fn test_fetch_server_error_is_transport_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/f1/2021/constructors.json")
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let fetcher = StructuredFetcher::with_http();
    let result = fetcher.fetch(&endpoint(&server)).await;

    match result {
        Err(FetchError::TransportError(message)) => assert!(message.contains("503")),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_not_found_is_transport_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/api/f1/1800/constructors.json")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = StructuredFetcher::with_http();
    let result = fetcher
        .fetch(&format!("{}/api/f1/1800/constructors.json", server.url()))
        .await;

    assert!(matches!(result, Err(FetchError::TransportError(_))));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_transport_error() {
    // Grab a free port, then close it so nothing is listening
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let transport = HttpTransport::with_timeout(Duration::from_secs(5)).unwrap();
    let fetcher = StructuredFetcher::new(transport);
    let result = fetcher
        .fetch(&format!("http://127.0.0.1:{port}/constructors.json"))
        .await;

    assert!(matches!(result, Err(FetchError::TransportError(_))));
}

#[tokio::test]
async fn test_fetch_invalid_endpoint_sends_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let fetcher = StructuredFetcher::with_http();
    let result = fetcher.fetch("ergast.com/api/f1/2021/constructors.json").await;

    assert!(matches!(result, Err(FetchError::InvalidEndpoint(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_with_cancelled_token_sends_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/f1/2021/constructors.json")
        .with_body(CONSTRUCTORS_2021)
        .expect(0)
        .create_async()
        .await;

    let token = CancellationToken::new();
    token.cancel();

    let fetcher = StructuredFetcher::with_http();
    let result = fetcher.fetch_with_cancel(&endpoint(&server), &token).await;

    assert_eq!(result, Err(FetchError::Cancelled));
    mock.assert_async().await;
}
