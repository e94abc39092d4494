//! Integration tests for the tracking client using wiremock

use gophish_client::{ClientOptions, TrackOptions, TrackingClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn open_hits_tracking_pixel_with_overrides() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/track"))
        .and(query_param("rid", "r1d2"))
        .and(header("user-agent", "Mozilla/5.0 (Test)"))
        .and(header("x-forwarded-for", "10.0.0.5"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = TrackingClient::new(&server.uri(), &ClientOptions::default()).unwrap();
    let options = TrackOptions {
        user_agent: Some("Mozilla/5.0 (Test)".into()),
        forwarded_for: Some("10.0.0.5".into()),
    };
    let status = client.track_open("r1d2", &options).await.unwrap();
    assert!(status.is_success());
}

#[tokio::test]
async fn click_hits_root_with_rid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("rid", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>landing</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = TrackingClient::new(&server.uri(), &ClientOptions::default()).unwrap();
    let status = client
        .track_click("abc", &TrackOptions::default())
        .await
        .unwrap();
    assert_eq!(status.as_u16(), 200);
}

#[tokio::test]
async fn unknown_recipient_status_is_returned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/track"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = TrackingClient::new(&server.uri(), &ClientOptions::default()).unwrap();
    let status = client
        .track_open("missing", &TrackOptions::default())
        .await
        .unwrap();
    assert_eq!(status.as_u16(), 404);
}
