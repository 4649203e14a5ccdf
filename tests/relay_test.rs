// Remote push delivery against a mock relay.

use pushbell::notifications::{
    Dispatcher, ExpoPushClient, FixedAnswer, LocalNotificationService, NotificationCenter,
    PushMessage, PushRelay,
};
use pushbell::NotifyError;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUSH_PATH: &str = "/--/api/v2/push/send";

fn client(server: &MockServer) -> ExpoPushClient {
    ExpoPushClient::new(reqwest::Client::new(), format!("{}{PUSH_PATH}", server.uri()))
}

#[tokio::test]
async fn test_posts_remote_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .and(body_json(json!({
            "to": "ExponentPushToken[abc]",
            "sound": "default",
            "title": "Remoto via fetch",
            "body": "And here is the body!",
            "data": { "data": "goes here" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "status": "ok" } })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .send(&PushMessage::remote_demo("ExponentPushToken[abc]"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_sends_fixed_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client(&server)
        .send(&PushMessage::remote_demo("tok"))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    assert_eq!(header("accept").as_deref(), Some("application/json"));
    assert_eq!(header("accept-encoding").as_deref(), Some("gzip, deflate"));
    assert_eq!(header("content-type").as_deref(), Some("application/json"));
}

#[tokio::test]
async fn test_empty_token_still_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({
            "to": "",
            "sound": "default",
            "title": "Remoto via fetch",
            "body": "And here is the body!",
            "data": { "data": "goes here" }
        })))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    // The response is not validated, so an error status still counts as sent.
    let result = client(&server).send(&PushMessage::remote_demo("")).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_unreachable_relay_reports_network_error() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let relay = ExpoPushClient::new(
        reqwest::Client::new(),
        format!("http://127.0.0.1:{port}{PUSH_PATH}"),
    );

    let result = relay.send(&PushMessage::remote_demo("tok")).await;
    assert!(matches!(result, Err(NotifyError::Network(_))));
}

#[tokio::test]
async fn test_dispatcher_waits_before_posting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUSH_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let service = Arc::new(LocalNotificationService::new(
        NotificationCenter::new(),
        Arc::new(FixedAnswer(true)),
    ));
    let dispatcher = Dispatcher::new(
        service,
        Arc::new(client(&server)),
        Duration::from_millis(10),
        Duration::from_millis(150),
    );

    let started = Instant::now();
    let handle = dispatcher.send_remote("ExponentPushToken[abc]");
    assert!(server.received_requests().await.unwrap().is_empty());

    handle.await.unwrap().unwrap();
    assert!(started.elapsed() >= Duration::from_millis(150));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
