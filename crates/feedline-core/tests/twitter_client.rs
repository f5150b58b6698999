use feedline_core::credentials::Credentials;
use feedline_core::feed::{
    DisplaySink, FeedDriver, FeedSource, LiveOutcome, SharedBuffer, StreamEvent,
};
use feedline_core::providers::TwitterClient;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMELINE: &str = r#"[
  {"created_at":"Mon Jan 02 20:38:05 +0000 2006","full_text":"RT @jogbert: Test tweet https://t.co/test1","user":{"screen_name":"vaelen"},
   "retweeted_status":{"created_at":"Mon Jan 02 19:38:05 +0000 2006","full_text":"Test tweet https://t.co/test1","user":{"screen_name":"jogbert"},
     "entities":{"urls":[{"url":"https://t.co/test1","expanded_url":"https://example.com/test/1"}]}}},
  {"not":"a tweet"},
  {"created_at":"Mon Jan 02 19:38:05 +0000 2006","full_text":"older","user":{"screen_name":"jogbert"}}
]"#;

const STREAM_BODY: &str = concat!(
    "{\"friends\":[1,2,3]}\r\n",
    "\r\n",
    "{\"created_at\":\"Mon Jan 02 21:00:00 +0000 2006\",\"full_text\":\"live https://t.co/m\",",
    "\"user\":{\"screen_name\":\"jogbert\"},",
    "\"entities\":{\"media\":[{\"url\":\"https://t.co/m\",\"expanded_url\":\"https://example.com/photo\"}]}}\r\n",
    "{\"delete\":{\"status\":{\"id\":1}}}\r\n",
);

fn credentials() -> Credentials {
    Credentials {
        access_token: "token".to_string(),
        access_token_secret: "token-secret".to_string(),
        consumer_key: "key".to_string(),
        consumer_secret: "secret".to_string(),
    }
}

fn client(server: &MockServer) -> TwitterClient {
    TwitterClient::with_urls(
        &format!("{}/1.1", server.uri()),
        &format!("{}/1.1/user.json", server.uri()),
        credentials(),
    )
    .unwrap()
}

struct NoopSink;

impl DisplaySink for NoopSink {
    fn request_redraw(&self) {}
}

#[tokio::test]
async fn test_home_timeline_signs_request_and_skips_non_posts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .and(query_param("count", "3"))
        .and(query_param("tweet_mode", "extended"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TIMELINE))
        .expect(1)
        .mount(&server)
        .await;

    let messages = client(&server).recent(3).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].author, "vaelen");
    assert!(messages[0].is_repost());
    assert_eq!(messages[1].body, "older");

    let requests = server.received_requests().await.unwrap();
    let auth = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with("OAuth "));
    assert!(auth.contains("oauth_consumer_key=\"key\""));
    assert!(auth.contains("oauth_token=\"token\""));
}

#[tokio::test]
async fn test_home_timeline_auth_failure_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"errors":[{"code":32,"message":"Could not authenticate you."}]}"#,
        ))
        .mount(&server)
        .await;

    let err = client(&server).recent(5).await.unwrap_err();
    assert!(format!("{err:#}").contains("HTTP 401: Could not authenticate you."));
}

#[tokio::test]
async fn test_user_stream_classifies_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/user.json"))
        .and(query_param("tweet_mode", "extended"))
        .and(query_param("with", "followings"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STREAM_BODY))
        .mount(&server)
        .await;

    let events: Vec<StreamEvent> = client(&server)
        .open_stream()
        .await
        .unwrap()
        .map(Result::unwrap)
        .collect()
        .await;

    assert_eq!(events.len(), 4);
    assert_eq!(events[0], StreamEvent::Other("friends".to_string()));
    assert_eq!(events[1], StreamEvent::KeepAlive);
    assert!(matches!(&events[2], StreamEvent::Message(msg) if msg.author == "jogbert"));
    assert_eq!(events[3], StreamEvent::Other("delete".to_string()));
}

#[tokio::test]
async fn test_driver_backfills_then_streams_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1.1/statuses/home_timeline.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TIMELINE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1.1/user.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(STREAM_BODY))
        .mount(&server)
        .await;

    let source = client(&server);
    let driver = FeedDriver::new(SharedBuffer::new(4), NoopSink);

    driver.backfill(&source).await.unwrap();
    let outcome = driver.stream(&source, CancellationToken::new()).await;

    assert_eq!(outcome, LiveOutcome::Closed);
    let lines: Vec<String> = driver
        .buffer()
        .snapshot()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        lines,
        vec![
            "21:00 jogbert: live https://example.com/photo".to_string(),
            "20:38 jogbert (via vaelen): Test tweet https://example.com/test/1".to_string(),
            "19:38 jogbert: older".to_string(),
            String::new(),
        ]
    );
}
