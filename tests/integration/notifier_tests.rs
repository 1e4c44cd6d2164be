use super::*;
use gpu_drop_watcher::plugins::notifiers::{DiscordConfig, DiscordNotifier, PushoverConfig, PushoverNotifier};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn event() -> NotificationEvent {
    NotificationEvent::new(
        "NVIDIA GEFORCE RTX 5090",
        "NVIDIA GEFORCE RTX 5090 - Available at https://marketplace.nvidia.com/de-de/5090",
    )
}

fn pushover(server: &MockServer) -> PushoverNotifier {
    let mut config = PushoverConfig::from_parts(Some("app-token"), Some("user-key")).unwrap();
    config.api_url = format!("{}/1/messages.json", server.uri());
    PushoverNotifier::new(reqwest::Client::new(), config)
}

fn discord(server: &MockServer, channel: Option<&str>, role: Option<&str>, users: Option<&str>) -> DiscordNotifier {
    let mut config = DiscordConfig::from_parts(Some("bot-token"), channel, role, users).unwrap();
    config.api_url = server.uri();
    DiscordNotifier::new(reqwest::Client::new(), config)
}

#[tokio::test]
async fn test_pushover_delivers_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .and(body_string_contains("token=app-token"))
        .and(body_string_contains("user=user-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 1, "request": "req-123" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = pushover(&server).notify(&event()).await.unwrap();

    assert!(result.success);
    assert_eq!(result.message_id.as_deref(), Some("req-123"));
}

#[tokio::test]
async fn test_pushover_rejection_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": 0,
            "user": "invalid",
            "errors": ["user identifier is invalid"],
            "request": "req-456"
        })))
        .mount(&server)
        .await;

    let err = pushover(&server).notify(&event()).await.unwrap_err();

    assert!(matches!(err, AppError::Notifier { .. }));
    assert!(err.to_string().contains("user identifier is invalid"));
}

#[tokio::test]
async fn test_discord_channel_message_mentions_role() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .and(header("authorization", "Bot bot-token"))
        .and(body_json(json!({ "content": format!("<@&777> {}", event().message) })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-1", "channel_id": "42" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = discord(&server, Some("42"), Some("777"), None)
        .notify(&event())
        .await
        .unwrap();

    assert!(result.success);
    assert_eq!(result.message_id.as_deref(), Some("msg-1"));
}

#[tokio::test]
async fn test_discord_direct_messages_skip_role_mention() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .and(body_json(json!({ "recipient_id": "111" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "dm-111" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/channels/dm-111/messages"))
        .and(body_json(json!({ "content": event().message })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-2" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = discord(&server, None, Some("777"), Some("111"))
        .notify(&event())
        .await
        .unwrap();

    assert_eq!(result.message_id.as_deref(), Some("msg-2"));
}

#[tokio::test]
async fn test_discord_direct_messages_carry_role_mention_with_channel() {
    let server = MockServer::start().await;
    let mentioned = format!("<@&777> {}", event().message);

    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .and(body_json(json!({ "content": mentioned })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-5" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "dm-111" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/channels/dm-111/messages"))
        .and(body_json(json!({ "content": mentioned })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-6" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = discord(&server, Some("42"), Some("777"), Some("111"))
        .notify(&event())
        .await
        .unwrap();

    assert_eq!(result.message_id.as_deref(), Some("msg-6"));
}

#[tokio::test]
async fn test_discord_failed_recipient_does_not_stop_others() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .and(body_json(json!({ "recipient_id": "111" })))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Cannot send messages to this user", "code": 50007 })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/@me/channels"))
        .and(body_json(json!({ "recipient_id": "222" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "dm-222" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/channels/dm-222/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-3" })))
        .expect(1)
        .mount(&server)
        .await;

    let err = discord(&server, None, None, Some("111;222"))
        .notify(&event())
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("user 111"));
    assert!(!text.contains("user 222"));
}

#[tokio::test]
async fn test_dispatcher_isolates_real_channels() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/1/messages.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/channels/42/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "msg-4" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut dispatcher = NotifierDispatcher::new();
    dispatcher.register_notifier(Box::new(pushover(&server)));
    dispatcher.register_notifier(Box::new(discord(&server, Some("42"), None, None)));

    let summary = dispatcher.notify(&event()).await;

    assert_eq!(summary.delivered, 1);
    assert_eq!(summary.failed, 1);
}
