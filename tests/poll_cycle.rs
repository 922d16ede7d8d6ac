//! Integration tests for the poll cycle against mocked status and Bot API servers.
//!
//! One mockito server plays both the homework status API and the Telegram Bot API.

use std::time::Duration;

use mockito::{Matcher, ServerGuard};
use serde_json::json;

use homework_status_bot::BotError;
use homework_status_bot::api::{HomeworkClient, PollError};
use homework_status_bot::config::{BotSettings, Credentials, check_tokens};
use homework_status_bot::scheduler::{Cursor, HomeworkPoller, TickOutcome};
use homework_status_bot::telegram::{NotifyError, TelegramNotifier};

const PRACTICUM_TOKEN: &str = "y0_integration_practicum";
const BOT_TOKEN: &str = "123456:integration_bot_token";
const CHAT_ID: &str = "4242";
const STATUS_PATH: &str = "/api/user_api/homework_statuses/";

/// Any Bot API `sendMessage` call, whatever the method-name casing.
fn any_send_message() -> Matcher {
    Matcher::Regex(r"^/bot[^/]+/(?i:sendmessage)$".to_owned())
}

const SENT_MESSAGE: &str = r#"{
    "ok": true,
    "result": {
        "message_id": 7,
        "date": 1706529600,
        "chat": {"id": 4242, "type": "private", "first_name": "Student"},
        "from": {"id": 123456, "is_bot": true, "first_name": "HomeworkBot", "username": "homework_bot"},
        "text": "ok"
    }
}"#;

fn settings_for(server: &ServerGuard, endpoint: String) -> BotSettings {
    BotSettings {
        endpoint,
        retry_secs: 600,
        request_timeout_secs: 5,
        telegram_api_url: Some(server.url()),
        log_file: None,
    }
}

fn credentials() -> Credentials {
    Credentials::new(PRACTICUM_TOKEN, BOT_TOKEN, CHAT_ID)
}

fn build_poller(settings: &BotSettings) -> HomeworkPoller<HomeworkClient, TelegramNotifier> {
    let credentials = credentials();
    let client = HomeworkClient::from_config(settings, &credentials).unwrap();
    let notifier = TelegramNotifier::from_config(settings, &credentials).unwrap();

    HomeworkPoller::new(client, notifier)
        .with_retry_interval(settings.retry_interval())
        .with_cursor(Cursor::new(1_700_000_000))
}

fn send_message_path() -> String {
    format!("/bot{BOT_TOKEN}/SendMessage")
}

#[tokio::test]
async fn approved_homework_is_sent_verbatim() {
    let mut server = mockito::Server::new_async().await;
    let endpoint = format!("{}{STATUS_PATH}", server.url());

    let status_mock = server
        .mock("GET", STATUS_PATH)
        .match_header("authorization", format!("OAuth {PRACTICUM_TOKEN}").as_str())
        .match_query(Matcher::UrlEncoded("from_date".into(), "1700000000".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "homeworks": [{"homework_name": "Project X", "status": "approved"}],
                "current_date": 1_700_000_600
            })
            .to_string(),
        )
        .create_async()
        .await;

    let send_mock = server
        .mock("POST", send_message_path().as_str())
        .match_body(Matcher::PartialJson(json!({
            "chat_id": 4242,
            "text": "Изменился статус проверки работы \"Project X\". Работа проверена: ревьюеру всё понравилось. Ура!"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SENT_MESSAGE)
        .expect(1)
        .create_async()
        .await;

    let mut poller = build_poller(&settings_for(&server, endpoint));
    let outcome = poller.run_once().await.unwrap();

    status_mock.assert_async().await;
    send_mock.assert_async().await;
    assert!(matches!(outcome, TickOutcome::Notified(_)));
    assert_eq!(poller.cursor().from_date(), 1_700_000_600);
}

#[tokio::test]
async fn empty_reply_sends_nothing() {
    let mut server = mockito::Server::new_async().await;
    let endpoint = format!("{}{STATUS_PATH}", server.url());

    let status_mock = server
        .mock("GET", STATUS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"homeworks": [], "current_date": 1700000600}"#)
        .expect(1)
        .create_async()
        .await;

    let send_mock = server
        .mock("POST", any_send_message())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SENT_MESSAGE)
        .expect(0)
        .create_async()
        .await;

    let mut poller = build_poller(&settings_for(&server, endpoint));
    let outcome = poller.run_once().await.unwrap();

    status_mock.assert_async().await;
    send_mock.assert_async().await;
    assert_eq!(outcome, TickOutcome::NoChange);
    assert_eq!(poller.cursor().from_date(), 1_700_000_600);
}

#[tokio::test]
async fn unreachable_status_api_is_reported_and_polling_continues() {
    let mut server = mockito::Server::new_async().await;

    let report_mock = server
        .mock("POST", send_message_path().as_str())
        .match_body(Matcher::Regex("Сбой в работе программы".to_owned()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SENT_MESSAGE)
        .expect(2)
        .create_async()
        .await;

    let mut poller = build_poller(&settings_for(&server, "http://127.0.0.1:1/api/".to_owned()));

    for _ in 0..2 {
        let result = poller.run_once().await;
        assert!(matches!(
            result,
            Err(BotError::Poll(PollError::Connectivity { .. }))
        ));
    }

    report_mock.assert_async().await;
    assert_eq!(poller.cursor().from_date(), 1_700_000_000);
    assert_eq!(poller.retry_interval(), Duration::from_secs(600));
}

#[tokio::test]
async fn failed_delivery_leaves_cursor_for_retry() {
    let mut server = mockito::Server::new_async().await;
    let endpoint = format!("{}{STATUS_PATH}", server.url());

    let _status_mock = server
        .mock("GET", STATUS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "homeworks": [{"homework_name": "Project X", "status": "rejected"}],
                "current_date": 1_700_000_600
            })
            .to_string(),
        )
        .create_async()
        .await;

    // The status message and the failure report both hit the rejecting chat.
    let send_mock = server
        .mock("POST", send_message_path().as_str())
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#)
        .expect(2)
        .create_async()
        .await;

    let mut poller = build_poller(&settings_for(&server, endpoint));
    let result = poller.run_once().await;

    send_mock.assert_async().await;
    assert!(matches!(
        result,
        Err(BotError::Notify(NotifyError::Delivery(teloxide::RequestError::Api(_))))
    ));
    assert_eq!(poller.cursor().from_date(), 1_700_000_000);
}

#[test]
fn missing_credential_blocks_startup() {
    let credentials = Credentials::from_lookup(|name| match name {
        "PRACTICUM_TOKEN" => Some(PRACTICUM_TOKEN.to_owned()),
        "TELEGRAM_TOKEN" => Some(BOT_TOKEN.to_owned()),
        _ => None,
    });

    assert!(!check_tokens(&credentials));
    let err = credentials.require().unwrap_err();
    assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));
}
