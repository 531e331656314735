use mail::api::{MailApi, MailClient};
use mail::models::{EmailChangeset, Mailbox, NewEmail};
use serde_json::{Value, json};
use session::{Session, SessionConfig};
use test_helpers::{StubServer, http_client};

const COOKIES: &str = "sessionid=s1; csrftoken=tok";

const EMAIL: &str = r#"{
    "id": 7,
    "sender": "bob@example.com",
    "recipients": ["me@example.com"],
    "subject": "Lunch",
    "body": "Noon?",
    "timestamp": "Jan 01 2020, 10:00 AM",
    "read": false,
    "archived": false
}"#;

fn client(server: &StubServer, sign_updates: bool) -> MailClient {
    let config = SessionConfig::new(server.url(), COOKIES);
    let session = Session::with_client(http_client(), &config).unwrap();
    MailClient::new(session, sign_updates)
}

fn json_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

#[tokio::test]
async fn test_list_mailbox_request() {
    let server = StubServer::start().await.unwrap();
    server.reply("GET", "/emails/archive", 200, format!("[{EMAIL}]"));

    let emails = client(&server, false).list_mailbox(Mailbox::Archive).await.unwrap();

    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].subject, "Lunch");
    assert_eq!(emails[0].recipients, vec!["me@example.com".to_string()]);

    let request = server.last_request().unwrap();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path, "/emails/archive");
    assert_eq!(request.header("cookie"), Some(COOKIES));
    assert_eq!(request.header("x-csrftoken"), None);
}

#[tokio::test]
async fn test_get_email_request() {
    let server = StubServer::start().await.unwrap();
    server.reply("GET", "/emails/7", 200, EMAIL);

    let email = client(&server, false).get_email(7).await.unwrap();

    assert_eq!(email.id, 7);
    assert!(!email.read);
    assert_eq!(server.last_request().unwrap().path, "/emails/7");
}

#[tokio::test]
async fn test_update_is_unsigned_by_default() {
    let server = StubServer::start().await.unwrap();
    server.reply("PUT", "/emails/7", 200, "{}");

    client(&server, false)
        .update_email(7, &EmailChangeset::new().with_read(true))
        .await
        .unwrap();

    let request = server.last_request().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, "/emails/7");
    assert_eq!(json_body(&request.body), json!({"read": true}));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(request.header("cookie"), Some(COOKIES));
    assert_eq!(request.header("x-csrftoken"), None);
}

#[tokio::test]
async fn test_update_is_signed_when_enabled() {
    let server = StubServer::start().await.unwrap();
    server.reply("PUT", "/emails/7", 200, "{}");

    client(&server, true)
        .update_email(7, &EmailChangeset::new().with_archived(false))
        .await
        .unwrap();

    let request = server.last_request().unwrap();
    assert_eq!(json_body(&request.body), json!({"archived": false}));
    assert_eq!(request.header("x-csrftoken"), Some("tok"));
}

#[tokio::test]
async fn test_send_email_request() {
    let server = StubServer::start().await.unwrap();
    server.reply("POST", "/emails", 201, r#"{"message": "Email sent successfully."}"#);

    let email = NewEmail {
        recipients: "bob@example.com, carol@example.com".to_string(),
        subject: "Plans".to_string(),
        body: "See you".to_string(),
    };
    let result = client(&server, false).send_email(&email).await.unwrap();

    assert_eq!(result.message.as_deref(), Some("Email sent successfully."));
    let request = server.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/emails");
    assert_eq!(request.header("x-csrftoken"), Some("tok"));
    assert_eq!(
        json_body(&request.body),
        json!({
            "recipients": "bob@example.com, carol@example.com",
            "subject": "Plans",
            "body": "See you",
        })
    );
}

#[tokio::test]
async fn test_send_email_error_body() {
    let server = StubServer::start().await.unwrap();
    server.reply(
        "POST",
        "/emails",
        400,
        r#"{"error": "User with email nobody@example.com does not exist."}"#,
    );

    let email = NewEmail {
        recipients: "nobody@example.com".to_string(),
        subject: String::new(),
        body: String::new(),
    };
    let err = client(&server, false).send_email(&email).await.unwrap_err();

    assert_eq!(err.to_string(), "User with email nobody@example.com does not exist.");
}

#[tokio::test]
async fn test_send_email_failure_without_error_body() {
    let server = StubServer::start().await.unwrap();
    server.reply("POST", "/emails", 500, "oops");

    let email = NewEmail {
        recipients: "bob@example.com".to_string(),
        subject: String::new(),
        body: String::new(),
    };
    let err = client(&server, false).send_email(&email).await.unwrap_err();

    assert!(err.to_string().contains("cannot send email with status 500"));
}

#[tokio::test]
async fn test_failed_listing_carries_status() {
    let server = StubServer::start().await.unwrap();
    server.reply("GET", "/emails/inbox", 500, r#"{"error": "boom"}"#);

    let err = client(&server, false).list_mailbox(Mailbox::Inbox).await.unwrap_err();

    let text = err.to_string();
    assert!(text.contains("cannot list mailbox inbox with status 500"));
    assert!(text.contains("boom"));
}
