use network::api::{FeedApi, FeedClient};
use network::models::PostEdit;
use serde_json::{Value, json};
use session::{Session, SessionConfig};
use test_helpers::{StubServer, http_client};

const COOKIES: &str = "csrftoken=tok; sessionid=s1";

fn client(server: &StubServer) -> FeedClient {
    let config = SessionConfig::new(server.url(), COOKIES);
    FeedClient::new(Session::with_client(http_client(), &config).unwrap())
}

#[tokio::test]
async fn test_like_and_unlike_are_plain_gets() {
    let server = StubServer::start().await.unwrap();
    server
        .reply("GET", "/like/3", 200, r#"{"message": "Like Added"}"#)
        .reply("GET", "/unlike/3", 200, r#"{"message": "Like Removed"}"#);
    let feed = client(&server);

    assert_eq!(feed.like(3).await.unwrap().message, "Like Added");
    assert_eq!(feed.unlike(3).await.unwrap().message, "Like Removed");

    let requests = server.requests();
    let paths: Vec<_> = requests.iter().map(|r| (r.method.as_str(), r.path.as_str())).collect();
    assert_eq!(paths, vec![("GET", "/like/3"), ("GET", "/unlike/3")]);
    assert!(requests.iter().all(|r| r.header("x-csrftoken").is_none()));
    assert!(requests.iter().all(|r| r.header("cookie") == Some(COOKIES)));
}

#[tokio::test]
async fn test_edit_post_request() {
    let server = StubServer::start().await.unwrap();
    server.reply(
        "POST",
        "/edit/3",
        200,
        r#"{"message": "Change Successful", "data": "New text"}"#,
    );

    let reply = client(&server)
        .edit_post(3, &PostEdit {
            message: "New text".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(reply.data.as_deref(), Some("New text"));
    let request = server.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.header("x-csrftoken"), Some("tok"));
    assert_eq!(
        serde_json::from_str::<Value>(&request.body).unwrap(),
        json!({"message": "New text"})
    );
}

#[tokio::test]
async fn test_rejected_edit_is_an_error() {
    let server = StubServer::start().await.unwrap();
    server.reply("POST", "/edit/3", 403, r#"{"error": "Not your post"}"#);

    let err = client(&server)
        .edit_post(3, &PostEdit {
            message: "Mine now".to_string(),
        })
        .await
        .unwrap_err();

    assert!(err.to_string().contains("cannot edit post 3 with status 403"));
}

#[tokio::test]
async fn test_follow_and_unfollow_paths() {
    let server = StubServer::start().await.unwrap();
    server
        .reply("GET", "/profile/alice/follow", 200, "<html></html>")
        .reply("GET", "/profile/alice/unfollow", 200, "<html></html>");
    let feed = client(&server);

    feed.follow("alice").await.unwrap();
    feed.unfollow("alice").await.unwrap();

    let paths: Vec<_> = server.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/profile/alice/follow", "/profile/alice/unfollow"]);
}

#[tokio::test]
async fn test_new_post_is_a_signed_form() {
    let server = StubServer::start().await.unwrap();
    server.reply("POST", "/new", 200, "<html></html>");

    client(&server).new_post("Hello").await.unwrap();

    let request = server.last_request().unwrap();
    assert_eq!(request.body, "new_post=Hello");
    assert_eq!(
        request.header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request.header("x-csrftoken"), Some("tok"));
}

#[tokio::test]
async fn test_follow_unknown_user() {
    let server = StubServer::start().await.unwrap();

    let err = client(&server).follow("nobody").await.unwrap_err();

    assert!(err.to_string().contains("cannot follow nobody with status 404"));
}
