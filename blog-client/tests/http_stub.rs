//! Проверки клиента против одноразового локального HTTP-сервера.

use blog_client::{ApiError, BlogClient, BlogClientError, NewComment};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Отвечает на один запрос заготовленным ответом и возвращает сырой запрос.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{addr}"), handle)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.expect("read request");
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= head_end + 4 + body_len {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

const POSTS_PAGE: &str = r#"{
    "items": [{
        "id": 11,
        "title": "Second page",
        "summary": "s",
        "published": true,
        "slug": null,
        "user_id": "p1",
        "published_at": "2024-12-02T10:00:00Z",
        "created_at": "2024-12-01T10:00:00Z",
        "updated_at": "2024-12-02T10:00:00Z"
    }],
    "total": 11,
    "page": 2,
    "page_size": 10,
    "total_pages": 2
}"#;

const CREATED_COMMENT: &str = r#"{
    "id": 5,
    "content": "thanks",
    "user_id": "p1",
    "post_id": 3,
    "parent_id": 2,
    "created_at": "2024-12-04T10:00:00Z",
    "updated_at": "2024-12-04T10:00:00Z"
}"#;

#[tokio::test]
async fn list_posts_sends_page_query_and_decodes_envelope() {
    let (url, server) = serve_once("200 OK", POSTS_PAGE).await;
    let client = BlogClient::new(url).expect("client must build");

    let page = client.list_posts(2, 10).await.expect("list must succeed");
    assert_eq!(page.page, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items[0].id, 11);
    assert!(page.items[0].content.is_empty());

    let request = server.await.expect("server task");
    assert!(
        request.starts_with("GET /api/posts?page=2&page_size=10 HTTP/1.1"),
        "{request}"
    );
    assert!(!request.to_ascii_lowercase().contains("authorization:"));
}

#[tokio::test]
async fn create_comment_sends_bearer_and_parent() {
    let (url, server) = serve_once("200 OK", CREATED_COMMENT).await;
    let mut client = BlogClient::new(url).expect("client must build");
    client.set_token("tok-123");

    let created = client
        .create_comment(&NewComment {
            content: "thanks".to_string(),
            post_id: 3,
            parent_id: Some(2),
        })
        .await
        .expect("create must succeed");
    assert_eq!(created.parent_id, Some(2));

    let request = server.await.expect("server task");
    assert!(request.starts_with("POST /api/comments HTTP/1.1"), "{request}");
    assert!(request.to_ascii_lowercase().contains("authorization: bearer tok-123"));
    assert!(request.contains(r#""parent_id":2"#), "{request}");
    assert!(request.contains(r#""post_id":3"#), "{request}");
}

#[tokio::test]
async fn list_comments_attaches_bearer_when_logged_in() {
    let (url, server) = serve_once("200 OK", "[]").await;
    let mut client = BlogClient::new(url).expect("client must build");
    client.set_token("tok-456");

    let comments = client.list_comments(3).await.expect("list must succeed");
    assert!(comments.is_empty());

    let request = server.await.expect("server task");
    assert!(
        request.starts_with("GET /api/comments?post_id=3 HTTP/1.1"),
        "{request}"
    );
    assert!(request.to_ascii_lowercase().contains("authorization: bearer tok-456"));
}

#[tokio::test]
async fn comment_without_token_is_rejected_before_network() {
    // Порт 9 (discard) закрыт: попытка соединения дала бы ошибку транспорта.
    let client = BlogClient::new("http://127.0.0.1:9").expect("client must build");

    let result = client
        .create_comment(&NewComment {
            content: "hello".to_string(),
            post_id: 1,
            parent_id: None,
        })
        .await;
    assert!(matches!(result, Err(BlogClientError::MissingCredential)));
}

#[tokio::test]
async fn rejected_current_user_logs_out() {
    let (url, server) = serve_once("401 Unauthorized", r#"{"error":"unauthorized"}"#).await;
    let mut client = BlogClient::new(url).expect("client must build");
    client.set_token("expired");

    let err = client.current_user().await.expect_err("must fail");
    assert!(matches!(err, BlogClientError::Unauthorized));
    assert!(client.get_token().is_none());
    assert!(ApiError::from(err).is_unauthorized());

    let request = server.await.expect("server task");
    assert!(request.starts_with("GET /api/auth/current HTTP/1.1"));
}

#[tokio::test]
async fn accepted_current_user_is_remembered() {
    let (url, _server) = serve_once(
        "200 OK",
        r#"{"pid":"p1","email":"ann@example.com","name":"Ann"}"#,
    )
    .await;
    let mut client = BlogClient::new(url).expect("client must build");
    client.set_token("tok");

    let user = client.current_user().await.expect("must succeed");
    assert_eq!(user.name, "Ann");
    assert_eq!(client.session().user().map(|u| u.pid.as_str()), Some("p1"));
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (url, _server) = serve_once("200 OK", "not json").await;
    let client = BlogClient::new(url).expect("client must build");

    let err = client.get_post(1).await.expect_err("must fail");
    assert!(matches!(err, BlogClientError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn server_message_is_kept_for_rejections() {
    let (url, _server) = serve_once(
        "422 Unprocessable Entity",
        r#"{"message":"title is required"}"#,
    )
    .await;
    let mut client = BlogClient::new(url).expect("client must build");
    client.set_token("tok");

    let err = client
        .update_post(4, &Default::default())
        .await
        .expect_err("must fail");
    match ApiError::from(err) {
        ApiError::Http { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "title is required");
        }
        other => panic!("unexpected {other:?}"),
    }
}
