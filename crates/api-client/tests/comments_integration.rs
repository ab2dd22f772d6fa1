//! Integration tests for the comment service
//!
//! These tests use wiremock to stand in for the REST API and exercise the
//! full request/response cycle, including envelope and error handling.

use api_client::{ClientConfig, CommentApi, HttpCommentApi, NewComment};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn comment_json(id: &str, content: &str, parent_id: Option<&str>) -> serde_json::Value {
    let mut value = json!({
        "_id": id,
        "user": { "_id": "u-bob", "username": "bob", "name": "Bob Builder" },
        "content": content,
        "createdAt": "2024-01-01T00:00:00Z",
        "likesCount": 0,
        "isLiked": false
    });
    if let Some(parent) = parent_id {
        value["parentId"] = json!(parent);
    }
    value
}

fn service(server: &MockServer) -> HttpCommentApi {
    let config = ClientConfig::new(server.uri()).with_bearer_token("test-token");
    HttpCommentApi::new(config).unwrap()
}

// =============================================================================
// Fetch
// =============================================================================

#[tokio::test]
async fn test_fetch_comments_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comments/P1"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "comments": [comment_json("c2", "second", None), comment_json("c1", "first", None)]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let comments = service(&mock_server).fetch_comments("P1").await.unwrap();

    let ids: Vec<_> = comments.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c1"]);
    assert_eq!(comments[0].author.username, "bob");
}

#[tokio::test]
async fn test_fetch_comments_escapes_subject_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comments/a%20b"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "comments": [] })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let comments = service(&mock_server).fetch_comments("a b").await.unwrap();
    assert!(comments.is_empty());
}

#[tokio::test]
async fn test_fetch_comments_unsuccessful_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comments/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Post not found"
        })))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).fetch_comments("P1").await.unwrap_err();
    assert_eq!(err.code(), "Unsuccessful");
    assert_eq!(err.message(), "Post not found");
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_top_level_comment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments"))
        .and(body_json(json!({ "postId": "P1", "content": "hello" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "comment": comment_json("c9", "hello", None)
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = service(&mock_server)
        .create_comment(NewComment {
            subject_id: "P1".to_string(),
            content: "hello".to_string(),
            parent_id: None,
        })
        .await
        .unwrap();

    assert_eq!(created.id, "c9");
    assert!(created.is_top_level());
}

#[tokio::test]
async fn test_create_reply_sends_parent_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments"))
        .and(body_json(json!({
            "postId": "P1",
            "content": "@bob thanks",
            "parentId": "c1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "comment": comment_json("c10", "@bob thanks", Some("c1"))
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let created = service(&mock_server)
        .create_comment(NewComment {
            subject_id: "P1".to_string(),
            content: "@bob thanks".to_string(),
            parent_id: Some("c1".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(created.parent_id.as_deref(), Some("c1"));
}

#[tokio::test]
async fn test_create_missing_comment_in_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server)
        .create_comment(NewComment {
            subject_id: "P1".to_string(),
            content: "hello".to_string(),
            parent_id: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.code(), "ParseError");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_comment_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/comments/c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    service(&mock_server).delete_comment("c1").await.unwrap();
}

#[tokio::test]
async fn test_delete_comment_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/comments/c1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "Not authorized to delete this comment"
        })))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).delete_comment("c1").await.unwrap_err();
    assert_eq!(err.status(), 403);
    assert_eq!(err.message(), "Not authorized to delete this comment");
    assert!(!err.is_network_error());
}

// =============================================================================
// Transport errors
// =============================================================================

#[tokio::test]
async fn test_server_error_without_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comments/P1"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).fetch_comments("P1").await.unwrap_err();
    assert_eq!(err.status(), 502);
    assert_eq!(err.code(), "Unknown");
    assert!(err.message().contains("Bad Gateway"));
    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comments/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = service(&mock_server).fetch_comments("P1").await.unwrap_err();
    assert_eq!(err.status(), 0);
    assert_eq!(err.code(), "ParseError");
}

#[tokio::test]
async fn test_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/comments/P1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "comments": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(50));
    let api = HttpCommentApi::new(config).unwrap();

    let err = api.fetch_comments("P1").await.unwrap_err();
    assert_eq!(err.code(), "NetworkError");
    assert!(err.is_network_error());
}
