//! Group, message and join-request tests

#[path = "../common/mod.rs"]
mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};

#[tokio::test]
async fn test_create_and_search_groups() {
    let app = spawn_app().await;
    let session = app.register("alice@example.com", "Alice").await;

    let created = app
        .post("/groups/create", &session, json!({ "groupName": "Maple Street" }))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    let group: Value = created.json();
    assert_eq!(group["groupName"], "Maple Street");
    assert_eq!(group["creatorId"], session.user_id);
    assert!(group["id"].as_i64().unwrap() > 0);

    app.post("/groups/create", &session, json!({ "groupName": "Oak Lane" }))
        .await;

    let found: Vec<Value> = app.get("/groups/Street", &session).await.json();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["groupName"], "Maple Street");

    let none: Vec<Value> = app.get("/groups/Birch", &session).await.json();
    assert!(none.is_empty());

    let all: Vec<Value> = app.get("/groups/", &session).await.json();
    assert_eq!(all.len(), 2);
    let all_no_slash: Vec<Value> = app.get("/groups", &session).await.json();
    assert_eq!(all_no_slash.len(), 2);
}

#[tokio::test]
async fn test_create_group_requires_name() {
    let app = spawn_app().await;
    let session = app.register("alice@example.com", "Alice").await;

    let created = app
        .post("/groups/create", &session, json!({ "groupName": "  " }))
        .await;
    assert_eq!(created.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_and_list_messages() {
    let app = spawn_app().await;
    let alice = app.register("alice@example.com", "Alice").await;
    let bob = app.register("bob@example.com", "Bob").await;

    let sent = app
        .post(
            "/messages",
            &alice,
            json!({
                "subject": "Dinner",
                "body": "Pasta <tonight>",
                "type": "message",
                "recepientId": bob.user_id,
            }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    assert!(sent.body.is_empty());

    let inbox = app.get("/messages", &bob).await;
    assert_eq!(inbox.status, StatusCode::OK);
    assert!(inbox.headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = inbox.text();
    assert!(html.contains("Dinner"));
    assert!(html.contains("From Alice"));
    assert!(html.contains("Pasta &lt;tonight&gt;"));
    assert!(html.contains("<option value=\"Alice\">"));
    assert!(html.contains("<option value=\"Bob\">"));

    let alice_inbox = app.get("/messages", &alice).await.text();
    assert!(alice_inbox.contains("No messages."));
}

#[tokio::test]
async fn test_message_to_unknown_user_is_not_found() {
    let app = spawn_app().await;
    let alice = app.register("alice@example.com", "Alice").await;

    let sent = app
        .post("/messages", &alice, json!({ "subject": "Hi", "recepientId": 999 }))
        .await;
    assert_eq!(sent.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_message_rules() {
    let app = spawn_app().await;
    let alice = app.register("alice@example.com", "Alice").await;
    let bob = app.register("bob@example.com", "Bob").await;
    let carol = app.register("carol@example.com", "Carol").await;

    app.post(
        "/messages",
        &alice,
        json!({ "subject": "Hi", "body": "", "recepientId": bob.user_id }),
    )
    .await;
    let message_id = latest_message_id(&app, bob.user_id).await;

    let outsider = app
        .delete(&format!("/message/delete/{}", message_id), &carol)
        .await;
    assert_eq!(outsider.status, StatusCode::FORBIDDEN);

    let recipient = app
        .delete(&format!("/message/delete/{}", message_id), &bob)
        .await;
    assert_eq!(recipient.status, StatusCode::OK);
    assert!(recipient.body.is_empty());
    assert!(app.get("/messages", &bob).await.text().contains("No messages."));

    let missing = app.delete("/message/delete/4242", &bob).await;
    assert_eq!(missing.status, StatusCode::OK);
    assert!(missing.body.is_empty());
}

async fn latest_message_id(app: &TestApp, recipient_id: i32) -> i32 {
    household_api::storage::messages::find_for_recipient(&app.state.db, recipient_id)
        .await
        .unwrap()
        .first()
        .map(|message| message.id)
        .expect("a message was delivered")
}

async fn send_join_request(app: &TestApp, from: &Session, to: &Session) -> i32 {
    let sent = app
        .post(
            "/messages",
            from,
            json!({
                "subject": "Can I join?",
                "body": "Let me in",
                "type": "join",
                "recepientId": to.user_id,
            }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    latest_message_id(app, to.user_id).await
}

#[tokio::test]
async fn test_accept_join_request_moves_sender_into_group() {
    let app = spawn_app().await;
    let (alice, group_id) = app.member("alice@example.com", "Alice", "Flat 4").await;
    let bob = app.register("bob@example.com", "Bob").await;

    let message_id = send_join_request(&app, &bob, &alice).await;
    let html = app.get("/messages", &alice).await.text();
    assert!(html.contains(&format!("<button class=\"accept-join\" data-id=\"{}\">", message_id)));

    let accepted = app
        .put("/request/join/accept", &alice, json!({ "id": message_id }))
        .await;
    assert_eq!(accepted.status, StatusCode::OK);
    assert!(accepted.body.is_empty());

    // bob's existing session sees the group without logging in again
    let me: Value = app.get("/user", &bob).await.json();
    assert_eq!(me["GroupId"], group_id);
}

#[tokio::test]
async fn test_accept_join_request_by_non_recipient_is_rejected() {
    let app = spawn_app().await;
    let (alice, _) = app.member("alice@example.com", "Alice", "Flat 4").await;
    let (mallory, _) = app.member("mallory@example.com", "Mallory", "Elsewhere").await;
    let bob = app.register("bob@example.com", "Bob").await;

    let message_id = send_join_request(&app, &bob, &alice).await;

    let rejected = app
        .put("/request/join/accept", &mallory, json!({ "id": message_id }))
        .await;
    assert_eq!(rejected.status, StatusCode::FORBIDDEN);
    assert_eq!(rejected.error_code(), "forbidden");

    let me: Value = app.get("/user", &bob).await.json();
    assert_eq!(me["GroupId"], Value::Null);
}

#[tokio::test]
async fn test_accept_join_request_edge_cases() {
    let app = spawn_app().await;
    let alice = app.register("alice@example.com", "Alice").await;
    let bob = app.register("bob@example.com", "Bob").await;

    let missing = app
        .put("/request/join/accept", &alice, json!({ "id": 777 }))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    // the recipient has no group to hand out yet
    let message_id = send_join_request(&app, &bob, &alice).await;
    let no_group = app
        .put("/request/join/accept", &alice, json!({ "id": message_id }))
        .await;
    assert_eq!(no_group.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_accepting_a_plain_message_does_not_move_the_sender() {
    let app = spawn_app().await;
    let (alice, _) = app.member("alice@example.com", "Alice", "Flat 4").await;
    let (bob, bob_group) = app.member("bob@example.com", "Bob", "Flat 9").await;

    let sent = app
        .post(
            "/messages",
            &bob,
            json!({
                "subject": "Dinner?",
                "body": "Pizza tonight",
                "type": "message",
                "recepientId": alice.user_id,
            }),
        )
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    let message_id = latest_message_id(&app, alice.user_id).await;

    let refused = app
        .put("/request/join/accept", &alice, json!({ "id": message_id }))
        .await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);
    assert_eq!(refused.error_code(), "invalid_request");

    let me: Value = app.get("/user", &bob).await.json();
    assert_eq!(me["GroupId"], bob_group);
    let stored = household_api::storage::users::find_by_id(&app.state.db, bob.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.group_id, Some(bob_group));
}

#[tokio::test]
async fn test_malformed_path_ids_get_json_errors() {
    let app = spawn_app().await;
    let alice = app.register("alice@example.com", "Alice").await;

    for uri in ["/message/delete/abc", "/bill/delete/x", "/chore/edit/1/y"] {
        let response = if uri.starts_with("/chore/edit") {
            app.put(uri, &alice, json!({ "chore": "Dishes" })).await
        } else {
            app.delete(uri, &alice).await
        };
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(response.error_code(), "invalid_request", "{}", uri);
    }
}
