
use serde_json::json;
use test_helpers::*;
use warp::http::StatusCode;

#[tokio::test]
async fn test_profile_update_round_trip() {
    let server = TestServer::new(4).await;
    let token = server.create_user("Alice", 42).await;

    let (status, me) = server.get("/user/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Alice");
    assert_eq!(me["leader_card_id"], 42);
    assert!(me.get("token").is_none());

    let (status, body) = server
        .post(
            "/user/update",
            Some(&token),
            json!({ "user_name": "Alicia", "leader_card_id": 7 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));

    let (_, me) = server.get("/user/me", Some(&token)).await;
    assert_eq!(me["name"], "Alicia");
    assert_eq!(me["leader_card_id"], 7);
}

#[tokio::test]
async fn test_unknown_token_handling() {
    let server = TestServer::new(4).await;

    let (status, body) = server.get("/user/me", Some("nobody")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "UserNotFound");

    let (status, _) = server.get("/user/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = server
        .post(
            "/user/update",
            Some("nobody"),
            json!({ "user_name": "Mallory", "leader_card_id": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "InvalidToken");

    let (status, _) = server
        .post("/room/wait", Some("nobody"), json!({ "room_id": 1 }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_list_and_join_scenario() {
    let server = TestServer::new(2).await;
    let alice = server.create_user("Alice", 42).await;
    let bob = server.create_user("Bob", 5).await;
    let carol = server.create_user("Carol", 9).await;

    let room_id = server.create_room(&alice, 7, HARD).await;

    let (status, body) = server.post("/room/list", None, json!({ "live_id": 7 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["room_info_list"],
        json!([{ "room_id": room_id, "live_id": 7, "joined_user_count": 1, "max_user_count": 2 }])
    );

    // Other lives do not see the room
    let (_, body) = server.post("/room/list", None, json!({ "live_id": 8 })).await;
    assert_eq!(body["room_info_list"], json!([]));

    assert_eq!(server.join(&bob, room_id, NORMAL).await, JOIN_OK);
    assert_eq!(server.join(&carol, room_id, NORMAL).await, JOIN_ROOM_FULL);

    let wait = server.wait(&bob, room_id).await;
    assert_eq!(wait["status"], STATUS_WAITING);
    let roster = wait["room_user_list"].as_array().unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0]["name"], "Alice");
    assert_eq!(roster[0]["leader_card_id"], 42);
    assert_eq!(roster[0]["select_difficulty"], HARD);
    assert_eq!(roster[0]["is_host"], true);
    assert_eq!(roster[0]["is_me"], false);
    assert_eq!(roster[1]["name"], "Bob");
    assert_eq!(roster[1]["is_host"], false);
    assert_eq!(roster[1]["is_me"], true);
}

#[tokio::test]
async fn test_join_failures_are_reported_in_body() {
    let server = TestServer::new(4).await;
    let alice = server.create_user("Alice", 1).await;

    assert_eq!(server.join(&alice, 999, NORMAL).await, JOIN_OTHER_ERROR);
    assert_eq!(server.join("not-a-token", 999, NORMAL).await, JOIN_OTHER_ERROR);

    let (status, body) = server
        .post("/room/join", None, json!({ "room_id": 1, "select_difficulty": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["join_room_result"], JOIN_OTHER_ERROR);
}

#[tokio::test]
async fn test_non_ascii_authorization_header() {
    let server = TestServer::new(4).await;
    let alice = server.create_user("Alice", 1).await;
    let room_id = server.create_room(&alice, 5, NORMAL).await;
    let garbled = b"Bearer t\xC3\xB6ken";

    let (status, body) = server
        .post_with_raw_auth(
            "/room/join",
            garbled,
            json!({ "room_id": room_id, "select_difficulty": NORMAL }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["join_room_result"], JOIN_OTHER_ERROR);

    let (status, body) = server
        .post_with_raw_auth("/room/wait", garbled, json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "InvalidToken");

    // The room is untouched
    let wait = server.wait(&alice, room_id).await;
    assert_eq!(wait["room_user_list"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_only_host_can_start() {
    let server = TestServer::new(4).await;
    let alice = server.create_user("Alice", 1).await;
    let bob = server.create_user("Bob", 2).await;
    let room_id = server.create_room(&alice, 3, NORMAL).await;
    assert_eq!(server.join(&bob, room_id, NORMAL).await, JOIN_OK);

    let (status, body) = server
        .post("/room/start", Some(&bob), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NotHost");
    assert_eq!(server.wait(&bob, room_id).await["status"], STATUS_WAITING);

    let (status, _) = server
        .post("/room/start", Some(&alice), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.wait(&bob, room_id).await["status"], STATUS_LIVE_START);

    // Starting again is harmless
    let (status, _) = server
        .post("/room/start", Some(&alice), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.wait(&alice, room_id).await["status"], STATUS_LIVE_START);
}

#[tokio::test]
async fn test_end_result_and_disband_scenario() {
    let server = TestServer::new(4).await;
    let alice = server.create_user("Alice", 1).await;
    let bob = server.create_user("Bob", 2).await;
    let carol = server.create_user("Carol", 3).await;

    let room_id = server.create_room(&alice, 11, HARD).await;
    assert_eq!(server.join(&bob, room_id, NORMAL).await, JOIN_OK);

    let (status, _) = server
        .post("/room/start", Some(&alice), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        server.end(&alice, room_id, [100, 20, 3, 1, 0], 98_000).await,
        StatusCode::OK
    );
    assert_eq!(
        server.end(&bob, room_id, [80, 30, 10, 2, 2], 75_500).await,
        StatusCode::OK
    );

    // One submission per member
    assert_eq!(
        server.end(&bob, room_id, [1, 1, 1, 1, 1], 1).await,
        StatusCode::CONFLICT
    );
    // Outsiders cannot submit
    assert_eq!(
        server.end(&carol, room_id, [1, 1, 1, 1, 1], 1).await,
        StatusCode::FORBIDDEN
    );

    let (status, body) = server
        .post("/room/result", Some(&carol), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let results = body["result_user_list"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["judge_count_list"], json!([100, 20, 3, 1, 0]));
    assert_eq!(results[0]["score"], 98_000);
    assert_eq!(results[1]["judge_count_list"], json!([80, 30, 10, 2, 2]));
    assert_eq!(results[1]["score"], 75_500);

    assert_eq!(server.wait(&alice, room_id).await["status"], STATUS_DISSOLUTION);
    assert_eq!(server.join(&carol, room_id, NORMAL).await, JOIN_DISBANDED);

    let (_, me) = server.get("/user/me", Some(&alice)).await;
    let alice_id = me["id"].as_i64().unwrap() as i32;
    assert_eq!(
        server.user_repository.score_sum(alice_id).await.unwrap(),
        Some(98_000)
    );
}

#[tokio::test]
async fn test_leave_then_rejoin() {
    let server = TestServer::new(2).await;
    let alice = server.create_user("Alice", 1).await;
    let bob = server.create_user("Bob", 2).await;
    let carol = server.create_user("Carol", 3).await;
    let room_id = server.create_room(&alice, 4, NORMAL).await;

    assert_eq!(server.join(&bob, room_id, NORMAL).await, JOIN_OK);

    let (status, _) = server
        .post("/room/leave", Some(&bob), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::OK);

    // The freed seat can be taken by someone else
    assert_eq!(server.join(&carol, room_id, NORMAL).await, JOIN_OK);
    assert_eq!(server.join(&bob, room_id, NORMAL).await, JOIN_ROOM_FULL);

    let (status, _) = server
        .post("/room/leave", Some(&carol), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(server.join(&bob, room_id, HARD).await, JOIN_OK);

    // Leaving twice is idempotent
    let (status, _) = server
        .post("/room/leave", Some(&carol), json!({ "room_id": room_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missing_room_is_not_found() {
    let server = TestServer::new(4).await;
    let alice = server.create_user("Alice", 1).await;

    for path in ["/room/wait", "/room/start", "/room/result"] {
        let (status, body) = server
            .post(path, Some(&alice), json!({ "room_id": 404 }))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert_eq!(body["error"], "RoomNotFound");
    }
}

#[tokio::test]
async fn test_invalid_request_bodies() {
    let server = TestServer::new(4).await;
    let alice = server.create_user("Alice", 1).await;

    // Unknown difficulty code
    let (status, body) = server
        .post(
            "/room/create",
            Some(&alice),
            json!({ "live_id": 1, "select_difficulty": 9 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidRequest");

    // Judge list of the wrong length
    let room_id = server.create_room(&alice, 1, NORMAL).await;
    let (status, _) = server
        .post(
            "/room/end",
            Some(&alice),
            json!({ "room_id": room_id, "judge_count_list": [1, 2, 3], "score": 10 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Negative score
    let (status, _) = server
        .post(
            "/room/end",
            Some(&alice),
            json!({ "room_id": room_id, "judge_count_list": [1, 2, 3, 4, 5], "score": -1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_concurrent_joins_fill_last_seat_once() {
    let server = TestServer::new(2).await;
    let host = server.create_user("Host", 1).await;
    let room_id = server.create_room(&host, 21, NORMAL).await;

    let mut tokens = Vec::new();
    for i in 0..8 {
        tokens.push(server.create_user(&format!("Player {}", i), i).await);
    }

    let joins = tokens
        .iter()
        .map(|token| server.join(token, room_id, NORMAL));
    let results: Vec<i64> = futures::future::join_all(joins).await;

    assert_eq!(results.iter().filter(|&&r| r == JOIN_OK).count(), 1);
    assert_eq!(results.iter().filter(|&&r| r == JOIN_ROOM_FULL).count(), 7);

    let wait = server.wait(&host, room_id).await;
    assert_eq!(wait["room_user_list"].as_array().unwrap().len(), 2);
}
