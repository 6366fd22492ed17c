use std::convert::Infallible;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use warp::Filter;
use warp::http::HeaderMap;
use warp::http::header::AUTHORIZATION;

use crate::auth::AuthService;
use crate::handlers::{room, user};
use room_persistence::repositories::{RoomRepository, UserRepository};

pub mod auth;
pub mod config;
pub mod handlers;

/// Request bodies are a handful of integers and a user name.
const MAX_BODY_BYTES: u64 = 16 * 1024;

fn with_service<T: Send + Sync + 'static>(
    service: Arc<T>,
) -> impl Filter<Extract = (Arc<T>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn json_body<T: DeserializeOwned + Send>()
-> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

fn auth_header() -> impl Filter<Extract = (Option<String>,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization")
}

/// Like `auth_header`, but an unreadable value counts as no token at all.
fn lenient_auth_header() -> impl Filter<Extract = (Option<String>,), Error = Infallible> + Clone {
    warp::header::headers_cloned().map(|headers: HeaderMap| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    })
}

fn user_routes(
    auth_service: Arc<AuthService>,
    user_repository: Arc<UserRepository>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let create = warp::path!("user" / "create")
        .and(warp::post())
        .and(json_body())
        .and(with_service(user_repository.clone()))
        .and_then(user::create_user);

    let me = warp::path!("user" / "me")
        .and(warp::get())
        .and(auth_header())
        .and(with_service(auth_service))
        .and_then(user::get_me);

    let update = warp::path!("user" / "update")
        .and(warp::post())
        .and(json_body())
        .and(auth_header())
        .and(with_service(user_repository))
        .and_then(user::update_user);

    create.or(me).or(update)
}

fn room_routes(
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let auth_filter = with_service(auth_service);
    let room_filter = with_service(room_repository);

    let create = warp::path!("room" / "create")
        .and(warp::post())
        .and(json_body())
        .and(auth_header())
        .and(auth_filter.clone())
        .and(room_filter.clone())
        .and_then(room::create_room);

    // Listing is open to anyone who knows a live id
    let list = warp::path!("room" / "list")
        .and(warp::post())
        .and(json_body())
        .and(room_filter.clone())
        .and_then(room::list_rooms);

    // Join reports every failure in its body, including a garbled header
    let join = warp::path!("room" / "join")
        .and(warp::post())
        .and(json_body())
        .and(lenient_auth_header())
        .and(auth_filter.clone())
        .and(room_filter.clone())
        .and_then(room::join_room);

    let wait = warp::path!("room" / "wait")
        .and(warp::post())
        .and(json_body())
        .and(auth_header())
        .and(auth_filter.clone())
        .and(room_filter.clone())
        .and_then(room::wait_room);

    let start = warp::path!("room" / "start")
        .and(warp::post())
        .and(json_body())
        .and(auth_header())
        .and(auth_filter.clone())
        .and(room_filter.clone())
        .and_then(room::start_room);

    let end = warp::path!("room" / "end")
        .and(warp::post())
        .and(json_body())
        .and(auth_header())
        .and(auth_filter.clone())
        .and(room_filter.clone())
        .and_then(room::end_room);

    let result = warp::path!("room" / "result")
        .and(warp::post())
        .and(json_body())
        .and(auth_header())
        .and(auth_filter.clone())
        .and(room_filter.clone())
        .and_then(room::room_result);

    let leave = warp::path!("room" / "leave")
        .and(warp::post())
        .and(json_body())
        .and(auth_header())
        .and(auth_filter)
        .and(room_filter)
        .and_then(room::leave_room);

    create
        .or(list)
        .or(join)
        .or(wait)
        .or(start)
        .or(end)
        .or(result)
        .or(leave)
}

pub fn create_routes(
    auth_service: Arc<AuthService>,
    user_repository: Arc<UserRepository>,
    room_repository: Arc<RoomRepository>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let root = warp::path::end()
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "message": "Hello World" })));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", warp::http::StatusCode::OK));

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    root.or(health)
        .or(user_routes(auth_service.clone(), user_repository))
        .or(room_routes(auth_service, room_repository))
        .recover(handlers::handle_rejection)
        .with(cors)
        .with(warp::log("live_rooms"))
}
