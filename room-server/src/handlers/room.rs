use std::sync::Arc;

use warp::Rejection;
use warp::http::StatusCode;

use super::{ApiError, ApiReply, respond};
use crate::auth::AuthService;
use room_persistence::repositories::RoomRepository;
use room_types::{
    Empty, JoinRoomResult, RoomCreateRequest, RoomCreateResponse, RoomEndRequest, RoomIdRequest,
    RoomJoinRequest, RoomJoinResponse, RoomListRequest, RoomListResponse, RoomResultResponse,
    RoomWaitResponse,
};

pub async fn create_room(
    req: RoomCreateRequest,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let result = async {
        let user = auth_service.authenticate(auth_header.as_deref()).await?;
        let room_id = room_repository
            .create_room(&user, req.live_id, req.select_difficulty)
            .await?;
        Ok::<_, ApiError>(RoomCreateResponse { room_id })
    }
    .await;

    Ok(respond(result))
}

pub async fn list_rooms(
    req: RoomListRequest,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let result = room_repository
        .list_rooms(req.live_id)
        .await
        .map(|room_info_list| RoomListResponse { room_info_list })
        .map_err(ApiError::from);

    Ok(respond(result))
}

/// Join never fails at the HTTP level: every failure is reported as
/// `OtherError` in the body.
pub async fn join_room(
    req: RoomJoinRequest,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let outcome = async {
        let user = auth_service.authenticate(auth_header.as_deref()).await?;
        let result = room_repository
            .join(&user, req.room_id, req.select_difficulty)
            .await?;
        Ok::<_, ApiError>(result)
    }
    .await;

    let join_room_result = outcome.unwrap_or_else(|err| {
        match &err {
            ApiError::Auth(_) => tracing::debug!("Join to room {} refused: {}", req.room_id, err),
            _ => tracing::error!("Join to room {} failed: {}", req.room_id, err),
        }
        JoinRoomResult::OtherError
    });

    Ok(warp::reply::with_status(
        warp::reply::json(&RoomJoinResponse { join_room_result }),
        StatusCode::OK,
    ))
}

pub async fn wait_room(
    req: RoomIdRequest,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let result = async {
        let user = auth_service.authenticate(auth_header.as_deref()).await?;
        let (status, room_user_list) = room_repository.members(&user, req.room_id).await?;
        Ok::<_, ApiError>(RoomWaitResponse {
            status,
            room_user_list,
        })
    }
    .await;

    Ok(respond(result))
}

pub async fn start_room(
    req: RoomIdRequest,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let result = async {
        let user = auth_service.authenticate(auth_header.as_deref()).await?;
        room_repository.start(&user, req.room_id).await?;
        Ok::<_, ApiError>(Empty {})
    }
    .await;

    Ok(respond(result))
}

pub async fn end_room(
    req: RoomEndRequest,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let result = async {
        let user = auth_service.authenticate(auth_header.as_deref()).await?;
        room_repository
            .end(&user, req.room_id, req.judge_count_list, req.score)
            .await?;
        Ok::<_, ApiError>(Empty {})
    }
    .await;

    Ok(respond(result))
}

pub async fn room_result(
    req: RoomIdRequest,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let result = async {
        let user = auth_service.authenticate(auth_header.as_deref()).await?;
        let result_user_list = room_repository.result(&user, req.room_id).await?;
        Ok::<_, ApiError>(RoomResultResponse { result_user_list })
    }
    .await;

    Ok(respond(result))
}

pub async fn leave_room(
    req: RoomIdRequest,
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
    room_repository: Arc<RoomRepository>,
) -> Result<ApiReply, Rejection> {
    let result = async {
        let user = auth_service.authenticate(auth_header.as_deref()).await?;
        room_repository.leave(&user, req.room_id).await?;
        Ok::<_, ApiError>(Empty {})
    }
    .await;

    Ok(respond(result))
}
