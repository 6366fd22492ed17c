use std::sync::Arc;

use warp::Rejection;

use super::{ApiError, ApiReply, respond};
use crate::auth::{AuthError, AuthService};
use room_persistence::repositories::UserRepository;
use room_types::{Empty, SafeUser, UserCreateRequest, UserCreateResponse};

pub async fn create_user(
    req: UserCreateRequest,
    user_repository: Arc<UserRepository>,
) -> Result<ApiReply, Rejection> {
    let result = user_repository
        .create_user(&req.user_name, req.leader_card_id)
        .await
        .map(|user_token| UserCreateResponse { user_token })
        .map_err(ApiError::from);

    Ok(respond(result))
}

/// The caller's own profile. An unknown token reads as a missing user.
pub async fn get_me(
    auth_header: Option<String>,
    auth_service: Arc<AuthService>,
) -> Result<ApiReply, Rejection> {
    let result: Result<SafeUser, ApiError> =
        match auth_service.authenticate(auth_header.as_deref()).await {
            Ok(user) => Ok(user),
            Err(AuthError::InvalidToken) => Err(ApiError::UserNotFound),
            Err(err) => Err(err.into()),
        };

    Ok(respond(result))
}

pub async fn update_user(
    req: UserCreateRequest,
    auth_header: Option<String>,
    user_repository: Arc<UserRepository>,
) -> Result<ApiReply, Rejection> {
    let result = async {
        let token = AuthService::bearer_token(auth_header.as_deref())?;
        user_repository
            .update_user(token, &req.user_name, req.leader_card_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        Ok::<_, ApiError>(Empty {})
    }
    .await;

    Ok(respond(result))
}
