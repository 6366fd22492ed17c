use std::convert::Infallible;

use serde::Serialize;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::{Rejection, Reply};

use crate::auth::AuthError;
use room_persistence::RepositoryError;
use room_types::{ErrorResponse, RoomError};

pub mod room;
pub mod user;

pub type ApiReply = WithStatus<Json>;

/// Failures of an authenticated request, mapped to HTTP statuses in one place.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("User not found")]
    UserNotFound,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, RoomError) {
        match self {
            ApiError::Auth(AuthError::MissingToken | AuthError::InvalidToken) => {
                (StatusCode::UNAUTHORIZED, RoomError::InvalidToken)
            }
            ApiError::UserNotFound => (StatusCode::NOT_FOUND, RoomError::UserNotFound),
            ApiError::Repository(RepositoryError::RoomNotFound(_)) => {
                (StatusCode::NOT_FOUND, RoomError::RoomNotFound)
            }
            ApiError::Repository(RepositoryError::NotHost { .. }) => {
                (StatusCode::FORBIDDEN, RoomError::NotHost)
            }
            ApiError::Repository(RepositoryError::NotMember { .. }) => {
                (StatusCode::FORBIDDEN, RoomError::NotMember)
            }
            ApiError::Repository(RepositoryError::ResultAlreadySubmitted { .. }) => {
                (StatusCode::CONFLICT, RoomError::ResultAlreadySubmitted)
            }
            ApiError::Auth(AuthError::Repository(_))
            | ApiError::Repository(RepositoryError::CapacityOutOfRange(_))
            | ApiError::Repository(RepositoryError::CorruptRow(_))
            | ApiError::Repository(RepositoryError::Database(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, RoomError::InternalError)
            }
        }
    }

    pub fn into_reply(self) -> ApiReply {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        // Store details stay in the log
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        error_reply(status, code, message)
    }
}

pub fn error_reply(status: StatusCode, error: RoomError, message: impl Into<String>) -> ApiReply {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            error,
            message: message.into(),
        }),
        status,
    )
}

pub fn respond<T: Serialize>(result: Result<T, ApiError>) -> ApiReply {
    match result {
        Ok(body) => warp::reply::with_status(warp::reply::json(&body), StatusCode::OK),
        Err(err) => err.into_reply(),
    }
}

/// Turns rejected requests into JSON errors. Body decoding failures mean the
/// client and server disagree on a request shape, so they are logged.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let reply = if err.is_not_found() {
        error_reply(StatusCode::NOT_FOUND, RoomError::InvalidRequest, "Not found")
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        tracing::warn!("Request validation error: {}", e);
        error_reply(StatusCode::BAD_REQUEST, RoomError::InvalidRequest, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::InvalidHeader>() {
        tracing::warn!("Request validation error: {}", e);
        error_reply(StatusCode::UNAUTHORIZED, RoomError::InvalidToken, e.to_string())
    } else if let Some(e) = err.find::<warp::reject::UnsupportedMediaType>() {
        tracing::warn!("Request validation error: {}", e);
        error_reply(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RoomError::InvalidRequest,
            e.to_string(),
        )
    } else if let Some(e) = err.find::<warp::reject::PayloadTooLarge>() {
        tracing::warn!("Request validation error: {}", e);
        error_reply(StatusCode::PAYLOAD_TOO_LARGE, RoomError::InvalidRequest, e.to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            RoomError::InvalidRequest,
            "Method not allowed",
        )
    } else {
        tracing::error!("Unhandled rejection: {:?}", err);
        error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            RoomError::InternalError,
            "Internal server error",
        )
    };

    Ok(reply)
}
