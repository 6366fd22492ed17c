use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Error codes surfaced to clients in error response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoomError {
    InvalidToken,
    UserNotFound,
    RoomNotFound,
    NotHost,
    NotMember,
    ResultAlreadySubmitted,
    InvalidRequest,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: RoomError,
    pub message: String,
}

/// An integer code that does not name any variant of a wire enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} code {code}")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub code: i32,
}
