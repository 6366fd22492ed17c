use room_types::{RoomId, UnknownCode, UserId};
use sea_orm::DbErr;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),
    #[error("user {user_id} is not the host of room {room_id}")]
    NotHost { room_id: RoomId, user_id: UserId },
    #[error("user {user_id} is not a member of room {room_id}")]
    NotMember { room_id: RoomId, user_id: UserId },
    #[error("user {user_id} already submitted a result for room {room_id}")]
    ResultAlreadySubmitted { room_id: RoomId, user_id: UserId },
    #[error("room capacity {0} does not fit the rooms table")]
    CapacityOutOfRange(u32),
    #[error("corrupt row: {0}")]
    CorruptRow(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl From<UnknownCode> for RepositoryError {
    fn from(err: UnknownCode) -> Self {
        RepositoryError::CorruptRow(err.to_string())
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
