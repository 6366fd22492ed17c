use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{
    JoinRoomResult, JudgeCountList, LiveDifficulty, LiveId, ResultUser, RoomId, RoomInfo,
    RoomUser, WaitRoomStatus,
};

// User API

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserCreateRequest {
    pub user_name: String,
    pub leader_card_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserCreateResponse {
    pub user_token: String,
}

/// Acknowledgement body for operations with nothing to return.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Empty {}

// Room API

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomCreateRequest {
    pub live_id: LiveId,
    #[ts(type = "number")]
    pub select_difficulty: LiveDifficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomCreateResponse {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomListRequest {
    pub live_id: LiveId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomListResponse {
    pub room_info_list: Vec<RoomInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomJoinRequest {
    pub room_id: RoomId,
    #[ts(type = "number")]
    pub select_difficulty: LiveDifficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomJoinResponse {
    #[ts(type = "number")]
    pub join_room_result: JoinRoomResult,
}

/// Body shared by wait, start, leave and result requests.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomIdRequest {
    pub room_id: RoomId,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomWaitResponse {
    #[ts(type = "number")]
    pub status: WaitRoomStatus,
    pub room_user_list: Vec<RoomUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomEndRequest {
    pub room_id: RoomId,
    pub judge_count_list: JudgeCountList,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomResultResponse {
    pub result_user_list: Vec<ResultUser>,
}
