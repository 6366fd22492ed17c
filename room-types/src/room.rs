use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{LiveId, RoomId, UnknownCode, UserId};

/// Number of judgement tiers reported at the end of a live:
/// perfect, great, good, bad, miss.
pub const JUDGE_TIERS: usize = 5;

pub type JudgeCountList = [u32; JUDGE_TIERS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum LiveDifficulty {
    Normal = 1,
    Hard = 2,
}

impl From<LiveDifficulty> for i32 {
    fn from(difficulty: LiveDifficulty) -> Self {
        difficulty as i32
    }
}

impl TryFrom<i32> for LiveDifficulty {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(LiveDifficulty::Normal),
            2 => Ok(LiveDifficulty::Hard),
            _ => Err(UnknownCode {
                kind: "difficulty",
                code,
            }),
        }
    }
}

/// Outcome of a join attempt. Failures are reported as data, never as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum JoinRoomResult {
    Ok = 1,
    RoomFull = 2,
    Disbanded = 3,
    OtherError = 4,
}

impl From<JoinRoomResult> for i32 {
    fn from(result: JoinRoomResult) -> Self {
        result as i32
    }
}

impl TryFrom<i32> for JoinRoomResult {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(JoinRoomResult::Ok),
            2 => Ok(JoinRoomResult::RoomFull),
            3 => Ok(JoinRoomResult::Disbanded),
            4 => Ok(JoinRoomResult::OtherError),
            _ => Err(UnknownCode {
                kind: "join result",
                code,
            }),
        }
    }
}

/// Room lifecycle state. Variants are declared in lifecycle order so the
/// derived `Ord` matches the only allowed direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum WaitRoomStatus {
    Waiting = 1,
    LiveStart = 2,
    Dissolution = 3,
}

impl From<WaitRoomStatus> for i32 {
    fn from(status: WaitRoomStatus) -> Self {
        status as i32
    }
}

impl TryFrom<i32> for WaitRoomStatus {
    type Error = UnknownCode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(WaitRoomStatus::Waiting),
            2 => Ok(WaitRoomStatus::LiveStart),
            3 => Ok(WaitRoomStatus::Dissolution),
            _ => Err(UnknownCode {
                kind: "room status",
                code,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub live_id: LiveId,
    pub joined_user_count: u32,
    pub max_user_count: u32,
}

/// One row of the waiting-room roster, personalised for the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomUser {
    pub user_id: UserId,
    pub name: String,
    pub leader_card_id: i32,
    #[ts(type = "number")]
    pub select_difficulty: LiveDifficulty,
    pub is_me: bool,
    pub is_host: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ResultUser {
    pub user_id: UserId,
    pub judge_count_list: JudgeCountList,
    pub score: u32,
}
