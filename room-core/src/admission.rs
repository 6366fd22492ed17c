use room_types::{JoinRoomResult, WaitRoomStatus};

use crate::RoomLifecycle;

/// Snapshot of a room taken under its row lock, right before a join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub status: WaitRoomStatus,
    pub capacity: u32,
    pub joined_user_count: u32,
    pub caller_is_member: bool,
}

impl RoomOccupancy {
    pub fn is_full(&self) -> bool {
        self.joined_user_count >= self.capacity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinDecision {
    /// Insert a membership row for the caller.
    Admit,
    /// The caller already holds a slot; nothing to insert.
    AlreadyMember,
    Reject(JoinRoomResult),
}

impl JoinDecision {
    pub fn result(&self) -> JoinRoomResult {
        match self {
            JoinDecision::Admit | JoinDecision::AlreadyMember => JoinRoomResult::Ok,
            JoinDecision::Reject(result) => *result,
        }
    }
}

/// Decides a join attempt. `None` means the room does not exist.
///
/// Checks run in a fixed order: missing room, dissolved room, existing
/// membership, capacity. A dissolved room reports `Disbanded` even when full.
pub fn decide_join(room: Option<RoomOccupancy>) -> JoinDecision {
    let Some(room) = room else {
        return JoinDecision::Reject(JoinRoomResult::OtherError);
    };

    if RoomLifecycle::from_status(room.status).is_dissolved() {
        return JoinDecision::Reject(JoinRoomResult::Disbanded);
    }

    if room.caller_is_member {
        return JoinDecision::AlreadyMember;
    }

    if room.is_full() {
        return JoinDecision::Reject(JoinRoomResult::RoomFull);
    }

    // A started live is neither full nor disbanded, but it no longer takes players.
    if !RoomLifecycle::from_status(room.status).accepts_joins() {
        return JoinDecision::Reject(JoinRoomResult::OtherError);
    }

    JoinDecision::Admit
}
