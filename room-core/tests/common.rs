#![allow(dead_code)]

use room_core::{JudgeCounts, MemberScore, RoomOccupancy};
use room_types::{UserId, WaitRoomStatus};

/// An open room with the given head count, joined by a newcomer.
pub fn waiting_room(capacity: u32, joined_user_count: u32) -> RoomOccupancy {
    RoomOccupancy {
        status: WaitRoomStatus::Waiting,
        capacity,
        joined_user_count,
        caller_is_member: false,
    }
}

pub fn room_in_state(status: WaitRoomStatus, capacity: u32, joined_user_count: u32) -> RoomOccupancy {
    RoomOccupancy {
        status,
        ..waiting_room(capacity, joined_user_count)
    }
}

pub fn submitted(user_id: UserId, counts: [u32; 5], score: u32) -> MemberScore {
    MemberScore {
        user_id,
        judge_counts: JudgeCounts::from(counts),
        score: Some(score),
    }
}

pub fn pending(user_id: UserId) -> MemberScore {
    MemberScore {
        user_id,
        judge_counts: JudgeCounts::default(),
        score: None,
    }
}
