mod common;

use common::*;
use room_core::{JoinDecision, collect_results, decide_join};
use room_types::{JoinRoomResult, WaitRoomStatus};

#[test]
fn test_missing_room_is_other_error() {
    let decision = decide_join(None);
    assert_eq!(decision, JoinDecision::Reject(JoinRoomResult::OtherError));
    assert_eq!(decision.result(), JoinRoomResult::OtherError);
}

#[test]
fn test_open_room_admits() {
    let decision = decide_join(Some(waiting_room(4, 1)));
    assert_eq!(decision, JoinDecision::Admit);
    assert_eq!(decision.result(), JoinRoomResult::Ok);
}

#[test]
fn test_last_slot_admits_then_full() {
    assert_eq!(decide_join(Some(waiting_room(2, 1))), JoinDecision::Admit);
    assert_eq!(
        decide_join(Some(waiting_room(2, 2))).result(),
        JoinRoomResult::RoomFull
    );
}

#[test]
fn test_dissolved_room_is_disbanded_even_when_full() {
    let open = room_in_state(WaitRoomStatus::Dissolution, 4, 1);
    let full = room_in_state(WaitRoomStatus::Dissolution, 4, 4);

    assert_eq!(decide_join(Some(open)).result(), JoinRoomResult::Disbanded);
    assert_eq!(decide_join(Some(full)).result(), JoinRoomResult::Disbanded);
}

#[test]
fn test_started_room_rejects_newcomers() {
    let started = room_in_state(WaitRoomStatus::LiveStart, 4, 2);
    assert_eq!(decide_join(Some(started)).result(), JoinRoomResult::OtherError);

    let started_full = room_in_state(WaitRoomStatus::LiveStart, 2, 2);
    assert_eq!(
        decide_join(Some(started_full)).result(),
        JoinRoomResult::RoomFull
    );
}

#[test]
fn test_existing_member_keeps_slot_in_full_room() {
    let mut room = waiting_room(2, 2);
    room.caller_is_member = true;

    let decision = decide_join(Some(room));
    assert_eq!(decision, JoinDecision::AlreadyMember);
    assert_eq!(decision.result(), JoinRoomResult::Ok);
}

#[test]
fn test_results_skip_pending_members() {
    let results = collect_results(vec![
        submitted(1, [10, 5, 2, 1, 0], 9000),
        pending(2),
        submitted(3, [3, 3, 3, 3, 3], 1200),
    ]);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].user_id, 1);
    assert_eq!(results[0].judge_count_list, [10, 5, 2, 1, 0]);
    assert_eq!(results[0].score, 9000);
    assert_eq!(results[1].user_id, 3);
}

#[test]
fn test_judge_counts_total() {
    let member = submitted(1, [10, 5, 2, 1, 0], 9000);
    assert_eq!(member.judge_counts.total_notes(), 18);
    assert!(member.is_submitted());
    assert!(!pending(2).is_submitted());
}
