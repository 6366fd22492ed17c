use room_types::WaitRoomStatus;
use tracing::debug;

/// What a lifecycle request did to the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced {
        from: WaitRoomStatus,
        to: WaitRoomStatus,
    },
    Unchanged(WaitRoomStatus),
}

impl Transition {
    /// Status of the room after the request.
    pub fn status(&self) -> WaitRoomStatus {
        match self {
            Transition::Advanced { to, .. } => *to,
            Transition::Unchanged(status) => *status,
        }
    }

    pub fn is_advanced(&self) -> bool {
        matches!(self, Transition::Advanced { .. })
    }
}

/// Waiting -> LiveStart -> Dissolution, never backwards.
///
/// Requests for a state at or behind the current one are accepted and leave
/// the room where it is, so `start` and `dissolve` are safe to repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomLifecycle {
    status: WaitRoomStatus,
}

impl RoomLifecycle {
    pub fn new() -> Self {
        Self::from_status(WaitRoomStatus::Waiting)
    }

    pub fn from_status(status: WaitRoomStatus) -> Self {
        Self { status }
    }

    pub fn status(&self) -> WaitRoomStatus {
        self.status
    }

    pub fn accepts_joins(&self) -> bool {
        self.status == WaitRoomStatus::Waiting
    }

    pub fn is_dissolved(&self) -> bool {
        self.status == WaitRoomStatus::Dissolution
    }

    pub fn advance_to(&mut self, target: WaitRoomStatus) -> Transition {
        if target <= self.status {
            debug!(
                "Ignoring lifecycle request {:?}, room already {:?}",
                target, self.status
            );
            return Transition::Unchanged(self.status);
        }

        let from = self.status;
        self.status = target;
        Transition::Advanced { from, to: target }
    }

    pub fn start(&mut self) -> Transition {
        self.advance_to(WaitRoomStatus::LiveStart)
    }

    pub fn dissolve(&mut self) -> Transition {
        self.advance_to(WaitRoomStatus::Dissolution)
    }
}

impl Default for RoomLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
