use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UserId;

/// A user as seen by clients. Never carries the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SafeUser {
    pub id: UserId,
    pub name: String,
    pub leader_card_id: i32,
}
