use std::collections::HashMap;
use std::fmt::Display;

use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use tracing::{debug, info};

use crate::entities::{prelude::*, room_members, rooms, users};
use crate::{RepositoryError, RepositoryResult};
use room_core::{
    JoinDecision, JudgeCounts, MemberScore, RoomLifecycle, RoomOccupancy, collect_results,
    decide_join,
};
use room_types::{
    JoinRoomResult, JudgeCountList, LiveDifficulty, LiveId, ResultUser, RoomId, RoomInfo,
    RoomUser, SafeUser, UserId, WaitRoomStatus,
};

/// Rooms, their rosters, lifecycle and results.
///
/// Every operation runs in its own transaction on the injected connection.
/// Operations that read a room before changing it lock the room row first,
/// so concurrent requests against the same room are applied one at a time.
pub struct RoomRepository {
    db: DatabaseConnection,
    max_user_count: u32,
}

fn non_negative<T>(value: T, column: &str) -> RepositoryResult<u32>
where
    T: TryInto<u32> + Copy + Display,
{
    value
        .try_into()
        .map_err(|_| RepositoryError::CorruptRow(format!("{} out of range: {}", column, value)))
}

impl RoomRepository {
    /// `max_user_count` is the capacity given to every room created from now on.
    pub fn new(db: DatabaseConnection, max_user_count: u32) -> Self {
        Self { db, max_user_count }
    }

    pub fn max_user_count(&self) -> u32 {
        self.max_user_count
    }

    async fn find_room_for_update(
        txn: &DatabaseTransaction,
        room_id: RoomId,
    ) -> RepositoryResult<Option<rooms::Model>> {
        let room = Rooms::find_by_id(room_id)
            .lock_exclusive()
            .one(txn)
            .await?;

        Ok(room)
    }

    async fn find_membership<C: ConnectionTrait>(
        conn: &C,
        room_id: RoomId,
        user_id: UserId,
    ) -> RepositoryResult<Option<room_members::Model>> {
        let member = RoomMembers::find()
            .filter(room_members::Column::RoomId.eq(room_id))
            .filter(room_members::Column::UserId.eq(user_id))
            .one(conn)
            .await?;

        Ok(member)
    }

    async fn insert_membership<C: ConnectionTrait>(
        conn: &C,
        room_id: RoomId,
        user_id: UserId,
        difficulty: LiveDifficulty,
    ) -> RepositoryResult<()> {
        let member = room_members::ActiveModel {
            id: ActiveValue::NotSet,
            room_id: ActiveValue::Set(room_id),
            user_id: ActiveValue::Set(user_id),
            difficulty: ActiveValue::Set(i32::from(difficulty)),
            perfect: ActiveValue::Set(0),
            great: ActiveValue::Set(0),
            good: ActiveValue::Set(0),
            bad: ActiveValue::Set(0),
            miss: ActiveValue::Set(0),
            score: ActiveValue::Set(None),
            joined_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        RoomMembers::insert(member).exec(conn).await?;
        Ok(())
    }

    async fn occupancy(
        txn: &DatabaseTransaction,
        room: &rooms::Model,
        user_id: UserId,
    ) -> RepositoryResult<RoomOccupancy> {
        let joined_user_count = RoomMembers::find()
            .filter(room_members::Column::RoomId.eq(room.id))
            .count(txn)
            .await?;
        let caller_is_member = Self::find_membership(txn, room.id, user_id)
            .await?
            .is_some();

        Ok(RoomOccupancy {
            status: WaitRoomStatus::try_from(room.status)?,
            capacity: non_negative(room.capacity, "rooms.capacity")?,
            joined_user_count: u32::try_from(joined_user_count).unwrap_or(u32::MAX),
            caller_is_member,
        })
    }

    async fn save_status(
        txn: &DatabaseTransaction,
        room: rooms::Model,
        status: WaitRoomStatus,
    ) -> RepositoryResult<()> {
        let mut updated_room: rooms::ActiveModel = room.into();
        updated_room.status = ActiveValue::Set(i32::from(status));
        updated_room.updated_at = ActiveValue::Set(chrono::Utc::now().into());
        updated_room.update(txn).await?;
        Ok(())
    }

    /// Creates a room hosted by `host` and makes the host its first member.
    pub async fn create_room(
        &self,
        host: &SafeUser,
        live_id: LiveId,
        difficulty: LiveDifficulty,
    ) -> RepositoryResult<RoomId> {
        let capacity = i32::try_from(self.max_user_count)
            .map_err(|_| RepositoryError::CapacityOutOfRange(self.max_user_count))?;
        let now = chrono::Utc::now().into();

        let room_model = rooms::ActiveModel {
            id: ActiveValue::NotSet,
            live_id: ActiveValue::Set(live_id),
            host_user_id: ActiveValue::Set(host.id),
            capacity: ActiveValue::Set(capacity),
            host_difficulty: ActiveValue::Set(i32::from(difficulty)),
            status: ActiveValue::Set(i32::from(WaitRoomStatus::Waiting)),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let txn = self.db.begin().await?;
        let room_id = Rooms::insert(room_model).exec(&txn).await?.last_insert_id;
        Self::insert_membership(&txn, room_id, host.id, difficulty).await?;
        txn.commit().await?;

        info!(
            "Room {} created for live {} by user {} (capacity {})",
            room_id, live_id, host.id, capacity
        );
        Ok(room_id)
    }

    /// Every room for `live_id`, whatever its state, with live head counts.
    pub async fn list_rooms(&self, live_id: LiveId) -> RepositoryResult<Vec<RoomInfo>> {
        let txn = self.db.begin().await?;

        let room_models = Rooms::find()
            .filter(rooms::Column::LiveId.eq(live_id))
            .order_by_asc(rooms::Column::Id)
            .all(&txn)
            .await?;

        let room_ids: Vec<RoomId> = room_models.iter().map(|room| room.id).collect();
        let counts: HashMap<RoomId, i64> = RoomMembers::find()
            .select_only()
            .column(room_members::Column::RoomId)
            .column_as(Expr::col(room_members::Column::Id).count(), "joined_user_count")
            .filter(room_members::Column::RoomId.is_in(room_ids))
            .group_by(room_members::Column::RoomId)
            .into_tuple::<(RoomId, i64)>()
            .all(&txn)
            .await?
            .into_iter()
            .collect();

        txn.commit().await?;

        room_models
            .into_iter()
            .map(|room| {
                let joined = counts.get(&room.id).copied().unwrap_or(0);
                Ok(RoomInfo {
                    room_id: room.id,
                    live_id: room.live_id,
                    joined_user_count: non_negative(joined, "joined_user_count")?,
                    max_user_count: non_negative(room.capacity, "rooms.capacity")?,
                })
            })
            .collect()
    }

    /// Capacity-checked join. The room row stays locked from the capacity
    /// check until the membership insert commits, so two callers racing for
    /// the last slot cannot both get `Ok`.
    pub async fn join(
        &self,
        caller: &SafeUser,
        room_id: RoomId,
        difficulty: LiveDifficulty,
    ) -> RepositoryResult<JoinRoomResult> {
        let txn = self.db.begin().await?;

        let occupancy = match Self::find_room_for_update(&txn, room_id).await? {
            Some(room) => Some(Self::occupancy(&txn, &room, caller.id).await?),
            None => None,
        };

        let decision = decide_join(occupancy);
        match decision {
            JoinDecision::Admit => {
                Self::insert_membership(&txn, room_id, caller.id, difficulty).await?;
                info!("User {} joined room {}", caller.id, room_id);
            }
            JoinDecision::AlreadyMember => {
                debug!("User {} is already in room {}", caller.id, room_id);
            }
            JoinDecision::Reject(result) => {
                debug!(
                    "User {} could not join room {}: {:?}",
                    caller.id, room_id, result
                );
            }
        }

        txn.commit().await?;
        Ok(decision.result())
    }

    /// Room status plus its roster in join order, flagged for the caller.
    pub async fn members(
        &self,
        caller: &SafeUser,
        room_id: RoomId,
    ) -> RepositoryResult<(WaitRoomStatus, Vec<RoomUser>)> {
        let txn = self.db.begin().await?;

        let room = Rooms::find_by_id(room_id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::RoomNotFound(room_id))?;

        let rows = RoomMembers::find()
            .filter(room_members::Column::RoomId.eq(room_id))
            .order_by_asc(room_members::Column::Id)
            .find_also_related(Users)
            .all(&txn)
            .await?;

        txn.commit().await?;

        let status = WaitRoomStatus::try_from(room.status)?;
        let room_user_list = rows
            .into_iter()
            .map(|(member, user)| {
                let user = user.ok_or_else(|| {
                    RepositoryError::CorruptRow(format!(
                        "membership {} references missing user {}",
                        member.id, member.user_id
                    ))
                })?;

                Ok(RoomUser {
                    user_id: member.user_id,
                    name: user.name,
                    leader_card_id: user.leader_card_id,
                    select_difficulty: LiveDifficulty::try_from(member.difficulty)?,
                    is_me: member.user_id == caller.id,
                    is_host: member.user_id == room.host_user_id,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((status, room_user_list))
    }

    /// Drops the caller's membership. The room, its host and its state are untouched.
    pub async fn leave(&self, caller: &SafeUser, room_id: RoomId) -> RepositoryResult<()> {
        let deleted = RoomMembers::delete_many()
            .filter(room_members::Column::RoomId.eq(room_id))
            .filter(room_members::Column::UserId.eq(caller.id))
            .exec(&self.db)
            .await?;

        if deleted.rows_affected > 0 {
            info!("User {} left room {}", caller.id, room_id);
        } else {
            debug!("User {} was not in room {}", caller.id, room_id);
        }

        Ok(())
    }

    /// Starts the live. Only the host may do this; repeating it is a no-op.
    pub async fn start(&self, caller: &SafeUser, room_id: RoomId) -> RepositoryResult<WaitRoomStatus> {
        let txn = self.db.begin().await?;

        let room = Self::find_room_for_update(&txn, room_id)
            .await?
            .ok_or(RepositoryError::RoomNotFound(room_id))?;

        if room.host_user_id != caller.id {
            return Err(RepositoryError::NotHost {
                room_id,
                user_id: caller.id,
            });
        }

        let mut lifecycle = RoomLifecycle::from_status(WaitRoomStatus::try_from(room.status)?);
        let transition = lifecycle.start();
        if transition.is_advanced() {
            Self::save_status(&txn, room, transition.status()).await?;
            info!("Room {} started by host {}", room_id, caller.id);
        }

        txn.commit().await?;
        Ok(transition.status())
    }

    /// Records the caller's result for the room and adds the score to their
    /// lifetime total. Both writes commit together or not at all, and a
    /// member can submit only once per room.
    pub async fn end(
        &self,
        caller: &SafeUser,
        room_id: RoomId,
        judge_count_list: JudgeCountList,
        score: u32,
    ) -> RepositoryResult<()> {
        let counts = JudgeCounts::from(judge_count_list);
        let txn = self.db.begin().await?;

        Rooms::find_by_id(room_id)
            .one(&txn)
            .await?
            .ok_or(RepositoryError::RoomNotFound(room_id))?;

        let member = Self::find_membership(&txn, room_id, caller.id)
            .await?
            .ok_or(RepositoryError::NotMember {
                room_id,
                user_id: caller.id,
            })?;

        // Conditional on the score still being empty so a concurrent
        // duplicate submission cannot count twice.
        let recorded = RoomMembers::update_many()
            .col_expr(room_members::Column::Perfect, Expr::value(i64::from(counts.perfect)))
            .col_expr(room_members::Column::Great, Expr::value(i64::from(counts.great)))
            .col_expr(room_members::Column::Good, Expr::value(i64::from(counts.good)))
            .col_expr(room_members::Column::Bad, Expr::value(i64::from(counts.bad)))
            .col_expr(room_members::Column::Miss, Expr::value(i64::from(counts.miss)))
            .col_expr(room_members::Column::Score, Expr::value(i64::from(score)))
            .filter(room_members::Column::Id.eq(member.id))
            .filter(room_members::Column::Score.is_null())
            .exec(&txn)
            .await?;

        if recorded.rows_affected == 0 {
            return Err(RepositoryError::ResultAlreadySubmitted {
                room_id,
                user_id: caller.id,
            });
        }

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        Users::update_many()
            .col_expr(
                users::Column::ScoreSum,
                Expr::col(users::Column::ScoreSum).add(i64::from(score)),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(caller.id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(
            "User {} finished room {} with score {} over {} notes",
            caller.id,
            room_id,
            score,
            counts.total_notes()
        );
        Ok(())
    }

    /// Dissolves the room (once) and returns every submitted result.
    pub async fn result(&self, caller: &SafeUser, room_id: RoomId) -> RepositoryResult<Vec<ResultUser>> {
        let txn = self.db.begin().await?;

        let room = Self::find_room_for_update(&txn, room_id)
            .await?
            .ok_or(RepositoryError::RoomNotFound(room_id))?;

        let mut lifecycle = RoomLifecycle::from_status(WaitRoomStatus::try_from(room.status)?);
        let transition = lifecycle.dissolve();
        if transition.is_advanced() {
            Self::save_status(&txn, room, transition.status()).await?;
            info!("Room {} dissolved on result request from user {}", room_id, caller.id);
        }

        let rows = RoomMembers::find()
            .filter(room_members::Column::RoomId.eq(room_id))
            .order_by_asc(room_members::Column::Id)
            .all(&txn)
            .await?;

        txn.commit().await?;

        let members = rows
            .into_iter()
            .map(|row| {
                Ok(MemberScore {
                    user_id: row.user_id,
                    judge_counts: JudgeCounts {
                        perfect: non_negative(row.perfect, "room_members.perfect")?,
                        great: non_negative(row.great, "room_members.great")?,
                        good: non_negative(row.good, "room_members.good")?,
                        bad: non_negative(row.bad, "room_members.bad")?,
                        miss: non_negative(row.miss, "room_members.miss")?,
                    },
                    score: row
                        .score
                        .map(|score| non_negative(score, "room_members.score"))
                        .transpose()?,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(collect_results(members))
    }
}
