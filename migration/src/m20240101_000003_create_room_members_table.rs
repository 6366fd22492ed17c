use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_users_table::Users;
use crate::m20240101_000002_create_rooms_table::Rooms;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RoomMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RoomMembers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RoomMembers::RoomId).integer().not_null())
                    .col(ColumnDef::new(RoomMembers::UserId).integer().not_null())
                    .col(ColumnDef::new(RoomMembers::Difficulty).integer().not_null())
                    .col(
                        ColumnDef::new(RoomMembers::Perfect)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoomMembers::Great)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoomMembers::Good)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoomMembers::Bad)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RoomMembers::Miss)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    // NULL until the member submits a result
                    .col(ColumnDef::new(RoomMembers::Score).big_integer().null())
                    .col(
                        ColumnDef::new(RoomMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_members_room_id")
                            .from(RoomMembers::Table, RoomMembers::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_room_members_user_id")
                            .from(RoomMembers::Table, RoomMembers::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One membership per (room, user)
        manager
            .create_index(
                Index::create()
                    .name("idx_room_members_room_user")
                    .table(RoomMembers::Table)
                    .col(RoomMembers::RoomId)
                    .col(RoomMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RoomMembers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum RoomMembers {
    Table,
    Id,
    RoomId,
    UserId,
    Difficulty,
    Perfect,
    Great,
    Good,
    Bad,
    Miss,
    Score,
    JoinedAt,
}
