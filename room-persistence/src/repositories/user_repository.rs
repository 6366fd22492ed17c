use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::RepositoryResult;
use crate::entities::{prelude::*, users};
use room_types::{SafeUser, UserId};

/// Token-to-identity directory. The token is the only credential a user has.
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn model_to_user(model: users::Model) -> SafeUser {
        SafeUser {
            id: model.id,
            name: model.name,
            leader_card_id: model.leader_card_id,
        }
    }

    async fn find_model_by_token<C: ConnectionTrait>(
        conn: &C,
        token: &str,
    ) -> RepositoryResult<Option<users::Model>> {
        let user_model = Users::find()
            .filter(users::Column::Token.eq(token))
            .one(conn)
            .await?;

        Ok(user_model)
    }

    /// Registers a user and returns their new token.
    ///
    /// Tokens are random v4 UUIDs. A collision fails the insert on the unique
    /// index and is reported to the caller rather than retried.
    pub async fn create_user(&self, name: &str, leader_card_id: i32) -> RepositoryResult<String> {
        let token = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().into();

        let user_model = users::ActiveModel {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(name.to_string()),
            leader_card_id: ActiveValue::Set(leader_card_id),
            token: ActiveValue::Set(token.clone()),
            score_sum: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        let inserted = Users::insert(user_model).exec(&self.db).await?;
        info!("Created user {}", inserted.last_insert_id);

        Ok(token)
    }

    pub async fn find_by_token(&self, token: &str) -> RepositoryResult<Option<SafeUser>> {
        let user_model = Self::find_model_by_token(&self.db, token).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    pub async fn find_by_id(&self, id: UserId) -> RepositoryResult<Option<SafeUser>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(Self::model_to_user))
    }

    /// Lifetime total of every score the user has submitted.
    pub async fn score_sum(&self, id: UserId) -> RepositoryResult<Option<i64>> {
        let user_model = Users::find_by_id(id).one(&self.db).await?;
        Ok(user_model.map(|model| model.score_sum))
    }

    /// Updates name and leader card in place. Returns `None` for an unknown token.
    pub async fn update_user(
        &self,
        token: &str,
        name: &str,
        leader_card_id: i32,
    ) -> RepositoryResult<Option<SafeUser>> {
        let txn = self.db.begin().await?;

        let Some(user) = Self::find_model_by_token(&txn, token).await? else {
            return Ok(None);
        };

        let mut updated_user: users::ActiveModel = user.into();
        updated_user.name = ActiveValue::Set(name.to_string());
        updated_user.leader_card_id = ActiveValue::Set(leader_card_id);
        updated_user.updated_at = ActiveValue::Set(chrono::Utc::now().into());

        let saved = updated_user.update(&txn).await?;
        txn.commit().await?;

        info!("Updated profile of user {}", saved.id);
        Ok(Some(Self::model_to_user(saved)))
    }
}
