//! User repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::infra::ConnectionCache;
use common::AppResult;
use domain::{CreateUser, UpdateUser, User, DEFAULT_CREDIT_BALANCE, DEFAULT_PLAN_ID};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with default plan and balance
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// Find user by internal ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find user by the identity provider's ID
    async fn find_by_clerk_id(&self, clerk_id: &str) -> AppResult<Option<User>>;

    /// Apply the supplied fields; `None` when no user matches
    async fn update_by_clerk_id(&self, clerk_id: &str, update: UpdateUser)
        -> AppResult<Option<User>>;

    /// Delete user by ID, returning the removed record if there was one
    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Atomically add `delta` to the credit balance; `None` when no user matches
    async fn increment_credits(&self, id: Uuid, delta: i64) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserRepository
pub struct UserStore {
    db: Arc<ConnectionCache>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: Arc<ConnectionCache>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        let db = self.db.ensure_connection().await?;
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            clerk_id: Set(input.clerk_id),
            email: Set(input.email),
            username: Set(input.username),
            photo: Set(input.photo),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            plan_id: Set(DEFAULT_PLAN_ID),
            credit_balance: Set(DEFAULT_CREDIT_BALANCE),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(db).await?;
        Ok(User::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let db = self.db.ensure_connection().await?;
        let result = UserEntity::find_by_id(id).one(db).await?;

        Ok(result.map(User::from))
    }

    async fn find_by_clerk_id(&self, clerk_id: &str) -> AppResult<Option<User>> {
        let db = self.db.ensure_connection().await?;
        let result = UserEntity::find()
            .filter(user::Column::ClerkId.eq(clerk_id))
            .one(db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn update_by_clerk_id(
        &self,
        clerk_id: &str,
        update: UpdateUser,
    ) -> AppResult<Option<User>> {
        let db = self.db.ensure_connection().await?;
        let Some(user) = UserEntity::find()
            .filter(user::Column::ClerkId.eq(clerk_id))
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: ActiveModel = user.into();

        if let Some(first_name) = update.first_name {
            active.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = update.last_name {
            active.last_name = Set(Some(last_name));
        }
        if let Some(username) = update.username {
            active.username = Set(username);
        }
        if let Some(photo) = update.photo {
            active.photo = Set(photo);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(db).await?;
        Ok(Some(User::from(model)))
    }

    async fn delete_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let db = self.db.ensure_connection().await?;
        let Some(model) = UserEntity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let result = UserEntity::delete_by_id(id).exec(db).await?;

        // Someone else removed it between the lookup and the delete
        if result.rows_affected == 0 {
            return Ok(None);
        }

        Ok(Some(User::from(model)))
    }

    async fn increment_credits(&self, id: Uuid, delta: i64) -> AppResult<Option<User>> {
        let db = self.db.ensure_connection().await?;
        Ok(add_credits(db, id, delta).await?)
    }
}

/// Add `delta` to a user's balance on `conn`, which may be an open transaction.
///
/// Returns `None` when no user matches.
pub(crate) async fn add_credits<C>(conn: &C, id: Uuid, delta: i64) -> Result<Option<User>, DbErr>
where
    C: ConnectionTrait,
{
    // Single UPDATE so concurrent adjustments cannot overwrite each other
    let result = UserEntity::update_many()
        .col_expr(
            user::Column::CreditBalance,
            Expr::col(user::Column::CreditBalance).add(delta),
        )
        .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(user::Column::Id.eq(id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Ok(None);
    }

    let model = UserEntity::find_by_id(id).one(conn).await?;
    Ok(model.map(User::from))
}
