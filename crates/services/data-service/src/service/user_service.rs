//! User service - account CRUD and credit bookkeeping.
//!
//! Every operation catches failures at its own boundary, logs them through
//! [`handle_error`], and hands the typed error back to the caller.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use common::{handle_error, AppResult, OptionExt};
use domain::{CreateUser, UpdateUser, User, HOME_PATH};

use crate::infra::Revalidator;
use crate::repository::UserRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a new user
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Get user by internal ID
    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User>;

    /// Get user by the identity provider's ID
    async fn get_user_by_clerk_id(&self, clerk_id: &str) -> AppResult<User>;

    /// Merge the supplied fields into the user and return the new state
    async fn update_user(&self, clerk_id: &str, update: UpdateUser) -> AppResult<User>;

    /// Delete user and mark the home page stale.
    ///
    /// Returns `None` if the record disappeared between lookup and delete.
    async fn delete_user(&self, clerk_id: &str) -> AppResult<Option<User>>;

    /// Add a signed amount to the user's credit balance
    async fn update_credits(&self, id: Uuid, delta: i64) -> AppResult<User>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    revalidator: Arc<dyn Revalidator>,
}

impl UserManager {
    /// Create new user service instance with repository and page revalidator
    pub fn new(repo: Arc<dyn UserRepository>, revalidator: Arc<dyn Revalidator>) -> Self {
        Self { repo, revalidator }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        let result: AppResult<User> = async {
            input.validate()?;
            let user = self.repo.create(input).await?;
            info!(user_id = %user.id, clerk_id = %user.clerk_id, "User created");
            Ok(user)
        }
        .await;

        result.map_err(handle_error("create_user"))
    }

    async fn get_user_by_id(&self, id: Uuid) -> AppResult<User> {
        self.repo
            .find_by_id(id)
            .await
            .and_then(|user| user.ok_or_not_found("User"))
            .map_err(handle_error("get_user_by_id"))
    }

    async fn get_user_by_clerk_id(&self, clerk_id: &str) -> AppResult<User> {
        self.repo
            .find_by_clerk_id(clerk_id)
            .await
            .and_then(|user| user.ok_or_not_found("User"))
            .map_err(handle_error("get_user_by_clerk_id"))
    }

    async fn update_user(&self, clerk_id: &str, update: UpdateUser) -> AppResult<User> {
        let result: AppResult<User> = async {
            update.validate()?;

            if update.is_empty() {
                return self
                    .repo
                    .find_by_clerk_id(clerk_id)
                    .await?
                    .ok_or_not_found("User");
            }

            let user = self
                .repo
                .update_by_clerk_id(clerk_id, update)
                .await?
                .ok_or_not_found("User")?;
            info!(user_id = %user.id, "User updated");
            Ok(user)
        }
        .await;

        result.map_err(handle_error("update_user"))
    }

    async fn delete_user(&self, clerk_id: &str) -> AppResult<Option<User>> {
        let result: AppResult<Option<User>> = async {
            let user = self
                .repo
                .find_by_clerk_id(clerk_id)
                .await?
                .ok_or_not_found("User")?;

            let deleted = self.repo.delete_by_id(user.id).await?;
            info!(user_id = %user.id, removed = deleted.is_some(), "User deleted");

            // The page will still be regenerated on its normal schedule
            if let Err(e) = self.revalidator.revalidate_path(HOME_PATH).await {
                warn!(path = HOME_PATH, error = %e, "Failed to revalidate page");
            }

            Ok(deleted)
        }
        .await;

        result.map_err(handle_error("delete_user"))
    }

    async fn update_credits(&self, id: Uuid, delta: i64) -> AppResult<User> {
        let result: AppResult<User> = async {
            let user = self
                .repo
                .increment_credits(id, delta)
                .await?
                .ok_or_not_found("User")?;
            info!(user_id = %id, delta, balance = user.credit_balance, "Credits updated");
            Ok(user)
        }
        .await;

        result.map_err(handle_error("update_credits"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use common::{AppError, ErrorKind};
    use mockall::predicate::eq;

    use crate::infra::MockRevalidator;
    use crate::repository::MockUserRepository;

    fn create_test_user(id: Uuid) -> User {
        User {
            id,
            clerk_id: "user_test".to_string(),
            email: "test@example.com".to_string(),
            username: "tester".to_string(),
            photo: "https://img.example.com/t.png".to_string(),
            first_name: Some("Test".to_string()),
            last_name: Some("User".to_string()),
            plan_id: 1,
            credit_balance: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(repo: MockUserRepository, revalidator: MockRevalidator) -> UserManager {
        UserManager::new(Arc::new(repo), Arc::new(revalidator))
    }

    #[tokio::test]
    async fn test_create_user_rejects_invalid_input_before_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().never();

        let service = service(repo, MockRevalidator::new());
        let result = service
            .create_user(CreateUser {
                clerk_id: "user_1".to_string(),
                email: "broken".to_string(),
                username: "ada".to_string(),
                photo: "p".to_string(),
                first_name: None,
                last_name: None,
            })
            .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_clerk_id().returning(|_| Ok(None));

        let service = service(repo, MockRevalidator::new());
        let result = service.get_user_by_clerk_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_update_by_clerk_id().returning(|_, _| Ok(None));

        let service = service(repo, MockRevalidator::new());
        let update = UpdateUser {
            first_name: Some("New".to_string()),
            ..Default::default()
        };
        let result = service.update_user("missing", update).await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_empty_update_returns_current_state() {
        let user_id = Uuid::new_v4();
        let mut repo = MockUserRepository::new();
        repo.expect_update_by_clerk_id().never();
        repo.expect_find_by_clerk_id()
            .returning(move |_| Ok(Some(create_test_user(user_id))));

        let service = service(repo, MockRevalidator::new());
        let user = service
            .update_user("user_test", UpdateUser::default())
            .await
            .unwrap();

        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn test_delete_user_revalidates_home_page() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_clerk_id()
            .returning(move |_| Ok(Some(create_test_user(user_id))));
        repo.expect_delete_by_id()
            .with(eq(user_id))
            .times(1)
            .returning(|id| Ok(Some(create_test_user(id))));

        let mut revalidator = MockRevalidator::new();
        revalidator
            .expect_revalidate_path()
            .withf(|path| path == HOME_PATH)
            .times(1)
            .returning(|_| Ok(()));

        let service = service(repo, revalidator);
        let deleted = service.delete_user("user_test").await.unwrap();

        assert_eq!(deleted.map(|u| u.id), Some(user_id));
    }

    #[tokio::test]
    async fn test_delete_user_survives_revalidation_failure() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_clerk_id()
            .returning(move |_| Ok(Some(create_test_user(user_id))));
        repo.expect_delete_by_id()
            .returning(|id| Ok(Some(create_test_user(id))));

        let mut revalidator = MockRevalidator::new();
        revalidator
            .expect_revalidate_path()
            .returning(|_| Err(AppError::timeout("redis")));

        let service = service(repo, revalidator);
        assert!(service.delete_user("user_test").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_missing_user_skips_delete_and_revalidation() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_clerk_id().returning(|_| Ok(None));
        repo.expect_delete_by_id().never();

        let mut revalidator = MockRevalidator::new();
        revalidator.expect_revalidate_path().never();

        let service = service(repo, revalidator);
        let result = service.delete_user("missing").await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_credits_passes_delta_through() {
        let user_id = Uuid::new_v4();

        let mut repo = MockUserRepository::new();
        repo.expect_increment_credits()
            .with(eq(user_id), eq(-3))
            .returning(|id, delta| {
                let mut user = create_test_user(id);
                user.credit_balance += delta;
                Ok(Some(user))
            });

        let service = service(repo, MockRevalidator::new());
        let user = service.update_credits(user_id, -3).await.unwrap();

        assert_eq!(user.credit_balance, 7);
    }

    #[tokio::test]
    async fn test_update_credits_unknown_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_increment_credits().returning(|_, _| Ok(None));

        let service = service(repo, MockRevalidator::new());
        let result = service.update_credits(Uuid::new_v4(), 5).await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
