//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Identifier issued by the authentication provider
    pub clerk_id: String,
    pub email: String,
    pub username: String,
    pub photo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub plan_id: i32,
    pub credit_balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name built from the optional name parts, falling back to the username
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.username.clone(),
        }
    }

    /// Check whether the balance covers a fee
    pub fn can_afford(&self, fee: i64) -> bool {
        self.credit_balance >= fee
    }
}

/// User creation data transfer object
///
/// New users always start on `DEFAULT_PLAN_ID` with `DEFAULT_CREDIT_BALANCE`;
/// the balance only moves afterwards through credit updates and purchases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    /// Identifier issued by the authentication provider
    #[validate(length(min = 1, message = "clerk_id is required"))]
    pub clerk_id: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "photo is required"))]
    pub photo: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Partial user update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(length(min = 1, message = "username cannot be empty"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "photo cannot be empty"))]
    pub photo: Option<String>,
}

impl UpdateUser {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.username.is_none()
            && self.photo.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            clerk_id: "user_1".to_string(),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            photo: "https://img.example.com/ada.png".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: None,
            plan_id: 1,
            credit_balance: 10,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_prefers_name_parts() {
        let mut user = sample_user();
        assert_eq!(user.display_name(), "Ada");

        user.last_name = Some("Lovelace".to_string());
        assert_eq!(user.display_name(), "Ada Lovelace");

        user.first_name = None;
        user.last_name = None;
        assert_eq!(user.display_name(), "ada");
    }

    #[test]
    fn can_afford_compares_against_balance() {
        let user = sample_user();
        assert!(user.can_afford(10));
        assert!(!user.can_afford(11));
    }

    #[test]
    fn create_user_rejects_bad_email() {
        let input = CreateUser {
            clerk_id: "user_1".to_string(),
            email: "not-an-email".to_string(),
            username: "ada".to_string(),
            photo: "p".to_string(),
            first_name: None,
            last_name: None,
        };

        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn update_user_empty_username_is_invalid() {
        let update = UpdateUser {
            username: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
        assert!(UpdateUser::default().is_empty());
    }
}
