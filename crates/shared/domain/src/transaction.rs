//! Payment transaction domain entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Completed payment, keyed by the payment processor's identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Payment processor identifier (unique)
    pub stripe_id: String,
    /// Amount in minor currency units
    pub amount: i64,
    pub plan: Option<String>,
    pub credits: Option<i64>,
    pub buyer_id: Option<Uuid>,
}

/// Transaction creation data transfer object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateTransaction {
    #[validate(length(min = 1, message = "stripe_id is required"))]
    pub stripe_id: String,
    #[validate(range(min = 0, message = "amount cannot be negative"))]
    pub amount: i64,
    pub plan: Option<String>,
    #[validate(range(min = 0, message = "credits cannot be negative"))]
    pub credits: Option<i64>,
    pub buyer_id: Option<Uuid>,
}

impl CreateTransaction {
    /// Credits to grant and the user receiving them, when both are known
    pub fn credit_grant(&self) -> Option<(Uuid, i64)> {
        match (self.buyer_id, self.credits) {
            (Some(buyer), Some(credits)) if credits > 0 => Some((buyer, credits)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CreateTransaction {
        CreateTransaction {
            stripe_id: "cs_test_1".to_string(),
            amount: 2000,
            plan: Some("Pro Package".to_string()),
            credits: Some(120),
            buyer_id: Some(Uuid::new_v4()),
        }
    }

    #[test]
    fn credit_grant_requires_buyer_and_credits() {
        let input = sample();
        assert_eq!(input.credit_grant(), Some((input.buyer_id.unwrap(), 120)));

        let no_buyer = CreateTransaction {
            buyer_id: None,
            ..sample()
        };
        assert_eq!(no_buyer.credit_grant(), None);

        let zero = CreateTransaction {
            credits: Some(0),
            ..sample()
        };
        assert_eq!(zero.credit_grant(), None);
    }

    #[test]
    fn negative_amount_is_invalid() {
        let input = CreateTransaction {
            amount: -1,
            ..sample()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn empty_stripe_id_is_invalid() {
        let input = CreateTransaction {
            stripe_id: String::new(),
            ..sample()
        };
        assert!(input.validate().is_err());
    }
}
