//! Payment transaction repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::entities::transaction::{self, ActiveModel, Entity as TransactionEntity};
use super::user_repository::add_credits;
use crate::infra::ConnectionCache;
use common::AppResult;
use domain::{CreateTransaction, Transaction, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Transaction repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert a transaction and grant its credits atomically.
    ///
    /// Either both the row and the balance change are stored, or neither is.
    /// A repeated processor ID is rejected by the store.
    async fn record(&self, input: CreateTransaction) -> AppResult<RecordedPurchase>;

    /// Find transaction by the payment processor's ID
    async fn find_by_stripe_id(&self, stripe_id: &str) -> AppResult<Option<Transaction>>;

    /// List transactions paid by a user, newest first
    async fn list_by_buyer(&self, buyer_id: Uuid) -> AppResult<Vec<Transaction>>;
}

/// Outcome of [`TransactionRepository::record`].
#[derive(Debug, Clone)]
pub struct RecordedPurchase {
    pub transaction: Transaction,
    /// Buyer after the grant; `None` when nothing was granted or the buyer is unknown
    pub buyer: Option<User>,
}

/// Concrete implementation of TransactionRepository
pub struct TransactionStore {
    db: Arc<ConnectionCache>,
}

impl TransactionStore {
    /// Create new repository instance
    pub fn new(db: Arc<ConnectionCache>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TransactionRepository for TransactionStore {
    async fn record(&self, input: CreateTransaction) -> AppResult<RecordedPurchase> {
        let db = self.db.ensure_connection().await?;
        let grant = input.credit_grant();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            created_at: Set(chrono::Utc::now()),
            stripe_id: Set(input.stripe_id),
            amount: Set(input.amount),
            plan: Set(input.plan),
            credits: Set(input.credits),
            buyer_id: Set(input.buyer_id),
        };

        // Dropping the transaction on an early return rolls it back
        let txn = db.begin().await?;
        let model = active_model.insert(&txn).await?;
        let buyer = match grant {
            Some((buyer_id, credits)) => add_credits(&txn, buyer_id, credits).await?,
            None => None,
        };
        txn.commit().await?;

        Ok(RecordedPurchase {
            transaction: Transaction::from(model),
            buyer,
        })
    }

    async fn find_by_stripe_id(&self, stripe_id: &str) -> AppResult<Option<Transaction>> {
        let db = self.db.ensure_connection().await?;
        let result = TransactionEntity::find()
            .filter(transaction::Column::StripeId.eq(stripe_id))
            .one(db)
            .await?;

        Ok(result.map(Transaction::from))
    }

    async fn list_by_buyer(&self, buyer_id: Uuid) -> AppResult<Vec<Transaction>> {
        let db = self.db.ensure_connection().await?;
        let models = TransactionEntity::find()
            .filter(transaction::Column::BuyerId.eq(buyer_id))
            .order_by_desc(transaction::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(models.into_iter().map(Transaction::from).collect())
    }
}
