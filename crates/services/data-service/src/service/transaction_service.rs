//! Transaction service - records purchases and grants the bought credits.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use common::{handle_error, AppResult, OptionExt};
use domain::{CreateTransaction, Transaction};

use crate::repository::TransactionRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Transaction service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Store a completed payment and credit the buyer
    async fn record_purchase(&self, input: CreateTransaction) -> AppResult<Transaction>;

    /// Get transaction by the payment processor's ID
    async fn get_transaction_by_stripe_id(&self, stripe_id: &str) -> AppResult<Transaction>;

    /// List a user's payments, newest first
    async fn list_transactions_by_buyer(&self, buyer_id: Uuid) -> AppResult<Vec<Transaction>>;
}

/// Concrete implementation of TransactionService.
pub struct TransactionManager {
    transactions: Arc<dyn TransactionRepository>,
}

impl TransactionManager {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }
}

#[async_trait]
impl TransactionService for TransactionManager {
    async fn record_purchase(&self, input: CreateTransaction) -> AppResult<Transaction> {
        let result: AppResult<Transaction> = async {
            input.validate()?;
            let grant = input.credit_grant();

            let recorded = self.transactions.record(input).await?;
            let transaction = recorded.transaction;
            info!(
                transaction_id = %transaction.id,
                stripe_id = %transaction.stripe_id,
                amount = transaction.amount,
                "Transaction recorded"
            );

            if let Some((buyer_id, credits)) = grant {
                // The payment is stored either way, so a missing buyer is
                // reported rather than failing the purchase.
                match recorded.buyer {
                    Some(user) => info!(
                        user_id = %user.id,
                        credits,
                        balance = user.credit_balance,
                        "Purchased credits granted"
                    ),
                    None => error!(
                        buyer_id = %buyer_id,
                        stripe_id = %transaction.stripe_id,
                        "Buyer not found, credits not granted"
                    ),
                }
            }

            Ok(transaction)
        }
        .await;

        result.map_err(handle_error("record_purchase"))
    }

    async fn get_transaction_by_stripe_id(&self, stripe_id: &str) -> AppResult<Transaction> {
        self.transactions
            .find_by_stripe_id(stripe_id)
            .await
            .and_then(|t| t.ok_or_not_found("Transaction"))
            .map_err(handle_error("get_transaction_by_stripe_id"))
    }

    async fn list_transactions_by_buyer(&self, buyer_id: Uuid) -> AppResult<Vec<Transaction>> {
        self.transactions
            .list_by_buyer(buyer_id)
            .await
            .map_err(handle_error("list_transactions_by_buyer"))
    }
}
