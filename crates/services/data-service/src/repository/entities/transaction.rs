//! Payment transaction database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Transaction;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub created_at: DateTimeUtc,
    #[sea_orm(unique)]
    pub stripe_id: String,
    pub amount: i64,
    pub plan: Option<String>,
    pub credits: Option<i64>,
    pub buyer_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Transaction {
            id: model.id,
            created_at: model.created_at,
            stripe_id: model.stripe_id,
            amount: model.amount,
            plan: model.plan,
            credits: model.credits,
            buyer_id: model.buyer_id,
        }
    }
}
