//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub clerk_id: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub photo: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub plan_id: i32,
    /// Only ever changed through an in-database increment
    pub credit_balance: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            clerk_id: model.clerk_id,
            email: model.email,
            username: model.username,
            photo: model.photo,
            first_name: model.first_name,
            last_name: model.last_name,
            plan_id: model.plan_id,
            credit_balance: model.credit_balance,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
