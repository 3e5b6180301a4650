//! Image database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{DomainError, Image, TransformationConfig};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "images")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub transformation_type: String,
    pub public_id: String,
    pub secure_url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Tagged transformation settings
    pub config: Option<Json>,
    pub transformation_url: Option<String>,
    pub aspect_ratio: Option<String>,
    pub color: Option<String>,
    pub prompt: Option<String>,
    pub author_id: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity, decoding the stored tags
impl TryFrom<Model> for Image {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Image {
            id: model.id,
            title: model.title,
            transformation_type: model.transformation_type.parse()?,
            public_id: model.public_id,
            secure_url: model.secure_url,
            width: model.width,
            height: model.height,
            config: model.config.map(TransformationConfig::from_json).transpose()?,
            transformation_url: model.transformation_url,
            aspect_ratio: model.aspect_ratio,
            color: model.color,
            prompt: model.prompt,
            author_id: model.author_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
