//! Image repository implementation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::entities::image::{self, ActiveModel, Entity as ImageEntity};
use crate::infra::ConnectionCache;
use common::{AppError, AppResult};
use domain::{CreateImage, Image};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Image repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Insert a new image
    async fn create(&self, input: CreateImage) -> AppResult<Image>;

    /// Find image by ID
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Image>>;

    /// List images owned by a user, newest first
    async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Image>>;
}

/// Concrete implementation of ImageRepository
pub struct ImageStore {
    db: Arc<ConnectionCache>,
}

impl ImageStore {
    /// Create new repository instance
    pub fn new(db: Arc<ConnectionCache>) -> Self {
        Self { db }
    }
}

fn to_domain(model: image::Model) -> AppResult<Image> {
    Image::try_from(model).map_err(AppError::from)
}

#[async_trait]
impl ImageRepository for ImageStore {
    async fn create(&self, input: CreateImage) -> AppResult<Image> {
        let db = self.db.ensure_connection().await?;
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(input.title),
            transformation_type: Set(input.transformation_type.as_str().to_string()),
            public_id: Set(input.public_id),
            secure_url: Set(input.secure_url),
            width: Set(input.width),
            height: Set(input.height),
            config: Set(input.config.as_ref().map(|c| c.to_json())),
            transformation_url: Set(input.transformation_url),
            aspect_ratio: Set(input.aspect_ratio),
            color: Set(input.color),
            prompt: Set(input.prompt),
            author_id: Set(input.author_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(db).await?;
        to_domain(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Image>> {
        let db = self.db.ensure_connection().await?;
        ImageEntity::find_by_id(id)
            .one(db)
            .await?
            .map(to_domain)
            .transpose()
    }

    async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Image>> {
        let db = self.db.ensure_connection().await?;
        ImageEntity::find()
            .filter(image::Column::AuthorId.eq(author_id))
            .order_by_desc(image::Column::CreatedAt)
            .all(db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}
