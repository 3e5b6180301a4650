//! Image service - stores transformed image records.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use common::{handle_error, AppResult, OptionExt};
use domain::{CreateImage, Image};

use crate::repository::ImageRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Image service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Validate and store a new image
    async fn add_image(&self, input: CreateImage) -> AppResult<Image>;

    /// Get image by ID
    async fn get_image(&self, id: Uuid) -> AppResult<Image>;

    /// List a user's images, newest first
    async fn list_images_by_author(&self, author_id: Uuid) -> AppResult<Vec<Image>>;
}

/// Concrete implementation of ImageService using repository.
pub struct ImageManager {
    repo: Arc<dyn ImageRepository>,
}

impl ImageManager {
    pub fn new(repo: Arc<dyn ImageRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ImageService for ImageManager {
    async fn add_image(&self, input: CreateImage) -> AppResult<Image> {
        let result: AppResult<Image> = async {
            input.validate()?;
            let image = self.repo.create(input).await?;
            info!(image_id = %image.id, kind = %image.transformation_type, "Image stored");
            Ok(image)
        }
        .await;

        result.map_err(handle_error("add_image"))
    }

    async fn get_image(&self, id: Uuid) -> AppResult<Image> {
        self.repo
            .find_by_id(id)
            .await
            .and_then(|image| image.ok_or_not_found("Image"))
            .map_err(handle_error("get_image"))
    }

    async fn list_images_by_author(&self, author_id: Uuid) -> AppResult<Vec<Image>> {
        self.repo
            .list_by_author(author_id)
            .await
            .map_err(handle_error("list_images_by_author"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::ErrorKind;
    use domain::{TransformationConfig, TransformationType};

    use crate::repository::MockImageRepository;

    fn input(kind: TransformationType, config: Option<TransformationConfig>) -> CreateImage {
        CreateImage {
            title: "Beach".to_string(),
            transformation_type: kind,
            public_id: "imgs/beach".to_string(),
            secure_url: "https://cdn.example.com/beach.png".to_string(),
            width: None,
            height: None,
            config,
            transformation_url: None,
            aspect_ratio: None,
            color: None,
            prompt: None,
            author_id: None,
        }
    }

    #[tokio::test]
    async fn test_add_image_rejects_mismatched_config() {
        let mut repo = MockImageRepository::new();
        repo.expect_create().never();

        let service = ImageManager::new(Arc::new(repo));
        let result = service
            .add_image(input(
                TransformationType::Restore,
                Some(TransformationConfig::Fill),
            ))
            .await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_get_image_not_found() {
        let mut repo = MockImageRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = ImageManager::new(Arc::new(repo));
        let result = service.get_image(Uuid::new_v4()).await;

        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }
}
