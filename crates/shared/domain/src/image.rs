//! Image domain entity and transformation settings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::DomainError;

/// Kind of transformation applied to an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransformationType {
    Restore,
    RemoveBackground,
    Fill,
    Remove,
    Recolor,
}

impl TransformationType {
    /// Stored tag for this transformation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformationType::Restore => "restore",
            TransformationType::RemoveBackground => "removeBackground",
            TransformationType::Fill => "fill",
            TransformationType::Remove => "remove",
            TransformationType::Recolor => "recolor",
        }
    }
}

impl FromStr for TransformationType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "restore" => Ok(TransformationType::Restore),
            "removeBackground" => Ok(TransformationType::RemoveBackground),
            "fill" => Ok(TransformationType::Fill),
            "remove" => Ok(TransformationType::Remove),
            "recolor" => Ok(TransformationType::Recolor),
            other => Err(DomainError::UnknownTransformation(other.to_string())),
        }
    }
}

impl fmt::Display for TransformationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for a transformation, tagged by its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransformationConfig {
    Restore,
    RemoveBackground,
    Fill,
    Remove {
        prompt: String,
        #[serde(default, rename = "removeShadow")]
        remove_shadow: bool,
        #[serde(default)]
        multiple: bool,
    },
    Recolor {
        prompt: String,
        to: String,
        #[serde(default)]
        multiple: bool,
    },
}

impl TransformationConfig {
    /// Transformation kind this configuration belongs to
    pub fn kind(&self) -> TransformationType {
        match self {
            TransformationConfig::Restore => TransformationType::Restore,
            TransformationConfig::RemoveBackground => TransformationType::RemoveBackground,
            TransformationConfig::Fill => TransformationType::Fill,
            TransformationConfig::Remove { .. } => TransformationType::Remove,
            TransformationConfig::Recolor { .. } => TransformationType::Recolor,
        }
    }

    /// Decode a stored JSON blob
    pub fn from_json(value: serde_json::Value) -> Result<Self, DomainError> {
        serde_json::from_value(value)
            .map_err(|e| DomainError::validation(format!("invalid transformation config: {}", e)))
    }

    /// Encode for storage
    pub fn to_json(&self) -> serde_json::Value {
        // Enum with only string/bool fields always serializes.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Image domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: Uuid,
    pub title: String,
    pub transformation_type: TransformationType,
    pub public_id: String,
    pub secure_url: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub config: Option<TransformationConfig>,
    pub transformation_url: Option<String>,
    pub aspect_ratio: Option<String>,
    pub color: Option<String>,
    pub prompt: Option<String>,
    /// Owning user; not checked against the users table
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Image creation data transfer object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "config_matches_type", skip_on_field_errors = false))]
pub struct CreateImage {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub transformation_type: TransformationType,
    #[validate(length(min = 1, message = "public_id is required"))]
    pub public_id: String,
    #[validate(length(min = 1, message = "secure_url is required"))]
    pub secure_url: String,
    #[validate(range(min = 1, message = "width must be positive"))]
    pub width: Option<i32>,
    #[validate(range(min = 1, message = "height must be positive"))]
    pub height: Option<i32>,
    pub config: Option<TransformationConfig>,
    pub transformation_url: Option<String>,
    pub aspect_ratio: Option<String>,
    pub color: Option<String>,
    pub prompt: Option<String>,
    pub author_id: Option<Uuid>,
}

fn config_matches_type(image: &CreateImage) -> Result<(), ValidationError> {
    match &image.config {
        Some(config) if config.kind() != image.transformation_type => {
            let mut err = ValidationError::new("config_mismatch");
            err.message = Some(
                format!(
                    "config for '{}' does not match transformation type '{}'",
                    config.kind(),
                    image.transformation_type
                )
                .into(),
            );
            Err(err)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_input() -> CreateImage {
        CreateImage {
            title: "Portrait".to_string(),
            transformation_type: TransformationType::Recolor,
            public_id: "imgs/portrait".to_string(),
            secure_url: "https://cdn.example.com/portrait.png".to_string(),
            width: Some(800),
            height: Some(600),
            config: Some(TransformationConfig::Recolor {
                prompt: "shirt".to_string(),
                to: "blue".to_string(),
                multiple: false,
            }),
            transformation_url: None,
            aspect_ratio: None,
            color: None,
            prompt: Some("shirt".to_string()),
            author_id: None,
        }
    }

    #[test]
    fn transformation_type_parses_stored_tags() {
        for kind in [
            TransformationType::Restore,
            TransformationType::RemoveBackground,
            TransformationType::Fill,
            TransformationType::Remove,
            TransformationType::Recolor,
        ] {
            assert_eq!(kind.as_str().parse::<TransformationType>(), Ok(kind));
        }

        assert_eq!(
            "sharpen".parse::<TransformationType>(),
            Err(DomainError::UnknownTransformation("sharpen".to_string()))
        );
    }

    #[test]
    fn config_decodes_tagged_blob() {
        let config = TransformationConfig::from_json(json!({
            "type": "remove",
            "prompt": "car",
            "removeShadow": true
        }))
        .unwrap();

        assert_eq!(
            config,
            TransformationConfig::Remove {
                prompt: "car".to_string(),
                remove_shadow: true,
                multiple: false,
            }
        );
        assert_eq!(config.to_json()["type"], "remove");
    }

    #[test]
    fn config_rejects_unknown_tag() {
        let result = TransformationConfig::from_json(json!({ "type": "sharpen" }));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn create_image_accepts_matching_config() {
        assert!(sample_input().validate().is_ok());
    }

    #[test]
    fn create_image_rejects_mismatched_config() {
        let mut input = sample_input();
        input.transformation_type = TransformationType::Fill;
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_image_requires_title() {
        let mut input = sample_input();
        input.title.clear();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }
}
