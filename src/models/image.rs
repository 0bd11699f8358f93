use serde::{Serialize, Deserialize};

/// Optional capture details attached to a portfolio photograph. Every field
/// is independently optional.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lens: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal_length: Option<String>,
}

impl ImageMetadata {
    pub fn is_empty(&self) -> bool {
        self == &ImageMetadata::default()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioImage {
    pub id: String,
    pub category_id: String,
    /// Canonical storage locator. Never rewritten once stored.
    pub image_path: String,
    pub width: i64,
    pub height: i64,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
    pub featured: bool,
    pub order: i64,
    /// Epoch milliseconds.
    pub date_created: i64,
}

impl PortfolioImage {
    pub fn camera(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.camera.as_deref())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub order: i64,
    pub featured: bool,
    /// Cached count of images owned by this category, maintained by the writer.
    pub image_count: i64,
    pub created_at: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewImage {
    #[serde(default)]
    pub id: Option<String>,
    pub image_path: String,
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: Option<ImageMetadata>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub date_created: Option<i64>,
}
