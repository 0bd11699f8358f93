use serde::Serialize;
use crate::cdn::{CropMode, Format, Overlay, Quality, TransformationSpec, UrlTransformer};

/// Target widths for responsive `srcset` generation.
pub const RESPONSIVE_WIDTHS: [u32; 7] = [320, 640, 768, 1024, 1280, 1600, 1920];

pub const SOCIAL_WIDTH: u32 = 1200;
pub const SOCIAL_HEIGHT: u32 = 630;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ResponsiveSource {
    pub width: u32,
    pub url: String,
}

/// Render a list of responsive sources as an HTML `srcset` value.
pub fn srcset(sources: &[ResponsiveSource]) -> String {
    sources
        .iter()
        .map(|s| format!("{} {}w", s.url, s.width))
        .collect::<Vec<_>>()
        .join(", ")
}

impl UrlTransformer {
    /// General gallery delivery: auto quality and format, bounded size.
    pub fn optimized_url(&self, source: &str, width: Option<u32>, height: Option<u32>) -> String {
        let crop = if width.is_some() && height.is_some() { CropMode::Fill } else { CropMode::Limit };
        let spec = TransformationSpec::sized(width, height, Some(crop));
        self.to_delivery_url(source, &spec)
    }

    /// One URL per entry of [`RESPONSIVE_WIDTHS`]. `base` supplies every
    /// setting except width and crop.
    pub fn responsive_set(&self, source: &str, base: &TransformationSpec) -> Vec<ResponsiveSource> {
        if source.trim().is_empty() {
            return Vec::new();
        }
        RESPONSIVE_WIDTHS
            .iter()
            .map(|&width| {
                let spec = TransformationSpec {
                    width: Some(width),
                    height: None,
                    crop: Some(CropMode::Limit),
                    ..base.clone()
                };
                ResponsiveSource { width, url: self.to_delivery_url(source, &spec) }
            })
            .collect()
    }

    /// Tiny, heavily blurred stand-in shown while the full image loads.
    pub fn placeholder_url(&self, source: &str) -> String {
        let spec = TransformationSpec {
            width: Some(32),
            quality: Quality::Fixed(1),
            effect: Some("blur:1000".to_string()),
            ..Default::default()
        };
        self.to_delivery_url(source, &spec)
    }

    /// Delivery URL with the configured watermark text in the bottom right.
    pub fn watermarked_url(&self, source: &str, width: Option<u32>) -> String {
        let spec = TransformationSpec {
            width,
            crop: width.map(|_| CropMode::Limit),
            overlay: Some(Overlay {
                layer: format!("text:Arial_40:{}", self.config().watermark_text),
                opacity: Some(60),
                gravity: Some("south_east".to_string()),
                x: Some(20),
                y: Some(20),
            }),
            ..Default::default()
        };
        self.to_delivery_url(source, &spec)
    }

    /// Fixed 1200x630 crop for Open Graph / social previews.
    pub fn social_share_url(&self, source: &str) -> String {
        let spec = TransformationSpec {
            gravity: Some("auto".to_string()),
            format: Format::Jpg,
            ..TransformationSpec::sized(Some(SOCIAL_WIDTH), Some(SOCIAL_HEIGHT), Some(CropMode::Fill))
        };
        self.to_delivery_url(source, &spec)
    }
}
