use tracing::{debug, error, warn};
use crate::models::filter::{BeforeAfterPair, FilterOptions};
use crate::models::image::PortfolioImage;
use crate::portfolio::PortfolioService;
use crate::store::PortfolioStore;

pub const DEFAULT_RELATED_LIMIT: usize = 8;
pub const BEFORE_TAG: &str = "before";
pub const AFTER_TAG: &str = "after";

/// Remove every ASCII case-insensitive occurrence of `word` from `title`,
/// then trim surrounding whitespace.
pub fn strip_marker(title: &str, word: &str) -> String {
    if word.is_empty() {
        return title.trim().to_string();
    }
    let lowered = title.to_ascii_lowercase();
    let needle = word.to_ascii_lowercase();
    let mut out = String::with_capacity(title.len());
    let mut last = 0;
    for (start, _) in lowered.match_indices(&needle) {
        out.push_str(&title[last..start]);
        last = start + needle.len();
    }
    out.push_str(&title[last..]);
    out.trim().to_string()
}

/// Pair images tagged `before` with images tagged `after` whose titles are
/// identical once the marker word is stripped.
///
/// Each before image takes the first matching after image in input order.
/// Unmatched images on either side are dropped.
pub fn pair_before_after(images: &[PortfolioImage]) -> Vec<BeforeAfterPair> {
    let afters: Vec<(String, &PortfolioImage)> = images
        .iter()
        .filter(|img| img.has_tag(AFTER_TAG))
        .map(|img| (strip_marker(&img.title, AFTER_TAG), img))
        .collect();

    images
        .iter()
        .filter(|img| img.has_tag(BEFORE_TAG))
        .filter_map(|before| {
            let key = strip_marker(&before.title, BEFORE_TAG);
            afters
                .iter()
                .find(|(after_key, _)| *after_key == key)
                .map(|(_, after)| BeforeAfterPair { before: before.clone(), after: (*after).clone() })
        })
        .collect()
}

impl<S: PortfolioStore> PortfolioService<S> {
    /// Images sharing the source image's first tag and camera, excluding the
    /// source itself. An unknown source image yields an empty list.
    pub async fn get_related_images(&self, image_id: &str, category_id: &str, limit: usize) -> Vec<PortfolioImage> {
        let (cat, id) = (category_id.to_string(), image_id.to_string());
        let source = match self.run(move |store| store.get_image(&cat, &id)).await {
            Ok(Some(img)) => img,
            Ok(None) => {
                debug!(image = %image_id, category = %category_id, "related lookup for unknown image");
                return Vec::new();
            }
            Err(e) => {
                error!(image = %image_id, error = %e, "failed to load source image for related lookup");
                return Vec::new();
            }
        };

        let options = FilterOptions {
            tags: source.tags.first().map(|t| vec![t.clone()]),
            cameras: source.camera().map(|c| vec![c.to_string()]),
            limit: Some(limit.saturating_add(1)),
            ..Default::default()
        };

        let mut related = self.get_filtered_portfolio_images(options).await;
        related.retain(|img| !(img.id == source.id && img.category_id == source.category_id));
        related.truncate(limit);
        related
    }

    /// Before/after pairs across the whole catalog.
    pub async fn get_before_after_images(&self) -> Vec<BeforeAfterPair> {
        match self.scan_catalog().await {
            Ok((_, images)) => pair_before_after(&images),
            Err(e) => {
                warn!(error = %e, "failed to load catalog for before/after pairs");
                Vec::new()
            }
        }
    }
}
