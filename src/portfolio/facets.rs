use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error};
use crate::models::filter::{Facet, FacetSet};
use crate::models::image::{Category, ImageMetadata, PortfolioImage};
use crate::portfolio::PortfolioService;
use crate::store::PortfolioStore;

pub const UNKNOWN_CATEGORY_LABEL: &str = "Unknown Category";

fn tally<'a, I>(values: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    counts
}

fn raw_facets(counts: BTreeMap<&str, usize>) -> Vec<Facet> {
    counts
        .into_iter()
        .map(|(value, count)| Facet { id: value.to_string(), label: value.to_string(), count })
        .collect()
}

fn metadata_facets<F>(images: &[PortfolioImage], field: F) -> Vec<Facet>
where
    F: Fn(&ImageMetadata) -> Option<&str>,
{
    raw_facets(tally(images.iter().filter_map(|img| img.metadata.as_ref().and_then(&field))))
}

/// Count every filterable attribute over one snapshot of the catalog.
///
/// The category facet is labelled with the category title, or
/// [`UNKNOWN_CATEGORY_LABEL`] when the category is no longer listed. Every
/// other facet uses the raw value as both id and label. Images lacking a
/// metadata field do not contribute to that field's facet.
pub fn build_facet_set(categories: &[Category], images: &[PortfolioImage]) -> FacetSet {
    let titles: HashMap<&str, &str> = categories.iter().map(|c| (c.id.as_str(), c.title.as_str())).collect();

    let categories = tally(images.iter().map(|img| img.category_id.as_str()))
        .into_iter()
        .map(|(id, count)| Facet {
            id: id.to_string(),
            label: titles.get(id).copied().unwrap_or(UNKNOWN_CATEGORY_LABEL).to_string(),
            count,
        })
        .collect();

    let tags = raw_facets(tally(images.iter().flat_map(|img| img.tags.iter().map(String::as_str))));

    let mut iso_counts: BTreeMap<i64, usize> = BTreeMap::new();
    for iso in images.iter().filter_map(|img| img.metadata.as_ref().and_then(|m| m.iso)) {
        *iso_counts.entry(iso).or_insert(0) += 1;
    }
    let iso_values = iso_counts
        .into_iter()
        .map(|(iso, count)| Facet { id: iso.to_string(), label: iso.to_string(), count })
        .collect();

    FacetSet {
        categories,
        tags,
        cameras: metadata_facets(images, |m| m.camera.as_deref()),
        lenses: metadata_facets(images, |m| m.lens.as_deref()),
        locations: metadata_facets(images, |m| m.location.as_deref()),
        apertures: metadata_facets(images, |m| m.aperture.as_deref()),
        shutter_speeds: metadata_facets(images, |m| m.shutter_speed.as_deref()),
        iso_values,
    }
}

impl<S: PortfolioStore> PortfolioService<S> {
    /// Facets with per-value counts over every image in every category.
    ///
    /// This rescans the whole catalog on each call. If the category list
    /// cannot be read the result is the all-empty [`FacetSet`].
    pub async fn get_filterable_attributes(&self) -> FacetSet {
        match self.scan_catalog().await {
            Ok((categories, images)) => {
                debug!(categories = categories.len(), images = images.len(), "building filter facets");
                build_facet_set(&categories, &images)
            }
            Err(e) => {
                error!(error = %e, "failed to load catalog for filter facets");
                FacetSet::default()
            }
        }
    }
}
