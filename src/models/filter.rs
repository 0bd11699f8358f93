use serde::{Serialize, Deserialize};
use crate::models::image::PortfolioImage;

pub const DEFAULT_PAGE_SIZE: usize = 50;

/// One distinct value of a filterable attribute with the number of images
/// carrying it in the scan that produced it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Facet {
    pub id: String,
    pub label: String,
    pub count: usize,
}

/// All facet tables. Every array is always present, possibly empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FacetSet {
    pub categories: Vec<Facet>,
    pub tags: Vec<Facet>,
    pub cameras: Vec<Facet>,
    pub lenses: Vec<Facet>,
    pub locations: Vec<Facet>,
    pub apertures: Vec<Facet>,
    pub shutter_speeds: Vec<Facet>,
    pub iso_values: Vec<Facet>,
}

impl FacetSet {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
            && self.tags.is_empty()
            && self.cameras.is_empty()
            && self.lenses.is_empty()
            && self.locations.is_empty()
            && self.apertures.is_empty()
            && self.shutter_speeds.is_empty()
            && self.iso_values.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    DateCreated,
    Title,
    Featured,
    #[default]
    Order,
}

impl SortField {
    pub fn column(self) -> &'static str {
        match self {
            SortField::DateCreated => "date_created",
            SortField::Title => "title",
            SortField::Featured => "featured",
            SortField::Order => "sort_order",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Inclusive range of `dateCreated`, epoch milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

/// Query descriptor for the filtered portfolio query.
///
/// For every facet, `None` means "no restriction" while `Some(vec![])` is an
/// any-of match over nothing and therefore matches no image.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cameras: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lenses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apertures: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutter_speeds: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso_values: Option<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_after: Option<String>,
}

impl FilterOptions {
    /// True when some facet was given an empty selection, which can never match.
    pub fn has_empty_selection(&self) -> bool {
        fn empty<T>(v: &Option<Vec<T>>) -> bool {
            v.as_ref().map(|v| v.is_empty()).unwrap_or(false)
        }
        empty(&self.categories)
            || empty(&self.tags)
            || empty(&self.cameras)
            || empty(&self.lenses)
            || empty(&self.locations)
            || empty(&self.apertures)
            || empty(&self.shutter_speeds)
            || empty(&self.iso_values)
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BeforeAfterPair {
    pub before: PortfolioImage,
    pub after: PortfolioImage,
}
