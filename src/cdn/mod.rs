//! Rewrites object-storage URLs into CDN delivery URLs.
//!
//! Two URL shapes are produced. Upload mode references the object by its
//! storage key and relies on the CDN mapping the origin bucket; fetch mode
//! wraps the whole source URL and works for anything reachable over HTTP.
//! Nothing here touches the network.

pub mod descriptor;
pub mod presets;

use serde::{Serialize, Deserialize};
pub use descriptor::{CropMode, Format, Overlay, Quality, TransformationSpec};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CdnConfig {
    pub base_url: String,
    pub cloud_name: String,
    #[serde(default)]
    pub folder: Option<String>,
    /// Path segment that precedes the object key in storage URLs.
    pub storage_marker: String,
    pub watermark_text: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        Self {
            base_url: "https://res.cloudinary.com".to_string(),
            cloud_name: "demo".to_string(),
            folder: None,
            storage_marker: "/o/".to_string(),
            watermark_text: "© Studio".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UrlTransformer {
    config: CdnConfig,
}

impl UrlTransformer {
    pub fn new(config: CdnConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CdnConfig {
        &self.config
    }

    fn delivery_root(&self, mode: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.cloud_name.trim_matches('/'),
            mode
        )
    }

    /// Object key embedded in `source`, if it is a storage URL carrying the
    /// configured marker. The key is percent-decoded and free of any query.
    pub fn object_key(&self, source: &str) -> Option<String> {
        let (scheme, rest) = source.trim().split_once("://")?;
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
            return None;
        }
        let path_start = rest.find('/')?;
        let host = &rest[..path_start];
        if host.is_empty() || host.chars().any(char::is_whitespace) {
            return None;
        }
        let path = &rest[path_start..];
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let marker = self.config.storage_marker.as_str();
        if marker.is_empty() {
            return None;
        }
        let idx = path.find(marker)?;
        let remainder = &path[idx + marker.len()..];
        let decoded = urlencoding::decode(remainder).ok()?;
        let key = decoded.split('?').next().unwrap_or_default().trim_start_matches('/');
        if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        }
    }

    fn upload_url(&self, key: &str, descriptor: &str) -> String {
        let mut url = self.delivery_root("upload");
        if !descriptor.is_empty() {
            url.push('/');
            url.push_str(descriptor);
        }
        if let Some(folder) = self.config.folder.as_deref().map(|f| f.trim_matches('/')).filter(|f| !f.is_empty()) {
            url.push('/');
            url.push_str(folder);
        }
        url.push('/');
        url.push_str(key);
        url
    }

    fn fetch_url(&self, source: &str, descriptor: &str) -> String {
        let mut url = self.delivery_root("fetch");
        if !descriptor.is_empty() {
            url.push('/');
            url.push_str(descriptor);
        }
        url.push('/');
        url.push_str(&urlencoding::encode(source));
        url
    }

    /// Delivery URL for `source` with `spec` applied.
    ///
    /// Empty input gives an empty string, which callers treat as "no
    /// image". Storage URLs carrying the marker map to upload mode; anything
    /// else, including strings that are not URLs at all, is wrapped in fetch
    /// mode.
    pub fn to_delivery_url(&self, source: &str, spec: &TransformationSpec) -> String {
        if source.trim().is_empty() {
            return String::new();
        }
        let descriptor = spec.descriptor();
        match self.object_key(source) {
            Some(key) => self.upload_url(&key, &descriptor),
            None => self.fetch_url(source, &descriptor),
        }
    }
}

impl Default for UrlTransformer {
    fn default() -> Self {
        Self::new(CdnConfig::default())
    }
}
