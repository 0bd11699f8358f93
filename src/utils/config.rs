use std::env;
use std::path::PathBuf;
use crate::cdn::CdnConfig;
use crate::models::filter::DEFAULT_PAGE_SIZE;
use crate::portfolio::related::DEFAULT_RELATED_LIMIT;

#[derive(Clone, Debug)]
pub struct Config {
    pub data: PathBuf,
    pub port: u16,
    pub db_pool_size: u32,
    pub page_size: usize,
    pub related_limit: usize,
    pub cdn_base_url: String,
    pub cdn_cloud_name: String,
    pub cdn_folder: Option<String>,
    pub storage_marker: String,
    pub watermark_text: String,
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let cdn_defaults = CdnConfig::default();
        let data = env::var("STUDIO_DATA").unwrap_or_else(|_| "/studio-data".to_string());
        Self {
            data: PathBuf::from(data),
            port: parsed("STUDIO_PORT", 8787),
            db_pool_size: parsed("STUDIO_DB_POOL_SIZE", 10),
            page_size: parsed("STUDIO_PAGE_SIZE", DEFAULT_PAGE_SIZE),
            related_limit: parsed("STUDIO_RELATED_LIMIT", DEFAULT_RELATED_LIMIT),
            cdn_base_url: env::var("STUDIO_CDN_BASE_URL").unwrap_or(cdn_defaults.base_url),
            cdn_cloud_name: env::var("STUDIO_CDN_CLOUD_NAME").unwrap_or(cdn_defaults.cloud_name),
            cdn_folder: env::var("STUDIO_CDN_FOLDER").ok().filter(|v| !v.trim().is_empty()),
            storage_marker: env::var("STUDIO_STORAGE_MARKER").unwrap_or(cdn_defaults.storage_marker),
            watermark_text: env::var("STUDIO_WATERMARK_TEXT").unwrap_or(cdn_defaults.watermark_text),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data.join("db").join("portfolio.db")
    }

    pub fn cdn(&self) -> CdnConfig {
        CdnConfig {
            base_url: self.cdn_base_url.clone(),
            cloud_name: self.cdn_cloud_name.clone(),
            folder: self.cdn_folder.clone(),
            storage_marker: self.storage_marker.clone(),
            watermark_text: self.watermark_text.clone(),
        }
    }
}
