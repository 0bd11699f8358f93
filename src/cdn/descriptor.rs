use serde::{Serialize, Deserialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CropMode {
    Fill,
    Fit,
    Limit,
    Scale,
    Thumb,
    Pad,
}

impl CropMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CropMode::Fill => "fill",
            CropMode::Fit => "fit",
            CropMode::Limit => "limit",
            CropMode::Scale => "scale",
            CropMode::Thumb => "thumb",
            CropMode::Pad => "pad",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fill" => Some(CropMode::Fill),
            "fit" => Some(CropMode::Fit),
            "limit" => Some(CropMode::Limit),
            "scale" => Some(CropMode::Scale),
            "thumb" => Some(CropMode::Thumb),
            "pad" => Some(CropMode::Pad),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    #[default]
    Auto,
    Fixed(u8),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Auto,
    Jpg,
    Png,
    Webp,
    Avif,
}

impl Format {
    fn as_str(self) -> &'static str {
        match self {
            Format::Auto => "auto",
            Format::Jpg => "jpg",
            Format::Png => "png",
            Format::Webp => "webp",
            Format::Avif => "avif",
        }
    }
}

/// How the CDN should resize, crop and compress an image on delivery.
///
/// Rendered by [`TransformationSpec::descriptor`] into the comma separated
/// parameter string the CDN expects, e.g. `w_800,h_600,c_fill,q_auto,f_auto`.
/// An overlay becomes its own component chained after the base one with `/`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct TransformationSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<CropMode>,
    pub gravity: Option<String>,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub format: Format,
    pub effect: Option<String>,
    pub overlay: Option<Overlay>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// Layer source, e.g. `text:Arial_40:Studio`.
    pub layer: String,
    pub opacity: Option<u8>,
    pub gravity: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl TransformationSpec {
    pub fn sized(width: Option<u32>, height: Option<u32>, crop: Option<CropMode>) -> Self {
        Self { width, height, crop, ..Default::default() }
    }

    pub fn descriptor(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(w) = self.width { parts.push(format!("w_{}", w)); }
        if let Some(h) = self.height { parts.push(format!("h_{}", h)); }
        if let Some(c) = self.crop { parts.push(format!("c_{}", c.as_str())); }
        if let Some(g) = self.gravity.as_deref().filter(|g| !g.is_empty()) { parts.push(format!("g_{}", g)); }
        match self.quality {
            Quality::Auto => parts.push("q_auto".to_string()),
            Quality::Fixed(q) => parts.push(format!("q_{}", q.clamp(1, 100))),
        }
        parts.push(format!("f_{}", self.format.as_str()));
        if let Some(e) = self.effect.as_deref().filter(|e| !e.is_empty()) { parts.push(format!("e_{}", e)); }

        let base = parts.join(",");
        match &self.overlay {
            Some(overlay) => format!("{}/{}", base, overlay.descriptor()),
            None => base,
        }
    }
}

impl Overlay {
    fn descriptor(&self) -> String {
        // Text layers need `/` and `,` encoded twice so the CDN does not split on them
        let layer = urlencoding::encode(&self.layer)
            .replace("%3A", ":")
            .replace("%2F", "%252F")
            .replace("%2C", "%252C");
        let mut parts = vec![format!("l_{}", layer)];
        if let Some(o) = self.opacity { parts.push(format!("o_{}", o.min(100))); }
        if let Some(g) = self.gravity.as_deref().filter(|g| !g.is_empty()) { parts.push(format!("g_{}", g)); }
        if let Some(x) = self.x { parts.push(format!("x_{}", x)); }
        if let Some(y) = self.y { parts.push(format!("y_{}", y)); }
        parts.join(",")
    }
}
