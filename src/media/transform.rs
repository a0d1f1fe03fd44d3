//! CDN transformation URLs
//!
//! Grammar:
//! `https://<cdn-host>/<cloud-name>/image/upload/<crop>_<w|auto>_<h|auto>/q_<quality>/f_<format>/<public-id>`
//!
//! The size segment is only emitted when a width or height is requested.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::MediaConfig;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Crop {
    #[default]
    Fill,
    Scale,
    Fit,
    Thumb,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageFormat {
    #[default]
    Auto,
    Webp,
    Jpg,
    Png,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u8,
    pub format: ImageFormat,
    pub crop: Crop,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: 80,
            format: ImageFormat::Auto,
            crop: Crop::Fill,
        }
    }
}

/// Builds delivery URLs for one cloud. Constructed from [`MediaConfig`] at
/// startup.
#[derive(Debug, Clone)]
pub struct CdnUrlBuilder {
    cdn_host: String,
    cloud_name: String,
}

impl CdnUrlBuilder {
    pub fn new(cdn_host: impl Into<String>, cloud_name: impl Into<String>) -> Self {
        Self {
            cdn_host: cdn_host.into(),
            cloud_name: cloud_name.into(),
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(&config.cdn_host, &config.cloud_name)
    }

    pub fn cdn_host(&self) -> &str {
        &self.cdn_host
    }

    pub fn build_url(&self, public_id: &str, options: &TransformOptions) -> String {
        let mut transformations: Vec<String> = Vec::with_capacity(3);

        if options.width.is_some() || options.height.is_some() {
            transformations.push(format!(
                "{}_{}_{}",
                options.crop,
                dimension(options.width),
                dimension(options.height)
            ));
        }
        transformations.push(format!("q_{}", options.quality));
        transformations.push(format!("f_{}", options.format));

        format!(
            "https://{}/{}/image/upload/{}/{}",
            self.cdn_host,
            self.cloud_name,
            transformations.join("/"),
            public_id.trim_start_matches('/')
        )
    }
}

fn dimension(value: Option<u32>) -> String {
    value.map_or_else(|| "auto".to_string(), |v| v.to_string())
}
