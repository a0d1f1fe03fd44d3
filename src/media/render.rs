//! Rendering dispatch
//!
//! [`ImageResolver::resolve`] turns an image string into a [`RenderPlan`]
//! with a single match over [`ImageReference`]. [`ImageView`] then tracks the
//! loading state of one rendered instance:
//!
//! ```text
//! Loading ──on_load──▶ Loaded
//!    └─────on_error──▶ Failed
//! ```
//!
//! Transitions only leave `Loading`; there is no retry.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString};
use tracing::warn;

use super::reference::ImageReference;
use super::transform::{CdnUrlBuilder, Crop, ImageFormat, TransformOptions};
use crate::i18n::Messages;

/// Placeholder dimensions; `width: None` means full container width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaceholderSize {
    pub width: Option<u32>,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub crop: Crop,
    pub quality: u8,
    pub priority: bool,
    pub placeholder: PlaceholderSize,
}

impl RenderOptions {
    /// Override the target size. The placeholder follows the new size,
    /// except that a full-width placeholder stays full width.
    pub fn resized(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        if let Some(width) = width {
            self.width = width;
            if self.placeholder.width.is_some() {
                self.placeholder.width = Some(width);
            }
        }
        if let Some(height) = height {
            self.height = height;
            self.placeholder.height = height;
        }
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        ImagePreset::Default.options()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImagePreset {
    #[default]
    Default,
    /// Product cards
    Product,
    /// Full-width banners
    Hero,
    Thumbnail,
}

impl ImagePreset {
    pub fn options(self) -> RenderOptions {
        match self {
            ImagePreset::Default => RenderOptions {
                width: 400,
                height: 300,
                crop: Crop::Fill,
                quality: 80,
                priority: false,
                placeholder: PlaceholderSize {
                    width: Some(400),
                    height: 300,
                },
            },
            ImagePreset::Product => RenderOptions {
                width: 300,
                height: 300,
                crop: Crop::Fill,
                quality: 85,
                priority: false,
                placeholder: PlaceholderSize {
                    width: Some(300),
                    height: 300,
                },
            },
            ImagePreset::Hero => RenderOptions {
                width: 1200,
                height: 600,
                crop: Crop::Fill,
                quality: 90,
                priority: true,
                placeholder: PlaceholderSize {
                    width: None,
                    height: 600,
                },
            },
            ImagePreset::Thumbnail => RenderOptions {
                width: 100,
                height: 100,
                crop: Crop::Thumb,
                quality: 70,
                priority: false,
                placeholder: PlaceholderSize {
                    width: Some(100),
                    height: 100,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderReason {
    Empty,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectOrigin {
    Cdn,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RenderPlan {
    /// No request is made
    Placeholder {
        reason: PlaceholderReason,
        size: PlaceholderSize,
        text: String,
    },
    /// Provider transformation pipeline
    Transformed {
        public_id: String,
        src: String,
        width: u32,
        height: u32,
        priority: bool,
    },
    /// Generic image loading path
    Direct {
        origin: DirectOrigin,
        src: String,
        width: u32,
        height: u32,
        quality: u8,
        priority: bool,
    },
}

impl RenderPlan {
    pub fn needs_fetch(&self) -> bool {
        !matches!(self, RenderPlan::Placeholder { .. })
    }

    pub fn src(&self) -> Option<&str> {
        match self {
            RenderPlan::Placeholder { .. } => None,
            RenderPlan::Transformed { src, .. } | RenderPlan::Direct { src, .. } => Some(src),
        }
    }

    fn dimensions(&self) -> (Option<u32>, u32) {
        match self {
            RenderPlan::Placeholder { size, .. } => (size.width, size.height),
            RenderPlan::Transformed { width, height, .. }
            | RenderPlan::Direct { width, height, .. } => (Some(*width), *height),
        }
    }
}

pub struct ImageResolver {
    urls: CdnUrlBuilder,
    messages: &'static Messages,
}

impl ImageResolver {
    pub fn new(urls: CdnUrlBuilder, messages: &'static Messages) -> Self {
        Self { urls, messages }
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    pub fn classify(&self, src: &str) -> ImageReference {
        ImageReference::classify(src, self.urls.cdn_host())
    }

    pub fn resolve(&self, src: &str, options: &RenderOptions) -> RenderPlan {
        let reference = self.classify(src);
        if let Err(e) = reference.validate() {
            warn!("{}", e.format_simple());
        }

        match reference {
            ImageReference::Empty => self.placeholder(PlaceholderReason::Empty, options),
            ImageReference::Invalid(_) => self.placeholder(PlaceholderReason::Invalid, options),
            ImageReference::OpaqueId(public_id) => {
                let src = self.urls.build_url(
                    &public_id,
                    &TransformOptions {
                        width: Some(options.width),
                        height: Some(options.height),
                        quality: options.quality,
                        format: ImageFormat::Auto,
                        crop: options.crop,
                    },
                );
                RenderPlan::Transformed {
                    public_id,
                    src,
                    width: options.width,
                    height: options.height,
                    priority: options.priority,
                }
            }
            ImageReference::CdnUrl(src) => Self::direct(DirectOrigin::Cdn, src, options),
            ImageReference::ExternalUrl(src) => Self::direct(DirectOrigin::External, src, options),
        }
    }

    pub fn view(&self, src: &str, options: &RenderOptions) -> ImageView {
        ImageView::new(self.resolve(src, options), self.messages)
    }

    fn placeholder(&self, reason: PlaceholderReason, options: &RenderOptions) -> RenderPlan {
        RenderPlan::Placeholder {
            reason,
            size: options.placeholder,
            text: self.messages.no_image.to_string(),
        }
    }

    fn direct(origin: DirectOrigin, src: String, options: &RenderOptions) -> RenderPlan {
        RenderPlan::Direct {
            origin,
            src,
            width: options.width,
            height: options.height,
            quality: options.quality,
            priority: options.priority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Loaded,
    Failed,
}

/// What one view shows at a given moment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame<'a> {
    Placeholder {
        width: Option<u32>,
        height: u32,
        text: &'a str,
    },
    /// Skeleton overlay above the still-hidden image
    Loading {
        skeleton_width: Option<u32>,
        skeleton_height: u32,
        plan: &'a RenderPlan,
    },
    /// Image visible, faded in
    Loaded { plan: &'a RenderPlan },
    Failed {
        width: Option<u32>,
        height: u32,
        text: &'a str,
    },
}

/// Loading state of one rendered image
#[derive(Debug, Clone)]
pub struct ImageView {
    plan: RenderPlan,
    state: LoadState,
    messages: &'static Messages,
}

impl ImageView {
    pub fn new(plan: RenderPlan, messages: &'static Messages) -> Self {
        Self {
            plan,
            state: LoadState::Loading,
            messages,
        }
    }

    pub fn plan(&self) -> &RenderPlan {
        &self.plan
    }

    /// `None` for placeholder plans, which never load anything
    pub fn state(&self) -> Option<LoadState> {
        self.plan.needs_fetch().then_some(self.state)
    }

    /// Returns whether the event changed the state
    pub fn on_load(&mut self) -> bool {
        self.transition(LoadState::Loaded)
    }

    /// Returns whether the event changed the state
    pub fn on_error(&mut self) -> bool {
        self.transition(LoadState::Failed)
    }

    fn transition(&mut self, next: LoadState) -> bool {
        if !self.plan.needs_fetch() || self.state != LoadState::Loading {
            return false;
        }
        self.state = next;
        true
    }

    pub fn frame(&self) -> Frame<'_> {
        let (width, height) = self.plan.dimensions();

        if let RenderPlan::Placeholder { text, .. } = &self.plan {
            return Frame::Placeholder {
                width,
                height,
                text,
            };
        }

        match self.state {
            LoadState::Loading => Frame::Loading {
                skeleton_width: width,
                skeleton_height: height,
                plan: &self.plan,
            },
            LoadState::Loaded => Frame::Loaded { plan: &self.plan },
            LoadState::Failed => Frame::Failed {
                width,
                height,
                text: self.messages.image_failed,
            },
        }
    }
}
