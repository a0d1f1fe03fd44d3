//! Image handling
//!
//! - `reference`: pure classification of image strings
//! - `transform`: CDN transformation URL construction
//! - `render`: rendering dispatch and the per-view loading state machine
//! - `provider`: Cloudinary upload/destroy client
//! - `relay`: bounded, all-or-nothing batch uploads

pub mod provider;
pub mod reference;
pub mod relay;
pub mod render;
pub mod transform;

pub use provider::CloudinaryClient;
pub use reference::ImageReference;
pub use relay::{
    BatchReport, FileOutcome, HttpUploadTarget, Multiplicity, UploadFile, UploadRelay,
    UploadTarget,
};
pub use render::{Frame, ImagePreset, ImageResolver, ImageView, LoadState, RenderOptions, RenderPlan};
pub use transform::{CdnUrlBuilder, Crop, ImageFormat, TransformOptions};
