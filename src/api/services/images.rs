use std::str::FromStr;
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use tracing::trace;

use super::error_response;
use crate::media::{Crop, ImagePreset, ImageResolver};

/// `preset` picks the base options; the other fields override it
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub src: String,
    pub preset: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<String>,
    pub quality: Option<u8>,
    pub priority: Option<bool>,
}

pub struct ImageHandler;

impl ImageHandler {
    /// GET /api/images/resolve?src=...&preset=...&width=...&height=...&crop=...&quality=...&priority=...
    ///
    /// 缺少 `src` 等同于空字符串，返回占位方案
    pub async fn resolve(
        query: web::Query<ResolveQuery>,
        resolver: web::Data<Arc<ImageResolver>>,
    ) -> impl Responder {
        let query = query.into_inner();
        let messages = resolver.messages();

        let preset = match query.preset.as_deref() {
            None | Some("") => ImagePreset::Default,
            Some(name) => match ImagePreset::from_str(name) {
                Ok(preset) => preset,
                Err(_) => {
                    return error_response(StatusCode::BAD_REQUEST, messages.unknown_preset);
                }
            },
        };

        if query.width == Some(0)
            || query.height == Some(0)
            || query.quality.is_some_and(|q| !(1..=100).contains(&q))
        {
            return error_response(StatusCode::BAD_REQUEST, messages.invalid_image_options);
        }

        let mut options = preset.options().resized(query.width, query.height);
        if let Some(crop) = query.crop.as_deref().filter(|c| !c.is_empty()) {
            match Crop::from_str(crop) {
                Ok(crop) => options.crop = crop,
                Err(_) => {
                    return error_response(StatusCode::BAD_REQUEST, messages.invalid_image_options);
                }
            }
        }
        if let Some(quality) = query.quality {
            options.quality = quality;
        }
        if let Some(priority) = query.priority {
            options.priority = priority;
        }

        let plan = resolver.resolve(&query.src, &options);
        trace!("Resolved {:?} with preset {}", query.src, preset.as_ref());
        HttpResponse::Ok().json(plan)
    }
}
