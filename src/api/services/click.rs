use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use serde::Serialize;
use tracing::debug;

use super::error_response;
use crate::errors::LinkshelfError;
use crate::i18n::Messages;
use crate::services::ClickService;
use crate::utils::click_metadata;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClickResponse<'a> {
    external_link: String,
    message: &'a str,
}

pub struct ClickHandler;

impl ClickHandler {
    /// POST /api/products/{id}/click
    pub async fn register_click(
        req: HttpRequest,
        path: web::Path<String>,
        service: web::Data<Arc<ClickService>>,
        messages: web::Data<&'static Messages>,
    ) -> impl Responder {
        let product_id = path.into_inner();
        let meta = click_metadata(&req);

        match service.register_click(&product_id, meta).await {
            Ok(external_link) => HttpResponse::Ok().json(ClickResponse {
                external_link,
                message: messages.click_recorded,
            }),
            Err(LinkshelfError::NotFound(_)) => {
                debug!("Click on unknown product: {}", product_id);
                error_response(StatusCode::NOT_FOUND, messages.product_not_found)
            }
            // 服务层已记录详细错误
            Err(_) => error_response(StatusCode::INTERNAL_SERVER_ERROR, messages.click_failed),
        }
    }
}
