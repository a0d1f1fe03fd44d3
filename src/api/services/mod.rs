pub mod click;
pub mod images;
pub mod upload;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;

pub use click::ClickHandler;
pub use images::ImageHandler;
pub use upload::UploadHandler;

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
}

/// `{"error": ...}` 响应
#[inline]
pub(crate) fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody { error: message })
}

/// `/api` 路由配置
pub fn api_routes() -> actix_web::Scope {
    use actix_web::web;

    web::scope("/api")
        .route(
            "/products/{id}/click",
            web::post().to(ClickHandler::register_click),
        )
        .route("/upload", web::post().to(UploadHandler::upload))
        .route("/images/resolve", web::get().to(ImageHandler::resolve))
}
