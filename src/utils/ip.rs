//! 请求来源信息提取
//!
//! 只读代理头，不做可信代理校验：记录的数据仅用于统计，不参与鉴权。

use actix_web::HttpRequest;

use crate::storage::ClickMetadata;

/// 读取请求头并转为字符串（非 UTF-8 或空值视为缺失）
fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// 客户端 IP
///
/// 优先级：
/// 1. `X-Forwarded-For` 的第一个条目（最初的客户端）
/// 2. `X-Real-IP`
pub fn forwarded_client_ip(req: &HttpRequest) -> Option<String> {
    header_value(req, "x-forwarded-for")
        .and_then(|xff| {
            xff.split(',')
                .map(str::trim)
                .find(|s| !s.is_empty())
                .map(String::from)
        })
        .or_else(|| header_value(req, "x-real-ip"))
}

/// 组装点击元数据，缺失字段记为 `unknown`
pub fn click_metadata(req: &HttpRequest) -> ClickMetadata {
    ClickMetadata::new(
        forwarded_client_ip(req),
        header_value(req, "user-agent"),
        header_value(req, "referer"),
    )
}
