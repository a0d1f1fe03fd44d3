use std::sync::Arc;

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use bytes::BytesMut;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::error_response;
use crate::errors::LinkshelfError;
use crate::i18n::Messages;
use crate::media::{Multiplicity, UploadFile, UploadRelay};

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub multiple: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    public_id: String,
    public_ids: Vec<String>,
}

pub struct UploadHandler;

impl UploadHandler {
    /// POST /api/upload[?multiple=true]
    ///
    /// 读取所有名为 `file` 的字段（超过上限的直接丢弃），整批转发给上游
    pub async fn upload(
        query: web::Query<UploadQuery>,
        mut payload: Multipart,
        relay: web::Data<Arc<UploadRelay>>,
        messages: web::Data<&'static Messages>,
    ) -> impl Responder {
        if !relay.is_available() {
            warn!("Upload rejected: image provider is not configured");
            return error_response(StatusCode::SERVICE_UNAVAILABLE, messages.upload_unavailable);
        }

        let max_files = relay.max_files();
        let max_file_size = relay.max_file_size();
        let mut files: Vec<UploadFile> = Vec::new();

        while let Some(item) = payload.next().await {
            let mut field = match item {
                Ok(f) => f,
                Err(e) => {
                    error!("Failed to parse multipart field: {}", e);
                    return error_response(StatusCode::BAD_REQUEST, messages.upload_missing_file);
                }
            };

            if field.name() != Some("file") || files.len() >= max_files {
                while field.next().await.is_some() {}
                continue;
            }

            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .filter(|name| !name.is_empty())
                .unwrap_or("upload")
                .to_string();
            let content_type = field.content_type().map(|mime| mime.to_string());

            let mut data = BytesMut::new();
            while let Some(chunk) = field.next().await {
                match chunk {
                    Ok(bytes) => {
                        if data.len() + bytes.len() > max_file_size {
                            warn!(
                                "Upload of {} exceeds {} bytes, rejecting request",
                                filename, max_file_size
                            );
                            return error_response(
                                StatusCode::BAD_REQUEST,
                                messages.upload_file_too_large,
                            );
                        }
                        data.extend_from_slice(&bytes);
                    }
                    Err(e) => {
                        error!("Failed to read file chunk: {}", e);
                        return error_response(
                            StatusCode::BAD_REQUEST,
                            messages.upload_missing_file,
                        );
                    }
                }
            }

            // 浏览器在未选择文件时也会提交一个空的 file 字段
            if data.is_empty() {
                continue;
            }
            files.push(UploadFile {
                filename,
                content_type,
                data: data.freeze(),
            });
        }

        if files.is_empty() {
            return error_response(StatusCode::BAD_REQUEST, messages.upload_missing_file);
        }

        let multiplicity = Multiplicity::from_flag(query.multiple);
        info!(
            "Upload request: {} file(s), multiplicity={:?}",
            files.len(),
            multiplicity
        );

        match relay.upload(files, multiplicity).await {
            Ok(public_ids) => {
                let public_id = public_ids.first().cloned().unwrap_or_default();
                HttpResponse::Ok().json(UploadResponse {
                    public_id,
                    public_ids,
                })
            }
            Err(LinkshelfError::ProviderUnavailable(_)) => {
                error_response(StatusCode::SERVICE_UNAVAILABLE, messages.upload_unavailable)
            }
            Err(LinkshelfError::Validation(msg)) => {
                warn!("Upload rejected: {}", msg);
                error_response(StatusCode::BAD_REQUEST, messages.upload_file_too_large)
            }
            Err(e) => {
                error!("Upload batch failed: {}", e);
                error_response(StatusCode::BAD_GATEWAY, messages.upload_failed)
            }
        }
    }
}
