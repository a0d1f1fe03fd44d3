use std::sync::Arc;

use actix_web::web;
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::api_routes;
use crate::config::AppConfig;
use crate::i18n::Messages;
use crate::media::{CdnUrlBuilder, CloudinaryClient, ImageResolver, UploadRelay, UploadTarget};
use crate::services::ClickService;
use crate::storage::{SeaOrmStorage, StorageFactory};

/// Everything the HTTP workers share. Cheap to clone.
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub click_service: Arc<ClickService>,
    pub relay: Arc<UploadRelay>,
    pub resolver: Arc<ImageResolver>,
    pub messages: &'static Messages,
}

impl StartupContext {
    /// 用已有的存储和上传目标组装上下文
    pub fn from_parts(
        storage: Arc<SeaOrmStorage>,
        config: &AppConfig,
        upload_target: Arc<dyn UploadTarget>,
    ) -> Self {
        let messages = Messages::for_locale(config.locale);

        Self {
            click_service: Arc::new(ClickService::new(storage.clone())),
            relay: Arc::new(UploadRelay::new(upload_target, &config.media)),
            resolver: Arc::new(ImageResolver::new(
                CdnUrlBuilder::from_config(&config.media),
                messages,
            )),
            storage,
            messages,
        }
    }

    /// 注册共享数据与 `/api` 路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.click_service.clone()))
            .app_data(web::Data::new(self.relay.clone()))
            .app_data(web::Data::new(self.resolver.clone()))
            .app_data(web::Data::new(self.messages))
            .service(api_routes());
    }
}

/// 准备服务器启动的上下文
///
/// 连接数据库并执行迁移，根据配置构建 Cloudinary 客户端
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let provider = CloudinaryClient::new(&config.media)
        .context("Failed to build Cloudinary client")?;
    info!(
        "Image provider: cloud '{}' via {} (uploads {})",
        config.media.cloud_name,
        config.media.cdn_host,
        if provider.is_configured() {
            "enabled"
        } else {
            "disabled"
        }
    );

    let context = StartupContext::from_parts(storage, config, Arc::new(provider));

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
