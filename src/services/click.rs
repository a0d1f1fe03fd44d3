//! Click recording service
//!
//! Sits between the HTTP handler and storage. Only `NotFound` passes through
//! unchanged; every other failure is logged here and collapsed into
//! `Internal` so no store detail reaches the caller.

use std::sync::Arc;

use tracing::{error, info};

use crate::errors::{LinkshelfError, Result};
use crate::storage::{ClickMetadata, SeaOrmStorage};

pub struct ClickService {
    storage: Arc<SeaOrmStorage>,
}

impl ClickService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 记录点击，返回跳转目标
    pub async fn register_click(&self, product_id: &str, meta: ClickMetadata) -> Result<String> {
        match self.storage.record_click(product_id, &meta).await {
            Ok(link) => {
                info!(
                    product_id,
                    ip = %meta.ip_address,
                    "Click registered"
                );
                Ok(link)
            }
            Err(LinkshelfError::NotFound(msg)) => Err(LinkshelfError::NotFound(msg)),
            Err(e) => {
                error!("Error recording click for product {}: {}", product_id, e);
                Err(LinkshelfError::internal("Failed to record click"))
            }
        }
    }
}
