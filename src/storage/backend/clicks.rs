//! Click recording for SeaOrmStorage
//!
//! 计数 +1、读取跳转链接、写入点击事件在同一个事务内完成。
//! 计数更新放在最前：它既是存在性检查（影响行数为 0 即商品不存在），
//! 也让事务一开始就拿到该行的写锁，并发点击在此处串行化。

use chrono::Utc;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveValue::Set, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, ExprTrait,
    TransactionTrait,
};
use tracing::debug;

use super::SeaOrmStorage;
use super::retry;
use crate::errors::{LinkshelfError, Result};
use crate::storage::ClickMetadata;

use migration::entities::{product, product_analytics};

impl SeaOrmStorage {
    /// 记录一次点击并返回商品的外部链接
    ///
    /// 商品不存在时返回 `NotFound`，数据库不发生任何变化。
    pub async fn record_click(&self, product_id: &str, meta: &ClickMetadata) -> Result<String> {
        let db = &self.db;

        let external_link = retry::with_retry(
            &format!("record_click({})", product_id),
            self.retry_config,
            || async { record_click_txn(db, product_id, meta).await },
        )
        .await
        .map_err(|e| LinkshelfError::database_operation(format!("Failed to record click: {}", e)))?;

        match external_link {
            Some(link) => {
                debug!("Click recorded for product {}", product_id);
                Ok(link)
            }
            None => Err(LinkshelfError::not_found(format!(
                "Product not found: {}",
                product_id
            ))),
        }
    }
}

/// 单次事务尝试；`Ok(None)` 表示商品不存在（事务已回滚）
async fn record_click_txn(
    db: &DatabaseConnection,
    product_id: &str,
    meta: &ClickMetadata,
) -> std::result::Result<Option<String>, DbErr> {
    let txn = db.begin().await?;

    let increment = Query::update()
        .table(product::Entity)
        .value(
            product::Column::Clicks,
            Expr::col(product::Column::Clicks).add(Expr::val(1i64)),
        )
        .and_where(Expr::col(product::Column::Id).eq(Expr::val(product_id)))
        .to_owned();

    let updated = txn.execute(&increment).await?;
    if updated.rows_affected() == 0 {
        txn.rollback().await?;
        return Ok(None);
    }

    let Some(product) = product::Entity::find_by_id(product_id.to_string())
        .one(&txn)
        .await?
    else {
        txn.rollback().await?;
        return Ok(None);
    };

    let event = product_analytics::ActiveModel {
        product_id: Set(product_id.to_string()),
        ip_address: Set(meta.ip_address.clone()),
        user_agent: Set(meta.user_agent.clone()),
        referrer: Set(meta.referrer.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    product_analytics::Entity::insert(event).exec(&txn).await?;

    txn.commit().await?;
    Ok(Some(product.external_link))
}
