//! Product and click-event queries
//!
//! Product creation and removal belong to the catalogue management flows;
//! they are provided here for seeding and tests.

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use tracing::info;

use super::SeaOrmStorage;
use crate::errors::{LinkshelfError, Result};
use crate::storage::{ClickEvent, NewProduct, Product};

use migration::entities::{product, product_analytics};

impl SeaOrmStorage {
    pub async fn create_product(&self, new: NewProduct) -> Result<Product> {
        let model = product::ActiveModel {
            id: Set(new.id.clone()),
            name: Set(new.name),
            external_link: Set(new.external_link),
            clicks: Set(0),
            created_at: Set(Utc::now()),
        };

        product::Entity::insert(model)
            .exec(&self.db)
            .await
            .map_err(|e| {
                LinkshelfError::database_operation(format!(
                    "Failed to create product {}: {}",
                    new.id, e
                ))
            })?;

        self.get_product(&new.id)
            .await?
            .ok_or_else(|| LinkshelfError::internal(format!("Product {} vanished", new.id)))
    }

    pub async fn get_product(&self, id: &str) -> Result<Option<Product>> {
        let model = product::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(Product::from))
    }

    pub async fn remove_product(&self, id: &str) -> Result<()> {
        let result = product::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LinkshelfError::not_found(format!(
                "Product not found: {}",
                id
            )));
        }

        info!("Product deleted: {}", id);
        Ok(())
    }

    /// 按写入顺序返回某商品的点击事件
    pub async fn click_events(&self, product_id: &str) -> Result<Vec<ClickEvent>> {
        let models = product_analytics::Entity::find()
            .filter(product_analytics::Column::ProductId.eq(product_id))
            .order_by_asc(product_analytics::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ClickEvent::from).collect())
    }

    pub async fn count_click_events(&self) -> Result<u64> {
        let count = product_analytics::Entity::find().count(&self.db).await?;
        Ok(count)
    }
}
