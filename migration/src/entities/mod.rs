pub mod product;
pub mod product_analytics;

pub use product::Entity as ProductEntity;
pub use product_analytics::Entity as ProductAnalyticsEntity;
