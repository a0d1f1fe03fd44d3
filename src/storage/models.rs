use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use migration::entities::{product, product_analytics};

/// 请求元数据缺失时写入的占位值
pub const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub external_link: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to insert a product (creation flows live outside this crate)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub external_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub id: i64,
    pub product_id: String,
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: String,
    pub created_at: DateTime<Utc>,
}

/// Best-effort request metadata attached to a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickMetadata {
    pub ip_address: String,
    pub user_agent: String,
    pub referrer: String,
}

impl ClickMetadata {
    /// 空值与纯空白一律记为 `unknown`
    pub fn new(
        ip_address: Option<String>,
        user_agent: Option<String>,
        referrer: Option<String>,
    ) -> Self {
        Self {
            ip_address: or_unknown(ip_address),
            user_agent: or_unknown(user_agent),
            referrer: or_unknown(referrer),
        }
    }
}

impl Default for ClickMetadata {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

fn or_unknown(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

impl From<product::Model> for Product {
    fn from(model: product::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            external_link: model.external_link,
            clicks: model.clicks.max(0) as u64,
            created_at: model.created_at,
        }
    }
}

impl From<product_analytics::Model> for ClickEvent {
    fn from(model: product_analytics::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            ip_address: model.ip_address,
            user_agent: model.user_agent,
            referrer: model.referrer,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_defaults_to_unknown() {
        let meta = ClickMetadata::default();
        assert_eq!(meta.ip_address, UNKNOWN);
        assert_eq!(meta.user_agent, UNKNOWN);
        assert_eq!(meta.referrer, UNKNOWN);
    }

    #[test]
    fn test_metadata_blank_values_are_unknown() {
        let meta = ClickMetadata::new(
            Some("  ".to_string()),
            Some("Mozilla/5.0".to_string()),
            Some(String::new()),
        );
        assert_eq!(meta.ip_address, UNKNOWN);
        assert_eq!(meta.user_agent, "Mozilla/5.0");
        assert_eq!(meta.referrer, UNKNOWN);
    }
}
