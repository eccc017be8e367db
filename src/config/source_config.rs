// ==========================================
// 区间补货需求计算系统 - 外部存储配置
// ==========================================
// 职责: 表标识与字段名的加载与校验
// 来源: 环境变量 (带默认值), 启动时读取一次
// ==========================================

use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置项缺失或为空: {key}")]
    MissingKey { key: String },
}

// ==========================================
// SourceConfig - 外部存储配置 (不可变)
// ==========================================
// 构造一次后按引用传入各组件, 不持有环境状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    // ===== 表标识 =====
    /// 日销量计划表
    pub table_demand: String,
    /// Listing (产品-市场) 表
    pub table_listing: String,
    /// 箱规表
    pub table_box: String,

    // ===== 日销量计划表字段 =====
    /// 计划日期字段
    pub field_date: String,
    /// Listing 关联字段 (lookup, 标量或列表)
    pub field_listing: String,
    /// 市场标签字段 (lookup, 可能多值)
    pub field_market: String,
    /// 计划销量字段
    pub field_units: String,

    // ===== Listing 表字段 =====
    /// 产品关联字段
    pub field_product_link: String,

    // ===== 箱规表字段 =====
    /// 适用产品引用集合字段
    pub field_box_products: String,
    /// 每箱件数字段
    pub field_box_units: String,
}

impl SourceConfig {
    /// 从环境变量构造 (每个键都有与外部存储一致的默认值)
    ///
    /// # 环境变量
    /// - STORE_TABLE_DEMAND / STORE_TABLE_LISTING / STORE_TABLE_BOX
    /// - STORE_FIELD_DATE / STORE_FIELD_LISTING / STORE_FIELD_MARKET / STORE_FIELD_UNITS
    /// - STORE_FIELD_PRODUCT_LINK / STORE_FIELD_BOX_PRODUCTS / STORE_FIELD_BOX_UNITS
    ///
    /// # 返回
    /// - Err(ConfigError::MissingKey): 某个键被显式设置为空串
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = SourceConfig {
            table_demand: env_or("STORE_TABLE_DEMAND", "Sales Plan Daily"),
            table_listing: env_or("STORE_TABLE_LISTING", "Listings"),
            table_box: env_or("STORE_TABLE_BOX", "Box Sizes"),
            field_date: env_or("STORE_FIELD_DATE", "Date"),
            field_listing: env_or("STORE_FIELD_LISTING", "Listing ID"),
            field_market: env_or("STORE_FIELD_MARKET", "Marketplace"),
            field_units: env_or("STORE_FIELD_UNITS", "Planned units"),
            field_product_link: env_or("STORE_FIELD_PRODUCT_LINK", "Product"),
            field_box_products: env_or("STORE_FIELD_BOX_PRODUCTS", "Linked products"),
            field_box_units: env_or("STORE_FIELD_BOX_UNITS", "Units per carton"),
        };
        config.validate()?;
        Ok(config)
    }

    /// 校验所有键非空
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = [
            ("STORE_TABLE_DEMAND", &self.table_demand),
            ("STORE_TABLE_LISTING", &self.table_listing),
            ("STORE_TABLE_BOX", &self.table_box),
            ("STORE_FIELD_DATE", &self.field_date),
            ("STORE_FIELD_LISTING", &self.field_listing),
            ("STORE_FIELD_MARKET", &self.field_market),
            ("STORE_FIELD_UNITS", &self.field_units),
            ("STORE_FIELD_PRODUCT_LINK", &self.field_product_link),
            ("STORE_FIELD_BOX_PRODUCTS", &self.field_box_products),
            ("STORE_FIELD_BOX_UNITS", &self.field_box_units),
        ];
        for (key, value) in entries {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    /// 默认配置 (等同于未设置任何环境变量)
    fn default() -> Self {
        SourceConfig {
            table_demand: "Sales Plan Daily".to_string(),
            table_listing: "Listings".to_string(),
            table_box: "Box Sizes".to_string(),
            field_date: "Date".to_string(),
            field_listing: "Listing ID".to_string(),
            field_market: "Marketplace".to_string(),
            field_units: "Planned units".to_string(),
            field_product_link: "Product".to_string(),
            field_box_products: "Linked products".to_string(),
            field_box_units: "Units per carton".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
