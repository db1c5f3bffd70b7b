use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FlashSaleStatus {
    Scheduled,
    Active,
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashSale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub title: String,
    pub discount_percent: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: FlashSaleStatus,
    pub created_at: DateTime<Utc>,
}

impl FlashSale {
    /// Live means marked active and inside the sale window.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.status == FlashSaleStatus::Active && self.starts_at <= now && now < self.ends_at
    }
}
