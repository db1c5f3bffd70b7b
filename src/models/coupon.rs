use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CouponStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coupon {
    pub id: Uuid,
    pub code: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_uses: Option<u32>,
    pub used_count: u32,
    pub expires_at: Option<DateTime<Utc>>,
    pub status: CouponStatus,
    pub created_at: DateTime<Utc>,
}

impl Coupon {
    pub fn is_usable(&self, subtotal: Decimal, now: DateTime<Utc>) -> bool {
        if self.status != CouponStatus::Active {
            return false;
        }

        if self.expires_at.is_some_and(|expires_at| now > expires_at) {
            return false;
        }

        if self.max_uses.is_some_and(|max| self.used_count >= max) {
            return false;
        }

        !self.min_order_amount.is_some_and(|min| subtotal < min)
    }

    /// Discount applied to `subtotal`, never more than the subtotal itself.
    /// `None` when the percentage computation overflows.
    pub fn discount_for(&self, subtotal: Decimal, now: DateTime<Utc>) -> Option<Decimal> {
        if !self.is_usable(subtotal, now) {
            return Some(Decimal::ZERO);
        }

        let raw = match self.discount_type {
            DiscountType::Percentage => subtotal
                .checked_mul(self.value)?
                .checked_div(Decimal::ONE_HUNDRED)?
                .round_dp(2),
            DiscountType::Fixed => self.value,
        };

        Some(raw.min(subtotal).max(Decimal::ZERO))
    }
}
