use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::coupon::{Coupon, CouponStatus, DiscountType};
use crate::state::AppState;

pub const COUPON_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const COUPON_CODE_LEN: usize = 8;

pub fn generate_coupon_code() -> String {
    let mut rng = rand::thread_rng();
    (0..COUPON_CODE_LEN)
        .map(|_| COUPON_ALPHABET[rng.gen_range(0..COUPON_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCoupon {
    pub code: Option<String>,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_uses: Option<u32>,
    pub expires_at: Option<DateTime<Utc>>,
}

fn validate(new_coupon: &NewCoupon) -> Result<(), AppError> {
    if new_coupon.value <= Decimal::ZERO {
        return Err(AppError::BadRequest("value must be > 0".to_string()));
    }

    if new_coupon.discount_type == DiscountType::Percentage
        && new_coupon.value > Decimal::from(100)
    {
        return Err(AppError::BadRequest(
            "percentage discount cannot exceed 100".to_string(),
        ));
    }

    if new_coupon
        .min_order_amount
        .is_some_and(|min| min < Decimal::ZERO)
    {
        return Err(AppError::BadRequest(
            "min_order_amount cannot be negative".to_string(),
        ));
    }

    Ok(())
}

pub async fn create_coupon(state: &AppState, new_coupon: NewCoupon) -> Result<Coupon, AppError> {
    validate(&new_coupon)?;

    let code = match new_coupon.code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => code.to_uppercase(),
        _ => generate_coupon_code(),
    };

    let coupon = Coupon {
        id: Uuid::new_v4(),
        code,
        discount_type: new_coupon.discount_type,
        value: new_coupon.value,
        min_order_amount: new_coupon.min_order_amount,
        max_uses: new_coupon.max_uses,
        used_count: 0,
        expires_at: new_coupon.expires_at,
        status: CouponStatus::Active,
        created_at: Utc::now(),
    };

    state.store.insert_coupon(coupon.clone()).await?;
    info!(coupon_id = %coupon.id, code = %coupon.code, "coupon created");

    Ok(coupon)
}

pub async fn list_coupons(state: &AppState) -> Result<Vec<Coupon>, AppError> {
    let mut coupons = state.store.list_coupons().await?;
    coupons.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(coupons)
}

pub async fn set_coupon_status(
    state: &AppState,
    id: Uuid,
    status: CouponStatus,
) -> Result<Coupon, AppError> {
    Ok(state.store.set_coupon_status(id, status).await?)
}

pub async fn delete_coupon(state: &AppState, id: Uuid) -> Result<(), AppError> {
    state.store.delete_coupon(id).await?;
    info!(coupon_id = %id, "coupon deleted");
    Ok(())
}
