use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::coupon::Coupon;
use crate::models::order::OrderItem;
use crate::services::orders::checked_items_total;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct CartQuoteRequest {
    pub items: Vec<OrderItem>,
    pub coupon_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CartQuote {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub coupon_id: Option<Uuid>,
}

/// Items are validated the same way as at order creation. The discount is
/// capped at the subtotal, so the total never goes below zero.
pub fn quote(
    items: &[OrderItem],
    coupon: Option<&Coupon>,
    now: DateTime<Utc>,
) -> Result<CartQuote, AppError> {
    let subtotal = checked_items_total(items)?;
    let discount = match coupon {
        Some(coupon) => coupon
            .discount_for(subtotal, now)
            .ok_or_else(AppError::amount_out_of_range)?,
        None => Decimal::ZERO,
    };

    Ok(CartQuote {
        subtotal,
        discount,
        total: subtotal - discount,
        coupon_id: coupon
            .filter(|coupon| coupon.is_usable(subtotal, now))
            .map(|coupon| coupon.id),
    })
}

pub async fn quote_cart(state: &AppState, request: CartQuoteRequest) -> Result<CartQuote, AppError> {
    let code = request
        .coupon_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty());

    let coupon = match code {
        Some(code) => Some(
            state
                .store
                .get_coupon_by_code(code.to_string())
                .await?
                .ok_or_else(|| AppError::NotFound(format!("coupon {} not found", code)))?,
        ),
        None => None,
    };

    quote(&request.items, coupon.as_ref(), Utc::now())
}
