use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::flash_sale::{FlashSale, FlashSaleStatus};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct NewFlashSale {
    pub product_id: Uuid,
    pub title: String,
    pub discount_percent: Decimal,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

pub async fn create_flash_sale(
    state: &AppState,
    new_sale: NewFlashSale,
) -> Result<FlashSale, AppError> {
    if new_sale.title.trim().is_empty() {
        return Err(AppError::BadRequest("title cannot be empty".to_string()));
    }
    if new_sale.ends_at <= new_sale.starts_at {
        return Err(AppError::BadRequest(
            "ends_at must be after starts_at".to_string(),
        ));
    }
    if new_sale.discount_percent <= Decimal::ZERO || new_sale.discount_percent > Decimal::from(100)
    {
        return Err(AppError::BadRequest(
            "discount_percent must be in (0, 100]".to_string(),
        ));
    }

    let now = Utc::now();
    let status = if new_sale.starts_at <= now {
        FlashSaleStatus::Active
    } else {
        FlashSaleStatus::Scheduled
    };

    let sale = FlashSale {
        id: Uuid::new_v4(),
        product_id: new_sale.product_id,
        title: new_sale.title.trim().to_string(),
        discount_percent: new_sale.discount_percent,
        starts_at: new_sale.starts_at,
        ends_at: new_sale.ends_at,
        status,
        created_at: now,
    };

    state.store.insert_flash_sale(sale.clone()).await?;
    info!(flash_sale_id = %sale.id, product_id = %sale.product_id, "flash sale created");

    Ok(sale)
}

pub async fn list_flash_sales(state: &AppState, live_only: bool) -> Result<Vec<FlashSale>, AppError> {
    let now = Utc::now();
    let mut sales: Vec<FlashSale> = state
        .store
        .list_flash_sales()
        .await?
        .into_iter()
        .filter(|sale| !live_only || sale.is_live(now))
        .collect();
    sales.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
    Ok(sales)
}

pub async fn set_flash_sale_status(
    state: &AppState,
    id: Uuid,
    status: FlashSaleStatus,
) -> Result<FlashSale, AppError> {
    Ok(state.store.set_flash_sale_status(id, status).await?)
}

pub async fn delete_flash_sale(state: &AppState, id: Uuid) -> Result<(), AppError> {
    state.store.delete_flash_sale(id).await?;
    Ok(())
}
