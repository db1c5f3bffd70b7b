use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::email::templates;
use crate::error::AppError;
use crate::models::notification::NotificationKind;
use crate::models::payout::{Payout, PayoutStatus};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPayout {
    pub vendor_id: Uuid,
    pub amount: Decimal,
    pub method: String,
}

pub async fn request_payout(state: &AppState, new_payout: NewPayout) -> Result<Payout, AppError> {
    if new_payout.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be > 0".to_string()));
    }
    if new_payout.method.trim().is_empty() {
        return Err(AppError::BadRequest("method cannot be empty".to_string()));
    }

    let payout = Payout {
        id: Uuid::new_v4(),
        vendor_id: new_payout.vendor_id,
        amount: new_payout.amount,
        method: new_payout.method.trim().to_string(),
        status: PayoutStatus::Pending,
        rejection_reason: None,
        requested_at: Utc::now(),
        processed_at: None,
    };

    state.store.insert_payout(payout.clone()).await?;
    info!(payout_id = %payout.id, vendor_id = %payout.vendor_id, amount = %payout.amount, "payout requested");

    Ok(payout)
}

pub async fn list_payouts(
    state: &AppState,
    status: Option<PayoutStatus>,
) -> Result<Vec<Payout>, AppError> {
    let mut payouts: Vec<Payout> = state
        .store
        .list_payouts()
        .await?
        .into_iter()
        .filter(|payout| status.is_none_or(|status| payout.status == status))
        .collect();
    payouts.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
    Ok(payouts)
}

async fn load(state: &AppState, id: Uuid) -> Result<Payout, AppError> {
    state
        .store
        .get_payout(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("payout {} not found", id)))
}

async fn set_status(
    state: &AppState,
    id: Uuid,
    status: PayoutStatus,
    rejection_reason: Option<String>,
) -> Result<Payout, AppError> {
    let mut payout = load(state, id).await?;
    payout.status = status;
    payout.rejection_reason = rejection_reason;
    payout.processed_at = Some(Utc::now());

    state.store.update_payout(payout.clone()).await?;
    info!(payout_id = %id, status = ?status, "payout status updated");

    Ok(payout)
}

pub async fn approve_payout(state: &AppState, id: Uuid) -> Result<Payout, AppError> {
    let payout = set_status(state, id, PayoutStatus::Approved, None).await?;
    state.notifier.spawn_for_user(
        payout.vendor_id,
        templates::payout_approved(payout.amount),
        NotificationKind::Payout,
    );
    Ok(payout)
}

pub async fn reject_payout(state: &AppState, id: Uuid, reason: &str) -> Result<Payout, AppError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(AppError::BadRequest("rejection reason is required".to_string()));
    }

    let payout = set_status(state, id, PayoutStatus::Rejected, Some(reason.to_string())).await?;
    state.notifier.spawn_for_user(
        payout.vendor_id,
        templates::payout_rejected(payout.amount, reason),
        NotificationKind::Payout,
    );
    Ok(payout)
}

pub async fn mark_payout_paid(state: &AppState, id: Uuid) -> Result<Payout, AppError> {
    set_status(state, id, PayoutStatus::Paid, None).await
}
