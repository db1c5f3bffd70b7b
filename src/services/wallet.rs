//! Admin wallet adjustments.
//!
//! The new balance is computed from the last value read and written back
//! with a plain upsert; two admins adjusting the same wallet at once can
//! lose an update. Debits are not bounded below zero.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::email::templates;
use crate::error::AppError;
use crate::models::notification::NotificationKind;
use crate::models::wallet::{Direction, Wallet, WalletLogEntry};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct WalletAdjustment {
    pub direction: Direction,
    pub amount: Decimal,
    pub reason: Option<String>,
}

pub async fn get_wallet(state: &AppState, user_id: Uuid) -> Result<Wallet, AppError> {
    Ok(state
        .store
        .get_wallet(user_id)
        .await?
        .unwrap_or_else(|| Wallet::empty(user_id)))
}

pub async fn adjust_wallet(
    state: &AppState,
    user_id: Uuid,
    adjustment: WalletAdjustment,
) -> Result<Wallet, AppError> {
    if adjustment.amount <= Decimal::ZERO {
        return Err(AppError::BadRequest("amount must be > 0".to_string()));
    }

    let current = get_wallet(state, user_id).await?;
    let balance_after = adjustment
        .direction
        .apply(current.balance, adjustment.amount)
        .ok_or_else(AppError::amount_out_of_range)?;

    let updated = Wallet {
        user_id,
        balance: balance_after,
        updated_at: Utc::now(),
    };
    state.store.upsert_wallet(updated.clone()).await?;

    state
        .metrics
        .wallet_adjustments_total
        .with_label_values(&[adjustment.direction.as_str()])
        .inc();
    info!(
        user_id = %user_id,
        direction = adjustment.direction.as_str(),
        amount = %adjustment.amount,
        balance = %balance_after,
        "wallet adjusted"
    );

    let entry = WalletLogEntry {
        id: Uuid::new_v4(),
        user_id,
        direction: adjustment.direction,
        amount: adjustment.amount,
        balance_before: current.balance,
        balance_after,
        reason: adjustment.reason,
        created_at: updated.updated_at,
    };
    if let Err(err) = state.store.append_wallet_log(entry).await {
        warn!(user_id = %user_id, error = %err, "failed to append wallet audit log");
    }

    state.notifier.spawn_for_user(
        user_id,
        templates::wallet_adjusted(adjustment.direction, adjustment.amount, balance_after),
        NotificationKind::Wallet,
    );

    Ok(updated)
}

pub async fn list_wallet_logs(
    state: &AppState,
    user_id: Uuid,
) -> Result<Vec<WalletLogEntry>, AppError> {
    let mut entries = state.store.list_wallet_logs(user_id).await?;
    entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::{adjust_wallet, list_wallet_logs, WalletAdjustment};
    use crate::email::MockEmailSender;
    use crate::error::AppError;
    use crate::models::wallet::{Direction, Wallet};
    use crate::state::AppState;
    use crate::store::{MockStore, StoreError};

    fn adjustment(direction: Direction, amount: i64) -> WalletAdjustment {
        WalletAdjustment {
            direction,
            amount: Decimal::from(amount),
            reason: Some("refund".to_string()),
        }
    }

    #[tokio::test]
    async fn credit_then_debit_past_zero() {
        let state = AppState::in_memory(16);
        let user_id = Uuid::new_v4();

        let wallet = adjust_wallet(&state, user_id, adjustment(Direction::Credit, 40))
            .await
            .unwrap();
        assert_eq!(wallet.balance, Decimal::from(40));

        let wallet = adjust_wallet(&state, user_id, adjustment(Direction::Debit, 55))
            .await
            .unwrap();
        assert_eq!(wallet.balance, Decimal::from(-15));

        let logs = list_wallet_logs(&state, user_id).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs
            .iter()
            .any(|entry| entry.balance_before == Decimal::from(40)
                && entry.balance_after == Decimal::from(-15)));
    }

    #[tokio::test]
    async fn non_positive_amount_is_rejected() {
        let state = AppState::in_memory(16);
        let result = adjust_wallet(&state, Uuid::new_v4(), adjustment(Direction::Credit, 0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn overflowing_credit_keeps_previous_balance() {
        let state = AppState::in_memory(16);
        let user_id = Uuid::new_v4();
        let huge = WalletAdjustment {
            direction: Direction::Credit,
            amount: Decimal::from_str_exact("70000000000000000000000000000").unwrap(),
            reason: None,
        };

        let wallet = adjust_wallet(&state, user_id, huge.clone()).await.unwrap();
        assert_eq!(wallet.balance, huge.amount);

        let err = adjust_wallet(&state, user_id, huge.clone()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "amount out of range"));

        let logs = list_wallet_logs(&state, user_id).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].balance_after, huge.amount);
    }

    #[tokio::test]
    async fn audit_log_failure_does_not_fail_adjustment() {
        let user_id = Uuid::new_v4();
        let mut store = MockStore::new();
        store.expect_get_wallet().returning(move |_| {
            Ok(Some(Wallet {
                user_id,
                balance: Decimal::from(100),
                updated_at: chrono::Utc::now(),
            }))
        });
        store
            .expect_upsert_wallet()
            .withf(|wallet| wallet.balance == Decimal::from(125))
            .times(1)
            .returning(|_| Ok(()));
        store
            .expect_append_wallet_log()
            .times(1)
            .returning(|_| Err(StoreError::Unavailable("rpc failed".to_string())));
        store.expect_get_profile().returning(|_| Ok(None));
        store.expect_insert_notification().returning(|_| Ok(()));

        let state = AppState::new(
            Arc::new(store),
            Arc::new(MockEmailSender::new()),
            "shop@example.com".to_string(),
            16,
        );

        let wallet = adjust_wallet(&state, user_id, adjustment(Direction::Credit, 25))
            .await
            .unwrap();
        assert_eq!(wallet.balance, Decimal::from(125));
    }
}
