use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Credit,
    Debit,
}

impl Direction {
    /// No lower bound: a debit larger than the balance goes negative.
    /// `None` only when the result overflows `Decimal`.
    pub fn apply(&self, balance: Decimal, amount: Decimal) -> Option<Decimal> {
        match self {
            Direction::Credit => balance.checked_add(amount),
            Direction::Debit => balance.checked_sub(amount),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Credit => "credit",
            Direction::Debit => "debit",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: Uuid,
    pub balance: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            balance: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub direction: Direction,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}
