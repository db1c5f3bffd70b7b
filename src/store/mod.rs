//! Table access for the marketplace.
//!
//! Each method maps to one read or one write against a single table. Nothing
//! here spans two writes; callers that need several writes issue them one by
//! one and live with partial failure.

pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::coupon::{Coupon, CouponStatus};
use crate::models::flash_sale::{FlashSale, FlashSaleStatus};
use crate::models::notification::Notification;
use crate::models::order::{Order, OrderStatus};
use crate::models::payout::Payout;
use crate::models::profile::{Profile, Role};
use crate::models::review::{Review, ReviewStatus};
use crate::models::vendor::{ApplicationStatus, Vendor, VendorApplication};
use crate::models::wallet::{Wallet, WalletLogEntry};

pub use memory::MemoryStore;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("{table} row {id} not found")]
    NotFound { table: &'static str, id: String },

    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(table: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            table,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TableCounts {
    pub profiles: usize,
    pub orders: usize,
    pub vendor_applications: usize,
    pub notifications: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn table_counts(&self) -> Result<TableCounts, StoreError>;

    // profiles
    async fn insert_profile(&self, profile: Profile) -> Result<(), StoreError>;
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError>;
    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;
    /// Sets only the flags that are `Some`; the role and other fields stay.
    async fn set_user_restrictions(
        &self,
        id: Uuid,
        banned: Option<bool>,
        restricted: Option<bool>,
    ) -> Result<Profile, StoreError>;
    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<(), StoreError>;

    // orders
    async fn insert_order(&self, order: Order) -> Result<(), StoreError>;
    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError>;
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;
    /// Sets `status` and `updated_at` only.
    async fn update_order_status(&self, id: Uuid, status: OrderStatus)
    -> Result<Order, StoreError>;
    async fn set_order_driver(&self, id: Uuid, driver_id: Uuid) -> Result<Order, StoreError>;

    // vendor_applications, vendors
    async fn insert_vendor_application(
        &self,
        application: VendorApplication,
    ) -> Result<(), StoreError>;
    async fn get_vendor_application(
        &self,
        id: Uuid,
    ) -> Result<Option<VendorApplication>, StoreError>;
    async fn list_vendor_applications(&self) -> Result<Vec<VendorApplication>, StoreError>;
    async fn update_vendor_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        rejection_reason: Option<String>,
    ) -> Result<(), StoreError>;
    async fn upsert_vendor(&self, vendor: Vendor) -> Result<(), StoreError>;
    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError>;

    // wallets, wallet_logs
    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, StoreError>;
    async fn upsert_wallet(&self, wallet: Wallet) -> Result<(), StoreError>;
    async fn append_wallet_log(&self, entry: WalletLogEntry) -> Result<(), StoreError>;
    async fn list_wallet_logs(&self, user_id: Uuid) -> Result<Vec<WalletLogEntry>, StoreError>;

    // notifications
    async fn insert_notification(&self, notification: Notification) -> Result<(), StoreError>;
    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError>;
    async fn mark_notification_read(&self, id: Uuid) -> Result<Notification, StoreError>;

    // coupons
    async fn insert_coupon(&self, coupon: Coupon) -> Result<(), StoreError>;
    async fn get_coupon_by_code(&self, code: String) -> Result<Option<Coupon>, StoreError>;
    async fn list_coupons(&self) -> Result<Vec<Coupon>, StoreError>;
    async fn set_coupon_status(&self, id: Uuid, status: CouponStatus)
    -> Result<Coupon, StoreError>;
    async fn delete_coupon(&self, id: Uuid) -> Result<(), StoreError>;

    // flash_sales
    async fn insert_flash_sale(&self, sale: FlashSale) -> Result<(), StoreError>;
    async fn list_flash_sales(&self) -> Result<Vec<FlashSale>, StoreError>;
    async fn set_flash_sale_status(
        &self,
        id: Uuid,
        status: FlashSaleStatus,
    ) -> Result<FlashSale, StoreError>;
    async fn delete_flash_sale(&self, id: Uuid) -> Result<(), StoreError>;

    // payouts
    async fn insert_payout(&self, payout: Payout) -> Result<(), StoreError>;
    async fn get_payout(&self, id: Uuid) -> Result<Option<Payout>, StoreError>;
    async fn list_payouts(&self) -> Result<Vec<Payout>, StoreError>;
    async fn update_payout(&self, payout: Payout) -> Result<(), StoreError>;

    // reviews
    async fn insert_review(&self, review: Review) -> Result<(), StoreError>;
    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError>;
    async fn set_review_status(&self, id: Uuid, status: ReviewStatus)
    -> Result<Review, StoreError>;
    async fn delete_review(&self, id: Uuid) -> Result<(), StoreError>;
}
