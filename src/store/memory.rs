use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
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
use crate::store::{Store, StoreError, TableCounts};

/// In-process tables. Every write is last-write-wins on a single row.
#[derive(Default)]
pub struct MemoryStore {
    profiles: DashMap<Uuid, Profile>,
    orders: DashMap<Uuid, Order>,
    vendor_applications: DashMap<Uuid, VendorApplication>,
    vendors: DashMap<Uuid, Vendor>,
    wallets: DashMap<Uuid, Wallet>,
    wallet_logs: DashMap<Uuid, WalletLogEntry>,
    notifications: DashMap<Uuid, Notification>,
    coupons: DashMap<Uuid, Coupon>,
    flash_sales: DashMap<Uuid, FlashSale>,
    payouts: DashMap<Uuid, Payout>,
    reviews: DashMap<Uuid, Review>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn snapshot<T: Clone>(table: &DashMap<Uuid, T>) -> Vec<T> {
    table.iter().map(|entry| entry.value().clone()).collect()
}

fn remove<T>(table: &DashMap<Uuid, T>, name: &'static str, id: Uuid) -> Result<(), StoreError> {
    table
        .remove(&id)
        .map(|_| ())
        .ok_or_else(|| StoreError::not_found(name, id))
}

#[async_trait]
impl Store for MemoryStore {
    async fn table_counts(&self) -> Result<TableCounts, StoreError> {
        Ok(TableCounts {
            profiles: self.profiles.len(),
            orders: self.orders.len(),
            vendor_applications: self.vendor_applications.len(),
            notifications: self.notifications.len(),
        })
    }

    async fn insert_profile(&self, profile: Profile) -> Result<(), StoreError> {
        self.profiles.insert(profile.id, profile);
        Ok(())
    }

    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        Ok(snapshot(&self.profiles))
    }

    async fn set_user_restrictions(
        &self,
        id: Uuid,
        banned: Option<bool>,
        restricted: Option<bool>,
    ) -> Result<Profile, StoreError> {
        let mut row = self
            .profiles
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("profiles", id))?;
        if let Some(banned) = banned {
            row.banned = banned;
        }
        if let Some(restricted) = restricted {
            row.restricted = restricted;
        }
        Ok(row.clone())
    }

    async fn set_user_role(&self, id: Uuid, role: Role) -> Result<(), StoreError> {
        let mut row = self
            .profiles
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("profiles", id))?;
        row.role = role;
        Ok(())
    }

    async fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        self.orders.insert(order.id, order);
        Ok(())
    }

    async fn get_order(&self, id: Uuid) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        Ok(snapshot(&self.orders))
    }

    async fn update_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, StoreError> {
        let mut row = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("orders", id))?;
        row.status = status;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn set_order_driver(&self, id: Uuid, driver_id: Uuid) -> Result<Order, StoreError> {
        let mut row = self
            .orders
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("orders", id))?;
        row.driver_id = Some(driver_id);
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn insert_vendor_application(
        &self,
        application: VendorApplication,
    ) -> Result<(), StoreError> {
        self.vendor_applications.insert(application.id, application);
        Ok(())
    }

    async fn get_vendor_application(
        &self,
        id: Uuid,
    ) -> Result<Option<VendorApplication>, StoreError> {
        Ok(self
            .vendor_applications
            .get(&id)
            .map(|entry| entry.value().clone()))
    }

    async fn list_vendor_applications(&self) -> Result<Vec<VendorApplication>, StoreError> {
        Ok(snapshot(&self.vendor_applications))
    }

    async fn update_vendor_application_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        rejection_reason: Option<String>,
    ) -> Result<(), StoreError> {
        let mut row = self
            .vendor_applications
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("vendor_applications", id))?;
        row.status = status;
        row.rejection_reason = rejection_reason;
        row.reviewed_at = Some(Utc::now());
        Ok(())
    }

    async fn upsert_vendor(&self, vendor: Vendor) -> Result<(), StoreError> {
        self.vendors.insert(vendor.user_id, vendor);
        Ok(())
    }

    async fn list_vendors(&self) -> Result<Vec<Vendor>, StoreError> {
        Ok(snapshot(&self.vendors))
    }

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>, StoreError> {
        Ok(self.wallets.get(&user_id).map(|entry| entry.value().clone()))
    }

    async fn upsert_wallet(&self, wallet: Wallet) -> Result<(), StoreError> {
        self.wallets.insert(wallet.user_id, wallet);
        Ok(())
    }

    async fn append_wallet_log(&self, entry: WalletLogEntry) -> Result<(), StoreError> {
        self.wallet_logs.insert(entry.id, entry);
        Ok(())
    }

    async fn list_wallet_logs(&self, user_id: Uuid) -> Result<Vec<WalletLogEntry>, StoreError> {
        Ok(self
            .wallet_logs
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn insert_notification(&self, notification: Notification) -> Result<(), StoreError> {
        self.notifications.insert(notification.id, notification);
        Ok(())
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<Notification>, StoreError> {
        Ok(self
            .notifications
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<Notification, StoreError> {
        let mut row = self
            .notifications
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("notifications", id))?;
        row.read = true;
        Ok(row.clone())
    }

    async fn insert_coupon(&self, coupon: Coupon) -> Result<(), StoreError> {
        let taken = self
            .coupons
            .iter()
            .any(|entry| entry.code.eq_ignore_ascii_case(&coupon.code));
        if taken {
            return Err(StoreError::Duplicate(format!("coupon code {}", coupon.code)));
        }

        self.coupons.insert(coupon.id, coupon);
        Ok(())
    }

    async fn get_coupon_by_code(&self, code: String) -> Result<Option<Coupon>, StoreError> {
        Ok(self
            .coupons
            .iter()
            .find(|entry| entry.code.eq_ignore_ascii_case(&code))
            .map(|entry| entry.value().clone()))
    }

    async fn list_coupons(&self) -> Result<Vec<Coupon>, StoreError> {
        Ok(snapshot(&self.coupons))
    }

    async fn set_coupon_status(
        &self,
        id: Uuid,
        status: CouponStatus,
    ) -> Result<Coupon, StoreError> {
        let mut row = self
            .coupons
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("coupons", id))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn delete_coupon(&self, id: Uuid) -> Result<(), StoreError> {
        remove(&self.coupons, "coupons", id)
    }

    async fn insert_flash_sale(&self, sale: FlashSale) -> Result<(), StoreError> {
        self.flash_sales.insert(sale.id, sale);
        Ok(())
    }

    async fn list_flash_sales(&self) -> Result<Vec<FlashSale>, StoreError> {
        Ok(snapshot(&self.flash_sales))
    }

    async fn set_flash_sale_status(
        &self,
        id: Uuid,
        status: FlashSaleStatus,
    ) -> Result<FlashSale, StoreError> {
        let mut row = self
            .flash_sales
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("flashSales", id))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn delete_flash_sale(&self, id: Uuid) -> Result<(), StoreError> {
        remove(&self.flash_sales, "flashSales", id)
    }

    async fn insert_payout(&self, payout: Payout) -> Result<(), StoreError> {
        self.payouts.insert(payout.id, payout);
        Ok(())
    }

    async fn get_payout(&self, id: Uuid) -> Result<Option<Payout>, StoreError> {
        Ok(self.payouts.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_payouts(&self) -> Result<Vec<Payout>, StoreError> {
        Ok(snapshot(&self.payouts))
    }

    async fn update_payout(&self, payout: Payout) -> Result<(), StoreError> {
        let mut row = self
            .payouts
            .get_mut(&payout.id)
            .ok_or_else(|| StoreError::not_found("payouts", payout.id))?;
        *row = payout;
        Ok(())
    }

    async fn insert_review(&self, review: Review) -> Result<(), StoreError> {
        self.reviews.insert(review.id, review);
        Ok(())
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, StoreError> {
        Ok(snapshot(&self.reviews))
    }

    async fn set_review_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
    ) -> Result<Review, StoreError> {
        let mut row = self
            .reviews
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("reviews", id))?;
        row.status = status;
        Ok(row.clone())
    }

    async fn delete_review(&self, id: Uuid) -> Result<(), StoreError> {
        remove(&self.reviews, "reviews", id)
    }
}
