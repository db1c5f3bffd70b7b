pub mod coupon;
pub mod flash_sale;
pub mod notification;
pub mod order;
pub mod payout;
pub mod profile;
pub mod review;
pub mod vendor;
pub mod wallet;
