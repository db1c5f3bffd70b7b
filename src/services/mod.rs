pub mod cart;
pub mod coupons;
pub mod flash_sales;
pub mod notification;
pub mod orders;
pub mod payouts;
pub mod reviews;
pub mod users;
pub mod vendors;
pub mod wallet;
