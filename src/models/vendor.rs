use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorApplication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub business_email: String,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub user_id: Uuid,
    pub business_name: String,
    pub business_email: String,
    pub status: VendorStatus,
    pub updated_at: DateTime<Utc>,
}
