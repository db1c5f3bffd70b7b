use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Hidden,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRating {
    pub product_id: Uuid,
    pub average: f64,
    pub count: usize,
}

impl ProductRating {
    /// Only approved reviews count towards the public rating.
    pub fn from_reviews(product_id: Uuid, reviews: &[Review]) -> Self {
        let ratings: Vec<f64> = reviews
            .iter()
            .filter(|review| review.product_id == product_id)
            .filter(|review| review.status == ReviewStatus::Approved)
            .map(|review| review.rating as f64)
            .collect();

        let count = ratings.len();
        let average = if count == 0 {
            0.0
        } else {
            ratings.iter().sum::<f64>() / count as f64
        };

        Self {
            product_id,
            average,
            count,
        }
    }
}
