use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::review::{ProductRating, Review, ReviewStatus};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewFilter {
    pub product_id: Option<Uuid>,
    pub status: Option<ReviewStatus>,
}

pub async fn create_review(state: &AppState, new_review: NewReview) -> Result<Review, AppError> {
    if !(1..=5).contains(&new_review.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_string(),
        ));
    }

    let review = Review {
        id: Uuid::new_v4(),
        product_id: new_review.product_id,
        user_id: new_review.user_id,
        rating: new_review.rating,
        comment: new_review
            .comment
            .map(|comment| comment.trim().to_string())
            .filter(|comment| !comment.is_empty()),
        status: ReviewStatus::Pending,
        created_at: Utc::now(),
    };

    state.store.insert_review(review.clone()).await?;
    Ok(review)
}

pub async fn list_reviews(state: &AppState, filter: &ReviewFilter) -> Result<Vec<Review>, AppError> {
    let mut reviews: Vec<Review> = state
        .store
        .list_reviews()
        .await?
        .into_iter()
        .filter(|review| filter.product_id.is_none_or(|id| review.product_id == id))
        .filter(|review| filter.status.is_none_or(|status| review.status == status))
        .collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(reviews)
}

pub async fn set_review_status(
    state: &AppState,
    id: Uuid,
    status: ReviewStatus,
) -> Result<Review, AppError> {
    let review = state.store.set_review_status(id, status).await?;
    info!(review_id = %id, status = ?status, "review moderated");
    Ok(review)
}

pub async fn delete_review(state: &AppState, id: Uuid) -> Result<(), AppError> {
    state.store.delete_review(id).await?;
    Ok(())
}

pub async fn product_rating(state: &AppState, product_id: Uuid) -> Result<ProductRating, AppError> {
    let reviews = state.store.list_reviews().await?;
    Ok(ProductRating::from_reviews(product_id, &reviews))
}
