//! Guest reviews and rating aggregates.

use super::{fetch, list, remove, required};
use crate::error::{Result, ServiceError};
use chrono::{DateTime, Utc};
use domain::{Review, SubRatings, User};
use loyalty::LoyaltyEngine;
use serde::Serialize;
use serde_json::json;
use std::cmp::Ordering;
use std::sync::Arc;
use store::{collections, to_fields, Direction, DocumentStore, Query};
use tracing::{error, info, instrument};

pub const DEFAULT_TOP_REVIEWS: usize = 3;

/// Mean of every rating across all reviews; all zero when there are none
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    pub overall: f64,
    pub service: f64,
    pub food: f64,
    pub ambience: f64,
    pub value: f64,
    pub count: usize,
}

#[derive(Clone)]
pub struct ReviewService {
    store: Arc<dyn DocumentStore>,
    loyalty: LoyaltyEngine,
}

impl ReviewService {
    pub fn new(store: Arc<dyn DocumentStore>, loyalty: LoyaltyEngine) -> Self {
        Self { store, loyalty }
    }

    /// Store a review and check the reviewer achievement.
    #[instrument(skip(self, user, comment), fields(user = %user.id))]
    pub async fn create_review(
        &self,
        user: &User,
        ratings: SubRatings,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<Review> {
        check_ratings(&ratings)?;
        let comment = required(comment, "Please write a comment")?;

        let mut review = Review {
            id: String::new(),
            user_id: user.id.clone(),
            user_name: user.display_name.clone(),
            user_email: user.email.clone(),
            ratings,
            overall_rating: ratings.overall(),
            comment,
            helpful: 0,
            verified: false,
            created_at: now,
            updated_at: now,
        };
        review.id = self.store.insert(collections::REVIEWS, to_fields(&review)?).await?;
        info!("Stored review {} rated {:.2}", review.id, review.overall_rating);

        match self.user_reviews(&user.id).await {
            Ok(reviews) => {
                if let Err(e) = self
                    .loyalty
                    .check_review_achievements(&user.id, reviews.len() as u64, now)
                    .await
                {
                    error!("Review achievement check for {} failed: {}", user.id, e);
                }
            }
            Err(e) => error!("Could not count reviews for {}: {}", user.id, e),
        }

        Ok(review)
    }

    pub async fn get_review(&self, review_id: &str) -> Result<Option<Review>> {
        fetch(self.store.as_ref(), collections::REVIEWS, review_id).await
    }

    /// Every review, newest first
    pub async fn all_reviews(&self) -> Result<Vec<Review>> {
        let query = Query::new().order_by("created_at", Direction::Descending);
        list(self.store.as_ref(), collections::REVIEWS, &query).await
    }

    /// Best rated first, most helpful breaking ties
    pub async fn top_reviews(&self, count: usize) -> Result<Vec<Review>> {
        let mut reviews: Vec<Review> =
            list(self.store.as_ref(), collections::REVIEWS, &Query::new()).await?;
        reviews.sort_by(|a, b| {
            b.overall_rating
                .partial_cmp(&a.overall_rating)
                .unwrap_or(Ordering::Equal)
                .then(b.helpful.cmp(&a.helpful))
        });
        reviews.truncate(count);
        Ok(reviews)
    }

    pub async fn user_reviews(&self, user_id: &str) -> Result<Vec<Review>> {
        let query = Query::new()
            .where_eq("user_id", user_id)
            .order_by("created_at", Direction::Descending);
        list(self.store.as_ref(), collections::REVIEWS, &query).await
    }

    /// Replace the ratings and/or comment. New ratings recompute the overall.
    #[instrument(skip(self, comment))]
    pub async fn update_review(
        &self,
        review_id: &str,
        ratings: Option<SubRatings>,
        comment: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Review> {
        let mut review: Review = self
            .get_review(review_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review", review_id))?;

        if ratings.is_none() && comment.is_none() {
            return Err(ServiceError::validation("Nothing to update"));
        }
        if let Some(ratings) = ratings {
            check_ratings(&ratings)?;
            review.ratings = ratings;
            review.overall_rating = ratings.overall();
        }
        if let Some(comment) = comment {
            review.comment = required(comment, "Please write a comment")?;
        }
        review.updated_at = now;

        let fields = json!({
            "ratings": review.ratings,
            "overall_rating": review.overall_rating,
            "comment": review.comment,
            "updated_at": now,
        });
        self.store.update(collections::REVIEWS, review_id, fields).await?;
        info!("Updated review {}", review_id);
        Ok(review)
    }

    #[instrument(skip(self))]
    pub async fn delete_review(&self, review_id: &str) -> Result<()> {
        remove(self.store.as_ref(), collections::REVIEWS, "Review", review_id).await?;
        info!("Deleted review {}", review_id);
        Ok(())
    }

    /// Bump the helpful counter and return the new count
    #[instrument(skip(self))]
    pub async fn mark_helpful(&self, review_id: &str, now: DateTime<Utc>) -> Result<u32> {
        let review: Review = self
            .get_review(review_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Review", review_id))?;

        let helpful = review.helpful + 1;
        let fields = json!({ "helpful": helpful, "updated_at": now });
        self.store.update(collections::REVIEWS, review_id, fields).await?;
        Ok(helpful)
    }

    pub async fn average_ratings(&self) -> Result<RatingSummary> {
        let reviews: Vec<Review> =
            list(self.store.as_ref(), collections::REVIEWS, &Query::new()).await?;
        Ok(summarize(&reviews))
    }
}

fn check_ratings(ratings: &SubRatings) -> Result<()> {
    if ratings.as_array().iter().all(|r| (1..=5).contains(r)) {
        Ok(())
    } else {
        Err(ServiceError::validation("Every rating must be between 1 and 5 stars"))
    }
}

pub(crate) fn summarize(reviews: &[Review]) -> RatingSummary {
    if reviews.is_empty() {
        return RatingSummary::default();
    }
    let count = reviews.len() as f64;
    let mean = |f: fn(&Review) -> f64| reviews.iter().map(f).sum::<f64>() / count;

    RatingSummary {
        overall: mean(|r| r.overall_rating),
        service: mean(|r| r.ratings.service as f64),
        food: mean(|r| r.ratings.food as f64),
        ambience: mean(|r| r.ratings.ambience as f64),
        value: mean(|r| r.ratings.value as f64),
        count: reviews.len(),
    }
}
