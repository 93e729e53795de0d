//! Filtering, scoring and ranking of menu items for personalized
//! recommendations.
//!
//! This crate provides:
//! - Filter and ScoreRule traits with their implementations
//! - FilterPipeline for composing eligibility filters
//! - ScoringPipeline for the weighted personalized score
//! - PersonalizedScorer tying both together with recommendation reasons
//!
//! ## Architecture
//! The pipeline processes candidates in stages:
//! 1. Filters remove items that cannot be offered (e.g. sold out)
//! 2. Score rules each add a signed adjustment to a base score of 50
//! 3. Candidates are ranked, truncated and given a short reason
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{PersonalizedScorer, DEFAULT_RECOMMENDATION_COUNT};
//! use sources::{build_user_context, Candidate};
//!
//! let context = build_user_context(Some(user_id), &orders, &preferences, 20);
//! let picks = PersonalizedScorer::house().recommend(
//!     Candidate::all(&catalog),
//!     &context,
//!     DEFAULT_RECOMMENDATION_COUNT,
//! )?;
//! ```

pub mod filter_pipeline;
pub mod filters;
pub mod personalized;
pub mod reasons;
pub mod rules;
pub mod scoring;
pub mod traits;

// Re-export main types
pub use filter_pipeline::FilterPipeline;
pub use personalized::{PersonalizedScorer, DEFAULT_RECOMMENDATION_COUNT};
pub use scoring::{ScoredCandidate, ScoringPipeline, BASE_SCORE};
pub use traits::{Filter, ScoreRule};
