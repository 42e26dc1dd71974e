use crate::types::ReviewStatus;

/// Error type for domain validation in the core crate
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Review comment cannot be empty")]
    EmptyComment,

    #[error("Cannot move a review from {from} to {to}")]
    InvalidTransition { from: ReviewStatus, to: ReviewStatus },

    #[error("Unknown pricing model: {0}. Valid models: free, paid, subscription, free_plus_paid, no_pricing")]
    UnknownPricingModel(String),

    #[error("Unknown review status: {0}. Valid statuses: pending, approved, rejected")]
    UnknownReviewStatus(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}
