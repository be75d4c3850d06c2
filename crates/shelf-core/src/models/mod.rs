//! Domain models for review images and their owning catalog entities.

pub mod error_log;
pub mod review_image;

pub use error_log::{ErrorLogLevel, NewErrorLog};
pub use review_image::{MediaType, NewReviewImage, Owner, ReviewImage};
