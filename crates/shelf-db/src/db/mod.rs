pub mod error_log;
pub mod review_image;

pub use error_log::{ErrorLogRepository, ErrorLogStore};
pub use review_image::{ReviewImageRepository, ReviewImageRow, ReviewImageStore};
