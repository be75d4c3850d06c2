mod service;
mod types;

pub use service::{UploadService, DELETE_ROUTE};
pub use types::ImageFile;
