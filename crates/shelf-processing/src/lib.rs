//! Shelf Processing Library
//!
//! Size-bounded re-encoding of uploaded review images.

pub mod compression;

pub use compression::{
    shrink_until, CompressedImage, CompressionError, ImageKind, ShrinkOutcome,
};
#[cfg(feature = "image")]
pub use compression::Compressor;
