//! Image transforms and their dispatch
//!
//! This module contains:
//! - The built-in transform identifiers and [`TransformedImage`] results
//! - Pixel operations backed by the `image` crate
//! - [`TransformService`], which maps identifiers to operations
//! - [`LocalTransformer`], the pipeline's in-process transform stage

mod local;
mod ops;
mod service;

pub use local::LocalTransformer;
pub use ops::{ImageOps, PixelOps, TintFactors};
pub use service::TransformService;

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while dispatching or applying transforms
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Unknown transform '{0}'")]
    UnknownTransform(String),

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Transform worker failed: {0}")]
    Worker(String),
}

/// The built-in transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Grayscale,
    Sepia,
    Tint,
}

impl TransformKind {
    pub const BUILT_IN: [TransformKind; 3] = [Self::Grayscale, Self::Sepia, Self::Tint];

    /// The identifier used in configuration and output paths
    pub fn id(&self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Sepia => "sepia",
            Self::Tint => "tint",
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TransformKind {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::BUILT_IN
            .into_iter()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| TransformError::UnknownTransform(s.to_string()))
    }
}

/// The output of applying one transform to one image
///
/// `bytes` is empty when the transform failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedImage {
    pub image_name: String,
    pub transform_name: String,
    pub bytes: Vec<u8>,
}

impl TransformedImage {
    pub fn succeeded(&self) -> bool {
        !self.bytes.is_empty()
    }
}
