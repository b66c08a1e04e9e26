use crate::transform::{
    ImageOps, PixelOps, TintFactors, TransformError, TransformKind, TransformedImage,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Maps transform identifiers to pixel operations and applies them
///
/// The identifier map is built once in [`TransformService::new`] and is
/// read-only afterwards, so a service can be shared freely across threads.
pub struct TransformService {
    ops: Arc<dyn PixelOps>,
    transforms: HashMap<String, TransformKind>,
    tint: TintFactors,
}

impl TransformService {
    /// Creates a service with the built-in transforms backed by `ops`
    pub fn new(ops: Arc<dyn PixelOps>, tint: TintFactors) -> Self {
        let transforms = TransformKind::BUILT_IN
            .into_iter()
            .map(|kind| (kind.id().to_string(), kind))
            .collect();

        Self {
            ops,
            transforms,
            tint,
        }
    }

    /// Creates a service whose transforms run on the `image` crate
    pub fn with_image_ops(tint: TintFactors) -> Self {
        Self::new(Arc::new(ImageOps), tint)
    }

    /// Number of registered transforms
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn supports(&self, transform_id: &str) -> bool {
        self.transforms.contains_key(transform_id)
    }

    /// Registered identifiers, sorted
    pub fn transform_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Applies the transform named `transform_id` to `bytes`
    ///
    /// An unknown identifier is an error. A pixel operation that fails
    /// yields a [`TransformedImage`] with empty bytes.
    pub fn apply_transform(
        &self,
        image_name: &str,
        transform_id: &str,
        bytes: &[u8],
    ) -> Result<TransformedImage, TransformError> {
        let kind = self
            .transforms
            .get(transform_id)
            .ok_or_else(|| TransformError::UnknownTransform(transform_id.to_string()))?;

        let output = match kind {
            TransformKind::Grayscale => self.ops.grayscale(bytes),
            TransformKind::Sepia => self.ops.sepia(bytes),
            TransformKind::Tint => self.ops.tint(bytes, self.tint),
        };

        let bytes = output.unwrap_or_else(|e| {
            tracing::warn!("Transform {} failed for {}: {}", transform_id, image_name, e);
            Vec::new()
        });

        Ok(TransformedImage {
            image_name: image_name.to_string(),
            transform_name: transform_id.to_string(),
            bytes,
        })
    }
}

impl std::fmt::Debug for TransformService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformService")
            .field("transforms", &self.transform_ids())
            .field("tint", &self.tint)
            .finish()
    }
}
