use crate::pipeline::{ImageTransformer, RawImage};
use crate::transform::{TransformError, TransformService, TransformedImage};
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// In-process transform stage of the image pipeline
///
/// Every configured transform runs on the blocking thread pool. When an
/// output directory is set, successful outputs are written to
/// `<output>/<transform>/<image>.png`.
#[derive(Debug, Clone)]
pub struct LocalTransformer {
    service: Arc<TransformService>,
    transforms: Vec<String>,
    output_dir: Option<PathBuf>,
}

impl LocalTransformer {
    /// Fails if any of `transforms` is not registered with `service`
    pub fn new(
        service: Arc<TransformService>,
        transforms: Vec<String>,
    ) -> Result<Self, TransformError> {
        if let Some(unknown) = transforms.iter().find(|id| !service.supports(id)) {
            return Err(TransformError::UnknownTransform(unknown.clone()));
        }

        Ok(Self {
            service,
            transforms,
            output_dir: None,
        })
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    pub fn transforms(&self) -> &[String] {
        &self.transforms
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Applies every configured transform, in configuration order
    ///
    /// Transforms that panic or error are dropped from the result.
    pub async fn apply_all(&self, image: &RawImage) -> Vec<TransformedImage> {
        let bytes = Arc::new(image.bytes.clone());

        let tasks = self.transforms.iter().map(|transform_id| {
            let service = Arc::clone(&self.service);
            let bytes = Arc::clone(&bytes);
            let image_name = image.name.clone();
            let transform_id = transform_id.clone();
            tokio::task::spawn_blocking(move || {
                service.apply_transform(&image_name, &transform_id, &bytes)
            })
        });

        join_all(tasks)
            .await
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(Ok(transformed)) => Some(transformed),
                Ok(Err(e)) => {
                    tracing::warn!("Transform of {} rejected: {}", image.uri, e);
                    None
                }
                Err(e) => {
                    tracing::warn!("Transform worker for {} failed: {}", image.uri, e);
                    None
                }
            })
            .collect()
    }

    async fn write_output(
        &self,
        dir: &Path,
        image: &RawImage,
        transformed: &TransformedImage,
    ) -> std::io::Result<PathBuf> {
        let transform_dir = dir.join(&transformed.transform_name);
        tokio::fs::create_dir_all(&transform_dir).await?;

        let path = transform_dir.join(image.output_file_name());
        tokio::fs::write(&path, &transformed.bytes).await?;
        Ok(path)
    }
}

#[async_trait]
impl ImageTransformer for LocalTransformer {
    async fn transform_image(&self, image: &RawImage) -> usize {
        let mut produced = 0;

        for transformed in self.apply_all(image).await {
            if !transformed.succeeded() {
                continue;
            }

            if let Some(dir) = &self.output_dir {
                match self.write_output(dir, image, &transformed).await {
                    Ok(path) => tracing::trace!("Wrote {}", path.display()),
                    Err(e) => {
                        tracing::warn!(
                            "Failed to write {} output for {}: {}",
                            transformed.transform_name,
                            image.uri,
                            e
                        );
                        continue;
                    }
                }
            }

            produced += 1;
        }

        produced
    }
}
