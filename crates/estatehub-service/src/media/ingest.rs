//! The image ingestion pipeline.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, warn};

use estatehub_core::traits::ImageHost;
use estatehub_core::{AppError, AppResult};
use estatehub_entity::Patch;
use estatehub_storage::StagedUpload;

use super::inline::{BodyImage, classify, is_valid_base64};

/// Converts staged uploads and body image strings into hosted URLs.
#[derive(Debug, Clone)]
pub struct ImageIngestor {
    host: Arc<dyn ImageHost>,
    inline_threshold: usize,
}

impl ImageIngestor {
    pub fn new(host: Arc<dyn ImageHost>, inline_threshold: usize) -> Self {
        Self {
            host,
            inline_threshold,
        }
    }

    /// Image URLs for a new listing: uploads first, then body images.
    pub async fn ingest(&self, staged: &[StagedUpload], body: Vec<String>) -> AppResult<Vec<String>> {
        let mut urls = self.upload_staged(staged).await?;
        urls.extend(self.resolve_body_images(body).await);
        Ok(urls)
    }

    /// The image change for an update.
    ///
    /// Absent body images keep the stored set unless files were uploaded,
    /// in which case the uploads replace it. An explicit empty array clears
    /// the set.
    pub async fn ingest_patch(
        &self,
        staged: &[StagedUpload],
        body: Patch<Vec<String>>,
    ) -> AppResult<Patch<Vec<String>>> {
        let uploaded = self.upload_staged(staged).await?;
        Ok(match body {
            Patch::Unchanged if uploaded.is_empty() => Patch::Unchanged,
            Patch::Unchanged | Patch::Clear => Patch::Set(uploaded),
            Patch::Set(images) => {
                let mut urls = uploaded;
                urls.extend(self.resolve_body_images(images).await);
                Patch::Set(urls)
            }
        })
    }

    /// Push every staged file to the host concurrently.
    ///
    /// Each file is discarded after its attempt. Any failure fails the
    /// whole batch.
    pub async fn upload_staged(&self, staged: &[StagedUpload]) -> AppResult<Vec<String>> {
        if staged.is_empty() {
            return Ok(Vec::new());
        }

        let attempts = staged.iter().map(|upload| async move {
            let result = self.upload_one(upload).await;
            upload.discard().await;
            result
        });
        let results = join_all(attempts).await;

        let mut urls = Vec::with_capacity(results.len());
        for (upload, result) in staged.iter().zip(results) {
            match result {
                Ok(url) => urls.push(url),
                Err(e) => {
                    error!(
                        file = %upload.file_name,
                        provider = self.host.provider_name(),
                        "Image upload failed: {}",
                        e
                    );
                    return Err(AppError::image_upload(format!(
                        "Failed to upload image '{}': {}",
                        upload.file_name, e.message
                    )));
                }
            }
        }

        debug!(count = urls.len(), "Uploaded staged images");
        Ok(urls)
    }

    /// Resolve body images in order, uploading inline data concurrently.
    /// Inline data that cannot be hosted is logged and dropped.
    pub async fn resolve_body_images(&self, images: Vec<String>) -> Vec<String> {
        let attempts = images.iter().map(|image| async move {
            match classify(image, self.inline_threshold) {
                BodyImage::Hosted(_) => Some(image.clone()),
                BodyImage::Inline(payload) => self.upload_inline(payload).await,
            }
        });
        join_all(attempts).await.into_iter().flatten().collect()
    }

    async fn upload_inline(&self, payload: &str) -> Option<String> {
        if !is_valid_base64(payload) {
            warn!("Dropping inline image that is not valid base64");
            return None;
        }
        match self.host.upload_base64(payload, None).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(
                    provider = self.host.provider_name(),
                    "Dropping inline image that failed to upload: {}",
                    e
                );
                None
            }
        }
    }

    async fn upload_one(&self, upload: &StagedUpload) -> AppResult<String> {
        let encoded = upload.read_base64().await?;
        self.host.upload_base64(&encoded, upload.stem()).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;

    use estatehub_storage::UploadStaging;

    /// Hands out sequential URLs; fails for names containing "broken".
    #[derive(Debug, Default)]
    pub(crate) struct FakeHost {
        pub uploads: AtomicUsize,
    }

    #[async_trait]
    impl ImageHost for FakeHost {
        fn provider_name(&self) -> &str {
            "fake"
        }

        async fn upload_base64(&self, _encoded: &str, name: Option<&str>) -> AppResult<String> {
            if name.is_some_and(|n| n.contains("broken")) {
                return Err(AppError::image_upload("host rejected image"));
            }
            let n = self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://img.example/{n}.png"))
        }
    }

    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn ingestor() -> (ImageIngestor, Arc<FakeHost>) {
        let host = Arc::new(FakeHost::default());
        (ImageIngestor::new(host.clone(), 100), host)
    }

    #[tokio::test]
    async fn test_body_images_keep_order() {
        let (ingestor, _) = ingestor();
        let urls = ingestor
            .resolve_body_images(vec![
                "https://cdn.example/a.jpg".into(),
                PIXEL.into(),
                "data:image/png;base64,@@@".into(),
            ])
            .await;
        assert_eq!(urls, vec!["https://cdn.example/a.jpg", "https://img.example/0.png"]);
    }

    /// Counts how many uploads are in flight at once.
    #[derive(Debug, Default)]
    struct SlowHost {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        done: AtomicUsize,
    }

    #[async_trait]
    impl ImageHost for SlowHost {
        fn provider_name(&self) -> &str {
            "slow"
        }

        async fn upload_base64(&self, _encoded: &str, _name: Option<&str>) -> AppResult<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            let n = self.done.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://slow.example/{n}.png"))
        }
    }

    #[tokio::test]
    async fn test_inline_images_upload_concurrently() {
        let host = Arc::new(SlowHost::default());
        let ingestor = ImageIngestor::new(host.clone(), 100);

        let urls = ingestor
            .resolve_body_images(vec![
                "data:image/png;base64,aGVsbG8=".into(),
                "https://cdn.example/kept.jpg".into(),
                "data:image/png;base64,aGVsbG8=".into(),
                "data:image/png;base64,aGVsbG8=".into(),
            ])
            .await;

        assert!(host.peak.load(Ordering::SeqCst) > 1);
        assert_eq!(urls.len(), 4);
        assert_eq!(urls[1], "https://cdn.example/kept.jpg");
        let hosted = urls.iter().filter(|u| u.starts_with("https://slow.example/"));
        assert_eq!(hosted.count(), 3);
    }

    #[tokio::test]
    async fn test_uploads_come_first_and_are_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let staging = UploadStaging::new(dir.path()).await.unwrap();
        let staged = vec![
            staging.stage("front.jpg", None, Bytes::from_static(b"jpeg")).await.unwrap(),
        ];
        let (ingestor, _) = ingestor();

        let urls = ingestor
            .ingest(&staged, vec!["https://cdn.example/a.jpg".into()])
            .await
            .unwrap();
        assert_eq!(urls, vec!["https://img.example/0.png", "https://cdn.example/a.jpg"]);
        assert!(!staged[0].path.exists());
    }

    #[tokio::test]
    async fn test_one_failed_upload_fails_batch() {
        let dir = tempfile::tempdir().unwrap();
        let staging = UploadStaging::new(dir.path()).await.unwrap();
        let staged = vec![
            staging.stage("ok.jpg", None, Bytes::from_static(b"a")).await.unwrap(),
            staging.stage("broken.jpg", None, Bytes::from_static(b"b")).await.unwrap(),
        ];
        let (ingestor, _) = ingestor();

        let err = ingestor.upload_staged(&staged).await.unwrap_err();
        assert_eq!(err.kind, estatehub_core::ErrorKind::ImageUploadFailed);
        assert!(staged.iter().all(|s| !s.path.exists()));
    }

    #[tokio::test]
    async fn test_patch_semantics() {
        let (ingestor, _) = ingestor();
        assert_eq!(
            ingestor.ingest_patch(&[], Patch::Unchanged).await.unwrap(),
            Patch::Unchanged
        );
        assert_eq!(
            ingestor.ingest_patch(&[], Patch::Set(vec![])).await.unwrap(),
            Patch::Set(vec![])
        );
    }
}
