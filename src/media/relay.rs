//! Batch upload relay
//!
//! Files go out concurrently through an [`UploadTarget`], at most
//! `max_concurrent_uploads` at a time, each under its own timeout. Results
//! come back in input order. The batch is all-or-nothing: one failure and
//! the caller gets no identifiers. Files uploaded before the failure stay
//! uploaded.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::{self, StreamExt};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::MediaConfig;
use crate::errors::{LinkshelfError, Result};

/// One file as received from the client
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub(crate) fn into_part(self) -> Result<Part> {
        let part = Part::bytes(self.data.to_vec()).file_name(self.filename);
        match self.content_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| LinkshelfError::validation(format!("Invalid content type: {}", e))),
            None => Ok(part),
        }
    }
}

/// Something that turns a file into an opaque image identifier
#[async_trait]
pub trait UploadTarget: Send + Sync {
    async fn upload(&self, file: UploadFile) -> Result<String>;

    /// `false` when the target can never accept an upload (e.g. missing
    /// credentials)
    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Multiplicity {
    #[default]
    Single,
    Multiple,
}

impl Multiplicity {
    pub fn from_flag(multiple: bool) -> Self {
        if multiple {
            Multiplicity::Multiple
        } else {
            Multiplicity::Single
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub filename: String,
    pub result: std::result::Result<String, String>,
}

/// Per-file status of one batch, in input order
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
    /// Files beyond the cap that were never sent
    pub dropped: usize,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    /// All identifiers, or `UploadFailed` if any file failed
    pub fn into_ids(self) -> Result<Vec<String>> {
        let failed = self.failures().count();
        if failed > 0 {
            return Err(LinkshelfError::upload_failed(format!(
                "{} of {} uploads failed",
                failed,
                self.outcomes.len()
            )));
        }
        Ok(self
            .outcomes
            .into_iter()
            .filter_map(|o| o.result.ok())
            .collect())
    }
}

pub struct UploadRelay {
    target: Arc<dyn UploadTarget>,
    max_files: usize,
    max_concurrent: usize,
    max_file_size: usize,
    timeout: Duration,
}

impl UploadRelay {
    pub fn new(target: Arc<dyn UploadTarget>, config: &MediaConfig) -> Self {
        Self {
            target,
            max_files: config.max_files.max(1),
            max_concurrent: config.max_concurrent_uploads.max(1),
            max_file_size: config.max_file_size,
            timeout: Duration::from_secs(config.upload_timeout_secs),
        }
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn is_available(&self) -> bool {
        self.target.is_available()
    }

    /// Upload every file and report each result.
    pub async fn upload_with_report(&self, mut files: Vec<UploadFile>) -> BatchReport {
        let dropped = files.len().saturating_sub(self.max_files);
        if dropped > 0 {
            warn!(
                "Upload batch exceeds cap of {}, dropping {} file(s)",
                self.max_files, dropped
            );
            files.truncate(self.max_files);
        }

        let timeout = self.timeout;
        // buffered() 保持输入顺序，同时最多 max_concurrent 个请求在途
        let outcomes = stream::iter(files)
            .map(|file| {
                let target = Arc::clone(&self.target);
                async move {
                    let filename = file.filename.clone();
                    let result = match tokio::time::timeout(timeout, target.upload(file)).await {
                        Ok(Ok(id)) => {
                            debug!("Uploaded {} as {}", filename, id);
                            Ok(id)
                        }
                        Ok(Err(e)) => {
                            error!("Upload of {} failed: {}", filename, e);
                            Err(e.format_simple())
                        }
                        Err(_) => {
                            error!("Upload of {} timed out after {:?}", filename, timeout);
                            Err(format!("timed out after {}s", timeout.as_secs()))
                        }
                    };
                    FileOutcome { filename, result }
                }
            })
            .buffered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        BatchReport { outcomes, dropped }
    }

    /// All-or-nothing upload. `Single` returns only the first identifier.
    pub async fn upload(
        &self,
        files: Vec<UploadFile>,
        multiplicity: Multiplicity,
    ) -> Result<Vec<String>> {
        if !self.target.is_available() {
            return Err(LinkshelfError::provider_unavailable(
                "Upload target is not configured",
            ));
        }
        if files.is_empty() {
            return Err(LinkshelfError::validation("No file was provided"));
        }
        // 超出上限的文件会被丢弃，不参与大小检查
        if let Some(big) = files
            .iter()
            .take(self.max_files)
            .find(|f| f.data.len() > self.max_file_size)
        {
            return Err(LinkshelfError::validation(format!(
                "{} exceeds the {} byte limit",
                big.filename, self.max_file_size
            )));
        }

        let report = self.upload_with_report(files).await;
        let total = report.outcomes.len();
        let mut ids = report.into_ids()?;

        if multiplicity == Multiplicity::Single {
            ids.truncate(1);
        }
        info!("Upload batch completed: {} file(s)", total);
        Ok(ids)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    public_id: String,
}

/// Posts each file as multipart field `file` to an upload endpoint that
/// answers `{"publicId": ...}`.
pub struct HttpUploadTarget {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploadTarget {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl UploadTarget for HttpUploadTarget {
    async fn upload(&self, file: UploadFile) -> Result<String> {
        let form = Form::new().part("file", file.into_part()?);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LinkshelfError::provider(format!(
                "Upload endpoint returned {}: {}",
                status, body
            )));
        }

        let body: RelayResponse = response.json().await?;
        Ok(body.public_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Echoes the filename back as the identifier
    struct EchoTarget {
        delay_ms: fn(&str) -> u64,
        fail_on: Option<&'static str>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
    }

    impl EchoTarget {
        fn new() -> Self {
            Self {
                delay_ms: |_| 10,
                fail_on: None,
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl UploadTarget for EchoTarget {
        async fn upload(&self, file: UploadFile) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis((self.delay_ms)(&file.filename))).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on == Some(file.filename.as_str()) {
                return Err(LinkshelfError::provider("rejected"));
            }
            Ok(format!("ids/{}", file.filename))
        }
    }

    fn config(max_files: usize, max_concurrent: usize, timeout_secs: u64) -> MediaConfig {
        MediaConfig {
            cloud_name: "demo".to_string(),
            max_files,
            max_concurrent_uploads: max_concurrent,
            upload_timeout_secs: timeout_secs,
            ..Default::default()
        }
    }

    fn files(names: &[&str]) -> Vec<UploadFile> {
        names
            .iter()
            .map(|n| UploadFile::new(*n, Bytes::from_static(b"img")))
            .collect()
    }

    #[tokio::test]
    async fn test_multiple_preserves_input_order() {
        let mut target = EchoTarget::new();
        // 第一个文件最慢，结果仍按输入顺序返回
        target.delay_ms = |name| if name == "a" { 60 } else { 5 };
        let relay = UploadRelay::new(Arc::new(target), &config(5, 4, 5));

        let ids = relay
            .upload(files(&["a", "b", "c"]), Multiplicity::Multiple)
            .await
            .unwrap();
        assert_eq!(ids, vec!["ids/a", "ids/b", "ids/c"]);
    }

    #[tokio::test]
    async fn test_single_reports_first_only() {
        let relay = UploadRelay::new(Arc::new(EchoTarget::new()), &config(5, 4, 5));
        let ids = relay
            .upload(files(&["a", "b", "c"]), Multiplicity::Single)
            .await
            .unwrap();
        assert_eq!(ids, vec!["ids/a"]);
    }

    #[tokio::test]
    async fn test_one_failure_fails_batch() {
        let mut target = EchoTarget::new();
        target.fail_on = Some("b");
        let relay = UploadRelay::new(Arc::new(target), &config(5, 4, 5));

        let err = relay
            .upload(files(&["a", "b", "c"]), Multiplicity::Multiple)
            .await
            .unwrap_err();
        assert!(matches!(err, LinkshelfError::UploadFailed(_)));
    }

    #[tokio::test]
    async fn test_report_keeps_per_file_status() {
        let mut target = EchoTarget::new();
        target.fail_on = Some("b");
        let relay = UploadRelay::new(Arc::new(target), &config(5, 4, 5));

        let report = relay.upload_with_report(files(&["a", "b"])).await;
        assert!(!report.all_succeeded());
        assert_eq!(report.outcomes[0].result, Ok("ids/a".to_string()));
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.failures().next().unwrap().filename, "b");
    }

    #[tokio::test]
    async fn test_extra_files_are_dropped() {
        let target = Arc::new(EchoTarget::new());
        let relay = UploadRelay::new(target.clone(), &config(2, 4, 5));

        let report = relay.upload_with_report(files(&["a", "b", "c", "d"])).await;
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.dropped, 2);
        assert_eq!(target.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let target = Arc::new(EchoTarget::new());
        let relay = UploadRelay::new(target.clone(), &config(5, 2, 5));

        relay
            .upload(files(&["a", "b", "c", "d", "e"]), Multiplicity::Multiple)
            .await
            .unwrap();
        assert!(target.peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(target.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_slow_upload_times_out() {
        let mut target = EchoTarget::new();
        target.delay_ms = |name| if name == "slow" { 3_000 } else { 5 };
        let relay = UploadRelay::new(Arc::new(target), &config(5, 4, 1));

        let report = relay.upload_with_report(files(&["fast", "slow"])).await;
        assert!(report.outcomes[0].result.is_ok());
        assert!(report.outcomes[1].result.as_ref().unwrap_err().contains("timed out"));
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected_before_sending() {
        let target = Arc::new(EchoTarget::new());
        let mut cfg = config(5, 4, 5);
        cfg.max_file_size = 2;
        let relay = UploadRelay::new(target.clone(), &cfg);

        let err = relay
            .upload(files(&["a"]), Multiplicity::Single)
            .await
            .unwrap_err();
        assert!(matches!(err, LinkshelfError::Validation(_)));
        assert_eq!(target.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_oversized_file_beyond_cap_is_dropped() {
        let target = Arc::new(EchoTarget::new());
        let mut cfg = config(2, 4, 5);
        cfg.max_file_size = 4;
        let relay = UploadRelay::new(target.clone(), &cfg);

        let batch = vec![
            UploadFile::new("a", Bytes::from_static(b"ok")),
            UploadFile::new("b", Bytes::from_static(b"ok")),
            UploadFile::new("c", Bytes::from_static(b"way too large")),
        ];
        let ids = relay.upload(batch, Multiplicity::Multiple).await.unwrap();
        assert_eq!(ids, vec!["ids/a", "ids/b"]);
        assert_eq!(target.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unavailable_target() {
        struct Offline;

        #[async_trait]
        impl UploadTarget for Offline {
            async fn upload(&self, _file: UploadFile) -> Result<String> {
                unreachable!("offline target must not be called")
            }

            fn is_available(&self) -> bool {
                false
            }
        }

        let relay = UploadRelay::new(Arc::new(Offline), &config(5, 4, 5));
        assert!(!relay.is_available());
        let err = relay
            .upload(files(&["a"]), Multiplicity::Single)
            .await
            .unwrap_err();
        assert!(matches!(err, LinkshelfError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_empty_batch_is_rejected() {
        let relay = UploadRelay::new(Arc::new(EchoTarget::new()), &config(5, 4, 5));
        let err = relay.upload(Vec::new(), Multiplicity::Multiple).await.unwrap_err();
        assert!(matches!(err, LinkshelfError::Validation(_)));
    }
}
