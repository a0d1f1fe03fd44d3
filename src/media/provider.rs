//! Cloudinary upload API client
//!
//! Built once at startup from [`MediaConfig`] and shared by handle. Requests
//! are signed with SHA-256 over the sorted parameters followed by the API
//! secret.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::relay::{UploadFile, UploadTarget};
use crate::config::MediaConfig;
use crate::errors::{LinkshelfError, Result};

#[derive(Debug, Clone)]
struct Credentials {
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    http: reqwest::Client,
    api_base_url: String,
    cloud_name: String,
    credentials: Option<Credentials>,
}

impl CloudinaryClient {
    pub fn new(config: &MediaConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upload_timeout_secs))
            .build()?;

        let credentials = config.credentials().map(|(key, secret)| Credentials {
            api_key: key.to_string(),
            api_secret: secret.to_string(),
        });
        if credentials.is_none() {
            warn!("Cloudinary API credentials not configured, uploads are disabled");
        }

        Ok(Self {
            http,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            credentials,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.api_base_url, self.cloud_name, action
        )
    }

    /// Attach `api_key`, `timestamp` and the signature to `params`.
    fn signed_form(&self, creds: &Credentials, mut params: Vec<(&str, String)>) -> Form {
        params.push(("timestamp", chrono::Utc::now().timestamp().to_string()));
        let signature = sign(&params, &creds.api_secret);

        params
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k.to_string(), v))
            .text("api_key", creds.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    pub async fn upload_image(&self, file: UploadFile) -> Result<String> {
        let creds = self.credentials.as_ref().ok_or_else(|| {
            LinkshelfError::provider_unavailable("Cloudinary API credentials are not configured")
        })?;

        debug!(
            "Uploading {} ({} bytes) to Cloudinary",
            file.filename,
            file.data.len()
        );
        let form = self
            .signed_form(creds, Vec::new())
            .part("file", file.into_part()?);

        let response = self
            .http
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = parse_response(response).await?;

        info!("Uploaded image as {}", body.public_id);
        Ok(body.public_id)
    }

    /// Delete an asset. Without credentials this only logs and returns `Ok`.
    pub async fn destroy(&self, public_id: &str) -> Result<()> {
        let Some(creds) = self.credentials.as_ref() else {
            warn!(
                "Cloudinary credentials not configured, skipping destroy of {}",
                public_id
            );
            return Ok(());
        };

        let form = self.signed_form(creds, vec![("public_id", public_id.to_string())]);
        let response = self
            .http
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await?;
        let body: DestroyResponse = parse_response(response).await?;

        match body.result.as_str() {
            "ok" => {
                info!("Destroyed image {}", public_id);
                Ok(())
            }
            "not found" => {
                warn!("Image {} was already gone", public_id);
                Ok(())
            }
            other => Err(LinkshelfError::provider(format!(
                "Unexpected destroy result for {}: {}",
                public_id, other
            ))),
        }
    }
}

#[async_trait]
impl UploadTarget for CloudinaryClient {
    async fn upload(&self, file: UploadFile) -> Result<String> {
        self.upload_image(file).await
    }

    fn is_available(&self) -> bool {
        self.is_configured()
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .map(|b| b.error.message)
        .unwrap_or(text);
    Err(LinkshelfError::provider(format!(
        "Cloudinary returned {}: {}",
        status, message
    )))
}

/// `sha256("k1=v1&k2=v2" + secret)` with keys sorted, hex encoded
pub(crate) fn sign(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}
