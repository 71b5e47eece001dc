use std::future::Future;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::Endpoints;
use crate::config::Config;

/// Where a cited video is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Third-party player URL (e.g. Vimeo).
    Remote(String),
    /// Local streaming endpoint.
    Local,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("video classification request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("video classification response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("video classification returned HTTP {0}")]
    Status(u16),
}

/// Decides whether a video document is hosted by a third party.
pub trait VideoClassifier {
    fn classify(
        &self,
        doc_id: &str,
    ) -> impl Future<Output = Result<VideoSource, ClassifyError>> + Send;
}

#[derive(Debug, Deserialize)]
struct VideoCheck {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    vimeo_url: Option<String>,
}

impl VideoCheck {
    fn into_source(self) -> VideoSource {
        match (self.kind.as_deref(), self.vimeo_url) {
            (Some("vimeo"), Some(url)) if !url.is_empty() => VideoSource::Remote(url),
            _ => VideoSource::Local,
        }
    }
}

/// Classifies videos by asking the retrieval endpoint over HTTP.
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpClassifier {
    pub fn new(config: &Config) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoints: config.endpoints(),
        })
    }
}

impl VideoClassifier for HttpClassifier {
    async fn classify(&self, doc_id: &str) -> Result<VideoSource, ClassifyError> {
        let url = self.endpoints.video(doc_id);
        let resp = self.client.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status.as_u16()));
        }

        // Local videos are streamed straight back from the same endpoint.
        let content_type = resp
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("json") {
            debug!(doc_id, content_type = %content_type, "video check returned media, not JSON");
            return Ok(VideoSource::Local);
        }

        let text = resp.text().await?;
        let check: VideoCheck = serde_json::from_str(&text)?;
        Ok(check.into_source())
    }
}
