//! Paginated segment detection results.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::client::SignedRequestClient;
use crate::error::{SigningError, SigningResult};
use crate::service::ServiceEndpoint;

/// Extra pages fetched per batch after the first.
pub const MAX_PAGES_PER_BATCH: usize = 10;

const GET_SEGMENT_DETECTION: &str = "GetSegmentDetection";

/// One batch of accumulated `GetSegmentDetection` pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SegmentDetectionResults {
    pub segments: Vec<Value>,
    /// Metadata from the last page read.
    #[serde(default)]
    pub video_metadata: Value,
    #[serde(default)]
    pub audio_metadata: Value,
    #[serde(default)]
    pub selected_segment_types: Value,
    /// Continuation for the next batch; `None` when exhausted.
    #[serde(default, skip_serializing)]
    pub next_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SegmentDetectionPage {
    #[serde(default)]
    segments: Vec<Value>,
    #[serde(default)]
    video_metadata: Value,
    #[serde(default)]
    audio_metadata: Value,
    #[serde(default)]
    selected_segment_types: Value,
    #[serde(default)]
    next_token: Option<String>,
}

/// Reads segment detection results over the signed client.
#[derive(Clone)]
pub struct SegmentDetectionReader {
    client: SignedRequestClient,
}

impl SegmentDetectionReader {
    pub fn new(client: SignedRequestClient) -> Self {
        Self { client }
    }

    /// Read one batch starting at `next_token`.
    ///
    /// Follows `NextToken` for at most [`MAX_PAGES_PER_BATCH`] extra pages so a
    /// single call stays bounded.
    pub async fn read_batch(
        &self,
        job_id: &str,
        next_token: Option<&str>,
    ) -> SigningResult<SegmentDetectionResults> {
        let mut results = SegmentDetectionResults::default();
        let mut token = next_token.map(str::to_string);
        let mut pages = 0;

        loop {
            let page = self.read_page(job_id, token.as_deref()).await?;
            results.segments.extend(page.segments);
            results.video_metadata = page.video_metadata;
            results.audio_metadata = page.audio_metadata;
            results.selected_segment_types = page.selected_segment_types;
            token = page.next_token.filter(|t| !t.is_empty());

            if token.is_none() || pages >= MAX_PAGES_PER_BATCH {
                break;
            }
            pages += 1;
        }

        debug!(
            job_id = %job_id,
            segments = results.segments.len(),
            more = token.is_some(),
            "Read segment detection batch"
        );
        results.next_token = token;
        Ok(results)
    }

    /// Read every batch until the results are exhausted.
    pub async fn read_all(&self, job_id: &str) -> SigningResult<Vec<SegmentDetectionResults>> {
        let mut batches = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let batch = self.read_batch(job_id, token.as_deref()).await?;
            token = batch.next_token.clone();
            batches.push(batch);
            if token.is_none() {
                return Ok(batches);
            }
        }
    }

    async fn read_page(
        &self,
        job_id: &str,
        next_token: Option<&str>,
    ) -> SigningResult<SegmentDetectionPage> {
        let mut payload = json!({ "JobId": job_id });
        if let Some(token) = next_token {
            payload["NextToken"] = Value::String(token.to_string());
        }
        let response = self
            .client
            .send(&ServiceEndpoint::REKOGNITION, GET_SEGMENT_DETECTION, &payload)
            .await?;
        serde_json::from_value(response).map_err(|e| {
            SigningError::InvalidResponse(format!("{} {}: {}", job_id, GET_SEGMENT_DETECTION, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SigningConfig;
    use crate::credentials::Credentials;
    use wiremock::matchers::{body_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn reader_for(uri: &str) -> SegmentDetectionReader {
        let creds = Credentials::new("AKID", "secret", None).unwrap();
        let config = SigningConfig::new(creds, "us-east-1")
            .unwrap()
            .with_endpoint_override(uri)
            .unwrap();
        SegmentDetectionReader::new(SignedRequestClient::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_read_batch_follows_next_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!({"JobId": "job-1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "JobStatus": "SUCCEEDED",
                "Segments": [{"Type": "SHOT"}],
                "VideoMetadata": [{"FrameRate": 24.0}],
                "NextToken": "page-2"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(json!({"JobId": "job-1", "NextToken": "page-2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "JobStatus": "SUCCEEDED",
                "Segments": [{"Type": "TECHNICAL_CUE"}, {"Type": "SHOT"}],
                "VideoMetadata": [{"FrameRate": 25.0}],
                "AudioMetadata": [{"Codec": "aac"}],
                "SelectedSegmentTypes": [{"Type": "SHOT"}]
            })))
            .mount(&server)
            .await;

        let reader = reader_for(&server.uri());
        let batches = reader.read_all("job-1").await.unwrap();
        assert_eq!(batches.len(), 1);

        let batch = &batches[0];
        assert_eq!(batch.segments.len(), 3);
        assert_eq!(batch.video_metadata, json!([{"FrameRate": 25.0}]));
        assert_eq!(batch.audio_metadata, json!([{"Codec": "aac"}]));
        assert_eq!(batch.next_token, None);
    }

    #[tokio::test]
    async fn test_read_batch_is_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Segments": [{"Type": "SHOT"}],
                "NextToken": "again"
            })))
            .expect((MAX_PAGES_PER_BATCH + 1) as u64)
            .mount(&server)
            .await;

        let reader = reader_for(&server.uri());
        let batch = reader.read_batch("job-1", None).await.unwrap();
        assert_eq!(batch.segments.len(), MAX_PAGES_PER_BATCH + 1);
        assert_eq!(batch.next_token.as_deref(), Some("again"));
    }
}
