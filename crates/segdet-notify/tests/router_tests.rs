//! Router tests over the in-memory store.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use segdet_models::{Clock, ContinuationToken, FixedClock, JobId, ServiceKind, WorkflowStep};
use segdet_notify::{create_router, AppState, NotifyConfig};
use segdet_status::{CorrelatorContext, ResumeError, ResumeResult, WorkflowResumer};
use segdet_store::InMemoryStore;

#[derive(Default)]
struct RecordingResumer {
    calls: Mutex<Vec<(String, bool)>>,
    unavailable: bool,
}

#[async_trait]
impl WorkflowResumer for RecordingResumer {
    async fn resume_success(&self, token: &ContinuationToken, _output: &Value) -> ResumeResult<()> {
        self.calls.lock().unwrap().push((token.as_str().to_string(), true));
        if self.unavailable {
            return Err(ResumeError::Rejected {
                status: 503,
                message: "orchestrator unavailable".into(),
            });
        }
        Ok(())
    }

    async fn resume_failure(
        &self,
        token: &ContinuationToken,
        _error_kind: &str,
        _message: &str,
    ) -> ResumeResult<()> {
        self.calls.lock().unwrap().push((token.as_str().to_string(), false));
        Ok(())
    }
}

struct Harness {
    app: Router,
    context: CorrelatorContext,
    resumer: Arc<RecordingResumer>,
}

fn harness() -> Harness {
    harness_with(RecordingResumer::default(), "development")
}

fn harness_with(resumer: RecordingResumer, environment: &str) -> Harness {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
    ));
    let store = Arc::new(InMemoryStore::with_clock(Duration::from_secs(3600), clock.clone()));
    let resumer = Arc::new(resumer);
    let context = CorrelatorContext::from_parts(store, resumer.clone(), clock);
    let config = NotifyConfig {
        max_body_size: 4 * 1024,
        environment: environment.to_string(),
        ..NotifyConfig::default()
    };
    let app = create_router(AppState::with_context(config, context.clone()), None);
    Harness {
        app,
        context,
        resumer,
    }
}

async fn post(app: &Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "text/plain")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn sns_body(job_id: &str, status: &str) -> String {
    json!({
        "Type": "Notification",
        "MessageId": "m-1",
        "Message": json!({
            "JobId": job_id,
            "Status": status,
            "API": "StartSegmentDetection",
            "Timestamp": 1714557600000i64
        })
        .to_string()
    })
    .to_string()
}

#[tokio::test]
async fn test_health_and_ready() {
    let h = harness();
    let (status, body) = get(&h.app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&h.app, "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "memory");
    assert_eq!(body["services"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let h = harness();
    let (status, _) = get(&h.app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sns_completion_resumes_workflow() {
    let h = harness();
    let job_id = JobId::from("job-1");
    h.context
        .suspend(
            WorkflowStep::StartSegmentDetection,
            &job_id,
            ContinuationToken::new("tok-1"),
            ServiceKind::VideoAnalysis,
            &json!({"input": {"key": "a.mp4"}, "output": {}}),
        )
        .await
        .unwrap();

    let (status, body) = post(&h.app, "/v1/notifications/sns", sns_body("job-1", "SUCCEEDED")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "resumed");
    assert_eq!(body["jobId"], "job-1");
    assert_eq!(body["success"], true);
    assert_eq!(
        body["snapshot"]["output"]["start-segment-detection"]["status"],
        "completed"
    );
    assert_eq!(*h.resumer.calls.lock().unwrap(), vec![("tok-1".to_string(), true)]);

    // Redelivery finds nothing to resume.
    let (status, body) = post(&h.app, "/v1/notifications/sns", sns_body("job-1", "SUCCEEDED")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "correlation_miss");
    assert_eq!(h.resumer.calls.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_event_progress_keeps_pending_operation() {
    let h = harness();
    let job_id = JobId::from("mc-1");
    h.context
        .suspend(
            WorkflowStep::StartMediaconvert,
            &job_id,
            ContinuationToken::new("tok-2"),
            ServiceKind::Transcode,
            &json!({"output": {}}),
        )
        .await
        .unwrap();

    let body = json!({
        "source": "aws.mediaconvert",
        "detail": {
            "jobId": "mc-1",
            "status": "PROGRESSING",
            "jobProgress": {"jobPercentComplete": 40}
        }
    })
    .to_string();
    let (status, body) = post(&h.app, "/v1/notifications/events", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "pending");
    assert_eq!(body["snapshot"]["output"]["start-mediaconvert"]["progress"], 40);
    assert!(h.resumer.calls.lock().unwrap().is_empty());
    assert!(h.context.store().get(&job_id).await.is_ok());
}

#[tokio::test]
async fn test_unknown_job_is_not_found() {
    let h = harness();
    let (status, body) = post(&h.app, "/v1/notifications/sns", sns_body("job-404", "SUCCEEDED")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].as_str().unwrap().contains("job-404"));
}

#[tokio::test]
async fn test_subscription_confirmation_is_accepted() {
    let h = harness();
    let body = json!({"Type": "SubscriptionConfirmation", "SubscribeURL": "https://example.invalid"});
    let (status, body) = post(&h.app, "/v1/notifications/sns", body.to_string()).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["code"], "ignored");
}

#[tokio::test]
async fn test_malformed_envelope_is_bad_request() {
    let h = harness();
    let (status, _) = post(&h.app, "/v1/notifications/events", "{not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing_job = json!({"detail": {"status": "COMPLETE"}}).to_string();
    let (status, _) = post(&h.app, "/v1/notifications/events", missing_job).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let h = harness();
    let (status, _) = post(&h.app, "/v1/notifications/sns", "x".repeat(8 * 1024)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

async fn suspend_segment_job(h: &Harness, job_id: &str) {
    h.context
        .suspend(
            WorkflowStep::StartSegmentDetection,
            &JobId::from(job_id),
            ContinuationToken::new(format!("tok-{}", job_id)),
            ServiceKind::VideoAnalysis,
            &json!({"output": {}}),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_resume_failure_detail_hidden_in_production() {
    let unavailable = || RecordingResumer {
        unavailable: true,
        ..RecordingResumer::default()
    };

    // Environment names are matched case-insensitively.
    let h = harness_with(unavailable(), "Production");
    suspend_segment_job(&h, "job-9").await;
    let (status, body) = post(&h.app, "/v1/notifications/sns", sns_body("job-9", "SUCCEEDED")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "An internal error occurred");
    assert!(h.context.store().get(&JobId::from("job-9")).await.is_ok());

    let h = harness_with(unavailable(), "development");
    suspend_segment_job(&h, "job-9").await;
    let (status, body) = post(&h.app, "/v1/notifications/sns", sns_body("job-9", "SUCCEEDED")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("orchestrator unavailable"));
}
