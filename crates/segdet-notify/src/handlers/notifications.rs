//! Notification intake handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;

use segdet_status::{DispatchOutcome, EventBridgeTransport, NotificationTransport, SnsTransport};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// SNS HTTP delivery.
///
/// `SubscriptionConfirmation` and `UnsubscribeConfirmation` messages are
/// answered 202 without visiting `SubscribeURL`. Subscriptions must be
/// confirmed out of band (console, CLI or the infrastructure template)
/// before notifications are delivered here.
pub async fn sns_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<DispatchOutcome>> {
    dispatch(&state, &SnsTransport, &body).await
}

/// EventBridge API destination delivery.
pub async fn event_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<DispatchOutcome>> {
    dispatch(&state, &EventBridgeTransport, &body).await
}

async fn dispatch(
    state: &AppState,
    transport: &dyn NotificationTransport,
    body: &[u8],
) -> ApiResult<Json<DispatchOutcome>> {
    let outcome = state
        .context
        .dispatcher()
        .handle(transport, body)
        .await
        .map_err(|e| ApiError::from(e).redact(state.config.is_production()))?;
    Ok(Json(outcome))
}
