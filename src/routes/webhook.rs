//! Receiver for content-lifecycle webhooks from the CMS.
//!
//! The content source fires a `POST` at this route for every entry
//! lifecycle event. Only a created `form` entry triggers the confirmation
//! email; everything else, unparsable bodies included, is acknowledged and
//! dropped so the CMS never retries deliveries it considers successful.

use crate::{domain::RegistrationFields, email_client::EmailClient, notification, state::AppState};
use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use http::StatusCode;
use std::{error::Error, sync::Arc};

const FORM_MODEL: &str = "form";
const ENTRY_CREATED_EVENT: &str = "entry.create";

/// Create a router to serve endpoints.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/", post(receive_event))
}

/// The shape of the content source's webhook payload. Every part is
/// defaultable so payloads for other content models still deserialize and
/// can be matched against the expected sentinel values.
#[derive(Debug, serde::Deserialize)]
struct InboundEvent {
    #[serde(default)]
    model: String,
    #[serde(default)]
    event: String,
    #[serde(default)]
    entry: serde_json::Value,
}

impl InboundEvent {
    fn is_registration_created(&self) -> bool {
        self.model == FORM_MODEL && self.event == ENTRY_CREATED_EVENT
    }

    /// Pull the participant fields out of the entry. Missing or non-string
    /// fields become empty strings; only the event label keeps its absence.
    fn registration_fields(&self) -> RegistrationFields {
        let text = |key: &str| {
            self.entry
                .get(key)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_owned()
        };

        RegistrationFields {
            participant_name: text("ParticipantName"),
            registration_number: text("RegistrationNumber"),
            email: text("Email"),
            contact: text("Contact"),
            event_label: self
                .entry
                .get("event")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned),
        }
    }
}

/// Receive a content-lifecycle event from the content source.
#[tracing::instrument(name = "Receive content event", skip_all)]
#[utoipa::path(
    post,
    path = "/api/data",
    responses(
        (status = OK, description = "Event received; a matching registration entry queues a confirmation email"),
        (status = INTERNAL_SERVER_ERROR, description = "The notification could not be composed")
    )
)]
pub(crate) async fn receive_event(
    State(email_client): State<Arc<EmailClient>>,
    body: Bytes,
) -> Result<Response, WebhookError> {
    match serde_json::from_slice::<InboundEvent>(&body) {
        Ok(event) if event.is_registration_created() => {
            let fields = event.registration_fields();
            tracing::info!(
                participant = %fields.participant_name,
                registration_number = %fields.registration_number,
                event_label = ?fields.event_label,
                "New registration entry received"
            );
            notification::dispatch_registration_confirmation(email_client, fields)?;
        }
        Ok(event) => {
            tracing::debug!(
                model = %event.model,
                event = %event.event,
                "Ignoring non-matching content event"
            );
        }
        Err(error) => {
            tracing::debug!(%error, "Ignoring webhook body that could not be parsed");
        }
    }

    Ok(acknowledge())
}

/// The fixed acknowledgment the content source receives for every delivery,
/// whether or not a notification was triggered.
fn acknowledge() -> Response {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "POST request received and logged successfully",
        })),
    )
        .into_response()
}

/// Represent the errors that can happen while handling a webhook delivery.
#[derive(thiserror::Error)]
pub enum WebhookError {
    #[error("Failed to render the registration confirmation email")]
    ComposeFailed(#[from] askama::Error),
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        tracing::error!("{:?}", self);
        let details = self
            .source()
            .map(|source| source.to_string())
            .unwrap_or_else(|| self.to_string());

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "success": false,
                "error": "Failed to process POST request",
                "details": details,
            })),
        )
            .into_response()
    }
}
