//! Composition and dispatch of the registration confirmation email.

use crate::{
    domain::{EmailMessage, RegistrationFields},
    email_client::{DeliveryResult, EmailClient},
};
use askama::Template;
use chrono::Utc;
use std::sync::Arc;
use tracing::Instrument;

pub const CONFIRMATION_SUBJECT: &str = "✅ Event Registration Confirmed - ROBOAUT";

/// Substituted for a blank or missing event label.
pub const DEFAULT_EVENT_LABEL: &str = "General Registration";

#[derive(Template)]
#[template(path = "registration_confirmation.html")]
struct RegistrationConfirmationTemplate<'a> {
    name: &'a str,
    registration_number: &'a str,
    email: &'a str,
    phone: &'a str,
    event: &'a str,
    registration_date: &'a str,
}

/// Render the confirmation email for a registration.
///
/// The template is fixed at build time; the only moving parts are the five
/// participant fields and the date the email is generated on. Fields are
/// interpolated as-is (the template engine HTML-escapes them), with no
/// format validation.
pub fn compose_registration_confirmation(
    fields: &RegistrationFields,
) -> Result<EmailMessage, askama::Error> {
    let registration_date = Utc::now().format("%B %-d, %Y").to_string();
    let html_body = RegistrationConfirmationTemplate {
        name: &fields.participant_name,
        registration_number: &fields.registration_number,
        email: &fields.email,
        phone: &fields.contact,
        event: fields
            .event_label
            .as_deref()
            .filter(|label| !label.is_empty())
            .unwrap_or(DEFAULT_EVENT_LABEL),
        registration_date: &registration_date,
    }
    .render()?;

    Ok(EmailMessage::new(
        fields.email.clone(),
        Some(fields.participant_name.clone()),
        CONFIRMATION_SUBJECT.to_string(),
        html_body,
    ))
}

/// Compose the confirmation and queue its delivery as an independent task.
///
/// The caller only waits for composition; the provider round trip happens in
/// the background so the webhook can be acknowledged immediately and the
/// content source never retries because of an email-provider hiccup. The
/// delivery outcome is logged and goes no further.
pub fn dispatch_registration_confirmation(
    email_client: Arc<EmailClient>,
    fields: RegistrationFields,
) -> Result<(), askama::Error> {
    let message = compose_registration_confirmation(&fields)?;

    tokio::spawn(
        async move {
            match email_client.send_email(&message).await {
                DeliveryResult::Sent { message_id } => {
                    tracing::info!(
                        %message_id,
                        recipient = %message.recipient(),
                        "Registration confirmation delivered"
                    );
                }
                DeliveryResult::Failed { error } => {
                    tracing::error!(
                        %error,
                        recipient = %message.recipient(),
                        "Failed to deliver registration confirmation"
                    );
                }
            }
        }
        .instrument(tracing::info_span!("Deliver registration confirmation")),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{compose_registration_confirmation, CONFIRMATION_SUBJECT, DEFAULT_EVENT_LABEL};
    use crate::domain::RegistrationFields;
    use chrono::Utc;
    use claims::assert_ok;

    fn fields() -> RegistrationFields {
        RegistrationFields {
            participant_name: "Asha Rao".to_string(),
            registration_number: "2021UGCS045".to_string(),
            email: "asha@example.com".to_string(),
            contact: "9876543210".to_string(),
            event_label: Some("RoboCup 2024".to_string()),
        }
    }

    #[test]
    fn composed_email_contains_every_field_verbatim() {
        let message = assert_ok!(compose_registration_confirmation(&fields()));

        let body = message.html_body();
        assert!(body.contains("Asha Rao"));
        assert!(body.contains("2021UGCS045"));
        assert!(body.contains("asha@example.com"));
        assert!(body.contains("9876543210"));
        assert!(body.contains("RoboCup 2024"));
    }

    #[test]
    fn composed_email_carries_the_generation_date() {
        let message = assert_ok!(compose_registration_confirmation(&fields()));

        let today = Utc::now().format("%B %-d, %Y").to_string();
        assert!(message.html_body().contains(&today));
    }

    #[test]
    fn composed_email_is_addressed_to_the_participant() {
        let message = assert_ok!(compose_registration_confirmation(&fields()));

        assert_eq!(message.recipient(), "asha@example.com");
        assert_eq!(message.recipient_name().as_deref(), Some("Asha Rao"));
        assert_eq!(message.subject(), CONFIRMATION_SUBJECT);
    }

    #[test]
    fn missing_event_label_falls_back_to_general_registration() {
        let mut missing = fields();
        missing.event_label = None;

        let message = assert_ok!(compose_registration_confirmation(&missing));
        assert!(message.html_body().contains(DEFAULT_EVENT_LABEL));
    }

    #[test]
    fn empty_event_label_falls_back_to_general_registration() {
        let mut empty = fields();
        empty.event_label = Some(String::new());

        let message = assert_ok!(compose_registration_confirmation(&empty));
        assert!(message.html_body().contains(DEFAULT_EVENT_LABEL));
    }

    #[test]
    fn whitespace_event_label_is_kept_as_is() {
        let mut whitespace = fields();
        whitespace.event_label = Some("  ".to_string());

        let message = assert_ok!(compose_registration_confirmation(&whitespace));
        assert!(!message.html_body().contains(DEFAULT_EVENT_LABEL));
    }

    #[test]
    fn empty_fields_are_interpolated_as_blanks() {
        let empty = RegistrationFields {
            participant_name: String::new(),
            registration_number: String::new(),
            email: String::new(),
            contact: String::new(),
            event_label: None,
        };

        let message = assert_ok!(compose_registration_confirmation(&empty));
        assert!(message.html_body().contains(DEFAULT_EVENT_LABEL));
    }
}
