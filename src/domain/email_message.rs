use derive_getters::Getters;

/// A fully composed email, ready to hand to the delivery client. The sender
/// address is deployment-fixed and lives on the client, not on the message.
#[derive(Debug, Clone, Getters)]
pub struct EmailMessage {
    recipient: String,
    recipient_name: Option<String>,
    subject: String,
    html_body: String,
}

impl EmailMessage {
    pub fn new(
        recipient: String,
        recipient_name: Option<String>,
        subject: String,
        html_body: String,
    ) -> Self {
        Self {
            recipient,
            recipient_name,
            subject,
            html_body,
        }
    }
}
