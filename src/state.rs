use crate::email_client::EmailClient;
use axum::extract::FromRef;
use derive_getters::Getters;
use std::sync::Arc;

/// Shared state for the application. The email client is the only shared
/// resource; it is read-only for the lifetime of the process.
#[derive(Debug, Clone, Getters)]
pub struct AppState {
    email_client: Arc<EmailClient>,
}

impl AppState {
    pub fn create(email_client: EmailClient) -> Self {
        Self {
            email_client: Arc::new(email_client),
        }
    }
}

impl FromRef<AppState> for Arc<EmailClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.email_client.clone()
    }
}
