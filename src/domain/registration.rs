/// The participant fields extracted from a "form entry created" webhook.
///
/// All values arrive as plain strings from the content source; no format
/// validation is applied, and a missing field is carried as an empty string.
/// The event label is the one field with a dedicated fallback, applied at
/// composition time.
#[derive(Debug, Clone)]
pub struct RegistrationFields {
    pub participant_name: String,
    pub registration_number: String,
    pub email: String,
    pub contact: String,
    pub event_label: Option<String>,
}
