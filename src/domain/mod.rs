mod email_address;
mod email_message;
mod registration;

pub use email_address::EmailAddress;
pub use email_message::EmailMessage;
pub use registration::RegistrationFields;
