use std::fmt::Display;

use validator::validate_email;

/// Represents a valid email address. Used for addresses the service itself
/// is configured with; recipient addresses arriving over the webhook are
/// passed through as-is.
#[derive(Debug, Clone)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(s: String) -> Result<Self, String> {
        if validate_email(&s) {
            Ok(Self(s))
        } else {
            Err(format!("{s} is not a valid email address."))
        }
    }
}

impl Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::EmailAddress;
    use claims::assert_err;
    use fake::{faker::internet::en::SafeEmail, Fake};
    use proptest::prelude::*;
    use rstest::*;

    #[rstest]
    #[case("")]
    #[case(" ")]
    fn blank_string_is_rejected(#[case] email: String) {
        assert_err!(EmailAddress::parse(email));
    }

    #[test]
    fn email_missing_at_symbol_is_rejected() {
        let email = "registration.roboaut.in".to_string();
        assert_err!(EmailAddress::parse(email));
    }

    #[test]
    fn email_missing_subject_is_rejected() {
        let email = "@roboaut.in".to_string();
        assert_err!(EmailAddress::parse(email));
    }

    #[derive(Debug, Clone)]
    struct ValidEmailFixture(pub String);

    fn email() -> impl Strategy<Value = ValidEmailFixture> {
        any::<u32>().prop_map(|_| ValidEmailFixture(SafeEmail().fake()))
    }

    proptest! {
        #[test]
        fn valid_emails_are_parsed_successfully(valid_email in email()) {
            claims::assert_ok!(EmailAddress::parse(valid_email.0));
        }
    }
}
