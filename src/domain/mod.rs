//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::OutboundMessage;
pub use response::{DispatchResult, MessageResult};
pub use validation::ValidationError;
pub use value::{AccountReference, Password, Username};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_reference_rejects_empty() {
        assert!(matches!(
            AccountReference::new("   "),
            Err(ValidationError::Empty {
                field: AccountReference::FIELD
            })
        ));
    }

    #[test]
    fn password_rejects_empty() {
        assert!(matches!(
            Password::new(""),
            Err(ValidationError::Empty {
                field: Password::FIELD
            })
        ));
    }

    #[test]
    fn outbound_message_new_leaves_other_fields_default() {
        let message = OutboundMessage::new("447700900123", "hello");
        assert_eq!(message.to, "447700900123");
        assert_eq!(message.body, "hello");
        assert_eq!(message.message_type, "");
        assert_eq!(message.lang, "");
        assert_eq!(message.character_set, "");
        assert_eq!(message.validity, 0);
        assert_eq!(message.retries, 0);
    }
}
