/// A single message to dispatch.
///
/// Every field is sent verbatim; Esendex performs the validation. Fields left at
/// their default are still serialized (as an empty element or `0`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutboundMessage {
    /// Recipient phone number (`to`).
    pub to: String,
    /// Message type tag, e.g. `SMS` or `Voice` (`type`).
    pub message_type: String,
    /// Language tag used for voice messages, e.g. `en-GB` (`lang`).
    pub lang: String,
    /// Expiry window in hours (`validity`).
    pub validity: i32,
    /// Character set, e.g. `GSM` or `Unicode` (`characterset`).
    pub character_set: String,
    /// Number of delivery attempts for voice messages (`retries`).
    pub retries: i32,
    /// Message text (`body`).
    pub body: String,
}

impl OutboundMessage {
    pub fn new(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            body: body.into(),
            ..Default::default()
        }
    }
}
