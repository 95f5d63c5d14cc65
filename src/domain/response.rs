/// Outcome of a dispatched batch.
///
/// `messages` follows the order of the `messageheader` elements in the response,
/// which Esendex returns in submission order. Nothing correlates an entry back to
/// its [`OutboundMessage`](crate::OutboundMessage) other than that position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchResult {
    pub batch_id: String,
    pub messages: Vec<MessageResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageResult {
    pub uri: String,
    pub id: String,
}
