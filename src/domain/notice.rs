//! Outbound text shapes written to clients.

use super::ConnectionId;

/// Sent back to the sender when a direct message's recipient is not live.
pub const RECIPIENT_OFFLINE: &str =
    "System message: the recipient is offline or the channel id is invalid";

/// `"{display_name}: {body}"`, used for direct deliveries, their echo, and
/// broadcasts.
#[must_use]
pub fn chat_line(display_name: &str, body: &str) -> String {
    format!("{display_name}: {body}")
}

/// Greeting written to a connection right after it registers.
#[must_use]
pub fn welcome(display_name: &str, id: &ConnectionId) -> String {
    format!("{display_name} is online (channel id: {id})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_line_prefixes_display_name() {
        assert_eq!(chat_line("Alice", "hi"), "Alice: hi");
    }

    #[test]
    fn welcome_mentions_channel_id() {
        let text = welcome("Bob", &ConnectionId::from("42"));
        assert_eq!(text, "Bob is online (channel id: 42)");
    }
}
