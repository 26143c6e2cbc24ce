//! Control frames sent to the feed broker.

use serde::Serialize;

/// Subscription request sent right after the socket opens.
///
/// Consumers sharing a `group_id` split the topic between them, so each order
/// is delivered to one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscribeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub topic: String,
    pub group_id: String,
}

impl SubscribeMessage {
    #[must_use]
    pub fn new(topic: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            msg_type: "subscribe".into(),
            topic: topic.into(),
            group_id: group_id.into(),
        }
    }
}
