//! Shared message types exchanged between the transport and the dispatch core.

use serde::{Deserialize, Serialize};

pub use crate::jid::ChatType;

/// One inbound message event, as delivered by the session provider.
///
/// `raw` carries the untouched message payload so owner commands can capture
/// rich structures (e.g. a quoted product catalog) the core otherwise treats
/// as opaque.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundMessage {
    /// JID of the chat the message arrived in.
    pub chat: String,
    /// Sender inside a group chat, if any.
    pub participant: Option<String>,
    /// True when the message was sent from the bot's own session.
    pub from_me: bool,
    /// Extracted message text; empty when the message carries none.
    pub text: String,
    /// JID of the sender of the quoted message, when this is a reply.
    pub quoted_sender: Option<String>,
    /// Raw message payload as received from the network.
    pub raw: serde_json::Value,
}

impl InboundMessage {
    /// Convenience constructor for a plain text message.
    #[must_use]
    pub fn text(chat: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat: chat.into(),
            text: text.into(),
            ..Self::default()
        }
    }
}
