use {anyhow::Result, async_trait::async_trait};

/// Outbound primitives the dispatch core needs from a connected session.
///
/// Implementations must deliver to the network or return an error; the core
/// handles ordering, throttling, and failure reporting on top.
#[async_trait]
pub trait ChannelOutbound: Send + Sync {
    /// Send a plain text message.
    async fn send_text(&self, to: &str, text: &str) -> Result<()>;

    /// Send an image with a caption.
    async fn send_image(&self, to: &str, image: &[u8], caption: &str) -> Result<()>;

    /// Re-send a previously captured raw message structure verbatim.
    async fn relay(&self, to: &str, template: &serde_json::Value) -> Result<()>;

    /// The session's own JID, when the transport knows it. Used to recognize
    /// the operator's linked devices.
    fn self_jid(&self) -> Option<String> {
        None
    }
}
