//! Console transport: prints outbound sends to stdout, so the dispatch core
//! can be exercised end-to-end without a live session. A production
//! deployment swaps this for the real session provider behind the same trait.

use {anyhow::Result, async_trait::async_trait};

use lapak_channels::ChannelOutbound;

pub struct ConsoleOutbound {
    self_jid: Option<String>,
}

impl ConsoleOutbound {
    pub fn new(self_jid: Option<String>) -> Self {
        Self { self_jid }
    }
}

#[async_trait]
impl ChannelOutbound for ConsoleOutbound {
    async fn send_text(&self, to: &str, text: &str) -> Result<()> {
        println!("→ {to}\n{text}\n");
        Ok(())
    }

    async fn send_image(&self, to: &str, image: &[u8], caption: &str) -> Result<()> {
        println!("→ {to} [image, {} bytes]\n{caption}\n", image.len());
        Ok(())
    }

    async fn relay(&self, to: &str, template: &serde_json::Value) -> Result<()> {
        println!("→ {to} [relayed template, {} bytes]\n", template.to_string().len());
        Ok(())
    }

    fn self_jid(&self) -> Option<String> {
        self.self_jid.clone()
    }
}
