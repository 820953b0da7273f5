//! The ordered rule chain evaluated for every inbound message.
//!
//! Rules are mutually exclusive: the first match terminates evaluation.
//! Owner commands are checked before the from-self filter because they are
//! typically issued from the bot's own linked device.

use std::{collections::HashSet, sync::Arc};

use {
    anyhow::Result,
    tracing::{error, info},
};

use {
    lapak_catalog::Catalog,
    lapak_channels::ChannelOutbound,
    lapak_common::{
        jid,
        types::{ChatType, InboundMessage},
    },
    lapak_config::LapakConfig,
    lapak_state::{CooldownStore, ExcludeStore, QrisCache},
};

use crate::{
    catalog::handle_catalog,
    outcome::{Dispatched, DropReason, Outcome},
    owner::{self, OwnerCommand},
    product::handle_product,
    qris::{MediaGap, handle_qris},
    queue::SendQueue,
    thanks::handle_thanks,
};

/// Evaluates inbound messages and routes replies through the send queue.
pub struct Dispatcher {
    pub(crate) config: Arc<LapakConfig>,
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) cooldowns: Arc<CooldownStore>,
    pub(crate) excludes: Arc<ExcludeStore>,
    pub(crate) qris: Arc<QrisCache>,
    pub(crate) queue: Arc<SendQueue>,
    pub(crate) outbound: Arc<dyn ChannelOutbound>,
    pub(crate) media_gap: MediaGap,
    // Trigger lists and owner identities, normalized once at startup.
    pub(crate) catalog_triggers: HashSet<String>,
    pub(crate) qris_triggers: HashSet<String>,
    pub(crate) thanks_triggers: Vec<String>,
    pub(crate) owner_jids: Vec<String>,
    pub(crate) owner_numbers: Vec<String>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        config: Arc<LapakConfig>,
        catalog: Arc<Catalog>,
        cooldowns: Arc<CooldownStore>,
        excludes: Arc<ExcludeStore>,
        qris: Arc<QrisCache>,
        queue: Arc<SendQueue>,
        outbound: Arc<dyn ChannelOutbound>,
    ) -> Self {
        let lowered = |words: &[String]| {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect::<Vec<_>>()
        };

        let catalog_triggers = lowered(&config.triggers.catalog).into_iter().collect();
        let qris_triggers = lowered(&config.triggers.qris).into_iter().collect();
        let thanks_triggers = lowered(&config.triggers.thanks);
        let owner_jids = config
            .owners
            .jids
            .iter()
            .map(|j| jid::normalize_jid(j))
            .filter(|j| !j.is_empty())
            .collect();
        let owner_numbers = config
            .owners
            .numbers
            .iter()
            .map(|n| jid::normalize_local_number(n))
            .filter(|n| !n.is_empty())
            .collect();
        let media_gap = MediaGap::new(config.qris.media_gap());

        Self {
            config,
            catalog,
            cooldowns,
            excludes,
            qris,
            queue,
            outbound,
            media_gap,
            catalog_triggers,
            qris_triggers,
            thanks_triggers,
            owner_jids,
            owner_numbers,
        }
    }

    /// Process one inbound message: evaluate the rule chain and emit the
    /// single-line outcome log. Errors are logged here and never propagate;
    /// a malformed message must not take the responder down.
    pub async fn handle(&self, msg: &InboundMessage) {
        let peer = peer_label(&msg.chat);
        let text = msg.text.trim().to_lowercase();
        match self.dispatch(msg).await {
            Ok(dispatched) => log_dispatch(&peer, &text, &dispatched),
            Err(e) => error!(peer = %peer, text = %text, error = %e, "failed to process inbound message"),
        }
    }

    /// Evaluate the rule chain for one message.
    pub async fn dispatch(&self, msg: &InboundMessage) -> Result<Dispatched> {
        let chat = jid::normalize_jid(&msg.chat);
        match jid::classify_jid(&chat) {
            ChatType::Broadcast => return Ok(Dispatched::Dropped(DropReason::Broadcast)),
            ChatType::Group => return Ok(Dispatched::Dropped(DropReason::Group)),
            ChatType::Other if self.config.private_chat_only.0 => {
                return Ok(Dispatched::Dropped(DropReason::NonPrivate));
            },
            ChatType::Personal | ChatType::Other => {},
        }

        let text = msg.text.trim().to_lowercase();

        if let Some(command) = OwnerCommand::parse(&text) {
            return owner::handle_owner(self, msg, &chat, command).await;
        }

        if msg.from_me {
            return Ok(Dispatched::Dropped(DropReason::FromSelf));
        }
        if self.is_excluded(msg) {
            return Ok(Dispatched::Dropped(DropReason::Excluded));
        }
        if text.is_empty() {
            return Ok(Dispatched::Dropped(DropReason::EmptyText));
        }

        if self.catalog_triggers.contains(&text) {
            return Ok(Dispatched::Evaluated(handle_catalog(self, &chat).await?));
        }
        if self.qris_triggers.contains(&text) {
            return Ok(Dispatched::Evaluated(handle_qris(self, &chat).await?));
        }
        if let Some(outcome) = handle_product(self, &chat, &text).await? {
            return Ok(Dispatched::Evaluated(outcome));
        }
        if let Some(outcome) = handle_thanks(self, &chat, &text).await? {
            return Ok(Dispatched::Evaluated(outcome));
        }

        Ok(Dispatched::Evaluated(Outcome::NoMatch))
    }

    /// Queue a plain text send to `to`.
    pub(crate) async fn queue_text(&self, to: &str, text: impl Into<String>) -> Result<()> {
        let outbound = Arc::clone(&self.outbound);
        let to = to.to_string();
        let text = text.into();
        self.queue
            .enqueue(async move { outbound.send_text(&to, &text).await })
            .await
    }

    /// Queue an image send to `to`.
    pub(crate) async fn queue_image(
        &self,
        to: &str,
        image: Arc<Vec<u8>>,
        caption: impl Into<String>,
    ) -> Result<()> {
        let outbound = Arc::clone(&self.outbound);
        let to = to.to_string();
        let caption = caption.into();
        self.queue
            .enqueue(async move { outbound.send_image(&to, &image, &caption).await })
            .await
    }

    /// Queue a verbatim template relay to `to`.
    pub(crate) async fn queue_relay(&self, to: &str, template: serde_json::Value) -> Result<()> {
        let outbound = Arc::clone(&self.outbound);
        let to = to.to_string();
        self.queue
            .enqueue(async move { outbound.relay(&to, &template).await })
            .await
    }

    /// Exclusion lookups test the raw and normalized chat JID plus the
    /// normalized participant, so an entry captured in any form matches.
    fn is_excluded(&self, msg: &InboundMessage) -> bool {
        let raw = msg.chat.trim();
        if self.excludes.contains(raw) || self.excludes.contains(&jid::normalize_jid(raw)) {
            return true;
        }
        msg.participant
            .as_deref()
            .is_some_and(|p| self.excludes.contains(&jid::normalize_jid(p)))
    }
}

fn peer_label(chat: &str) -> String {
    let digits = jid::digits_from_jid(chat);
    if digits.is_empty() {
        chat.trim().to_string()
    } else {
        digits
    }
}

fn log_dispatch(peer: &str, text: &str, dispatched: &Dispatched) {
    match dispatched {
        Dispatched::Dropped(DropReason::Excluded) => {
            info!(peer, text, outcome = "excluded", "inbound message excluded");
        },
        Dispatched::Dropped(_) => {},
        Dispatched::OwnerCommand { command, detail } => {
            info!(peer, text, command = %command, detail = %detail, "owner command");
        },
        Dispatched::Evaluated(Outcome::Sent(rule)) => {
            info!(peer, text, outcome = "sent", rule = %rule, "reply sent");
        },
        Dispatched::Evaluated(Outcome::Suppressed(rule)) => {
            info!(peer, text, outcome = "cooldown", rule = %rule, "reply suppressed by cooldown");
        },
        Dispatched::Evaluated(Outcome::NoMatch) => {
            info!(peer, text, outcome = "no_match", "unrecognized message");
        },
    }
}
