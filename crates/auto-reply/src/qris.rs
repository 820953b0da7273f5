//! QRIS payment-catalog delivery: a global media gap followed by a strictly
//! ordered two-layer fallback chain, with a plain-text apology as the floor.

use std::{
    sync::Mutex,
    time::Duration,
};

use {
    anyhow::{Result, bail},
    tokio::time::Instant,
    tracing::warn,
};

use lapak_state::cooldown::command_key;

use crate::{
    outcome::{Outcome, RuleKind},
    reply::Dispatcher,
};

pub(crate) const CMD_QRIS: &str = "qris";

/// Minimum spacing between media sends across *all* recipients, independent
/// of per-recipient cooldowns. Updated only on successful media sends.
pub(crate) struct MediaGap {
    gap: Duration,
    last: Mutex<Option<Instant>>,
}

impl MediaGap {
    pub(crate) fn new(gap: Duration) -> Self {
        Self {
            gap,
            last: Mutex::new(None),
        }
    }

    /// Sleep out whatever remains of the gap since the last media send.
    pub(crate) async fn wait_turn(&self) {
        let remaining = {
            let last = self.last.lock().unwrap_or_else(|e| e.into_inner());
            last.and_then(|at| self.gap.checked_sub(at.elapsed()))
        };
        if let Some(remaining) = remaining {
            tokio::time::sleep(remaining).await;
        }
    }

    pub(crate) fn mark_media_sent(&self) {
        *self.last.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
    }
}

pub(crate) async fn handle_qris(d: &Dispatcher, jid: &str) -> Result<Outcome> {
    let key = command_key(CMD_QRIS);
    if !d.cooldowns.can_send(jid, &key, d.config.cooldowns.qris()) {
        return Ok(Outcome::Suppressed(RuleKind::Qris));
    }

    d.media_gap.wait_turn().await;

    let mut failures: Vec<String> = Vec::new();

    // Layer 1: relay the captured catalog template.
    match d.qris.template() {
        Some(template) => match d.queue_relay(jid, template).await {
            Ok(()) => {
                d.media_gap.mark_media_sent();
                d.cooldowns.mark_sent(jid, &key);
                return Ok(Outcome::Sent(RuleKind::Qris));
            },
            Err(e) => failures.push(format!("template relay: {e}")),
        },
        None => failures.push("template relay: no template cached".into()),
    }

    // Layer 2: the static image with its caption.
    match d.qris.image() {
        Some(image) => {
            let caption = d.config.replies.qris_image_caption.clone();
            match d.queue_image(jid, image, caption).await {
                Ok(()) => {
                    d.media_gap.mark_media_sent();
                    d.cooldowns.mark_sent(jid, &key);
                    return Ok(Outcome::Sent(RuleKind::Qris));
                },
                Err(e) => failures.push(format!("image send: {e}")),
            }
        },
        None => failures.push("image send: no image available".into()),
    }

    // Layer 3: plain-text apology. The cooldown is still marked so a broken
    // setup is not hammered by retries from the same sender; the media gap
    // is not touched.
    warn!(jid, failures = %failures.join("; "), "qris media layers failed, sending apology");
    let apology = d.config.replies.qris_apology.clone();
    if let Err(e) = d.queue_text(jid, apology).await {
        failures.push(format!("apology text: {e}"));
    }
    d.cooldowns.mark_sent(jid, &key);

    bail!("qris delivery failed: {}", failures.join("; "))
}
