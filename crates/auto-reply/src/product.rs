//! Product queries: exact key lookup, then detection inside a sentence.
//! Either path is gated by the product's main-key cooldown bucket, so all
//! aliases of one product share a single cooldown.

use anyhow::Result;

use lapak_state::cooldown::product_key;

use crate::{
    outcome::{Outcome, RuleKind},
    reply::Dispatcher,
};

pub(crate) async fn handle_product(
    d: &Dispatcher,
    jid: &str,
    text: &str,
) -> Result<Option<Outcome>> {
    let Some(entry) = d
        .catalog
        .exact(text)
        .or_else(|| d.catalog.detect_in_sentence(text))
    else {
        return Ok(None);
    };

    let key = product_key(&entry.main_key);
    if !d.cooldowns.can_send(jid, &key, d.config.cooldowns.product()) {
        return Ok(Some(Outcome::Suppressed(RuleKind::Product(
            entry.main_key.clone(),
        ))));
    }

    d.queue_text(jid, entry.reply_text()).await?;
    d.cooldowns.mark_sent(jid, &key);
    Ok(Some(Outcome::Sent(RuleKind::Product(entry.main_key.clone()))))
}
