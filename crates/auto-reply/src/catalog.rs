//! Catalog trigger: cooldown-gated canned text reply.

use anyhow::Result;

use lapak_state::cooldown::command_key;

use crate::{
    outcome::{Outcome, RuleKind},
    reply::Dispatcher,
};

pub(crate) const CMD_CATALOG: &str = "catalog";

pub(crate) async fn handle_catalog(d: &Dispatcher, jid: &str) -> Result<Outcome> {
    let key = command_key(CMD_CATALOG);
    if !d
        .cooldowns
        .can_send(jid, &key, d.config.cooldowns.catalog())
    {
        return Ok(Outcome::Suppressed(RuleKind::Catalog));
    }

    d.queue_text(jid, d.config.replies.catalog_text.clone())
        .await?;
    d.cooldowns.mark_sent(jid, &key);
    Ok(Outcome::Sent(RuleKind::Catalog))
}
