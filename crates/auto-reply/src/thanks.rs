//! Gratitude auto-reply: substring match against the configured word list.

use anyhow::Result;

use lapak_state::cooldown::command_key;

use crate::{
    outcome::{Outcome, RuleKind},
    reply::Dispatcher,
};

pub(crate) const CMD_THANKS: &str = "thanks";

pub(crate) async fn handle_thanks(
    d: &Dispatcher,
    jid: &str,
    text: &str,
) -> Result<Option<Outcome>> {
    if !d
        .thanks_triggers
        .iter()
        .any(|trigger| text.contains(trigger.as_str()))
    {
        return Ok(None);
    }

    let key = command_key(CMD_THANKS);
    if !d.cooldowns.can_send(jid, &key, d.config.cooldowns.thanks()) {
        return Ok(Some(Outcome::Suppressed(RuleKind::Thanks)));
    }

    d.queue_text(jid, d.config.replies.thanks_reply.clone())
        .await?;
    d.cooldowns.mark_sent(jid, &key);
    Ok(Some(Outcome::Sent(RuleKind::Thanks)))
}
