//! Owner commands: QRIS template capture and exclusion-list management.
//!
//! These run before the from-self filter, so the operator can drive the bot
//! from its own linked device. Non-owners get a rejection text and no state
//! changes.

use std::fmt;

use anyhow::Result;

use {
    lapak_common::{jid, types::InboundMessage},
    lapak_state::QrisCache,
};

use crate::{outcome::Dispatched, reply::Dispatcher};

const NOT_OWNER: &str = "❌ Kamu bukan OWNER. Hanya owner yang bisa memakai perintah ini.";
const SAVEQRIS_OK: &str = "✅ Berhasil! Template katalog QRIS tersimpan.";
const SAVEQRIS_USAGE: &str = "❌ Tidak ketemu pesan katalog.\n\nCara pakai:\n1) Reply pesan katalog QRIS\n2) Ketik: *saveqris*";
const EXCLUDE_USAGE: &str = "❌ Tidak ada pesan yang di-reply.\n\nCara pakai:\n1) Reply pesan dari nomor yang mau di-exclude\n2) Ketik: *exclude*";
const UNEXCLUDE_USAGE: &str = "❌ Reply pesan dari nomor yang mau di-unexclude.";
const LIST_EMPTY: &str = "📋 *Daftar Exclude*\n\n_Belum ada nomor yang di-exclude._\n\nReply pesan + ketik *exclude* untuk menambah.";

/// The owner-only runtime commands, matched case-insensitively and exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerCommand {
    SaveQris,
    Exclude,
    Unexclude,
    ListExclude,
}

impl OwnerCommand {
    /// Parse already-lowercased message text.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "saveqris" => Some(Self::SaveQris),
            "exclude" => Some(Self::Exclude),
            "unexclude" => Some(Self::Unexclude),
            "listexclude" => Some(Self::ListExclude),
            _ => None,
        }
    }
}

impl fmt::Display for OwnerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SaveQris => write!(f, "saveqris"),
            Self::Exclude => write!(f, "exclude"),
            Self::Unexclude => write!(f, "unexclude"),
            Self::ListExclude => write!(f, "listexclude"),
        }
    }
}

/// Owner test, most specific check first. With no owner numbers configured
/// every sender passes the final check (the single-operator default).
pub(crate) fn is_owner(d: &Dispatcher, msg: &InboundMessage) -> bool {
    if msg.from_me {
        return true;
    }

    let remote = jid::normalize_jid(&msg.chat);
    let participant = msg
        .participant
        .as_deref()
        .map(jid::normalize_jid)
        .unwrap_or_default();

    if !d.owner_jids.is_empty()
        && (d.owner_jids.contains(&remote)
            || (!participant.is_empty() && d.owner_jids.contains(&participant)))
    {
        return true;
    }

    if let Some(me) = d.outbound.self_jid() {
        let me = jid::normalize_jid(&me);
        if !me.is_empty() && (remote == me || participant == me) {
            return true;
        }
    }

    if d.owner_numbers.is_empty() {
        return true;
    }

    let remote_digits = jid::normalize_local_number(&jid::digits_from_jid(&remote));
    let participant_digits = jid::normalize_local_number(&jid::digits_from_jid(&participant));
    d.owner_numbers.contains(&remote_digits)
        || (!participant_digits.is_empty() && d.owner_numbers.contains(&participant_digits))
}

pub(crate) async fn handle_owner(
    d: &Dispatcher,
    msg: &InboundMessage,
    chat: &str,
    command: OwnerCommand,
) -> Result<Dispatched> {
    if !is_owner(d, msg) {
        d.queue_text(chat, NOT_OWNER).await?;
        return Ok(done(command, "rejected: not owner"));
    }

    match command {
        OwnerCommand::SaveQris => save_qris(d, msg, chat).await,
        OwnerCommand::Exclude => exclude(d, msg, chat).await,
        OwnerCommand::Unexclude => unexclude(d, msg, chat).await,
        OwnerCommand::ListExclude => list_exclude(d, chat).await,
    }
}

async fn save_qris(d: &Dispatcher, msg: &InboundMessage, chat: &str) -> Result<Dispatched> {
    let Some(wrapper) = QrisCache::find_product_message(&msg.raw) else {
        d.queue_text(chat, SAVEQRIS_USAGE).await?;
        return Ok(done(OwnerCommand::SaveQris, "no catalog message to save"));
    };

    d.qris.save_template(&wrapper)?;
    d.queue_text(chat, SAVEQRIS_OK).await?;
    Ok(done(OwnerCommand::SaveQris, "template saved"))
}

async fn exclude(d: &Dispatcher, msg: &InboundMessage, chat: &str) -> Result<Dispatched> {
    let Some(target) = msg.quoted_sender.as_deref() else {
        d.queue_text(chat, EXCLUDE_USAGE).await?;
        return Ok(done(OwnerCommand::Exclude, "no quoted message"));
    };

    d.excludes.add(target);
    d.queue_text(
        chat,
        format!(
            "✅ Berhasil exclude!\n\n*JID:* {target}\n\nNomor ini tidak akan dibalas bot lagi.\nKetik *listexclude* untuk lihat daftar."
        ),
    )
    .await?;
    Ok(done(OwnerCommand::Exclude, format!("excluded {target}")))
}

async fn unexclude(d: &Dispatcher, msg: &InboundMessage, chat: &str) -> Result<Dispatched> {
    let Some(target) = msg.quoted_sender.as_deref() else {
        d.queue_text(chat, UNEXCLUDE_USAGE).await?;
        return Ok(done(OwnerCommand::Unexclude, "no quoted message"));
    };

    if !d.excludes.remove(target) {
        d.queue_text(chat, format!("❌ JID tidak ada di daftar exclude:\n{target}"))
            .await?;
        return Ok(done(OwnerCommand::Unexclude, "not in exclusion list"));
    }

    d.queue_text(chat, format!("✅ Berhasil unexclude!\n\n*JID:* {target}"))
        .await?;
    Ok(done(OwnerCommand::Unexclude, format!("unexcluded {target}")))
}

async fn list_exclude(d: &Dispatcher, chat: &str) -> Result<Dispatched> {
    let jids = d.excludes.list();
    if jids.is_empty() {
        d.queue_text(chat, LIST_EMPTY).await?;
        return Ok(done(OwnerCommand::ListExclude, "0 exclusions"));
    }

    let formatted = jids
        .iter()
        .enumerate()
        .map(|(i, j)| format!("{}. {j}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    d.queue_text(
        chat,
        format!(
            "📋 *Daftar Exclude*\n\n{formatted}\n\n_Total: {} nomor_",
            jids.len()
        ),
    )
    .await?;
    Ok(done(
        OwnerCommand::ListExclude,
        format!("{} exclusions", jids.len()),
    ))
}

fn done(command: OwnerCommand, detail: impl Into<String>) -> Dispatched {
    Dispatched::OwnerCommand {
        command,
        detail: detail.into(),
    }
}
