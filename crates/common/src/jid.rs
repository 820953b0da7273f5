//! JID normalization and classification.
//!
//! WhatsApp addresses the same party under several suffix forms (`@c.us`
//! legacy, `@s.whatsapp.net` personal, `@lid` anonymized-linked). Every map
//! key and equality check in the workspace goes through [`normalize_jid`]
//! first; comparing un-normalized JIDs is the classic silent-mismatch bug in
//! this domain.

use serde::{Deserialize, Serialize};

/// Canonical suffix for a personal chat.
pub const SUFFIX_PERSONAL: &str = "@s.whatsapp.net";
/// Legacy personal suffix, rewritten to [`SUFFIX_PERSONAL`].
pub const SUFFIX_LEGACY: &str = "@c.us";
/// Anonymized linked-identity suffix.
pub const SUFFIX_LID: &str = "@lid";
/// Group chat suffix.
pub const SUFFIX_GROUP: &str = "@g.us";
/// Broadcast list suffix.
pub const SUFFIX_BROADCAST: &str = "@broadcast";
/// The status feed pseudo-chat.
pub const STATUS_BROADCAST: &str = "status@broadcast";

// Indonesian dial plan: international prefix, national trunk prefix, and the
// leading digit of bare mobile subscriber numbers.
const COUNTRY_CODE: &str = "62";
const TRUNK_PREFIX: char = '0';
const MOBILE_PREFIX: char = '8';

/// Chat classification derived from a JID suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatType {
    /// One-on-one chat (`@s.whatsapp.net`, `@lid`, or legacy `@c.us`).
    Personal,
    /// Group chat (`@g.us`).
    Group,
    /// Status feed or broadcast list.
    Broadcast,
    /// Anything else (newsletter feeds, future suffixes).
    Other,
}

/// Rewrite a known legacy suffix to the canonical one; unknown suffixes pass
/// through untouched. Idempotent: `normalize_jid(normalize_jid(x)) ==
/// normalize_jid(x)`.
#[must_use]
pub fn normalize_jid(raw: &str) -> String {
    let jid = raw.trim();
    if jid.len() >= SUFFIX_LEGACY.len() {
        let (head, tail) = jid.split_at(jid.len() - SUFFIX_LEGACY.len());
        if tail.eq_ignore_ascii_case(SUFFIX_LEGACY) {
            return format!("{head}{SUFFIX_PERSONAL}");
        }
    }
    jid.to_string()
}

/// Extract the bare digits of a JID: everything left of `@`, minus a
/// `:device` index, minus any non-digit character.
#[must_use]
pub fn digits_from_jid(jid: &str) -> String {
    let left = jid.split('@').next().unwrap_or_default();
    let left = left.split(':').next().unwrap_or_default();
    left.chars().filter(char::is_ascii_digit).collect()
}

/// Rewrite a phone number to international form.
///
/// A leading national trunk `0` becomes the country code, a bare mobile
/// number starting with `8` gets the country code prefixed, and numbers
/// already in international form (or from another plan) pass through.
#[must_use]
pub fn normalize_local_number(digits: &str) -> String {
    let digits: String = digits.chars().filter(char::is_ascii_digit).collect();
    if let Some(rest) = digits.strip_prefix(TRUNK_PREFIX) {
        return format!("{COUNTRY_CODE}{rest}");
    }
    if digits.starts_with(MOBILE_PREFIX) {
        return format!("{COUNTRY_CODE}{digits}");
    }
    digits
}

/// Classify a JID by suffix. Works on raw or normalized input.
#[must_use]
pub fn classify_jid(jid: &str) -> ChatType {
    let lower = jid.trim().to_ascii_lowercase();
    if lower == STATUS_BROADCAST || lower.ends_with(SUFFIX_BROADCAST) {
        return ChatType::Broadcast;
    }
    if lower.ends_with(SUFFIX_GROUP) {
        return ChatType::Group;
    }
    if lower.ends_with(SUFFIX_PERSONAL)
        || lower.ends_with(SUFFIX_LID)
        || lower.ends_with(SUFFIX_LEGACY)
    {
        return ChatType::Personal;
    }
    ChatType::Other
}
