//! First-class dispatch outcomes.
//!
//! The sent / suppressed / no-match trichotomy is the observability contract
//! of the whole responder: the surrounding system emits exactly one log line
//! per evaluated message based on these values.

use std::fmt;

use crate::owner::OwnerCommand;

/// Which reply rule fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleKind {
    Catalog,
    Qris,
    /// Product reply, tagged with the product's main key.
    Product(String),
    Thanks,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog => write!(f, "catalog"),
            Self::Qris => write!(f, "qris"),
            Self::Product(key) => write!(f, "product:{key}"),
            Self::Thanks => write!(f, "thanks"),
        }
    }
}

/// Result of evaluating the reply rules for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A reply was sent.
    Sent(RuleKind),
    /// A rule matched but the recipient's cooldown suppressed the reply.
    Suppressed(RuleKind),
    /// No rule matched; nothing was sent.
    NoMatch,
}

/// Why a message was dropped before rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Broadcast,
    Group,
    NonPrivate,
    FromSelf,
    Excluded,
    EmptyText,
}

/// What the dispatcher did with one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// Dropped before rule evaluation. Only `Excluded` drops are logged.
    Dropped(DropReason),
    /// An owner command ran (or was rejected).
    OwnerCommand {
        command: OwnerCommand,
        detail: String,
    },
    /// The rule chain ran to completion.
    Evaluated(Outcome),
}
