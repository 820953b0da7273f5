//! Inbound message dispatch core.
//!
//! Flow: transport message → JID normalization → ordered rule chain (owner
//! commands, exclusion, catalog/QRIS triggers, product match, thanks) →
//! cooldown gate → send queue → transport outbound. Every evaluated message
//! yields exactly one outcome: sent, cooldown-suppressed, or no-match.

pub mod catalog;
pub mod outcome;
pub mod owner;
pub mod product;
pub mod qris;
pub mod queue;
pub mod reply;
pub mod thanks;

pub use {
    outcome::{Dispatched, DropReason, Outcome, RuleKind},
    owner::OwnerCommand,
    queue::SendQueue,
    reply::Dispatcher,
};
