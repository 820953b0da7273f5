//! Shared types, error definitions, and JID utilities used across all lapak crates.

pub mod error;
pub mod jid;
pub mod types;

pub use error::{Error, Result};
