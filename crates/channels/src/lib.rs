//! Transport seam between the dispatch core and the messaging network.
//!
//! The session provider (connection handling, encryption, reconnect policy)
//! lives outside this workspace; it plugs in by implementing
//! [`ChannelOutbound`].

pub mod plugin;

pub use plugin::ChannelOutbound;
