//! File-backed runtime state: the cooldown ledger, the exclusion list, and
//! the captured QRIS assets. Each file is owned exclusively by its store; no
//! other crate touches them directly.

pub mod cooldown;
pub mod debounce;
pub mod exclude;
pub mod qris;

pub use {
    cooldown::CooldownStore, debounce::Debouncer, exclude::ExcludeStore, qris::QrisCache,
};
