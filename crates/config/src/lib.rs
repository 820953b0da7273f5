//! Configuration schema and file loader for lapak.
//!
//! Config lives in `lapak.{toml,yaml,yml,json}`, discovered project-local
//! first, then in the user config directory. String values support `${ENV}`
//! substitution. A missing file yields defaults; a malformed file is an error.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{discover_and_load, load_config},
    schema::{
        CooldownsConfig, IconsConfig, LapakConfig, MatcherConfig, OwnersConfig, PathsConfig,
        ProductConfig, QrisConfig, RateLimitConfig, RepliesConfig, TriggersConfig,
    },
    validate::validate,
};
