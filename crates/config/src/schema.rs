//! Config schema types. Defaults mirror the production deployment: Indonesian
//! storefront texts, 24-hour cooldowns, 2.5–7 s send jitter.

use std::{collections::HashMap, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LapakConfig {
    /// Only reply in one-on-one chats. Group and broadcast chats are always
    /// skipped; this additionally skips unknown chat kinds.
    pub private_chat_only: PrivateChatOnly,
    pub replies: RepliesConfig,
    pub triggers: TriggersConfig,
    pub cooldowns: CooldownsConfig,
    pub rate_limit: RateLimitConfig,
    pub qris: QrisConfig,
    pub owners: OwnersConfig,
    pub paths: PathsConfig,
    pub matcher: MatcherConfig,
    pub icons: IconsConfig,
    pub products: Vec<ProductConfig>,
}

/// Newtype so `private_chat_only` can default to `true` under `#[serde(default)]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrivateChatOnly(pub bool);

impl Default for PrivateChatOnly {
    fn default() -> Self {
        Self(true)
    }
}

/// Canned reply texts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepliesConfig {
    /// Body sent for the catalog trigger.
    pub catalog_text: String,
    /// Auto-reply for gratitude messages.
    pub thanks_reply: String,
    /// Caption on the QRIS image fallback.
    pub qris_image_caption: String,
    /// Last-resort text when neither template nor image can be sent.
    pub qris_apology: String,
}

impl Default for RepliesConfig {
    fn default() -> Self {
        Self {
            catalog_text: "catalog_text belum di-set di lapak.toml".into(),
            thanks_reply: "Alhamdulillah kk, dengan senang hati :)".into(),
            qris_image_caption: "Silakan scan QRIS ini untuk pembayaran 😊".into(),
            qris_apology: "QRIS tidak bisa dikirim. Hubungi admin ya, kk.".into(),
        }
    }
}

/// Trigger word lists. Matching is case-insensitive; entries are lowercased
/// when the dispatcher is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggersConfig {
    /// Exact-match triggers for the catalog reply.
    pub catalog: Vec<String>,
    /// Exact-match triggers for the QRIS payment reply.
    pub qris: Vec<String>,
    /// Substring triggers for the gratitude auto-reply.
    pub thanks: Vec<String>,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        Self {
            catalog: vec!["menu".into()],
            qris: vec!["qris".into()],
            thanks: [
                "terimakasih",
                "terima kasih",
                "makasih",
                "makasi",
                "thanks",
                "thank you",
                "thx",
                "tq",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Per-recipient cooldown windows, in hours, plus the persistence debounce.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownsConfig {
    pub catalog_hours: u64,
    pub qris_hours: u64,
    pub product_hours: u64,
    pub thanks_hours: u64,
    /// Trailing debounce before the cooldown file is rewritten.
    pub flush_debounce_ms: u64,
}

impl CooldownsConfig {
    #[must_use]
    pub fn catalog(&self) -> Duration {
        Duration::from_secs(self.catalog_hours * 3600)
    }

    #[must_use]
    pub fn qris(&self) -> Duration {
        Duration::from_secs(self.qris_hours * 3600)
    }

    #[must_use]
    pub fn product(&self) -> Duration {
        Duration::from_secs(self.product_hours * 3600)
    }

    #[must_use]
    pub fn thanks(&self) -> Duration {
        Duration::from_secs(self.thanks_hours * 3600)
    }

    #[must_use]
    pub fn flush_debounce(&self) -> Duration {
        Duration::from_millis(self.flush_debounce_ms)
    }
}

impl Default for CooldownsConfig {
    fn default() -> Self {
        Self {
            catalog_hours: 24,
            qris_hours: 24,
            product_hours: 24,
            thanks_hours: 24,
            flush_debounce_ms: 5000,
        }
    }
}

/// Randomized inter-send delay applied by the send queue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_ms: 2500,
            max_ms: 7000,
        }
    }
}

/// QRIS delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrisConfig {
    /// Minimum gap between media sends across *all* recipients.
    pub media_gap_ms: u64,
    /// Captured catalog-template file.
    pub template_path: PathBuf,
    /// Static QRIS image used as the fallback layer.
    pub image_path: PathBuf,
}

impl QrisConfig {
    #[must_use]
    pub fn media_gap(&self) -> Duration {
        Duration::from_millis(self.media_gap_ms)
    }
}

impl Default for QrisConfig {
    fn default() -> Self {
        Self {
            media_gap_ms: 8000,
            template_path: PathBuf::from("qris_catalog_saved.json"),
            image_path: PathBuf::from("qris.png"),
        }
    }
}

/// Who may run owner commands. An empty `numbers` list means every sender
/// passes the number check (single-operator deployments).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnersConfig {
    /// Owner phone numbers, any local or international form.
    pub numbers: Vec<String>,
    /// Owner JIDs (personal or linked-identity form).
    pub jids: Vec<String>,
}

/// Persisted-state file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub cooldown_file: PathBuf,
    pub exclude_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cooldown_file: PathBuf::from("cooldown.json"),
            exclude_file: PathBuf::from("runtime_exclude.json"),
        }
    }
}

/// Alias-matching policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Require whole-token boundaries around short aliases, so a two-letter
    /// abbreviation does not fire inside unrelated words.
    pub short_alias_word_boundary: bool,
    /// Aliases at or below this length count as short.
    pub short_alias_max_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            short_alias_word_boundary: true,
            short_alias_max_len: 2,
        }
    }
}

/// Category icon table with a fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    pub default: String,
    pub categories: HashMap<String, String>,
}

impl Default for IconsConfig {
    fn default() -> Self {
        Self {
            default: "📦".into(),
            categories: HashMap::new(),
        }
    }
}

/// One product catalog entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductConfig {
    /// Canonical key; lowercased form buckets the product's cooldown.
    pub key: String,
    /// Display name; defaults to `key`.
    pub name: Option<String>,
    /// Reply body. Entries with an empty description are skipped.
    pub description: String,
    /// Category for icon lookup.
    pub category: Option<String>,
    /// Additional keywords resolving to this entry.
    pub aliases: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let cfg = LapakConfig::default();
        assert!(cfg.private_chat_only.0);
        assert_eq!(cfg.triggers.catalog, vec!["menu"]);
        assert_eq!(cfg.triggers.qris, vec!["qris"]);
        assert_eq!(cfg.cooldowns.qris(), Duration::from_secs(24 * 3600));
        assert_eq!(cfg.rate_limit.min_ms, 2500);
        assert_eq!(cfg.rate_limit.max_ms, 7000);
        assert_eq!(cfg.qris.media_gap_ms, 8000);
        assert!(cfg.matcher.short_alias_word_boundary);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: LapakConfig = toml::from_str(
            r#"
            [triggers]
            catalog = ["menu", "katalog"]

            [[products]]
            key = "Netflix"
            description = "Akun premium 1 bulan"
            aliases = ["nf", "netplix"]
            "#,
        )
        .unwrap_or_default();
        assert_eq!(cfg.triggers.catalog.len(), 2);
        assert_eq!(cfg.triggers.qris, vec!["qris"]);
        assert_eq!(cfg.products.len(), 1);
        assert_eq!(cfg.products[0].aliases, vec!["nf", "netplix"]);
        assert_eq!(cfg.cooldowns.flush_debounce_ms, 5000);
    }
}
