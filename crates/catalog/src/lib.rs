//! Product catalog: alias → entry lookup plus free-text detection.
//!
//! Built once at startup from `[[products]]` config tables, read-only after.
//! Every alias (and the main key itself) resolves to the same shared entry,
//! so sending via any alias shares one cooldown bucket keyed by `main_key`.

use std::{collections::HashMap, sync::Arc};

use {
    lapak_config::{IconsConfig, MatcherConfig, ProductConfig},
    regex::Regex,
    tracing::{error, warn},
};

/// One catalog entry. Immutable; shared behind `Arc` by all of its aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductEntry {
    /// Canonical lowercase key; the product's cooldown bucket.
    pub main_key: String,
    /// Display name, original casing.
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Configured extra aliases, lowercased.
    pub aliases: Vec<String>,
}

impl ProductEntry {
    /// Reply body for this product.
    #[must_use]
    pub fn reply_text(&self) -> String {
        format!("{} *{}*\n\n{}", self.icon, self.name, self.description)
    }
}

/// Alias-keyed product catalog with a precomputed detection pattern.
pub struct Catalog {
    by_alias: HashMap<String, Arc<ProductEntry>>,
    pattern: Option<Regex>,
    product_count: usize,
}

impl Catalog {
    /// Build the catalog from config. Entries with an empty key or
    /// description are skipped with a warning; a later product claiming an
    /// already-used alias takes it over.
    #[must_use]
    pub fn build(products: &[ProductConfig], icons: &IconsConfig, matcher: &MatcherConfig) -> Self {
        let mut by_alias: HashMap<String, Arc<ProductEntry>> = HashMap::new();
        // Alias insertion order, for deterministic tie-breaking in the pattern.
        let mut ordered: Vec<String> = Vec::new();
        let mut product_count = 0usize;

        for product in products {
            let main_key = product.key.trim().to_lowercase();
            if main_key.is_empty() || product.description.trim().is_empty() {
                warn!(key = %product.key, "skipping product without key or description");
                continue;
            }

            let aliases: Vec<String> = product
                .aliases
                .iter()
                .map(|a| a.trim().to_lowercase())
                .filter(|a| !a.is_empty())
                .collect();

            let entry = Arc::new(ProductEntry {
                main_key: main_key.clone(),
                name: product
                    .name
                    .clone()
                    .unwrap_or_else(|| product.key.trim().to_string()),
                description: product.description.trim().to_string(),
                icon: icon_for(icons, product.category.as_deref()),
                aliases: aliases.clone(),
            });

            product_count += 1;
            for key in std::iter::once(main_key).chain(aliases) {
                if !by_alias.contains_key(&key) {
                    ordered.push(key.clone());
                }
                by_alias.insert(key, Arc::clone(&entry));
            }
        }

        let pattern = build_pattern(&ordered, matcher);
        Self {
            by_alias,
            pattern,
            product_count,
        }
    }

    /// Direct lookup by exact key. `text` must already be lowercased.
    #[must_use]
    pub fn exact(&self, text: &str) -> Option<Arc<ProductEntry>> {
        self.by_alias.get(text).cloned()
    }

    /// Find a product mentioned inside a sentence. Returns `None` when the
    /// whole input equals the matched alias; that case belongs to
    /// [`Catalog::exact`] so a message is never classified twice.
    ///
    /// The longest alias wins at any given position (pattern alternatives are
    /// sorted longest-first); ties keep catalog insertion order.
    #[must_use]
    pub fn detect_in_sentence(&self, text: &str) -> Option<Arc<ProductEntry>> {
        let found = self.pattern.as_ref()?.find(text)?;
        let matched = found.as_str().to_lowercase();
        if text == matched {
            return None;
        }
        self.by_alias.get(&matched).cloned()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.product_count
    }

    /// Number of keys resolving to a product (main keys + aliases).
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.by_alias.len()
    }
}

fn icon_for(icons: &IconsConfig, category: Option<&str>) -> String {
    category
        .and_then(|c| icons.categories.get(&c.trim().to_lowercase()))
        .cloned()
        .unwrap_or_else(|| icons.default.clone())
}

/// One alternation over all aliases, longest-first, so detection is a single
/// linear scan. Short aliases get whole-token boundaries when the matcher
/// policy asks for them; multi-word aliases always match as plain substrings.
fn build_pattern(aliases: &[String], matcher: &MatcherConfig) -> Option<Regex> {
    if aliases.is_empty() {
        return None;
    }

    let mut sorted = aliases.to_vec();
    sorted.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let parts: Vec<String> = sorted
        .iter()
        .map(|alias| {
            let escaped = regex::escape(alias);
            let is_short = alias.chars().count() <= matcher.short_alias_max_len;
            if matcher.short_alias_word_boundary && is_short {
                format!(r"\b{escaped}\b")
            } else {
                escaped
            }
        })
        .collect();

    match Regex::new(&format!("(?i)(?:{})", parts.join("|"))) {
        Ok(re) => Some(re),
        Err(e) => {
            error!(error = %e, "failed to build product detection pattern");
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(key: &str, aliases: &[&str]) -> ProductConfig {
        ProductConfig {
            key: key.into(),
            description: format!("{key} description"),
            aliases: aliases.iter().map(|a| (*a).to_string()).collect(),
            ..ProductConfig::default()
        }
    }

    fn catalog(products: &[ProductConfig]) -> Catalog {
        Catalog::build(products, &IconsConfig::default(), &MatcherConfig::default())
    }

    #[test]
    fn aliases_share_one_entry() {
        let c = catalog(&[product("Netflix", &["nf", "netplix"])]);
        assert_eq!(c.product_count(), 1);
        assert_eq!(c.alias_count(), 3);
        let by_main = c.exact("netflix");
        let by_alias = c.exact("netplix");
        assert_eq!(
            by_main.as_deref().map(|e| &e.main_key),
            by_alias.as_deref().map(|e| &e.main_key)
        );
    }

    #[test]
    fn empty_description_skipped() {
        let mut p = product("ghost", &[]);
        p.description = "   ".into();
        let c = catalog(&[p]);
        assert_eq!(c.product_count(), 0);
        assert!(c.exact("ghost").is_none());
    }

    #[test]
    fn longest_alias_wins() {
        let c = catalog(&[product("p", &[]), product("premium plan", &[])]);
        let hit = c.detect_in_sentence("i want premium plan please");
        assert_eq!(hit.map(|e| e.main_key.clone()), Some("premium plan".into()));
    }

    #[test]
    fn whole_input_match_is_left_to_exact() {
        let c = catalog(&[product("netflix", &[])]);
        assert!(c.detect_in_sentence("netflix").is_none());
        assert!(c.exact("netflix").is_some());
    }

    #[test]
    fn detection_inside_sentence() {
        let c = catalog(&[product("netflix", &["netplix"])]);
        let hit = c.detect_in_sentence("mau tanya harga netplix dong");
        assert_eq!(hit.map(|e| e.main_key.clone()), Some("netflix".into()));
    }

    #[test]
    fn short_alias_requires_word_boundary() {
        let c = catalog(&[product("gopro", &["go"])]);
        assert!(c.detect_in_sentence("belajar golang dulu").is_none());
        assert!(c.detect_in_sentence("paket go ada?").is_some());
    }

    #[test]
    fn short_alias_substring_when_boundary_disabled() {
        let matcher = MatcherConfig {
            short_alias_word_boundary: false,
            ..MatcherConfig::default()
        };
        let c = Catalog::build(
            &[product("gopro", &["go"])],
            &IconsConfig::default(),
            &matcher,
        );
        assert!(c.detect_in_sentence("belajar golang dulu").is_some());
    }

    #[test]
    fn multi_word_alias_matches_as_substring() {
        let c = catalog(&[product("vpn", &["virtual private network"])]);
        let hit = c.detect_in_sentence("ada virtual private network murah?");
        assert_eq!(hit.map(|e| e.main_key.clone()), Some("vpn".into()));
    }

    #[test]
    fn later_product_takes_over_duplicate_alias() {
        let c = catalog(&[product("first", &["shared"]), product("second", &["shared"])]);
        let hit = c.exact("shared");
        assert_eq!(hit.map(|e| e.main_key.clone()), Some("second".into()));
    }

    #[test]
    fn icon_falls_back_to_default() {
        let mut icons = IconsConfig::default();
        icons.categories.insert("streaming".into(), "🎬".into());
        let mut with_cat = product("netflix", &[]);
        with_cat.category = Some("Streaming".into());
        let plain = product("other", &[]);
        let c = Catalog::build(&[with_cat, plain], &icons, &MatcherConfig::default());
        assert_eq!(c.exact("netflix").map(|e| e.icon.clone()), Some("🎬".into()));
        assert_eq!(c.exact("other").map(|e| e.icon.clone()), Some("📦".into()));
    }

    #[test]
    fn reply_text_format() {
        let c = catalog(&[product("Netflix", &[])]);
        let entry = c.exact("netflix");
        assert_eq!(
            entry.map(|e| e.reply_text()),
            Some("📦 *Netflix*\n\nNetflix description".into())
        );
    }
}
