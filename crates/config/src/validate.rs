//! Sanity checks on a loaded config. Problems are advisory: the bot starts
//! anyway and the binary logs each finding.

use std::collections::HashSet;

use crate::schema::LapakConfig;

/// Check a config for likely misconfigurations. Returns one human-readable
/// finding per problem; empty means clean.
#[must_use]
pub fn validate(cfg: &LapakConfig) -> Vec<String> {
    let mut findings = Vec::new();

    if cfg.rate_limit.enabled && cfg.rate_limit.max_ms < cfg.rate_limit.min_ms {
        findings.push(format!(
            "rate_limit.max_ms ({}) is below min_ms ({}); the minimum delay will be used",
            cfg.rate_limit.max_ms, cfg.rate_limit.min_ms
        ));
    }

    if cfg.triggers.catalog.is_empty() && cfg.triggers.qris.is_empty() && cfg.products.is_empty() {
        findings.push("no catalog triggers, qris triggers, or products configured; the bot will only answer thanks".into());
    }

    let mut seen_keys = HashSet::new();
    for product in &cfg.products {
        let key = product.key.trim().to_lowercase();
        if key.is_empty() {
            findings.push("a [[products]] entry has an empty key".into());
            continue;
        }
        if !seen_keys.insert(key.clone()) {
            findings.push(format!("duplicate product key: {key}"));
        }
        if product.description.trim().is_empty() {
            findings.push(format!("product {key} has an empty description and will be skipped"));
        }
    }

    for alias in cfg.products.iter().flat_map(|p| &p.aliases) {
        if alias.trim().is_empty() {
            findings.push("a product alias is empty".into());
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::schema::{ProductConfig, RateLimitConfig},
    };

    #[test]
    fn default_config_has_no_findings() {
        assert!(validate(&LapakConfig::default()).is_empty());
    }

    #[test]
    fn inverted_rate_bounds_flagged() {
        let cfg = LapakConfig {
            rate_limit: RateLimitConfig {
                enabled: true,
                min_ms: 7000,
                max_ms: 2500,
            },
            ..LapakConfig::default()
        };
        assert_eq!(validate(&cfg).len(), 1);
    }

    #[test]
    fn duplicate_and_empty_products_flagged() {
        let cfg = LapakConfig {
            products: vec![
                ProductConfig {
                    key: "netflix".into(),
                    description: "ok".into(),
                    ..ProductConfig::default()
                },
                ProductConfig {
                    key: "Netflix".into(),
                    description: String::new(),
                    ..ProductConfig::default()
                },
            ],
            ..LapakConfig::default()
        };
        let findings = validate(&cfg);
        assert!(findings.iter().any(|f| f.contains("duplicate product key")));
        assert!(findings.iter().any(|f| f.contains("empty description")));
    }
}
