use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::LapakConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["lapak.toml", "lapak.yaml", "lapak.yml", "lapak.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<LapakConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./lapak.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/lapak/lapak.{toml,yaml,yml,json}` (user-global)
///
/// Returns `LapakConfig::default()` if no config file is found.
#[must_use]
pub fn discover_and_load() -> LapakConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    LapakConfig::default()
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "lapak") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<LapakConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn loads_toml_file() {
        let mut f = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(f, "private_chat_only = false").unwrap();
        let cfg = load_config(f.path()).unwrap();
        assert!(!cfg.private_chat_only.0);
    }

    #[test]
    fn loads_json_file() {
        let mut f = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        writeln!(f, "{}", r#"{"triggers": {"qris": ["qris", "bayar"]}}"#).unwrap();
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.triggers.qris, vec!["qris", "bayar"]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut f = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(f, "private_chat_only = [[[").unwrap();
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/lapak.toml")).is_err());
    }
}
