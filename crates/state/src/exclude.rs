//! Runtime exclusion list, persisted eagerly on every mutation.

use std::{
    collections::BTreeSet,
    path::PathBuf,
    sync::RwLock,
};

use {
    serde::{Deserialize, Serialize},
    tracing::{debug, warn},
};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ExcludeFile {
    excluded_jids: Vec<String>,
    updated_at: String,
}

/// JIDs the bot must never auto-reply to. Mutated only by owner commands;
/// the file is rewritten on every change (the set is small and changes are
/// rare, so no debounce).
pub struct ExcludeStore {
    path: PathBuf,
    jids: RwLock<BTreeSet<String>>,
}

impl ExcludeStore {
    /// Load the exclusion list. Missing or corrupt files yield an empty set.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let jids = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<ExcludeFile>(&raw) {
                Ok(file) => {
                    debug!(path = %path.display(), count = file.excluded_jids.len(), "exclusion list loaded");
                    file.excluded_jids.into_iter().collect()
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt exclusion file, starting empty");
                    BTreeSet::new()
                },
            },
            Err(_) => BTreeSet::new(),
        };

        Self {
            path,
            jids: RwLock::new(jids),
        }
    }

    #[must_use]
    pub fn contains(&self, jid: &str) -> bool {
        self.jids
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(jid)
    }

    /// Add a JID. Returns false when it was already present. Persists.
    pub fn add(&self, jid: &str) -> bool {
        let added = self
            .jids
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(jid.to_string());
        if added {
            self.persist();
        }
        added
    }

    /// Remove a JID. Returns false when it was not present. Persists.
    pub fn remove(&self, jid: &str) -> bool {
        let removed = self
            .jids
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(jid);
        if removed {
            self.persist();
        }
        removed
    }

    /// All excluded JIDs, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.jids
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    fn persist(&self) {
        let file = ExcludeFile {
            excluded_jids: self.list(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        };
        let result = serde_json::to_string_pretty(&file)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.path, json));
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "failed to persist exclusion list");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime_exclude.json");

        let store = ExcludeStore::load(&path);
        assert!(store.add("628111@s.whatsapp.net"));
        assert!(!store.add("628111@s.whatsapp.net"));
        assert!(store.contains("628111@s.whatsapp.net"));

        let reloaded = ExcludeStore::load(&path);
        assert!(reloaded.contains("628111@s.whatsapp.net"));
        assert!(reloaded.remove("628111@s.whatsapp.net"));
        assert!(!reloaded.remove("628111@s.whatsapp.net"));
        assert!(ExcludeStore::load(&path).list().is_empty());
    }

    #[test]
    fn file_format_matches_contract() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime_exclude.json");

        ExcludeStore::load(&path).add("628111@s.whatsapp.net");

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw["excludedJids"],
            serde_json::json!(["628111@s.whatsapp.net"])
        );
        assert!(raw["updatedAt"].is_string());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime_exclude.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(ExcludeStore::load(&path).list().is_empty());
    }
}
