//! Per-recipient cooldown ledger with debounced JSON persistence.
//!
//! One file holds two key namespaces per canonical JID: `cmd:<name>` for
//! command cooldowns and `prod:<main_key>` for product cooldowns. Values are
//! millisecond Unix timestamps of the last send. The ledger is best-effort:
//! a corrupt or missing file loads as empty, and write failures never
//! propagate; in-memory state stays authoritative.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use tracing::{debug, warn};

use crate::debounce::Debouncer;

/// Cooldown key for a command bucket (`cmd:catalog`, `cmd:qris`, ...).
#[must_use]
pub fn command_key(name: &str) -> String {
    format!("cmd:{name}")
}

/// Cooldown key for a product bucket, always the product's main key.
#[must_use]
pub fn product_key(main_key: &str) -> String {
    format!("prod:{main_key}")
}

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

type CooldownMap = HashMap<String, HashMap<String, u64>>;

/// Last-sent timestamps per (canonical JID, cooldown key).
pub struct CooldownStore {
    path: PathBuf,
    entries: Arc<RwLock<CooldownMap>>,
    flush: Debouncer,
}

impl CooldownStore {
    /// Load the ledger from `path`. A missing or corrupt file yields an
    /// empty store; cooldowns are not worth failing startup over.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>, flush_debounce: Duration) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<CooldownMap>(&raw) {
                Ok(map) => {
                    debug!(path = %path.display(), jids = map.len(), "cooldown ledger loaded");
                    map
                },
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt cooldown file, starting empty");
                    CooldownMap::new()
                },
            },
            Err(_) => CooldownMap::new(),
        };

        Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
            flush: Debouncer::new(flush_debounce),
        }
    }

    /// True when no send is recorded for (jid, key), or the last one is at
    /// least `cooldown` ago. Pure read.
    #[must_use]
    pub fn can_send(&self, jid: &str, key: &str, cooldown: Duration) -> bool {
        self.can_send_at(now_ms(), jid, key, cooldown)
    }

    /// Deterministic twin of [`can_send`](Self::can_send) for simulated time.
    #[must_use]
    pub fn can_send_at(&self, now: u64, jid: &str, key: &str, cooldown: Duration) -> bool {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        match entries.get(jid).and_then(|by_key| by_key.get(key)) {
            Some(&last) => now.saturating_sub(last) >= cooldown.as_millis() as u64,
            None => true,
        }
    }

    /// Record a send now and schedule a debounced flush.
    pub fn mark_sent(&self, jid: &str, key: &str) {
        self.mark_sent_at(now_ms(), jid, key);
    }

    /// Deterministic twin of [`mark_sent`](Self::mark_sent).
    pub fn mark_sent_at(&self, now: u64, jid: &str, key: &str) {
        {
            let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
            entries
                .entry(jid.to_string())
                .or_default()
                .insert(key.to_string(), now);
        }

        let entries = Arc::clone(&self.entries);
        let path = self.path.clone();
        self.flush
            .schedule(move || write_snapshot(&entries, &path));
    }

    /// Synchronously persist the current state. Used on graceful shutdown.
    pub fn force_flush(&self) {
        write_snapshot(&self.entries, &self.path);
    }
}

fn write_snapshot(entries: &Arc<RwLock<CooldownMap>>, path: &Path) {
    let json = {
        let entries = entries.read().unwrap_or_else(|e| e.into_inner());
        serde_json::to_string_pretty(&*entries)
    };
    let result = json.map_err(std::io::Error::other).and_then(|json| std::fs::write(path, json));
    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "failed to persist cooldown ledger");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn store(dir: &tempfile::TempDir) -> CooldownStore {
        CooldownStore::load(dir.path().join("cooldown.json"), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn first_send_is_always_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        assert!(s.can_send_at(0, "628@s.whatsapp.net", &command_key("qris"), HOUR));
    }

    #[tokio::test]
    async fn cooldown_is_monotonic_until_elapsed() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        let jid = "628@s.whatsapp.net";
        let key = command_key("catalog");

        s.mark_sent_at(1_000, jid, &key);
        assert!(!s.can_send_at(1_000, jid, &key, Duration::from_millis(1)));
        assert!(!s.can_send_at(1_000 + HOUR.as_millis() as u64 - 1, jid, &key, HOUR));
        assert!(s.can_send_at(1_000 + HOUR.as_millis() as u64, jid, &key, HOUR));
    }

    #[tokio::test]
    async fn namespaces_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let s = store(&dir);
        let jid = "628@s.whatsapp.net";

        s.mark_sent_at(1_000, jid, &command_key("netflix"));
        assert!(s.can_send_at(1_000, jid, &product_key("netflix"), HOUR));
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_marks_produces_one_coalesced_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooldown.json");
        let s = CooldownStore::load(&path, Duration::from_secs(5));

        for i in 0..5u64 {
            s.mark_sent_at(i, &format!("jid{i}@s.whatsapp.net"), &command_key("catalog"));
        }
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;

        let written: HashMap<String, HashMap<String, u64>> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 5);
    }

    #[tokio::test]
    async fn force_flush_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooldown.json");

        let s = CooldownStore::load(&path, Duration::from_secs(5));
        s.mark_sent_at(42, "628@s.whatsapp.net", &product_key("netflix"));
        s.force_flush();

        let reloaded = CooldownStore::load(&path, Duration::from_secs(5));
        assert!(!reloaded.can_send_at(42, "628@s.whatsapp.net", &product_key("netflix"), HOUR));
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cooldown.json");
        std::fs::write(&path, "{not json").unwrap();

        let s = CooldownStore::load(&path, Duration::from_secs(5));
        assert!(s.can_send_at(0, "anyone", "cmd:qris", HOUR));
    }
}
