//! Single-slot persisted token store.
//!
//! One fixed-path file holds at most one token string. Presence means
//! "possibly authenticated"; absence means anonymous. The slot is
//! last-write-wins and survives process restarts. It is cleared on
//! logout, on decode failure, and on any 401 from the remote store.

use std::io;
use std::path::{Path, PathBuf};

/// File-backed token slot.
///
/// Cloning shares the path, not state - every operation goes straight to
/// the file, so clones observe each other's writes.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Create a store over the given slot path. Nothing is touched on
    /// disk until the first `save`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token, if any.
    ///
    /// A missing or empty slot is `None`, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures other than the file being
    /// absent.
    pub fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_owned()))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Replace the slot with `token`, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
    }

    /// Remove the stored token. Idempotent: clearing an empty slot is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures other than the file being
    /// absent.
    pub fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static SLOT: AtomicU32 = AtomicU32::new(0);

    /// Per-test slot path under the system temp dir.
    fn temp_store() -> TokenStore {
        let n = SLOT.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir()
            .join(format!("farmstall-store-test-{}-{n}", std::process::id()))
            .join("token");
        TokenStore::new(path)
    }

    #[test]
    fn test_load_absent_slot_is_none() {
        let store = temp_store();
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = temp_store();
        store.save("h.p.s").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("h.p.s"));
        store.clear().expect("clear");
    }

    #[test]
    fn test_save_is_last_write_wins() {
        let store = temp_store();
        store.save("first").expect("save");
        store.save("second").expect("save");
        assert_eq!(store.load().expect("load").as_deref(), Some("second"));
        store.clear().expect("clear");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = temp_store();
        store.save("tok").expect("save");
        store.clear().expect("first clear");
        store.clear().expect("second clear");
        assert_eq!(store.load().expect("load"), None);
    }

    #[test]
    fn test_whitespace_only_slot_is_none() {
        let store = temp_store();
        store.save("  \n").expect("save");
        assert_eq!(store.load().expect("load"), None);
        store.clear().expect("clear");
    }

    #[test]
    fn test_clones_share_the_slot() {
        let store = temp_store();
        let other = store.clone();
        store.save("shared").expect("save");
        assert_eq!(other.load().expect("load").as_deref(), Some("shared"));
        other.clear().expect("clear");
        assert_eq!(store.load().expect("load"), None);
    }
}
