use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::users::User;

/// Tokens and the signed-in user, persisted between CLI invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

/// Storage abstraction for credentials so sessions can be tested without disk.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<Credentials>, StoreError>;
    fn save(&self, credentials: &Credentials) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("credential file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("credential file {path} is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON file on disk, created on first save.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<Credentials>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Format {
                path: self.path.clone(),
                source,
            })
    }

    fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }
        let raw = serde_json::to_string_pretty(credentials).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;
        write_owner_only(&self.path, raw.as_bytes()).map_err(|err| self.io_error(err))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(self.io_error(err)),
        }
    }
}

/// Tokens are secrets: the file is created 0600 and an existing file is
/// narrowed to 0600 before it is rewritten.
fn write_owner_only(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    inner: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            inner: Mutex::new(Some(credentials)),
        }
    }

    pub fn snapshot(&self) -> Option<Credentials> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch_store() -> (TempDir, FileCredentialStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = FileCredentialStore::new(dir.path().join("session").join("credentials.json"));
        (dir, store)
    }

    fn sample() -> Credentials {
        Credentials {
            access_token: "access-1".to_string(),
            refresh_token: Some("refresh-1".to_string()),
            user: None,
        }
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let (_dir, store) = scratch_store();

        assert_eq!(store.load().expect("missing file loads"), None);
        store.save(&sample()).expect("save creates parent directory");
        assert_eq!(store.load().expect("load"), Some(sample()));

        store.clear().expect("clear");
        assert_eq!(store.load().expect("load after clear"), None);
        store.clear().expect("clearing twice is fine");
    }

    #[test]
    fn corrupt_file_is_reported() {
        let (_dir, store) = scratch_store();
        store.save(&sample()).expect("save");
        fs::write(store.path(), "{not json").expect("overwrite");

        let err = store.load().expect_err("corrupt file rejected");
        assert!(matches!(err, StoreError::Format { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn saved_tokens_are_readable_by_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_dir, store) = scratch_store();
        store.save(&sample()).expect("save");
        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).expect("loosen");
        store.save(&sample()).expect("save again");
        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o077, 0, "rewrite narrows an existing file");
        assert_eq!(store.load().expect("load"), Some(sample()));
    }

    #[test]
    fn memory_store_tracks_latest_save() {
        let store = MemoryCredentialStore::new();
        store.save(&sample()).expect("save");
        assert_eq!(store.snapshot(), Some(sample()));
        store.clear().expect("clear");
        assert_eq!(store.snapshot(), None);
    }
}
