use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// File-backed holder for the backend's session cookie.
///
/// The backend issues an opaque `session=...` cookie on login; every
/// authenticated call replays it verbatim. Nothing else is persisted between
/// invocations; profile and financial data are re-fetched each time.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        SessionStore { path }
    }

    /// The stored cookie, if a login session exists.
    pub fn cookie(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let cookie = raw.trim().to_string();
                if cookie.is_empty() { None } else { Some(cookie) }
            }
            Err(_) => None,
        }
    }

    pub fn save(&self, cookie: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        fs::write(&self.path, cookie)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        debug!("Saved session to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleared session at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            }),
        }
    }
}
