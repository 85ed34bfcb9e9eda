//! Durable session persistence for the authenticated user.
//!
//! The session is two keys stored file-per-key under a store directory:
//! the bearer token (plain string) and the user profile (JSON). The two are
//! written on login and removed together on logout or auth rejection; the
//! loader treats any partial or corrupt state as unauthenticated.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use crate::models::User;

/// Token file name in the session directory.
const TOKEN_FILE: &str = "token";

/// User profile file name in the session directory.
const USER_FILE: &str = "user.json";

/// Resolved authentication state at load time.
#[derive(Debug, Clone)]
pub enum AuthState {
    Unauthenticated,
    Authenticated { token: String, user: User },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }
}

/// Durable store for the bearer token and user profile.
///
/// Holds no in-memory state: every operation reads or writes the backing
/// files, so concurrent callers always observe the latest persisted session
/// and a clear is immediately visible to in-flight work. All operations are
/// idempotent; removing from an empty store is a no-op.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Open the store at the platform session directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::session_dir()?))
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create session directory {}", self.dir.display()))
    }

    /// Persist the bearer token.
    pub fn save_token(&self, token: &str) -> Result<()> {
        self.ensure_dir()?;
        fs::write(self.token_path(), token).context("Failed to write session token")
    }

    /// The current bearer token, or `None` when unset.
    pub fn token(&self) -> Option<String> {
        match fs::read_to_string(self.token_path()) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(_) => None,
        }
    }

    pub fn remove_token(&self) -> Result<()> {
        remove_if_exists(&self.token_path()).context("Failed to remove session token")
    }

    /// Persist the user profile.
    pub fn save_user(&self, user: &User) -> Result<()> {
        self.ensure_dir()?;
        let contents = serde_json::to_string_pretty(user)?;
        fs::write(self.user_path(), contents).context("Failed to write user profile")
    }

    /// The stored user profile. A corrupt or unparseable record reads as
    /// absent, never as an error.
    pub fn user(&self) -> Option<User> {
        let contents = fs::read_to_string(self.user_path()).ok()?;
        match serde_json::from_str(&contents) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user profile is unreadable, treating as absent");
                None
            }
        }
    }

    pub fn remove_user(&self) -> Result<()> {
        remove_if_exists(&self.user_path()).context("Failed to remove user profile")
    }

    /// Persist token and user together, the login/registration path.
    ///
    /// Two writes are needed; a crash between them leaves a partial state
    /// that `auth_state` resolves as unauthenticated.
    pub fn save_session(&self, token: &str, user: &User) -> Result<()> {
        self.save_token(token)?;
        self.save_user(user)
    }

    /// Remove token and user together. The only invalidation path, used for
    /// both logout and auth-rejected responses, so the two keys never desync.
    pub fn clear_all(&self) -> Result<()> {
        self.remove_token()?;
        self.remove_user()
    }

    /// Resolve the authentication state from disk.
    ///
    /// Both keys present means authenticated; anything else, including a
    /// token without a user or vice versa, is unauthenticated.
    pub fn auth_state(&self) -> AuthState {
        match (self.token(), self.user()) {
            (Some(token), Some(user)) => AuthState::Authenticated { token, user },
            (None, None) => AuthState::Unauthenticated,
            _ => {
                warn!("Partial session state on disk, treating as unauthenticated");
                AuthState::Unauthenticated
            }
        }
    }
}

fn remove_if_exists(path: &Path) -> std::io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
