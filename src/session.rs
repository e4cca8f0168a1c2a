//! Bearer-token session lifecycle.
//!
//! A [`SessionManager`] holds at most one token. It is created empty (or
//! restored from its [`SessionStore`]), filled on successful login, and
//! cleared on logout or on any 401 from an authenticated call. Clearing
//! always schedules a [`Route::Login`] for the front end to act on.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Where the front end should send the user next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Inventory,
}

/// Why the session was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// User asked to sign out
    UserRequested,
    /// Server answered 401 to an authenticated call
    Expired,
}

/// Backing storage for the token, scoped to one client "tab".
pub trait SessionStore {
    fn load(&self) -> io::Result<Option<String>>;
    fn save(&mut self, token: &str) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
}

/// Process-scoped storage; the token disappears when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Option<String>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> io::Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.token = None;
        Ok(())
    }
}

/// Stores the token in a single file so consecutive CLI invocations share it.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Writes the token readable by the current user only.
    fn save(&mut self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // mode() only applies when the file is created
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.as_bytes())
    }

    fn clear(&mut self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

pub struct SessionManager {
    token: Option<String>,
    store: Box<dyn SessionStore>,
    pending_route: Option<Route>,
    last_logout: Option<LogoutReason>,
}

impl SessionManager {
    /// Creates an empty session backed by `store`. Call [`restore`](Self::restore)
    /// to pick up a token saved by an earlier run.
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self {
            token: None,
            store,
            pending_route: None,
            last_logout: None,
        }
    }

    /// Empty session that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStore::default()))
    }

    /// Loads a previously saved token. Without one, routes to login.
    pub fn restore(&mut self) -> bool {
        match self.store.load() {
            Ok(Some(token)) => {
                log::debug!("Restored session token (length {})", token.len());
                self.token = Some(token);
                true
            }
            Ok(None) => {
                log::debug!("No stored session token");
                self.pending_route = Some(Route::Login);
                false
            }
            Err(e) => {
                log::warn!("Failed to read stored session, starting signed out: {}", e);
                self.pending_route = Some(Route::Login);
                false
            }
        }
    }

    /// Stores a freshly issued token and routes to the inventory view.
    pub fn begin(&mut self, token: String) {
        log::info!("Signed in (token length {})", token.len());
        if let Err(e) = self.store.save(&token) {
            log::warn!("Failed to persist session token: {}", e);
        }
        self.token = Some(token);
        self.last_logout = None;
        self.pending_route = Some(Route::Inventory);
    }

    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    /// `Authorization` header value for the held token, if any.
    pub fn current_credential_header(&self) -> Option<String> {
        self.token.as_ref().map(|token| format!("Bearer {token}"))
    }

    /// Clears the token after a 401 and schedules navigation to login.
    pub fn force_logout(&mut self) {
        log::info!("Session expired, clearing credentials");
        self.clear(LogoutReason::Expired);
    }

    /// User-initiated sign out.
    pub fn logout(&mut self) {
        log::info!("Logging out");
        self.clear(LogoutReason::UserRequested);
    }

    fn clear(&mut self, reason: LogoutReason) {
        self.token = None;
        if let Err(e) = self.store.clear() {
            log::warn!("Failed to clear stored session: {}", e);
        }
        self.last_logout = Some(reason);
        self.pending_route = Some(Route::Login);
    }

    /// Navigation scheduled by the last session change; consumed once.
    pub fn take_pending_route(&mut self) -> Option<Route> {
        self.pending_route.take()
    }

    pub fn pending_route(&self) -> Option<Route> {
        self.pending_route
    }

    pub fn last_logout(&self) -> Option<LogoutReason> {
        self.last_logout
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("signed_in", &self.is_signed_in())
            .field("pending_route", &self.pending_route)
            .field("last_logout", &self.last_logout)
            .finish()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
