//! Injectable authentication context.
//!
//! The session is an explicit value handed to whoever needs it, backed by a
//! [`TokenStore`] so tests can use memory and the CLI a JSON file.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::SessionError;
use crate::utils::{app_data_dir, write_atomic};

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Doctor,
    Customer,
    Manager,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Doctor => "Doctor",
            Role::Customer => "Customer",
            Role::Manager => "Manager",
        }
    }

    /// Portal a user of this role lands on after sign-in.
    pub fn home_portal(self) -> Portal {
        match self {
            Role::Admin => Portal::Admin,
            Role::Doctor => Portal::Doctor,
            Role::Customer => Portal::Customer,
            Role::Manager => Portal::Manager,
        }
    }

    /// Admins can open every portal; everyone else only their own.
    pub fn can_open(self, portal: Portal) -> bool {
        self == Role::Admin || self.home_portal() == portal
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portal {
    Admin,
    Doctor,
    Customer,
    Manager,
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Portal::Admin => "admin",
            Portal::Doctor => "doctor",
            Portal::Customer => "customer",
            Portal::Manager => "manager",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: SessionUser,
}

/// Persistence for the signed-in session.
pub trait TokenStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError>;
    fn save(&mut self, session: &StoredSession) -> Result<(), SessionError>;
    fn clear(&mut self) -> Result<(), SessionError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    session: Option<StoredSession>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: StoredSession) -> Self {
        Self {
            session: Some(session),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        Ok(self.session.clone())
    }

    fn save(&mut self, session: &StoredSession) -> Result<(), SessionError> {
        self.session = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        self.session = None;
        Ok(())
    }
}

/// Session kept as JSON under the application data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new() -> Self {
        Self::at(app_data_dir().join(SESSION_FILE))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredSession>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&mut self, session: &StoredSession) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(session)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SessionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

pub struct SessionContext<S: TokenStore> {
    store: S,
    current: Option<StoredSession>,
}

impl<S: TokenStore> SessionContext<S> {
    /// Starts signed out; call [`SessionContext::initialize_auth`] to restore.
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// Restores a stored session. Unreadable state is discarded and the
    /// context stays signed out.
    pub fn initialize_auth(&mut self) -> Result<Option<&SessionUser>, SessionError> {
        self.current = match self.store.load() {
            Ok(Some(session)) if !session.token.trim().is_empty() => Some(session),
            Ok(Some(_)) => {
                self.store.clear()?;
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "discarding unreadable session");
                self.store.clear()?;
                None
            }
        };
        Ok(self.current_user())
    }

    pub fn login(&mut self, token: &str, user: SessionUser) -> Result<&SessionUser, SessionError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let session = StoredSession {
            token: token.to_string(),
            user,
        };
        self.store.save(&session)?;
        info!(user = %session.user.id, role = %session.user.role, "signed in");
        Ok(&self.current.insert(session).user)
    }

    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.store.clear()?;
        if let Some(session) = self.current.take() {
            info!(user = %session.user.id, "signed out");
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current.as_ref().map(|session| &session.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.current_user().map_or(false, |user| user.role == role)
    }

    pub fn require_user(&self) -> Result<&SessionUser, SessionError> {
        self.current_user().ok_or(SessionError::NotAuthenticated)
    }

    pub fn require_portal(&self, portal: Portal) -> Result<&SessionUser, SessionError> {
        let user = self.require_user()?;
        if user.role.can_open(portal) {
            Ok(user)
        } else {
            Err(SessionError::Forbidden {
                role: user.role.to_string(),
                portal: portal.to_string(),
            })
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            name: "Sam Doe".into(),
            email: "sam@example.com".into(),
            role,
        }
    }

    #[test]
    fn login_and_logout_round_through_store() {
        let mut session = SessionContext::new(MemoryTokenStore::new());
        assert!(session.initialize_auth().unwrap().is_none());
        session.login(" tok-1 ", user(Role::Doctor)).unwrap();
        assert_eq!(session.token(), Some("tok-1"));
        assert!(session.store().load().unwrap().is_some());

        session.logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(session.store().load().unwrap().is_none());
    }

    #[test]
    fn empty_tokens_are_rejected() {
        let mut session = SessionContext::new(MemoryTokenStore::new());
        assert!(matches!(
            session.login("   ", user(Role::Admin)),
            Err(SessionError::EmptyToken)
        ));
    }

    #[test]
    fn portal_access_follows_role() {
        let mut session = SessionContext::new(MemoryTokenStore::new());
        assert!(matches!(
            session.require_portal(Portal::Doctor),
            Err(SessionError::NotAuthenticated)
        ));

        session.login("t", user(Role::Doctor)).unwrap();
        assert!(session.require_portal(Portal::Doctor).is_ok());
        let err = session.require_portal(Portal::Admin).unwrap_err();
        assert_eq!(err.to_string(), "Doctor accounts cannot open the admin portal");

        session.login("t", user(Role::Admin)).unwrap();
        assert!(session.require_portal(Portal::Manager).is_ok());
        assert!(session.has_role(Role::Admin));
    }

    #[test]
    fn file_store_restores_and_discards_corrupt_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let stored = StoredSession {
            token: "abc".into(),
            user: user(Role::Customer),
        };
        let mut store = FileTokenStore::at(path.clone());
        store.save(&stored).unwrap();

        let mut session = SessionContext::new(FileTokenStore::at(path.clone()));
        assert_eq!(session.initialize_auth().unwrap(), Some(&stored.user));

        fs::write(&path, "not json").unwrap();
        let mut session = SessionContext::new(FileTokenStore::at(path.clone()));
        assert!(session.initialize_auth().unwrap().is_none());
        assert!(!path.exists());
    }
}
