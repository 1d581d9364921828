use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::FlightError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub is_admin: bool,
    pub user: Option<User>,
}

const DEMO_ACCOUNTS: &[(&str, &str, &str, bool)] = &[
    ("admin@aerolinea.com", "admin123", "Admin Demo", true),
    ("user@aerolinea.com", "user123", "Usuario Demo", false),
];

impl Session {
    pub fn sign_in(email: &str, password: &str) -> Option<Self> {
        DEMO_ACCOUNTS
            .iter()
            .find(|(e, p, _, _)| *e == email && *p == password)
            .map(|(email, _, name, is_admin)| Self {
                is_admin: *is_admin,
                user: Some(User {
                    name: name.to_string(),
                    email: email.to_string(),
                }),
            })
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os("AERODESK_SESSION").filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        let home = std::env::var_os("HOME").map_or_else(|| PathBuf::from("."), PathBuf::from);
        home.join(".aerodesk").join("session.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // Missing or unreadable means signed out.
    pub fn load(&self) -> Session {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Session::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read session file");
                return Session::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring corrupt session file");
            Session::default()
        })
    }

    pub fn save(&self, session: &Session) -> Result<(), FlightError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| FlightError::Session(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json).map_err(|e| FlightError::Session(e.to_string()))
    }

    pub fn clear(&self) -> Result<(), FlightError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FlightError::Session(e.to_string())),
        }
    }
}
