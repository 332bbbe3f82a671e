use crate::error::{KycError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SESSION_FILE: &str = ".kyc/session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
}

/// Owner-only on unix, since the file holds a bearer token.
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // an existing file keeps its old mode on open
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

/// Client-side auth state. Only read and written at login and logout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

impl SessionState {
    pub fn path(state_dir: &Path) -> PathBuf {
        state_dir.join(SESSION_FILE)
    }

    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = Self::path(state_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content)
            .map_err(|e| KycError::Session(format!("{}: {}", path.display(), e)))
    }

    pub fn save(&mut self, state_dir: &Path) -> Result<PathBuf> {
        let path = Self::path(state_dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(KycError::Io)?;
        }
        self.saved_at = Some(Utc::now().to_rfc3339());
        let json = serde_json::to_string_pretty(self)?;
        write_private(&path, &json).map_err(KycError::Io)?;
        Ok(path)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn view(&self) -> View {
        if self.is_authenticated() {
            View::Dashboard
        } else {
            View::Login
        }
    }

    pub fn login(state_dir: &Path, token: &str, email: Option<&str>) -> Result<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(KycError::Session("token must not be empty".to_string()));
        }
        let mut state = Self {
            token: Some(token.to_string()),
            email: email.map(ToString::to_string),
            saved_at: None,
        };
        let path = state.save(state_dir)?;
        tracing::info!(path = %path.display(), "session saved");
        Ok(state)
    }

    pub fn logout(state_dir: &Path) -> Result<Self> {
        let mut state = Self::default();
        let path = state.save(state_dir)?;
        tracing::info!(path = %path.display(), "session cleared");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_session_file_means_logged_out() {
        let dir = TempDir::new().expect("temp dir should be created");
        let state = SessionState::load(dir.path()).expect("load should succeed");
        assert!(!state.is_authenticated());
        assert_eq!(state.view(), View::Login);
    }

    #[test]
    fn login_persists_token_and_logout_clears_it() {
        let dir = TempDir::new().expect("temp dir should be created");

        SessionState::login(dir.path(), "abc.def", Some("jane@example.com"))
            .expect("login should succeed");
        let loaded = SessionState::load(dir.path()).expect("load should succeed");
        assert_eq!(loaded.token.as_deref(), Some("abc.def"));
        assert_eq!(loaded.email.as_deref(), Some("jane@example.com"));
        assert!(loaded.saved_at.is_some());
        assert_eq!(loaded.view(), View::Dashboard);

        SessionState::logout(dir.path()).expect("logout should succeed");
        let cleared = SessionState::load(dir.path()).expect("load should succeed");
        assert!(cleared.token.is_none());
        assert_eq!(cleared.view(), View::Login);
    }

    #[test]
    fn login_rejects_blank_token() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = SessionState::login(dir.path(), "   ", None).expect_err("blank token should fail");
        assert!(err.to_string().contains("token must not be empty"));
        assert!(!SessionState::path(dir.path()).exists());
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join(".kyc")).expect("state dir should create");
        fs::write(SessionState::path(dir.path()), "{}").expect("file should write");
        fs::set_permissions(
            SessionState::path(dir.path()),
            fs::Permissions::from_mode(0o644),
        )
        .expect("permissions should set");

        SessionState::login(dir.path(), "abc.def", None).expect("login should succeed");
        let mode = fs::metadata(SessionState::path(dir.path()))
            .expect("session file should exist")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_session_file_is_reported() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join(".kyc")).expect("state dir should create");
        fs::write(SessionState::path(dir.path()), "{not json").expect("file should write");
        let err = SessionState::load(dir.path()).expect_err("corrupt file should fail");
        assert!(matches!(err, KycError::Session(_)));
    }
}
