//! Authentication service seam

use async_trait::async_trait;
use audiostories_core::{AppError, Result, Session};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Issues and tracks the signed-in session
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Signs in with existing credentials
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Creates an account and signs it in
    async fn create_account(&self, email: &str, password: &str) -> Result<Session>;

    /// Ends the current session, if any
    async fn sign_out(&self) -> Result<()>;

    /// Returns the active session
    fn current_session(&self) -> Option<Session>;
}

/// Stable user id for an email address. Case-insensitive.
pub fn uid_for_email(email: &str) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, email.trim().to_lowercase().as_bytes()).to_string()
}

#[derive(Debug, Default)]
struct AuthState {
    /// Lower-cased email to password
    accounts: HashMap<String, String>,
    session: Option<Session>,
}

/// Process-local authentication service.
///
/// Accounts live only as long as the service. User ids are derived from the
/// email address, so data keyed by uid in a persistent document store lines
/// up again across runs.
#[derive(Debug, Default)]
pub struct MemoryAuthService {
    state: Mutex<AuthState>,
}

impl MemoryAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out signed in as `email`, as after a restored session
    pub fn signed_in(email: &str, password: &str) -> Self {
        let service = Self::new();
        let mut state = service.lock();
        let key = email.trim().to_lowercase();
        state.session = Some(Session::new(uid_for_email(&key), email));
        state.accounts.insert(key, password.to_string());
        drop(state);
        service
    }

    // Every update leaves the state whole, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, AuthState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl AuthService for MemoryAuthService {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let key = email.trim().to_lowercase();
        let mut state = self.lock();
        let password_matches = state.accounts.get(&key).map(|stored| stored == password);
        match password_matches {
            Some(true) => {
                let session = Session::new(uid_for_email(&key), email.trim());
                state.session = Some(session.clone());
                Ok(session)
            }
            Some(false) => Err(AppError::AuthenticationFailed {
                reason: "wrong password".to_string(),
            }),
            None => Err(AppError::AuthenticationFailed {
                reason: format!("no account for {}", email.trim()),
            }),
        }
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<Session> {
        let key = email.trim().to_lowercase();
        if key.is_empty() || !key.contains('@') {
            return Err(AppError::AuthenticationFailed {
                reason: "badly formatted email address".to_string(),
            });
        }
        if password.is_empty() {
            return Err(AppError::AuthenticationFailed {
                reason: "password must not be empty".to_string(),
            });
        }

        let mut state = self.lock();
        if state.accounts.contains_key(&key) {
            return Err(AppError::AuthenticationFailed {
                reason: "email address already in use".to_string(),
            });
        }
        let session = Session::new(uid_for_email(&key), email.trim());
        state.accounts.insert(key, password.to_string());
        state.session = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self) -> Result<()> {
        self.lock().session = None;
        Ok(())
    }

    fn current_session(&self) -> Option<Session> {
        self.lock().session.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_is_case_insensitive_and_stable() {
        assert_eq!(uid_for_email("Ada@Example.com"), uid_for_email("ada@example.com"));
        assert_ne!(uid_for_email("ada@example.com"), uid_for_email("bob@example.com"));
    }

    #[tokio::test]
    async fn test_create_account_signs_in() {
        let auth = MemoryAuthService::new();
        assert!(auth.current_session().is_none());

        let session = auth.create_account("ada@example.com", "secret").await.unwrap();

        assert_eq!(session.uid, uid_for_email("ada@example.com"));
        assert_eq!(auth.current_session(), Some(session));
    }

    #[tokio::test]
    async fn test_duplicate_account_rejected() {
        let auth = MemoryAuthService::new();
        auth.create_account("ada@example.com", "secret").await.unwrap();

        let err = auth.create_account("ADA@example.com", "other").await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailed { .. }));
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let auth = MemoryAuthService::new();
        auth.create_account("ada@example.com", "secret").await.unwrap();
        auth.sign_out().await.unwrap();
        assert!(auth.current_session().is_none());

        assert!(auth.sign_in("ada@example.com", "wrong").await.is_err());
        assert!(auth.current_session().is_none());
        assert!(auth.sign_in("nobody@example.com", "secret").await.is_err());

        let session = auth.sign_in("ada@example.com", "secret").await.unwrap();
        assert_eq!(auth.current_session(), Some(session));
    }

    #[tokio::test]
    async fn test_create_account_validates_input() {
        let auth = MemoryAuthService::new();
        assert!(auth.create_account("not-an-email", "secret").await.is_err());
        assert!(auth.create_account("ada@example.com", "").await.is_err());
    }

    #[test]
    fn test_signed_in_constructor() {
        let auth = MemoryAuthService::signed_in("ada@example.com", "pw");
        let session = auth.current_session().unwrap();
        assert_eq!(session.uid, uid_for_email("ada@example.com"));
    }
}
