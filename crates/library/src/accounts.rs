//! Sign-in, registration and profile access

use audiostories_core::{AppError, Result, Session, User};
use audiostories_database::{Backend, USERS};

/// Wraps the authentication service and the `users` collection.
///
/// Sign-in and registration failures come back as `None`; the reason is
/// logged rather than returned.
#[derive(Debug, Clone)]
pub struct AccountManager {
    backend: Backend,
}

impl AccountManager {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Option<Session> {
        match self.backend.auth().sign_in(email, password).await {
            Ok(session) => {
                log::info!("Signed in {}", session.email);
                Some(session)
            }
            Err(e) => {
                log::warn!("Error signing in with email: {}", e);
                None
            }
        }
    }

    /// Creates the account and writes a fresh profile with empty statistics.
    ///
    /// An existing profile document for the same user is replaced.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Option<Session> {
        let session = match self.backend.auth().create_account(email, password).await {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Registration failed: {}", e);
                return None;
            }
        };

        if let Err(e) = self.write_profile(&session, &User::new(name, email)).await {
            log::error!("Account {} created but profile not saved: {}", session.uid, e);
            return None;
        }
        log::info!("Registered {}", session.email);
        Some(session)
    }

    /// Signs in, registering the account when sign-in fails.
    ///
    /// A profile is only written when none exists yet, so statistics kept
    /// from earlier sessions survive.
    pub async fn sign_in_or_register(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Option<Session> {
        if let Some(session) = self.sign_in(email, password).await {
            return Some(session);
        }

        let session = match self.backend.auth().create_account(email, password).await {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Registration failed: {}", e);
                return None;
            }
        };

        let existing = match self.backend.documents().get(USERS, &session.uid).await {
            Ok(existing) => existing,
            Err(e) => {
                log::error!("Failed to look up profile {}: {}", session.uid, e);
                return None;
            }
        };

        if existing.is_none() {
            let name = name
                .map(str::to_string)
                .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());
            if let Err(e) = self.write_profile(&session, &User::new(name, email)).await {
                log::error!("Failed to create profile {}: {}", session.uid, e);
                return None;
            }
        }
        Some(session)
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.backend.auth().sign_out().await
    }

    pub fn current_session(&self) -> Option<Session> {
        self.backend.auth().current_session()
    }

    /// Reads the signed-in user's profile, `None` if it was never written
    pub async fn fetch_profile(&self) -> Result<Option<User>> {
        let session = self
            .current_session()
            .ok_or_else(|| AppError::unauthenticated("load the profile"))?;

        self.backend
            .documents()
            .get(USERS, &session.uid)
            .await?
            .map(|doc| doc.decode::<User>("User"))
            .transpose()
    }

    async fn write_profile(&self, session: &Session, user: &User) -> Result<()> {
        let data = serde_json::to_value(user)?;
        self.backend
            .documents()
            .set(USERS, &session.uid, data)
            .await?;
        Ok(())
    }
}
