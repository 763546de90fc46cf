//! Authenticated session issued by the authentication service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A signed-in user context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable user id; also the id of the user's profile document
    pub uid: String,
    pub email: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session stamped with the current time
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
            signed_in_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let before = Utc::now();
        let session = Session::new("uid-1", "ada@example.com");
        assert_eq!(session.uid, "uid-1");
        assert_eq!(session.email, "ada@example.com");
        assert!(session.signed_in_at >= before);
    }
}
