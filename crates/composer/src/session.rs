use std::sync::Arc;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Authenticated account as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub bio: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: String::new(),
            role: UserRole::User,
            is_verified: false,
            bio: String::new(),
        }
    }

    /// True when the account carries a usable username.
    pub fn is_identified(&self) -> bool {
        !self.username.is_empty()
    }
}

/// Session presence. Cloned handles share state; the composer only ever reads it.
#[derive(Clone)]
pub struct UserStore {
    user: Arc<ArcSwapOption<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            user: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn current_user(&self) -> Option<Arc<User>> {
        self.user.load_full()
    }

    pub fn sign_in(&self, user: User) {
        tracing::debug!(username = %user.username, "session established");
        self.user.store(Some(Arc::new(user)));
    }

    pub fn sign_out(&self) {
        tracing::debug!("session cleared");
        self.user.store(None);
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
