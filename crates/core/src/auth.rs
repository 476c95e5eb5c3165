//! Credential store and role mapping
//!
//! The store is an injected, swappable interface; the in-memory map is the
//! default for demos and a test double elsewhere. Digests are unsalted
//! SHA-256; a real deployment swaps the store for one backed by a KDF and
//! persistence.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors from credential management.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("login '{0}' is already taken")]
    DuplicateLogin(String),
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,
}

/// Access roles, each mapped to a fixed module set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Administrator,
    SecurityAnalyst,
    Clinician,
}

/// Dashboard modules a role may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Home,
    Intrusion,
    Triage,
    Dashboard,
    UserAdmin,
}

impl Role {
    /// Static role → module mapping.
    pub fn modules(&self) -> &'static [Module] {
        match self {
            Role::Administrator => &[
                Module::Home,
                Module::Intrusion,
                Module::Triage,
                Module::Dashboard,
                Module::UserAdmin,
            ],
            Role::SecurityAnalyst => &[Module::Home, Module::Intrusion, Module::Dashboard],
            Role::Clinician => &[Module::Home, Module::Triage, Module::Dashboard],
        }
    }
}

/// A verified user, as handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub login: String,
    pub display_name: String,
    pub role: Role,
}

/// Swappable credential backend.
pub trait CredentialStore: Send + Sync {
    /// Check a login/password pair; `None` on any mismatch.
    fn verify(&self, login: &str, password: &str) -> Option<UserRecord>;

    /// Register a new account.
    fn create(
        &self,
        login: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<(), AuthError>;
}

struct StoredUser {
    password_digest: String,
    display_name: String,
    role: Role,
}

/// In-memory store keyed by lowercased login.
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

fn digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn canonical(login: &str) -> String {
    login.trim().to_lowercase()
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Store seeded with the three demo accounts.
    pub fn with_default_accounts() -> Self {
        let store = Self::new();
        let seeds = [
            ("admin", "twinguard2024", "Primary Admin", Role::Administrator),
            ("analyst", "analysis123", "Security Analyst", Role::SecurityAnalyst),
            ("clinician", "triage456", "Medical Practitioner", Role::Clinician),
        ];
        for (login, password, name, role) in seeds {
            // Seeding a fresh map cannot collide.
            let _ = store.create(login, password, name, role);
        }
        store
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::with_default_accounts()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn verify(&self, login: &str, password: &str) -> Option<UserRecord> {
        let key = canonical(login);
        let users = self.users.read().ok()?;
        let stored = users.get(&key)?;
        if stored.password_digest != digest(password) {
            return None;
        }
        Some(UserRecord {
            login: key,
            display_name: stored.display_name.clone(),
            role: stored.role,
        })
    }

    fn create(
        &self,
        login: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<(), AuthError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }
        let key = canonical(login);
        let mut users = self
            .users
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if users.contains_key(&key) {
            return Err(AuthError::DuplicateLogin(key));
        }
        users.insert(
            key,
            StoredUser {
                password_digest: digest(password),
                display_name: display_name.to_string(),
                role,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accounts_verify() {
        let store = MemoryCredentialStore::with_default_accounts();
        let user = store.verify("admin", "twinguard2024").unwrap();
        assert_eq!(user.role, Role::Administrator);
        assert!(store.verify("admin", "wrong").is_none());
        assert!(store.verify("ghost", "twinguard2024").is_none());
    }

    #[test]
    fn test_login_matching_trims_and_lowercases() {
        let store = MemoryCredentialStore::with_default_accounts();
        assert!(store.verify("  Admin ", "twinguard2024").is_some());
    }

    #[test]
    fn test_create_then_verify() {
        let store = MemoryCredentialStore::new();
        store
            .create("newuser", "longenough", "New User", Role::Clinician)
            .unwrap();
        let user = store.verify("newuser", "longenough").unwrap();
        assert_eq!(user.display_name, "New User");
        assert_eq!(user.role, Role::Clinician);
    }

    #[test]
    fn test_duplicate_login_rejected() {
        let store = MemoryCredentialStore::new();
        store
            .create("dup", "longenough", "First", Role::Clinician)
            .unwrap();
        assert_eq!(
            store.create("DUP", "longenough", "Second", Role::Clinician),
            Err(AuthError::DuplicateLogin("dup".to_string()))
        );
    }

    #[test]
    fn test_weak_password_rejected() {
        let store = MemoryCredentialStore::new();
        assert_eq!(
            store.create("u", "short", "U", Role::Clinician),
            Err(AuthError::WeakPassword)
        );
    }

    #[test]
    fn test_role_module_mapping() {
        assert!(Role::Administrator.modules().contains(&Module::UserAdmin));
        assert!(!Role::SecurityAnalyst.modules().contains(&Module::Triage));
        assert!(!Role::Clinician.modules().contains(&Module::Intrusion));
    }
}
