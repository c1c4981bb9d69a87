//! In-memory student accounts.
//!
//! Accounts live for the lifetime of the process only.

use std::sync::RwLock;

use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UserError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("user already exists")]
    AlreadyExists,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("user registry lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
}

/// What a successful login returns. Never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub username: String,
    pub class: String,
    pub score: f64,
    pub role: Role,
}

struct Account {
    username: String,
    class: String,
    salt: [u8; 16],
    password_hash: [u8; 32],
}

/// Student accounts keyed by case-insensitive username.
///
/// Not a production password scheme. Salts come from `fastrand`, which is
/// not a CSPRNG, and passwords are a single unstretched SHA-256 digest
/// compared in non-constant time. Swap in a real KDF such as argon2 before
/// exposing the service beyond a trusted network.
#[derive(Default)]
pub struct UserRegistry {
    accounts: RwLock<Vec<Account>>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a student. Usernames are unique ignoring case.
    pub fn register(&self, username: &str, password: &str, class: &str) -> Result<(), UserError> {
        let username = required(username, "username")?;
        // Passwords are checked for blankness but stored exactly as typed.
        required(password, "password")?;
        let class = required(class, "class")?;

        let mut accounts = self.accounts.write().map_err(|_| UserError::Poisoned)?;
        if accounts
            .iter()
            .any(|a| same_username(&a.username, username))
        {
            return Err(UserError::AlreadyExists);
        }

        let mut salt = [0u8; 16];
        salt.iter_mut().for_each(|b| *b = fastrand::u8(..));
        accounts.push(Account {
            username: username.to_string(),
            class: class.to_string(),
            salt,
            password_hash: hash_password(&salt, password),
        });
        tracing::info!(username, class, "registered student");
        Ok(())
    }

    pub fn login(&self, username: &str, password: &str) -> Result<UserProfile, UserError> {
        let accounts = self.accounts.read().map_err(|_| UserError::Poisoned)?;
        accounts
            .iter()
            .find(|a| {
                same_username(&a.username, username.trim())
                    && hash_password(&a.salt, password) == a.password_hash
            })
            .map(|a| UserProfile {
                username: a.username.clone(),
                class: a.class.clone(),
                score: 0.0,
                role: Role::Student,
            })
            .ok_or(UserError::InvalidCredentials)
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, UserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(UserError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn same_username(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn hash_password(salt: &[u8], password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
