use std::collections::BTreeMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use uuid::Uuid;

use common::store::{ObjectStorage, StoreError};

/// Key of the account table inside the object storage.
pub const ACCOUNTS_KEY: &str = "accounts.json";

const MAX_USERNAME_LEN: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    salt: String,
    password_hash: String,
}

impl AccountRecord {
    fn new(password: &str) -> Self {
        let salt = Uuid::new_v4().simple().to_string();
        let password_hash = digest(&salt, password);
        Self {
            salt,
            password_hash,
        }
    }

    fn matches(&self, password: &str) -> bool {
        digest(&self.salt, password) == self.password_hash
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("username already taken: {0}")]
    UsernameTaken(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("corrupt account table: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Usernames double as object key segments, so they are restricted to
///  `[A-Za-z0-9_.-]`, 1 to 64 characters, and never `.` or `..`.
pub fn validate_username(username: &str) -> Result<(), AccountError> {
    let valid = !username.is_empty()
        && username.len() <= MAX_USERNAME_LEN
        && username != "."
        && username != ".."
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid {
        Ok(())
    } else {
        Err(AccountError::InvalidUsername(username.to_string()))
    }
}

/// Credential table, one JSON document in the object storage.
#[derive(Debug)]
pub struct Accounts {
    storage: ObjectStorage,
    // serializes read-modify-write of the table
    write_lock: Mutex<()>,
}

impl Accounts {
    pub fn new(storage: ObjectStorage) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    async fn table(&self) -> Result<BTreeMap<String, AccountRecord>, AccountError> {
        match self.storage.get_object(ACCOUNTS_KEY).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Register a new account.
    pub async fn create(&self, username: &str, password: &str) -> Result<(), AccountError> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(AccountError::EmptyPassword);
        }

        let _guard = self.write_lock.lock().await;
        let mut table = self.table().await?;
        if table.contains_key(username) {
            return Err(AccountError::UsernameTaken(username.to_string()));
        }
        table.insert(username.to_string(), AccountRecord::new(password));

        let data = serde_json::to_vec(&table)?;
        self.storage.put_object(ACCOUNTS_KEY, Bytes::from(data)).await?;
        tracing::info!(username, "account created");
        Ok(())
    }

    /// Take `username` out of the table. Returns whether it was there.
    pub async fn remove(&self, username: &str) -> Result<bool, AccountError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.table().await?;
        if table.remove(username).is_none() {
            return Ok(false);
        }

        let data = serde_json::to_vec(&table)?;
        self.storage.put_object(ACCOUNTS_KEY, Bytes::from(data)).await?;
        tracing::info!(username, "account removed");
        Ok(true)
    }

    /// Whether `password` is right for `username`. Unknown users are simply
    ///  not verified.
    pub async fn verify(&self, username: &str, password: &str) -> Result<bool, AccountError> {
        let table = self.table().await?;
        Ok(table
            .get(username)
            .map(|record| record.matches(password))
            .unwrap_or(false))
    }
}
