use std::sync::Arc;

use common::drive::Drive;
use common::store::{ObjectStorage, StoreError};

use crate::auth::{Accounts, Sessions};
use crate::service_config::Config;

/// Main service state, shared by every request handler
#[derive(Debug, Clone)]
pub struct State {
    drive: Drive,
    storage: ObjectStorage,
    accounts: Arc<Accounts>,
    sessions: Sessions,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        tracing::debug!(storage = ?config.storage, "ServiceState::from_config - opening storage");
        let storage = ObjectStorage::new(&config.storage).await?;
        Ok(Self::from_storage(storage))
    }

    /// Build the state on an already open storage.
    pub fn from_storage(storage: ObjectStorage) -> Self {
        Self {
            drive: Drive::from_storage(storage.clone()),
            accounts: Arc::new(Accounts::new(storage.clone())),
            sessions: Sessions::new(),
            storage,
        }
    }

    pub fn drive(&self) -> &Drive {
        &self.drive
    }

    /// Raw object access, for everything that does not live in a tree.
    pub fn storage(&self) -> &ObjectStorage {
        &self.storage
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("storage setup error: {0}")]
    Storage(#[from] StoreError),
}
