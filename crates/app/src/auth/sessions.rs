use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

/// Process-local token -> owner table. Lost on restart.
#[derive(Debug, Clone, Default)]
pub struct Sessions {
    tokens: Arc<RwLock<HashMap<String, String>>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh token for `owner`.
    pub fn issue(&self, owner: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.write().insert(token.clone(), owner.to_string());
        token
    }

    pub fn owner(&self, token: &str) -> Option<String> {
        self.tokens.read().get(token).cloned()
    }

    /// Forget `token`. Returns whether it was live.
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.write().remove(token).is_some()
    }
}
