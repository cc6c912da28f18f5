use std::fmt::Debug;
use std::fmt::Formatter;

use crate::utils::Redact;

/// Credential that holds the storage account name and account key.
#[derive(Default, Clone)]
pub struct Credential {
    account_name: String,
    account_key: String,
}

impl Credential {
    /// Create a new credential.
    ///
    /// `account_key` is the base64 encoded key as shown in the azure portal.
    pub fn new(account_name: impl Into<String>, account_key: impl Into<String>) -> Self {
        Self {
            account_name: account_name.into(),
            account_key: account_key.into(),
        }
    }

    /// Storage account name.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Base64 encoded storage account key.
    pub fn account_key(&self) -> &str {
        &self.account_key
    }

    /// Whether this credential carries everything needed for signing.
    pub fn is_valid(&self) -> bool {
        !self.account_name.is_empty() && !self.account_key.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("account_name", &self.account_name)
            .field("account_key", &Redact::from(&self.account_key))
            .finish()
    }
}
