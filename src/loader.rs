use std::sync::Arc;
use std::sync::Mutex;

use log::debug;

use crate::config::Config;
use crate::credential::Credential;
use crate::error::Result;

/// Loader will load credential from different sources.
#[cfg_attr(test, derive(Debug))]
pub struct Loader {
    config: Config,

    credential: Arc<Mutex<Option<Credential>>>,
}

impl Loader {
    /// Create a new loader via config.
    pub fn new(config: Config) -> Self {
        Self {
            config,

            credential: Arc::default(),
        }
    }

    /// Load credential.
    pub fn load(&self) -> Result<Option<Credential>> {
        // Return cached credential if it's valid.
        if let Some(cred) = self.credential.lock().expect("lock poisoned").clone() {
            return Ok(Some(cred));
        }

        let cred = self.load_via_config()?;
        if let Some(cred) = &cred {
            debug!("loaded credential: {:?}", cred);
        }

        let mut lock = self.credential.lock().expect("lock poisoned");
        *lock = cred.clone();

        Ok(cred)
    }

    fn load_via_config(&self) -> Result<Option<Credential>> {
        if let (Some(name), Some(key)) = (&self.config.account_name, &self.config.account_key) {
            let cred = Credential::new(name, key);
            if cred.is_valid() {
                return Ok(Some(cred));
            }
        }

        Ok(None)
    }
}
