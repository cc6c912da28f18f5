//! Signing Azure Storage API requests without effort.
//!
//! `azsign` computes the `Authorization: SharedKey` header for Azure Storage
//! requests. It canonicalizes the request the way the service expects,
//! signs the result with HMAC-SHA256 and applies both the signature and the
//! `x-ms-date` header back onto the request.
//!
//! # Example
//!
//! ```no_run
//! use anyhow::Result;
//! use azsign::Config;
//! use azsign::Loader;
//! use azsign::Signer;
//! use reqwest::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Loader can also pick up the account from the environment or an
//!     // Azure connection string.
//!     let config = Config {
//!         account_name: Some("account_name".to_string()),
//!         account_key: Some("YWNjb3VudF9rZXkK".to_string()),
//!     };
//!     let loader = Loader::new(config);
//!     let signer = Signer::new();
//!     // Construct request
//!     let req = http::Request::put("https://account_name.blob.core.windows.net/container/blob")
//!         .header("x-ms-version", "2021-12-02")
//!         .header("x-ms-blob-type", "BlockBlob")
//!         .header("content-length", "11")
//!         .body("Hello World")?;
//!     let (mut parts, body) = req.into_parts();
//!     // Signing request with Signer
//!     let credential = loader.load()?.expect("credential must be valid");
//!     signer.sign(&mut parts, &credential)?;
//!     // Sending already signed request.
//!     let req = http::Request::from_parts(parts, body);
//!     let resp = Client::new().execute(req.try_into()?).await?;
//!     println!("resp got status: {}", resp.status());
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod config;
pub use config::Config;

mod connection_string;

mod credential;
pub use credential::Credential;

mod loader;
pub use loader::Loader;

mod request;
pub use request::SigningRequest;

mod signer;
pub use signer::Signer;

mod error;
pub use error::Error;
pub use error::ErrorKind;
pub use error::Result;

mod constants;
mod hash;
mod time;
mod utils;
