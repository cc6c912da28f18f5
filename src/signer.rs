//! Azure Storage SharedKey signer.

use std::fmt::Write;

use http::header;
use http::header::HeaderName;
use http::HeaderValue;
use http::Method;
use log::debug;
use percent_encoding::percent_encode;

use crate::constants::CONTENT_MD5;
use crate::constants::QUERY_ENCODE_SET;
use crate::constants::X_MS_DATE;
use crate::constants::X_MS_PREFIX;
use crate::credential::Credential;
use crate::error::Error;
use crate::error::Result;
use crate::hash::base64_decode;
use crate::hash::base64_hmac_sha256;
use crate::request::SigningRequest;
use crate::time;
use crate::time::format_http_date;
use crate::time::DateTime;

/// Signer that implements Azure Storage Shared Key Authorization.
///
/// - [Authorize with Shared Key](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
#[derive(Debug, Default)]
pub struct Signer {
    time: Option<DateTime>,
}

impl Signer {
    /// Create a signer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    #[cfg(test)]
    pub(crate) fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Signing request with header.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use anyhow::Result;
    /// use azsign::Config;
    /// use azsign::Loader;
    /// use azsign::Signer;
    /// use reqwest::Client;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<()> {
    ///     let config = Config {
    ///         account_name: Some("account_name".to_string()),
    ///         account_key: Some("YWNjb3VudF9rZXkK".to_string()),
    ///     };
    ///     let loader = Loader::new(config);
    ///     let signer = Signer::new();
    ///     // Construct request
    ///     let req = http::Request::get("https://test.blob.core.windows.net/testbucket/testblob")
    ///         .body("")?;
    ///     let (mut parts, body) = req.into_parts();
    ///     // Signing request with Signer
    ///     let credential = loader.load()?.expect("credential must be valid");
    ///     signer.sign(&mut parts, &credential)?;
    ///     let req = http::Request::from_parts(parts, body);
    ///     // Sending already signed request.
    ///     let resp = Client::new().execute(req.try_into()?).await?;
    ///     println!("resp got status: {}", resp.status());
    ///     Ok(())
    /// }
    /// ```
    pub fn sign(&self, parts: &mut http::request::Parts, cred: &Credential) -> Result<()> {
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "account name and account key are required",
            ));
        }

        // Decode the key before touching the request so that key errors
        // leave the request untouched.
        let key = base64_decode(cred.account_key()).map_err(|e| {
            Error::credential_invalid("account key is not valid base64").with_source(e)
        })?;

        let mut ctx = SigningRequest::build(parts)?;

        let now = self.time.unwrap_or_else(time::now);
        let string_to_sign = string_to_sign(&mut ctx, cred.account_name(), now)?;
        let signature = base64_hmac_sha256(&key, string_to_sign.as_bytes());

        ctx.headers.insert(header::AUTHORIZATION, {
            let mut value: HeaderValue =
                format!("SharedKey {}:{}", cred.account_name(), signature).parse()?;
            value.set_sensitive(true);

            value
        });

        for (_, v) in ctx.query.iter_mut() {
            *v = percent_encode(v.as_bytes(), &QUERY_ENCODE_SET).to_string();
        }
        ctx.apply(parts)
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-Encoding + "\n" +
/// Content-Language + "\n" +
/// Content-Length + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// Date + "\n" +
/// If-Modified-Since + "\n" +
/// If-Match + "\n" +
/// If-None-Match + "\n" +
/// If-Unmodified-Since + "\n" +
/// Range + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource;
/// ```
///
/// ## Reference
///
/// - [Blob, Queue, and File Services (Shared Key authorization)](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key)
fn string_to_sign(ctx: &mut SigningRequest, account_name: &str, now: DateTime) -> Result<String> {
    let mut s = String::with_capacity(128);

    writeln!(&mut s, "{}", ctx.method.as_str())?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::CONTENT_ENCODING)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::CONTENT_LANGUAGE)?)?;
    writeln!(
        &mut s,
        "{}",
        // Requests without body never sign a length. A literal "0" signs
        // as empty as well, matching service versions since 2015-02-21.
        if ctx.method == Method::GET || ctx.method == Method::HEAD {
            ""
        } else {
            ctx.header_get_or_default(&header::CONTENT_LENGTH)
                .map(|v| if v == "0" { "" } else { v })?
        }
    )?;
    writeln!(
        &mut s,
        "{}",
        ctx.header_get_or_default(&HeaderName::from_static(CONTENT_MD5))?
    )?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::CONTENT_TYPE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::DATE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_MODIFIED_SINCE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_MATCH)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_NONE_MATCH)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::IF_UNMODIFIED_SINCE)?)?;
    writeln!(&mut s, "{}", ctx.header_get_or_default(&header::RANGE)?)?;
    writeln!(&mut s, "{}", canonicalize_header(ctx, now)?)?;
    write!(&mut s, "{}", canonicalize_resource(ctx, account_name))?;

    debug!("string to sign: {}", &s);

    Ok(s)
}

/// ## Reference
///
/// - [Constructing the canonicalized headers string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-headers-string)
fn canonicalize_header(ctx: &mut SigningRequest, now: DateTime) -> Result<String> {
    ctx.headers
        .insert(X_MS_DATE, format_http_date(now).parse()?);

    Ok(SigningRequest::header_to_string(
        ctx.header_to_vec_with_prefix(X_MS_PREFIX),
        ":",
        "\n",
    ))
}

/// ## Reference
///
/// - [Constructing the canonicalized resource string](https://docs.microsoft.com/en-us/rest/api/storageservices/authorize-with-shared-key#constructing-the-canonicalized-resource-string)
fn canonicalize_resource(ctx: &mut SigningRequest, account_name: &str) -> String {
    if ctx.query.is_empty() {
        return format!("/{}{}", account_name, ctx.path);
    }

    let query = ctx
        .query
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect();

    format!(
        "/{}{}\n{}",
        account_name,
        ctx.path,
        SigningRequest::query_to_resource_string(query, ":", "\n")
    )
}
