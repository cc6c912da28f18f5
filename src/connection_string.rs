use std::collections::HashMap;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;

/// Parses an [Azure connection string][1].
///
/// [1]: https://learn.microsoft.com/en-us/azure/storage/common/storage-configure-connection-string
pub(crate) fn parse(conn_str: &str) -> Result<Config> {
    let key_values = parse_into_key_values(conn_str)?;

    // Try to read development storage configuration.
    if key_values.get("UseDevelopmentStorage") == Some(&"true".to_string()) {
        return Ok(development_storage_config(&key_values));
    }

    Ok(Config {
        account_name: key_values.get("AccountName").cloned(),
        account_key: key_values.get("AccountKey").cloned(),
    })
}

fn parse_into_key_values(conn_str: &str) -> Result<HashMap<String, String>> {
    conn_str
        .trim()
        .replace('\n', "")
        .split(';')
        .filter(|&field| !field.is_empty())
        .map(|field| {
            let (key, value) = field.trim().split_once('=').ok_or_else(|| {
                Error::config_invalid(format!(
                    "invalid connection string, expected '=' in field: {field}"
                ))
            })?;
            Ok((key.to_string(), value.to_string()))
        })
        .collect()
}

fn development_storage_config(key_values: &HashMap<String, String>) -> Config {
    // Azurite defaults.
    const AZURITE_DEFAULT_STORAGE_ACCOUNT_NAME: &str = "devstoreaccount1";
    const AZURITE_DEFAULT_STORAGE_ACCOUNT_KEY: &str =
        "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

    let account_name = key_values
        .get("AccountName")
        .cloned()
        .unwrap_or(AZURITE_DEFAULT_STORAGE_ACCOUNT_NAME.to_string());
    let account_key = key_values
        .get("AccountKey")
        .cloned()
        .unwrap_or(AZURITE_DEFAULT_STORAGE_ACCOUNT_KEY.to_string());

    Config {
        account_name: Some(account_name),
        account_key: Some(account_key),
    }
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::config::Config;

    #[test]
    fn test_parse() {
        let test_cases = vec![
            (
                "basic creds",
                "AccountName=testaccount;AccountKey=testkey",
                Some(Config {
                    account_name: Some("testaccount".to_string()),
                    account_key: Some("testkey".to_string()),
                }),
            ),
            (
                "endpoint only",
                "BlobEndpoint=https://testaccount.blob.core.windows.net/",
                Some(Config::default()),
            ),
            (
                "development storage",
                "UseDevelopmentStorage=true",
                Some(Config {
                    account_name: Some("devstoreaccount1".to_string()),
                    account_key: Some("Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==".to_string()),
                }),
            ),
            (
                "development storage with custom account values",
                "UseDevelopmentStorage=true;AccountName=myAccount;AccountKey=myKey",
                Some(Config {
                    account_name: Some("myAccount".to_string()),
                    account_key: Some("myKey".to_string()),
                }),
            ),
            (
                "unknown key is ignored",
                "SomeUnknownKey=123;AccountName=testaccount",
                Some(Config {
                    account_name: Some("testaccount".to_string()),
                    account_key: None,
                }),
            ),
            (
                "leading and trailing `;`",
                ";AccountName=testaccount;",
                Some(Config {
                    account_name: Some("testaccount".to_string()),
                    account_key: None,
                }),
            ),
            (
                "line breaks",
                r#"
                    AccountName=testaccount;
                    AccountKey=testkey"#,
                Some(Config {
                    account_name: Some("testaccount".to_string()),
                    account_key: Some("testkey".to_string()),
                }),
            ),
            (
                "missing equals",
                "AccountNameexample;AccountKey=example",
                None, // This should fail due to missing '='
            ),
        ];

        for (name, conn_str, expected) in test_cases {
            let actual = parse(conn_str);

            if let Some(expected) = expected {
                assert!(actual.is_ok(), "Failed for case: {}", name);
                assert_eq!(actual.unwrap(), expected, "Failed for case: {}", name);
            } else {
                assert!(actual.is_err(), "Expected error for case: {}", name);
            }
        }
    }
}
