//! Environment variable source.

use std::env;

use async_trait::async_trait;

use crate::{Credentials, ProvideCredentials, Result, RolecredError};

const ACCESS_KEY_ID: &str = "ALIBABA_CLOUD_ACCESS_KEY_ID";
const ACCESS_KEY_SECRET: &str = "ALIBABA_CLOUD_ACCESS_KEY_SECRET";
const SECURITY_TOKEN: &str = "ALIBABA_CLOUD_SECURITY_TOKEN";

/// Reads credentials from environment variables on every call.
///
/// By default the key pair comes from `ALIBABA_CLOUD_ACCESS_KEY_ID` and
/// `ALIBABA_CLOUD_ACCESS_KEY_SECRET`, plus `ALIBABA_CLOUD_SECURITY_TOKEN` if
/// set. The variable names can be overridden.
///
/// # Example
///
/// ```no_run
/// use rolecred::sources::EnvCredentials;
///
/// let source = EnvCredentials::new()
///     .with_access_key_id_var("MYAPP_ACCESS_KEY_ID")
///     .with_access_key_secret_var("MYAPP_ACCESS_KEY_SECRET");
/// ```
#[derive(Debug, Clone)]
pub struct EnvCredentials {
    access_key_id_var: String,
    access_key_secret_var: String,
    security_token_var: String,
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self {
            access_key_id_var: ACCESS_KEY_ID.to_string(),
            access_key_secret_var: ACCESS_KEY_SECRET.to_string(),
            security_token_var: SECURITY_TOKEN.to_string(),
        }
    }
}

impl EnvCredentials {
    /// Creates a source reading the default variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the variable holding the access key ID.
    pub fn with_access_key_id_var(mut self, name: impl Into<String>) -> Self {
        self.access_key_id_var = name.into();
        self
    }

    /// Sets the variable holding the access key secret.
    pub fn with_access_key_secret_var(mut self, name: impl Into<String>) -> Self {
        self.access_key_secret_var = name.into();
        self
    }

    /// Sets the variable holding the optional security token.
    pub fn with_security_token_var(mut self, name: impl Into<String>) -> Self {
        self.security_token_var = name.into();
        self
    }
}

#[async_trait]
impl ProvideCredentials for EnvCredentials {
    async fn provide_credentials(&self) -> Result<Credentials> {
        let access_key_id = required(&self.access_key_id_var)?;
        let access_key_secret = required(&self.access_key_secret_var)?;

        let mut credentials = Credentials::new(access_key_id, access_key_secret);
        if let Some(token) = read_env(&self.security_token_var)? {
            credentials = credentials.with_security_token(token);
        }
        Ok(credentials)
    }
}

fn required(name: &str) -> Result<String> {
    read_env(name)?.ok_or_else(|| {
        RolecredError::CredentialsNotFound(format!("environment variable {} is not set", name))
    })
}

/// Unset and empty variables both read as `None`.
fn read_env(name: &str) -> Result<Option<String>> {
    match env::var(name) {
        Ok(value) if value.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(RolecredError::CredentialsNotFound(format!(
            "environment variable {} contains invalid UTF-8",
            name
        ))),
    }
}
