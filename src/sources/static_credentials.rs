//! Fixed key pair source.

use async_trait::async_trait;

use crate::{Credentials, ProvideCredentials, Result};

/// Always returns the same credentials.
///
/// # Example
///
/// ```
/// use rolecred::sources::StaticCredentials;
/// use rolecred::ProvideCredentials;
///
/// #[tokio::main]
/// async fn main() -> rolecred::Result<()> {
///     let source = StaticCredentials::new("LTAI.example", "example-secret");
///     let creds = source.provide_credentials().await?;
///     assert_eq!(creds.access_key_id, "LTAI.example");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Creates a source for a long-lived key pair.
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key_id, access_key_secret),
        }
    }
}

impl From<Credentials> for StaticCredentials {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

#[async_trait]
impl ProvideCredentials for StaticCredentials {
    async fn provide_credentials(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_credentials() {
        let source = StaticCredentials::new("id", "secret");
        let creds = source.provide_credentials().await.unwrap();
        assert_eq!(creds, Credentials::new("id", "secret"));
        assert!(creds.security_token.is_none());
    }

    #[tokio::test]
    async fn test_from_temporary_credentials() {
        let source =
            StaticCredentials::from(Credentials::new("id", "secret").with_security_token("tok"));
        let creds = source.provide_credentials().await.unwrap();
        assert_eq!(creds.security_token.as_deref(), Some("tok"));
    }
}
