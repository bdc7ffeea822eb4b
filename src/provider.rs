//! The credentials provider facade.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::CredentialCache;
use crate::config::{ProviderBuilder, ProviderConfig};
use crate::{Credentials, ProvideCredentials, Result, SessionCredential};

/// Provides short-lived credentials for one role, renewing them before they
/// expire.
///
/// A provider owns exactly one credential lineage: one role, one session
/// name, one requested duration. The first call to
/// [`get_credentials`](Self::get_credentials) assumes the role; later calls
/// return the cached credential until it enters its expiry margin, at which
/// point the next call renews it. No background task is involved.
///
/// Providers are `Send + Sync`; share one behind an [`Arc`] and concurrent
/// callers will trigger at most one renewal at a time.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "mock")]
/// # #[tokio::main]
/// # async fn main() -> rolecred::Result<()> {
/// use rolecred::clients::mock::MockRoleAssumptionClient;
/// use rolecred::CredentialsProvider;
///
/// let provider = CredentialsProvider::builder("acs:ram::123:role/test")
///     .with_session_duration_seconds(900)?
///     .with_role_assumption_client(MockRoleAssumptionClient::new())
///     .build()?;
///
/// let credential = provider.get_credentials().await?;
/// assert_eq!(credential.role_arn(), "acs:ram::123:role/test");
///
/// // served from cache
/// let again = provider.get_credentials().await?;
/// assert_eq!(credential, again);
/// assert_eq!(provider.renewal_count().await, 1);
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "mock"))]
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct CredentialsProvider {
    config: ProviderConfig,
    cache: CredentialCache,
}

impl CredentialsProvider {
    /// Starts building a provider for the given role.
    pub fn builder(role_arn: impl Into<String>) -> ProviderBuilder {
        ProviderBuilder::new(role_arn)
    }

    pub(crate) fn from_config(config: ProviderConfig) -> Self {
        Self {
            config,
            cache: CredentialCache::new(),
        }
    }

    /// Returns a credential valid beyond its safety margin.
    ///
    /// # Errors
    ///
    /// Returns [`RolecredError::Renewal`](crate::RolecredError::Renewal) if a renewal was
    /// needed and the client failed. The cache is left as it was and no
    /// retry is made; calling again will attempt a fresh renewal.
    pub async fn get_credentials(&self) -> Result<Arc<SessionCredential>> {
        self.cache.get(&self.config).await
    }

    /// The provider's configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Number of successful renewals performed so far.
    pub async fn renewal_count(&self) -> u64 {
        self.cache.renewal_count().await
    }

    /// The cached credential, if any, without checking its expiry.
    pub async fn cached(&self) -> Option<Arc<SessionCredential>> {
        self.cache.current().await
    }
}

/// Lets a provider act as the long-lived source for another provider's
/// client, chaining one role into the next.
#[async_trait]
impl ProvideCredentials for CredentialsProvider {
    async fn provide_credentials(&self) -> Result<Credentials> {
        let credential = self.get_credentials().await?;
        Ok(Credentials::from(&*credential))
    }
}
