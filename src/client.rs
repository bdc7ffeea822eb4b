//! Role assumption client trait.
//!
//! This module defines the [`RoleAssumptionClient`] trait, the only outbound
//! call a provider makes. Implementations own the network exchange, request
//! signing, and any timeout or retry policy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use crate::AssumeRoleError;

/// Parameters of one role assumption call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssumeRoleRequest {
    /// Role to assume.
    pub role_arn: String,

    /// Name identifying the session in audit logs.
    pub session_name: String,

    /// Requested credential lifetime.
    pub duration_seconds: u64,
}

impl AssumeRoleRequest {
    /// Creates a request.
    pub fn new(
        role_arn: impl Into<String>,
        session_name: impl Into<String>,
        duration_seconds: u64,
    ) -> Self {
        Self {
            role_arn: role_arn.into(),
            session_name: session_name.into(),
            duration_seconds,
        }
    }
}

/// Credentials returned by a successful role assumption.
#[derive(Clone)]
pub struct AssumedRole {
    /// Temporary access key ID.
    pub access_key_id: String,

    /// Temporary access key secret.
    pub access_key_secret: String,

    /// Security token accompanying the key pair.
    pub security_token: String,

    /// Expiry reported by the remote side, if the response carried one.
    pub expiration: Option<DateTime<Utc>>,
}

impl AssumedRole {
    /// Creates a response without a reported expiry.
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        security_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: security_token.into(),
            expiration: None,
        }
    }

    /// Records the expiry the remote side reported.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }
}

impl fmt::Debug for AssumedRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssumedRole")
            .field("access_key_id", &self.access_key_id)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

/// Exchanges a long-lived identity for short-lived role credentials.
///
/// Implementations typically hold a [`ProvideCredentials`](crate::ProvideCredentials)
/// source for the long-lived identity and use it to sign each call. The
/// provider never touches that source itself.
///
/// All implementations must be `Send + Sync`; a provider may be shared
/// across tasks.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use rolecred::{AssumeRoleError, AssumeRoleRequest, AssumedRole, RoleAssumptionClient};
///
/// #[derive(Debug)]
/// struct Fixed;
///
/// #[async_trait]
/// impl RoleAssumptionClient for Fixed {
///     async fn assume_role(
///         &self,
///         request: &AssumeRoleRequest,
///     ) -> Result<AssumedRole, AssumeRoleError> {
///         Ok(AssumedRole::new("STS.id", "secret", format!("token-{}", request.session_name)))
///     }
/// }
/// ```
#[async_trait]
pub trait RoleAssumptionClient: Send + Sync + fmt::Debug {
    /// Performs one role assumption call.
    ///
    /// # Errors
    ///
    /// Any [`AssumeRoleError`]. Timeouts are reported as
    /// [`AssumeRoleError::Timeout`].
    async fn assume_role(&self, request: &AssumeRoleRequest)
        -> Result<AssumedRole, AssumeRoleError>;
}

#[async_trait]
impl<T> RoleAssumptionClient for Arc<T>
where
    T: RoleAssumptionClient + ?Sized,
{
    async fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> Result<AssumedRole, AssumeRoleError> {
        (**self).assume_role(request).await
    }
}
