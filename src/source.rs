//! The long-lived credential source capability.
//!
//! Everything that can hand out signing credentials implements
//! [`ProvideCredentials`]: fixed key pairs, environment variables, chains
//! of other sources, and [`CredentialsProvider`](crate::CredentialsProvider)
//! itself. Role assumption clients hold one to sign their calls.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::{Credentials, Result};

/// A source of signing credentials.
///
/// All implementations must be `Send + Sync` to support concurrent access
/// across async tasks.
///
/// # Implementations
///
/// - [`StaticCredentials`](crate::sources::StaticCredentials): a fixed key pair
/// - [`EnvCredentials`](crate::sources::EnvCredentials): environment variables
/// - [`ChainCredentials`](crate::sources::ChainCredentials): first source that succeeds
/// - [`CredentialsProvider`](crate::CredentialsProvider): an assumed role
#[async_trait]
pub trait ProvideCredentials: Send + Sync + fmt::Debug {
    /// Returns the current credentials.
    ///
    /// # Errors
    ///
    /// - [`RolecredError::CredentialsNotFound`](crate::RolecredError::CredentialsNotFound):
    ///   the source has nothing to offer
    /// - [`RolecredError::Renewal`](crate::RolecredError::Renewal): the source is a provider
    ///   and its renewal failed
    async fn provide_credentials(&self) -> Result<Credentials>;
}

#[async_trait]
impl<T> ProvideCredentials for Arc<T>
where
    T: ProvideCredentials + ?Sized,
{
    async fn provide_credentials(&self) -> Result<Credentials> {
        (**self).provide_credentials().await
    }
}
