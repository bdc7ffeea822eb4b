//! Ordered fallback across several sources.

use std::fmt;

use async_trait::async_trait;
use tracing::debug;

use crate::{Credentials, ProvideCredentials, Result, RolecredError};

/// Provides credentials from the first source that succeeds.
///
/// # Example
///
/// To prefer environment variables and fall back to a fixed key pair:
///
/// ```
/// use rolecred::sources::{ChainCredentials, EnvCredentials, StaticCredentials};
///
/// let source = ChainCredentials::new()
///     .push(EnvCredentials::new())
///     .push(StaticCredentials::new("LTAI.fallback", "fallback-secret"));
/// assert_eq!(source.len(), 2);
/// ```
#[derive(Default)]
pub struct ChainCredentials {
    sources: Vec<Box<dyn ProvideCredentials>>,
}

impl ChainCredentials {
    /// Creates an empty chain.
    ///
    /// An empty chain always fails; add sources with [`push`](Self::push).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source, tried after every source already in the chain.
    pub fn push<S>(mut self, source: S) -> Self
    where
        S: ProvideCredentials + 'static,
    {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources in the chain.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources have been added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for ChainCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainCredentials")
            .field(
                "sources",
                &format_args!("[<{} entries>]", self.sources.len()),
            )
            .finish()
    }
}

#[async_trait]
impl ProvideCredentials for ChainCredentials {
    async fn provide_credentials(&self) -> Result<Credentials> {
        let mut errors = Vec::with_capacity(self.sources.len());
        for (index, source) in self.sources.iter().enumerate() {
            match source.provide_credentials().await {
                Ok(credentials) => return Ok(credentials),
                Err(err) => {
                    debug!(index, error = %err, "credential source failed, trying next");
                    errors.push(err);
                }
            }
        }

        if errors.is_empty() {
            return Err(RolecredError::CredentialsNotFound(
                "credential chain is empty".to_string(),
            ));
        }

        let messages: Vec<_> = errors.iter().map(|err| format!("- {}", err)).collect();
        Err(RolecredError::CredentialsNotFound(format!(
            "no source in the chain produced credentials; all errors:\n{}",
            messages.join("\n")
        )))
    }
}
