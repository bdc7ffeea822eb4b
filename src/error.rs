//! Error types for rolecred operations.

use std::sync::Arc;
use thiserror::Error;

/// Result type alias using [`RolecredError`].
pub type Result<T> = std::result::Result<T, RolecredError>;

/// Errors surfaced by providers and credential sources.
///
/// `RolecredError` is `Clone` so that every caller collapsed onto a single renewal
/// can receive the same failure. The underlying client error is shared
/// through an [`Arc`].
#[derive(Debug, Clone, Error)]
pub enum RolecredError {
    /// The provider was misconfigured.
    ///
    /// Always raised while building the provider, never from
    /// [`get_credentials`](crate::CredentialsProvider::get_credentials).
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A renewal was required and the role assumption call failed.
    #[error("failed to assume role {role_arn} (session {session_name}): {source}")]
    Renewal {
        /// Role the renewal targeted
        role_arn: String,
        /// Session name sent with the request
        session_name: String,
        /// Failure reported by the role assumption client
        #[source]
        source: Arc<AssumeRoleError>,
    },

    /// A credential source had no credentials to offer.
    #[error("credentials not found: {0}")]
    CredentialsNotFound(String),
}

impl RolecredError {
    /// Wraps a client failure with the request it belonged to.
    ///
    /// # Example
    ///
    /// ```
    /// use rolecred::{AssumeRoleError, RolecredError};
    ///
    /// let err = RolecredError::renewal(
    ///     "acs:ram::123:role/test",
    ///     "nightly",
    ///     AssumeRoleError::Timeout,
    /// );
    ///
    /// assert_eq!(
    ///     err.to_string(),
    ///     "failed to assume role acs:ram::123:role/test (session nightly): role assumption timed out"
    /// );
    /// ```
    pub fn renewal(
        role_arn: impl Into<String>,
        session_name: impl Into<String>,
        err: AssumeRoleError,
    ) -> Self {
        Self::Renewal {
            role_arn: role_arn.into(),
            session_name: session_name.into(),
            source: Arc::new(err),
        }
    }

    /// Returns true if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Invalid provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Requested session duration is outside the permitted range.
    #[error("session duration {value}s is out of range ({min}s - {max}s)")]
    DurationOutOfRange {
        /// Rejected value in seconds
        value: u64,
        /// Smallest permitted duration
        min: u64,
        /// Largest permitted duration
        max: u64,
    },

    /// No role ARN was supplied.
    #[error("role ARN is required")]
    MissingRoleArn,

    /// Role ARN contains characters that cannot be sent.
    #[error("invalid role ARN: {0}")]
    InvalidRoleArn(String),

    /// Session name does not satisfy the naming rules.
    #[error("invalid session name: {0}")]
    InvalidSessionName(String),

    /// No role assumption client was supplied.
    #[error("a role assumption client is required")]
    MissingClient,
}

/// Failures reported by a [`RoleAssumptionClient`](crate::RoleAssumptionClient).
///
/// The cache treats every variant the same way: the renewal failed, the
/// cached state is left alone, and the error goes back to the caller.
#[derive(Debug, Error)]
pub enum AssumeRoleError {
    /// Transport-level failure (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(String),

    /// The remote side refused the request.
    #[error("request rejected ({code}): {message}")]
    Rejected {
        /// Service error code
        code: String,
        /// Service error message
        message: String,
    },

    /// The response could not be understood.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The call did not complete in time.
    #[error("role assumption timed out")]
    Timeout,

    /// The long-lived credentials used to sign the call were unavailable.
    #[error("source credentials unavailable: {0}")]
    SourceCredentials(#[source] RolecredError),

    /// Other error (catch-all).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = RolecredError::from(ConfigError::DurationOutOfRange {
            value: 100,
            min: 900,
            max: 3600,
        });
        assert_eq!(
            err.to_string(),
            "invalid configuration: session duration 100s is out of range (900s - 3600s)"
        );
        assert!(err.is_configuration());
    }

    #[test]
    fn test_renewal_error_context() {
        let err = RolecredError::renewal(
            "acs:ram::123:role/test",
            "session-a",
            AssumeRoleError::Rejected {
                code: "NoPermission".to_string(),
                message: "not allowed".to_string(),
            },
        );

        let msg = err.to_string();
        assert!(msg.contains("acs:ram::123:role/test"));
        assert!(msg.contains("session-a"));
        assert!(msg.contains("NoPermission"));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_error_source_chain() {
        let err = RolecredError::renewal("arn", "name", AssumeRoleError::Timeout);
        let source = err.source().expect("renewal error has a source");
        assert_eq!(source.to_string(), "role assumption timed out");
    }

    #[test]
    fn test_clones_share_client_error() {
        let err =
            RolecredError::renewal("arn", "name", AssumeRoleError::Network("reset".into()));
        let copy = err.clone();

        match (err, copy) {
            (
                RolecredError::Renewal { source: a, .. },
                RolecredError::Renewal { source: b, .. },
            ) => assert!(Arc::ptr_eq(&a, &b)),
            _ => panic!("expected renewal errors"),
        }
    }
}
