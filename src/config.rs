//! Provider configuration and the builder that validates it.

use std::fmt;
use std::sync::Arc;

use crate::validation::{validate_duration_seconds, validate_role_arn, validate_session_name};
use crate::{Clock, ConfigError, CredentialsProvider, Result, RoleAssumptionClient, SystemClock};

/// Session duration used when none is configured, in seconds.
pub const DEFAULT_DURATION_SECONDS: u64 = 3600;

/// Prefix of generated session names.
pub const DEFAULT_SESSION_NAME_PREFIX: &str = "rolecred-";

/// Generates a session name from the prefix and the clock's time in
/// milliseconds.
///
/// The format is stable, uniqueness is not: two providers built in the same
/// millisecond get the same name. Set a name explicitly when audit
/// correlation matters.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use rolecred::{config::default_session_name, ManualClock};
///
/// let clock = ManualClock::new(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap());
/// assert_eq!(default_session_name(&clock), "rolecred-1700000000123");
/// ```
pub fn default_session_name(clock: &dyn Clock) -> String {
    format!(
        "{}{}",
        DEFAULT_SESSION_NAME_PREFIX,
        clock.now().timestamp_millis()
    )
}

/// Validated, immutable provider configuration.
///
/// Obtained from [`CredentialsProvider::config`]; built only through
/// [`ProviderBuilder`].
#[derive(Clone)]
pub struct ProviderConfig {
    role_arn: String,
    session_name: String,
    duration_seconds: u64,
    pub(crate) client: Arc<dyn RoleAssumptionClient>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ProviderConfig {
    /// Role assumed on every renewal.
    pub fn role_arn(&self) -> &str {
        &self.role_arn
    }

    /// Session name sent on every renewal.
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Requested credential lifetime in seconds.
    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("role_arn", &self.role_arn)
            .field("session_name", &self.session_name)
            .field("duration_seconds", &self.duration_seconds)
            .field("client", &self.client)
            .field("clock", &self.clock)
            .finish()
    }
}

/// Builder for [`CredentialsProvider`].
///
/// Each setter validates its input immediately, so an invalid value fails
/// at the call that supplied it:
///
/// ```
/// use rolecred::CredentialsProvider;
///
/// let result = CredentialsProvider::builder("acs:ram::123:role/test")
///     .with_session_duration_seconds(100);
///
/// assert!(result.is_err());
/// ```
///
/// A complete configuration:
///
/// ```
/// # #[cfg(feature = "mock")]
/// # fn main() -> rolecred::Result<()> {
/// use rolecred::clients::mock::MockRoleAssumptionClient;
/// use rolecred::CredentialsProvider;
///
/// let provider = CredentialsProvider::builder("acs:ram::123:role/test")
///     .with_session_name("nightly-export")?
///     .with_session_duration_seconds(1800)?
///     .with_role_assumption_client(MockRoleAssumptionClient::new())
///     .build()?;
///
/// assert_eq!(provider.config().session_name(), "nightly-export");
/// assert_eq!(provider.config().duration_seconds(), 1800);
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "mock"))]
/// # fn main() {}
/// ```
pub struct ProviderBuilder {
    role_arn: String,
    session_name: Option<String>,
    duration_seconds: u64,
    client: Option<Arc<dyn RoleAssumptionClient>>,
    clock: Arc<dyn Clock>,
}

impl ProviderBuilder {
    /// Starts a configuration for the given role.
    ///
    /// The role ARN is checked by [`build`](Self::build).
    pub fn new(role_arn: impl Into<String>) -> Self {
        Self {
            role_arn: role_arn.into(),
            session_name: None,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            client: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the session name.
    ///
    /// The name is sent unchanged on every renewal, so all credentials the
    /// provider obtains can be correlated in audit logs. Defaults to
    /// [`default_session_name`] evaluated at build time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSessionName`] if the name breaks the
    /// naming rules (see [`validate_session_name`]).
    pub fn with_session_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_session_name(&name)?;
        self.session_name = Some(name);
        Ok(self)
    }

    /// Sets the requested credential lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DurationOutOfRange`] unless `seconds` lies in
    /// `[900, 3600]`.
    pub fn with_session_duration_seconds(mut self, seconds: u64) -> Result<Self> {
        validate_duration_seconds(seconds)?;
        self.duration_seconds = seconds;
        Ok(self)
    }

    /// Sets the client that performs role assumption. Required.
    pub fn with_role_assumption_client<C>(mut self, client: C) -> Self
    where
        C: RoleAssumptionClient + 'static,
    {
        self.client = Some(Arc::new(client));
        self
    }

    /// Sets the clock used for expiry checks and the default session name.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Validates the configuration and builds the provider.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingRoleArn`] / [`ConfigError::InvalidRoleArn`]
    /// - [`ConfigError::MissingClient`] if no client was set
    pub fn build(self) -> Result<CredentialsProvider> {
        validate_role_arn(&self.role_arn)?;
        let client = self.client.ok_or(ConfigError::MissingClient)?;
        let clock = self.clock;
        let session_name = self
            .session_name
            .unwrap_or_else(|| default_session_name(&*clock));

        Ok(CredentialsProvider::from_config(ProviderConfig {
            role_arn: self.role_arn,
            session_name,
            duration_seconds: self.duration_seconds,
            client,
            clock,
        }))
    }
}

impl fmt::Debug for ProviderBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderBuilder")
            .field("role_arn", &self.role_arn)
            .field("session_name", &self.session_name)
            .field("duration_seconds", &self.duration_seconds)
            .field("client", &self.client.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::clients::mock::MockRoleAssumptionClient;
    use crate::{ManualClock, RolecredError};
    use chrono::{TimeZone, Utc};

    fn clock() -> ManualClock {
        ManualClock::new(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap())
    }

    #[test]
    fn test_builder_defaults() {
        let provider = ProviderBuilder::new("acs:ram::123:role/test")
            .with_role_assumption_client(MockRoleAssumptionClient::new())
            .with_clock(clock())
            .build()
            .unwrap();

        let config = provider.config();
        assert_eq!(config.role_arn(), "acs:ram::123:role/test");
        assert_eq!(config.session_name(), "rolecred-1700000000123");
        assert_eq!(config.duration_seconds(), DEFAULT_DURATION_SECONDS);
    }

    #[test]
    fn test_builder_overrides() {
        let provider = ProviderBuilder::new("acs:ram::123:role/test")
            .with_session_name("audit-42")
            .unwrap()
            .with_session_duration_seconds(900)
            .unwrap()
            .with_role_assumption_client(MockRoleAssumptionClient::new())
            .build()
            .unwrap();

        assert_eq!(provider.config().session_name(), "audit-42");
        assert_eq!(provider.config().duration_seconds(), 900);
    }

    #[test]
    fn test_duration_rejected_by_setter() {
        let result =
            ProviderBuilder::new("acs:ram::123:role/test").with_session_duration_seconds(100);
        assert!(matches!(
            result,
            Err(RolecredError::Configuration(ConfigError::DurationOutOfRange { value: 100, .. }))
        ));
    }

    #[test]
    fn test_missing_role_arn() {
        let result = ProviderBuilder::new("")
            .with_role_assumption_client(MockRoleAssumptionClient::new())
            .build();
        assert!(matches!(
            result,
            Err(RolecredError::Configuration(ConfigError::MissingRoleArn))
        ));
    }

    #[test]
    fn test_missing_client() {
        let result = ProviderBuilder::new("acs:ram::123:role/test").build();
        assert!(matches!(
            result,
            Err(RolecredError::Configuration(ConfigError::MissingClient))
        ));
    }

    #[test]
    fn test_invalid_session_name() {
        let result = ProviderBuilder::new("acs:ram::123:role/test").with_session_name("bad name");
        assert!(matches!(
            result,
            Err(RolecredError::Configuration(ConfigError::InvalidSessionName(_)))
        ));
    }

    #[test]
    fn test_default_session_name_format() {
        let name = default_session_name(&clock());
        assert!(name.starts_with(DEFAULT_SESSION_NAME_PREFIX));
        assert!(validate_session_name(&name).is_ok());
    }
}
