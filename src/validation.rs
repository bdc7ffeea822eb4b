//! Input validation for provider configuration.
//!
//! Everything here runs while the provider is being built, so a
//! misconfigured provider never reaches the renewal path.

use crate::{ConfigError, Result};

/// Shortest session a role assumption may request, in seconds.
pub const MIN_DURATION_SECONDS: u64 = 900;

/// Longest session a role assumption may request, in seconds.
pub const MAX_DURATION_SECONDS: u64 = 3600;

/// Maximum allowed length for a role ARN.
const MAX_ROLE_ARN_LENGTH: usize = 2048;

/// Session name length bounds.
const MIN_SESSION_NAME_LENGTH: usize = 2;
const MAX_SESSION_NAME_LENGTH: usize = 64;

/// Characters allowed in a session name besides ASCII alphanumerics.
const SESSION_NAME_PUNCTUATION: &str = "_.@-";

/// Validates a requested session duration.
///
/// # Errors
///
/// Returns [`ConfigError::DurationOutOfRange`] unless `seconds` lies in
/// `[900, 3600]`.
///
/// # Example
///
/// ```
/// use rolecred::validation::validate_duration_seconds;
///
/// assert!(validate_duration_seconds(900).is_ok());
/// assert!(validate_duration_seconds(3600).is_ok());
///
/// assert!(validate_duration_seconds(100).is_err());
/// assert!(validate_duration_seconds(3601).is_err());
/// ```
pub fn validate_duration_seconds(seconds: u64) -> Result<()> {
    if !(MIN_DURATION_SECONDS..=MAX_DURATION_SECONDS).contains(&seconds) {
        return Err(ConfigError::DurationOutOfRange {
            value: seconds,
            min: MIN_DURATION_SECONDS,
            max: MAX_DURATION_SECONDS,
        }
        .into());
    }
    Ok(())
}

/// Validates a role ARN.
///
/// Only structural checks are made; whether the role exists is for the
/// remote side to decide.
///
/// # Errors
///
/// - [`ConfigError::MissingRoleArn`] if the ARN is empty
/// - [`ConfigError::InvalidRoleArn`] if it is too long or contains
///   whitespace or control characters
pub fn validate_role_arn(role_arn: &str) -> Result<()> {
    if role_arn.is_empty() {
        return Err(ConfigError::MissingRoleArn.into());
    }

    if role_arn.len() > MAX_ROLE_ARN_LENGTH {
        return Err(ConfigError::InvalidRoleArn(format!(
            "exceeds maximum length of {} characters",
            MAX_ROLE_ARN_LENGTH
        ))
        .into());
    }

    if role_arn.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::InvalidRoleArn(
            "contains whitespace or control characters".to_string(),
        )
        .into());
    }

    Ok(())
}

/// Validates an explicitly supplied session name.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSessionName`] unless the name is 2-64
/// characters drawn from ASCII alphanumerics and `_.@-`.
///
/// # Example
///
/// ```
/// use rolecred::validation::validate_session_name;
///
/// assert!(validate_session_name("nightly-export").is_ok());
/// assert!(validate_session_name("ci@build.42").is_ok());
///
/// assert!(validate_session_name("x").is_err());
/// assert!(validate_session_name("has space").is_err());
/// ```
pub fn validate_session_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if !(MIN_SESSION_NAME_LENGTH..=MAX_SESSION_NAME_LENGTH).contains(&len) {
        return Err(ConfigError::InvalidSessionName(format!(
            "length must be between {} and {} characters",
            MIN_SESSION_NAME_LENGTH, MAX_SESSION_NAME_LENGTH
        ))
        .into());
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !SESSION_NAME_PUNCTUATION.contains(*c))
    {
        return Err(ConfigError::InvalidSessionName(format!(
            "character {:?} not allowed (allowed: letters, digits, {})",
            bad, SESSION_NAME_PUNCTUATION
        ))
        .into());
    }

    Ok(())
}
