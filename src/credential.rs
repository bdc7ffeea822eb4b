//! Credential data structures.

use crate::client::{AssumeRoleRequest, AssumedRole};
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Fraction of a credential's lifetime held back before its expiry.
///
/// A credential is treated as expiring once it has less than
/// `lifetime / EXPIRY_MARGIN_DIVISOR` left.
pub const EXPIRY_MARGIN_DIVISOR: i32 = 20;

/// Signing material: an access key pair, plus a security token when the
/// pair is temporary.
///
/// This is what a [`ProvideCredentials`](crate::ProvideCredentials) source
/// hands out. The secret and token are not printed in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The access key ID.
    pub access_key_id: String,

    /// The access key secret.
    pub access_key_secret: String,

    /// The security token, present for temporary credentials.
    pub security_token: Option<String>,
}

impl Credentials {
    /// Creates long-lived credentials from a key pair.
    pub fn new(access_key_id: impl Into<String>, access_key_secret: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            security_token: None,
        }
    }

    /// Attaches a security token.
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = Some(token.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("temporary", &self.security_token.is_some())
            .finish_non_exhaustive()
    }
}

/// One issued short-lived credential for an assumed role.
///
/// Never mutated once built; a renewal always produces a new value. The
/// secret and security token are not printed in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential {
    access_key_id: String,
    access_key_secret: String,
    security_token: String,
    role_arn: String,
    session_name: String,
    duration_seconds: u64,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionCredential {
    /// Builds a credential from a role assumption response.
    ///
    /// `issued_at` should be read before the request was sent. The expiry is
    /// `issued_at + request.duration_seconds`, pulled in to the expiry the
    /// response reported if that comes first. A reported expiry that is not
    /// after `issued_at` is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use rolecred::{AssumeRoleRequest, AssumedRole, SessionCredential};
    ///
    /// let issued = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    /// let request = AssumeRoleRequest::new("acs:ram::123:role/test", "nightly", 900);
    /// let assumed = AssumedRole::new("STS.id", "secret", "token");
    ///
    /// let credential = SessionCredential::new(&request, assumed, issued);
    /// assert_eq!(credential.expires_at(), issued + Duration::seconds(900));
    /// assert!(!credential.will_soon_expire(issued + Duration::seconds(854)));
    /// assert!(credential.will_soon_expire(issued + Duration::seconds(855)));
    /// ```
    pub fn new(
        request: &AssumeRoleRequest,
        assumed: AssumedRole,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let requested_expiry = issued_at + seconds(request.duration_seconds);
        let expires_at = match assumed.expiration {
            // A reported expiry at or before issue time is clock skew, not a lifetime.
            Some(reported) if reported > issued_at && reported < requested_expiry => reported,
            _ => requested_expiry,
        };

        Self {
            access_key_id: assumed.access_key_id,
            access_key_secret: assumed.access_key_secret,
            security_token: assumed.security_token,
            role_arn: request.role_arn.clone(),
            session_name: request.session_name.clone(),
            duration_seconds: request.duration_seconds,
            issued_at,
            expires_at,
        }
    }

    /// The temporary access key ID.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The temporary access key secret.
    pub fn access_key_secret(&self) -> &str {
        &self.access_key_secret
    }

    /// The security token that must accompany the key pair.
    pub fn security_token(&self) -> &str {
        &self.security_token
    }

    /// The role this credential was issued for.
    pub fn role_arn(&self) -> &str {
        &self.role_arn
    }

    /// The session name sent when this credential was requested.
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// The duration requested when this credential was minted.
    pub fn duration_seconds(&self) -> u64 {
        self.duration_seconds
    }

    /// When the renewal that produced this credential started.
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// When this credential stops being accepted.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Safety margin held back from the expiry: a twentieth of the lifetime.
    pub fn expiry_margin(&self) -> Duration {
        let lifetime = self.expires_at - self.issued_at;
        if lifetime <= Duration::zero() {
            return Duration::zero();
        }
        lifetime / EXPIRY_MARGIN_DIVISOR
    }

    /// The first instant at which this credential counts as expiring.
    pub fn stale_at(&self) -> DateTime<Utc> {
        self.expires_at - self.expiry_margin()
    }

    /// Returns true once `now` has reached the safety margin.
    ///
    /// The boundary itself counts as expiring.
    pub fn will_soon_expire(&self, now: DateTime<Utc>) -> bool {
        now >= self.stale_at()
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredential")
            .field("access_key_id", &self.access_key_id)
            .field("role_arn", &self.role_arn)
            .field("session_name", &self.session_name)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl From<&SessionCredential> for Credentials {
    fn from(credential: &SessionCredential) -> Self {
        Self {
            access_key_id: credential.access_key_id.clone(),
            access_key_secret: credential.access_key_secret.clone(),
            security_token: Some(credential.security_token.clone()),
        }
    }
}

// Saturates well below chrono's limit; durations are validated to an hour anyway.
fn seconds(value: u64) -> Duration {
    Duration::seconds(value.min(u64::from(u32::MAX)) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn credential(duration: u64, expiration: Option<DateTime<Utc>>) -> SessionCredential {
        let request = AssumeRoleRequest::new("acs:ram::123:role/test", "session", duration);
        let mut assumed = AssumedRole::new("STS.key", "secret", "token");
        assumed.expiration = expiration;
        SessionCredential::new(&request, assumed, issued())
    }

    #[test]
    fn test_expiry_derived_from_requested_duration() {
        let cred = credential(3600, None);
        assert_eq!(cred.expires_at(), issued() + Duration::seconds(3600));
        assert_eq!(cred.expiry_margin(), Duration::seconds(180));
        assert_eq!(cred.role_arn(), "acs:ram::123:role/test");
        assert_eq!(cred.session_name(), "session");
        assert_eq!(cred.duration_seconds(), 3600);
    }

    #[test]
    fn test_margin_scales_with_short_grants() {
        let cred = credential(900, None);
        assert_eq!(cred.expiry_margin(), Duration::seconds(45));
        assert_eq!(cred.stale_at(), issued() + Duration::seconds(855));
    }

    #[test]
    fn test_boundary_counts_as_expiring() {
        let cred = credential(900, None);
        let threshold = cred.stale_at();

        assert!(!cred.will_soon_expire(threshold - Duration::milliseconds(1)));
        assert!(cred.will_soon_expire(threshold));
        assert!(cred.will_soon_expire(threshold + Duration::seconds(1)));
    }

    #[test]
    fn test_earlier_reported_expiry_wins() {
        let reported = issued() + Duration::seconds(1200);
        let cred = credential(3600, Some(reported));

        assert_eq!(cred.expires_at(), reported);
        assert_eq!(cred.expiry_margin(), Duration::seconds(60));
    }

    #[test]
    fn test_later_reported_expiry_is_capped() {
        let cred = credential(900, Some(issued() + Duration::seconds(7200)));
        assert_eq!(cred.expires_at(), issued() + Duration::seconds(900));
    }

    #[test]
    fn test_reported_expiry_in_the_past_is_ignored() {
        for reported in [issued() - Duration::seconds(600), issued()] {
            let cred = credential(900, Some(reported));
            assert_eq!(cred.expires_at(), issued() + Duration::seconds(900));
            assert_eq!(cred.expiry_margin(), Duration::seconds(45));
            assert!(!cred.will_soon_expire(issued()));
        }
    }

    #[test]
    fn test_debug_hides_secrets() {
        let cred = credential(900, None);
        let debug = format!("{:?}", cred);
        assert!(debug.contains("STS.key"));
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("token"));

        let long_lived = Credentials::new("LTAI.key", "hunter2").with_security_token("tok");
        let debug = format!("{:?}", long_lived);
        assert!(debug.contains("LTAI.key"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok\""));
    }

    #[test]
    fn test_session_credential_into_credentials() {
        let cred = credential(900, None);
        let creds = Credentials::from(&cred);
        assert_eq!(creds.access_key_id, "STS.key");
        assert_eq!(creds.access_key_secret, "secret");
        assert_eq!(creds.security_token.as_deref(), Some("token"));
    }
}
