//! Rolecred - cached, self-renewing credentials for an assumed role.
//!
//! Rolecred exchanges a long-lived identity for short-lived credentials
//! scoped to a role, keeps the result in memory, and renews it shortly
//! before it expires. Callers that sign many requests pay for one role
//! assumption per credential lifetime instead of one per request.
//!
//! # Features
//!
//! - **Read-through cache**: one credential per provider, reused until it
//!   enters its expiry margin
//! - **Proportional margin**: renewal starts when 5% of the lifetime is left,
//!   so a 15 minute grant and a one hour grant are both renewed in time
//! - **Collapsed renewals**: concurrent callers that find the cache stale
//!   share a single role assumption call and its outcome
//! - **Validated configuration**: out-of-range durations and malformed names
//!   fail while the provider is being built
//! - **Pluggable collaborators**: bring your own [`RoleAssumptionClient`] and
//!   [`ProvideCredentials`] source; inject a [`Clock`] for tests
//!
//! # Quick Start
//!
//! ```no_run
//! use rolecred::{CredentialsProvider, RoleAssumptionClient};
//!
//! async fn sign_requests(client: impl RoleAssumptionClient + 'static) -> rolecred::Result<()> {
//!     let provider = CredentialsProvider::builder("acs:ram::123456789012:role/reader")
//!         .with_session_name("reporting-job")?
//!         .with_session_duration_seconds(900)?
//!         .with_role_assumption_client(client)
//!         .build()?;
//!
//!     for _ in 0..1000 {
//!         // only the first call, and one call every ~14 minutes, reaches the client
//!         let credential = provider.get_credentials().await?;
//!         println!("signing with {}", credential.access_key_id());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Provides |
//! |---------|---------|----------|
//! | `mock` | yes | [`clients::mock::MockRoleAssumptionClient`] |

mod cache;
pub mod client;
pub mod clients;
pub mod clock;
pub mod config;
pub mod credential;
pub mod error;
pub mod provider;
pub mod source;
pub mod sources;
pub mod validation;

pub use client::{AssumeRoleRequest, AssumedRole, RoleAssumptionClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ProviderBuilder, ProviderConfig};
pub use credential::{Credentials, SessionCredential};
pub use error::{AssumeRoleError, ConfigError, Result, RolecredError};
pub use provider::CredentialsProvider;
pub use source::ProvideCredentials;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_public_types_are_thread_safe() {
        assert_send_sync::<CredentialsProvider>();
        assert_send_sync::<SessionCredential>();
        assert_send_sync::<RolecredError>();
        assert_send_sync::<sources::ChainCredentials>();
    }
}
