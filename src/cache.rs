//! Single-slot credential cache with serialized renewal.
//!
//! The cache holds at most one [`SessionCredential`]. Reads of a fresh
//! credential only take a shared read guard. When the credential is absent
//! or expiring, callers queue on a renewal mutex; the first one through
//! performs the role assumption and the rest reuse its outcome.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::client::AssumeRoleRequest;
use crate::config::ProviderConfig;
use crate::{AssumeRoleError, Result, RolecredError, SessionCredential};

#[derive(Debug, Default)]
struct Slot {
    current: Option<Arc<SessionCredential>>,
    /// Successful renewals.
    renewals: u64,
    /// Renewals attempted, successful or not.
    attempts: u64,
    /// Outcome of the latest attempt if it failed.
    last_failure: Option<RolecredError>,
}

/// Read-through cache for a single role-session credential.
#[derive(Debug)]
pub(crate) struct CredentialCache {
    slot: RwLock<Slot>,
    renewal: Mutex<()>,
}

impl CredentialCache {
    pub(crate) fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::default()),
            renewal: Mutex::new(()),
        }
    }

    /// Returns the cached credential, renewing it first if it is absent or
    /// about to expire.
    ///
    /// Concurrent callers that find the cache stale collapse onto a single
    /// renewal and all see its result, success or failure.
    pub(crate) async fn get(&self, config: &ProviderConfig) -> Result<Arc<SessionCredential>> {
        let observed_attempts = {
            let slot = self.slot.read().await;
            if let Some(credential) = fresh(&slot, config) {
                debug!(role_arn = config.role_arn(), "returning cached credential");
                return Ok(credential);
            }
            slot.attempts
        };

        let _renewing = self.renewal.lock().await;

        // Someone else may have renewed while we waited for the lock.
        {
            let slot = self.slot.read().await;
            if let Some(credential) = fresh(&slot, config) {
                debug!(
                    role_arn = config.role_arn(),
                    "credential renewed by a concurrent caller"
                );
                return Ok(credential);
            }
            if slot.attempts != observed_attempts {
                if let Some(err) = &slot.last_failure {
                    debug!(
                        role_arn = config.role_arn(),
                        "concurrent renewal failed, sharing its error"
                    );
                    return Err(err.clone());
                }
            }
        }

        self.renew(config).await
    }

    async fn renew(&self, config: &ProviderConfig) -> Result<Arc<SessionCredential>> {
        let request = AssumeRoleRequest::new(
            config.role_arn(),
            config.session_name(),
            config.duration_seconds(),
        );
        debug!(
            role_arn = %request.role_arn,
            session_name = %request.session_name,
            duration_seconds = request.duration_seconds,
            "no usable credential cached, assuming role"
        );

        let issued_at = config.clock.now();
        let outcome = config
            .client
            .assume_role(&request)
            .await
            .map(|assumed| SessionCredential::new(&request, assumed, issued_at))
            .and_then(|credential| usable(credential, config.clock.now()));

        let mut slot = self.slot.write().await;
        slot.attempts += 1;

        match outcome {
            Ok(credential) => {
                let credential = Arc::new(credential);
                slot.renewals += 1;
                slot.current = Some(Arc::clone(&credential));
                slot.last_failure = None;
                info!(
                    role_arn = %request.role_arn,
                    session_name = %request.session_name,
                    renewal = slot.renewals,
                    expires_at = %credential.expires_at(),
                    "assumed role"
                );
                Ok(credential)
            }
            Err(source) => {
                let err = RolecredError::renewal(request.role_arn, request.session_name, source);
                warn!(error = %err, "role assumption failed");
                slot.last_failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Number of successful renewals so far.
    pub(crate) async fn renewal_count(&self) -> u64 {
        self.slot.read().await.renewals
    }

    /// The cached credential, fresh or not, without renewing.
    pub(crate) async fn current(&self) -> Option<Arc<SessionCredential>> {
        self.slot.read().await.current.clone()
    }
}

/// Rejects a credential that is already inside its expiry margin on arrival.
fn usable(
    credential: SessionCredential,
    now: DateTime<Utc>,
) -> std::result::Result<SessionCredential, AssumeRoleError> {
    if credential.will_soon_expire(now) {
        return Err(AssumeRoleError::MalformedResponse(format!(
            "credential issued at {} was already expiring at {} (expires {})",
            credential.issued_at(),
            now,
            credential.expires_at()
        )));
    }
    Ok(credential)
}

fn fresh(slot: &Slot, config: &ProviderConfig) -> Option<Arc<SessionCredential>> {
    let now = config.clock.now();
    slot.current
        .as_ref()
        .filter(|credential| !credential.will_soon_expire(now))
        .cloned()
}
