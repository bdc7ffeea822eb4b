//! Mock role assumption client for testing.
//!
//! This client answers every request in memory, with error injection and
//! artificial latency for testing code that depends on a provider.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::*;

/// Mock role assumption client.
///
/// Every successful call mints a distinct key pair (`STS.mock-1`,
/// `STS.mock-2`, ...). All knobs take `&self` so a test can keep an
/// `Arc` to the client while a provider owns another.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use rolecred::clients::mock::MockRoleAssumptionClient;
/// use rolecred::{AssumeRoleError, CredentialsProvider, RolecredError};
///
/// #[tokio::main]
/// async fn main() -> rolecred::Result<()> {
///     let client = Arc::new(MockRoleAssumptionClient::new());
///     let provider = CredentialsProvider::builder("acs:ram::123:role/test")
///         .with_role_assumption_client(Arc::clone(&client))
///         .build()?;
///
///     // Test error conditions
///     client.fail_with(AssumeRoleError::Timeout);
///     let result = provider.get_credentials().await;
///     assert!(matches!(result, Err(RolecredError::Renewal { .. })));
///
///     client.clear_failure();
///     provider.get_credentials().await?;
///     assert_eq!(client.call_count(), 2);
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockRoleAssumptionClient {
    calls: AtomicU64,
    requests: Mutex<Vec<AssumeRoleRequest>>,
    signed_with: Mutex<Vec<String>>,
    failure: Mutex<Option<AssumeRoleError>>,
    latency: Option<Duration>,
    reported_expiration: Option<DateTime<Utc>>,
    source: Option<Box<dyn ProvideCredentials>>,
}

impl MockRoleAssumptionClient {
    /// Creates a client that succeeds immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every response by `latency`.
    ///
    /// Useful for holding a renewal open while other callers pile up.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reports `expiration` in every response.
    pub fn with_reported_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.reported_expiration = Some(expiration);
        self
    }

    /// Fetches long-lived credentials from `source` before answering, the
    /// way a real client signs its request.
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: ProvideCredentials + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Makes every following call fail with `err` until cleared.
    pub fn fail_with(&self, err: AssumeRoleError) {
        *lock(&self.failure) = Some(err);
    }

    /// Lets following calls succeed again.
    pub fn clear_failure(&self) {
        *lock(&self.failure) = None;
    }

    /// Number of `assume_role` calls received, failed ones included.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<AssumeRoleRequest> {
        lock(&self.requests).clone()
    }

    /// Access key IDs of the source credentials used for each call.
    pub fn signed_with(&self) -> Vec<String> {
        lock(&self.signed_with).clone()
    }
}

#[async_trait]
impl RoleAssumptionClient for MockRoleAssumptionClient {
    async fn assume_role(
        &self,
        request: &AssumeRoleRequest,
    ) -> std::result::Result<AssumedRole, AssumeRoleError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.requests).push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(source) = &self.source {
            let signing = source
                .provide_credentials()
                .await
                .map_err(AssumeRoleError::SourceCredentials)?;
            lock(&self.signed_with).push(signing.access_key_id);
        }

        if let Some(err) = lock(&self.failure).as_ref() {
            return Err(replay(err));
        }

        let mut assumed = AssumedRole::new(
            format!("STS.mock-{}", call),
            format!("mock-secret-{}", call),
            format!("mock-token-{}", call),
        );
        assumed.expiration = self.reported_expiration;
        Ok(assumed)
    }
}

/// Reproduces an injected error for each call that hits it.
fn replay(err: &AssumeRoleError) -> AssumeRoleError {
    match err {
        AssumeRoleError::Network(msg) => AssumeRoleError::Network(msg.clone()),
        AssumeRoleError::Rejected { code, message } => AssumeRoleError::Rejected {
            code: code.clone(),
            message: message.clone(),
        },
        AssumeRoleError::MalformedResponse(msg) => AssumeRoleError::MalformedResponse(msg.clone()),
        AssumeRoleError::Timeout => AssumeRoleError::Timeout,
        AssumeRoleError::SourceCredentials(source) => {
            AssumeRoleError::SourceCredentials(source.clone())
        }
        AssumeRoleError::Other(other) => AssumeRoleError::Other(anyhow::anyhow!("{}", other)),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}
