//! Single-invocation dispatch with retry and backoff.
//!
//! The dispatcher is the sole place failure policy lives: every backend
//! call goes through [`Dispatcher::dispatch`], which bounds each attempt
//! with the request's timeout, retries rate-limited attempts with
//! exponential backoff plus jitter, and absorbs every other failure into
//! absence. Callers observe `Some(outcome)` or `None`, never an error.

use crate::ports::backend_gateway::BackendGateway;
use council_domain::{BackendId, InvocationOutcome, InvocationRequest};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Dispatches one invocation at a time against the gateway
#[derive(Clone)]
pub struct Dispatcher {
    gateway: Arc<dyn BackendGateway>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<dyn BackendGateway>) -> Self {
        Self { gateway }
    }

    /// Invoke one backend, retrying rate-limited attempts.
    ///
    /// Returns `None` when the attempt budget is exhausted or any
    /// non-retryable failure occurs (unknown backend, transport or
    /// protocol error, per-attempt timeout).
    pub async fn dispatch(
        &self,
        backend: &BackendId,
        request: &InvocationRequest,
    ) -> Option<InvocationOutcome> {
        let attempts = request.retries.max(1);

        for attempt in 0..attempts {
            let call = self.gateway.invoke(backend, request);
            match tokio::time::timeout(request.timeout, call).await {
                Ok(Ok(outcome)) => {
                    debug!(%backend, attempt, "backend call succeeded");
                    return Some(outcome);
                }
                Ok(Err(e)) if e.is_retryable() => {
                    let wait = backoff_delay(attempt);
                    warn!(
                        %backend,
                        attempt,
                        wait_secs = wait.as_secs_f64(),
                        "backend rate limited, backing off"
                    );
                    tokio::time::sleep(wait).await;
                }
                Ok(Err(e)) => {
                    warn!(%backend, attempt, error = %e, "backend call failed");
                    return None;
                }
                Err(_) => {
                    warn!(%backend, attempt, "backend call timed out");
                    return None;
                }
            }
        }

        warn!(%backend, attempts, "retry budget exhausted");
        None
    }
}

/// Exponential backoff with a uniform sub-second jitter: 2^attempt
/// seconds plus a random fraction.
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs_f64(2f64.powi(attempt as i32) + rand::random::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend_gateway::GatewayError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Gateway that rate-limits the first `limit` calls, then succeeds.
    struct RateLimitingGateway {
        calls: AtomicU32,
        limit: u32,
    }

    impl RateLimitingGateway {
        fn new(limit: u32) -> Self {
            Self {
                calls: AtomicU32::new(0),
                limit,
            }
        }
    }

    #[async_trait]
    impl BackendGateway for RateLimitingGateway {
        async fn invoke(
            &self,
            _backend: &BackendId,
            _request: &InvocationRequest,
        ) -> Result<InvocationOutcome, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.limit {
                Err(GatewayError::RateLimited)
            } else {
                Ok(InvocationOutcome::new("ok", "test-model"))
            }
        }
    }

    /// Gateway that always fails with a fixed error.
    struct FailingGateway {
        calls: AtomicU32,
        error: fn() -> GatewayError,
    }

    #[async_trait]
    impl BackendGateway for FailingGateway {
        async fn invoke(
            &self,
            _backend: &BackendId,
            _request: &InvocationRequest,
        ) -> Result<InvocationOutcome, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }
    }

    fn request_with_retries(retries: u32) -> InvocationRequest {
        InvocationRequest::from_prompt("hello").with_retries(retries)
    }

    #[tokio::test(start_paused = true)]
    async fn three_rate_limits_then_success_yields_outcome() {
        let gateway = Arc::new(RateLimitingGateway::new(3));
        let dispatcher = Dispatcher::new(gateway.clone());
        let started = tokio::time::Instant::now();

        let outcome = dispatcher
            .dispatch(&BackendId::new("b"), &request_with_retries(4))
            .await;

        assert_eq!(outcome.unwrap().content, "ok");
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 4);
        // Backoff slept 1+2+4 seconds plus at most 3 seconds of jitter.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(7), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_secs(11), "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limits_beyond_budget_yield_absence() {
        let gateway = Arc::new(RateLimitingGateway::new(u32::MAX));
        let dispatcher = Dispatcher::new(gateway.clone());

        let outcome = dispatcher
            .dispatch(&BackendId::new("b"), &request_with_retries(3))
            .await;

        assert!(outcome.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn transport_error_is_not_retried() {
        let gateway = Arc::new(FailingGateway {
            calls: AtomicU32::new(0),
            error: || GatewayError::Connection("refused".into()),
        });
        let dispatcher = Dispatcher::new(gateway.clone());

        let outcome = dispatcher
            .dispatch(&BackendId::new("b"), &request_with_retries(3))
            .await;

        assert!(outcome.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_backend_fails_once() {
        let gateway = Arc::new(FailingGateway {
            calls: AtomicU32::new(0),
            error: || GatewayError::UnknownBackend(BackendId::new("ghost")),
        });
        let dispatcher = Dispatcher::new(gateway.clone());

        let outcome = dispatcher
            .dispatch(&BackendId::new("ghost"), &request_with_retries(3))
            .await;

        assert!(outcome.is_none());
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_call_times_out_as_absence() {
        struct SlowGateway;

        #[async_trait]
        impl BackendGateway for SlowGateway {
            async fn invoke(
                &self,
                _backend: &BackendId,
                _request: &InvocationRequest,
            ) -> Result<InvocationOutcome, GatewayError> {
                tokio::time::sleep(Duration::from_secs(600)).await;
                Ok(InvocationOutcome::new("too late", "m"))
            }
        }

        let dispatcher = Dispatcher::new(Arc::new(SlowGateway));
        let request = InvocationRequest::from_prompt("hi")
            .with_timeout(Duration::from_secs(1))
            .with_retries(3);

        let outcome = dispatcher.dispatch(&BackendId::new("b"), &request).await;
        assert!(outcome.is_none());
    }

    #[test]
    fn backoff_grows_exponentially() {
        // Jitter is under a second, so consecutive delays always increase.
        for attempt in 0..4 {
            let shorter = backoff_delay(attempt);
            let longer = backoff_delay(attempt + 1);
            assert!(longer > shorter);
        }
        assert!(backoff_delay(0) >= Duration::from_secs(1));
        assert!(backoff_delay(0) < Duration::from_secs(2));
    }
}
