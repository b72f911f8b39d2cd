//! Scatter/gather over the dispatcher.
//!
//! The one place "ask many in parallel" lives: every job is dispatched
//! concurrently, all are awaited (no sibling cancellation on failure),
//! and results come back keyed by the caller's key rather than by
//! completion order. An absent outcome for one key never fails the
//! aggregate.

use super::dispatch::Dispatcher;
use council_domain::{BackendId, InvocationOutcome, InvocationRequest};
use std::collections::HashMap;
use std::hash::Hash;
use tokio::task::JoinSet;
use tracing::warn;

impl Dispatcher {
    /// Dispatch every job concurrently and wait for all to settle.
    pub async fn dispatch_all<K>(
        &self,
        jobs: Vec<(K, BackendId, InvocationRequest)>,
    ) -> HashMap<K, Option<InvocationOutcome>>
    where
        K: Eq + Hash + Send + 'static,
    {
        let mut join_set = JoinSet::new();

        for (key, backend, request) in jobs {
            let dispatcher = self.clone();
            join_set.spawn(async move {
                let outcome = dispatcher.dispatch(&backend, &request).await;
                (key, outcome)
            });
        }

        let mut outcomes = HashMap::new();

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((key, outcome)) => {
                    outcomes.insert(key, outcome);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::backend_gateway::{BackendGateway, GatewayError};
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Gateway that answers with the backend id, failing ids that start
    /// with "bad".
    struct EchoGateway;

    #[async_trait]
    impl BackendGateway for EchoGateway {
        async fn invoke(
            &self,
            backend: &BackendId,
            _request: &InvocationRequest,
        ) -> Result<InvocationOutcome, GatewayError> {
            if backend.as_str().starts_with("bad") {
                Err(GatewayError::RequestFailed("boom".into()))
            } else {
                Ok(InvocationOutcome::new(
                    format!("answer from {backend}"),
                    backend.as_str(),
                ))
            }
        }
    }

    fn job(key: usize, backend: &str) -> (usize, BackendId, InvocationRequest) {
        (key, BackendId::new(backend), InvocationRequest::from_prompt("q"))
    }

    #[tokio::test]
    async fn all_jobs_settle_keyed_by_caller_key() {
        let dispatcher = Dispatcher::new(Arc::new(EchoGateway));
        let outcomes = dispatcher
            .dispatch_all(vec![job(0, "alpha"), job(1, "beta"), job(2, "gamma")])
            .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(
            outcomes[&0].as_ref().unwrap().content,
            "answer from alpha"
        );
        assert_eq!(outcomes[&2].as_ref().unwrap().content, "answer from gamma");
    }

    #[tokio::test]
    async fn one_failure_does_not_block_the_rest() {
        let dispatcher = Dispatcher::new(Arc::new(EchoGateway));
        let outcomes = dispatcher
            .dispatch_all(vec![job(0, "alpha"), job(1, "bad_apple"), job(2, "gamma")])
            .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[&1].is_none());
        assert!(outcomes[&0].is_some());
        assert!(outcomes[&2].is_some());
    }

    #[tokio::test]
    async fn duplicate_backends_keep_distinct_keys() {
        let dispatcher = Dispatcher::new(Arc::new(EchoGateway));
        let outcomes = dispatcher
            .dispatch_all(vec![job(0, "alpha"), job(1, "alpha")])
            .await;

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[&0], outcomes[&1]);
    }

    #[tokio::test]
    async fn empty_job_list_yields_empty_map() {
        let dispatcher = Dispatcher::new(Arc::new(EchoGateway));
        let outcomes = dispatcher.dispatch_all::<usize>(vec![]).await;
        assert!(outcomes.is_empty());
    }
}
