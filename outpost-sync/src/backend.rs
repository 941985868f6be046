//! Remote replay backend abstraction.
//!
//! The engine guarantees call-once-per-success semantics and the
//! retry/abandonment envelope; the backend owns everything about the wire.
//! Each [`ActionKind`] maps to exactly one handler inside the backend.

use crate::error::ReplayError;
use async_trait::async_trait;
use outpost_types::ActionKind;

/// Replays queued actions against the remote system.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Replays one action. A returned error costs the action one retry
    /// credit; the engine does not inspect which variant it was.
    async fn replay(
        &self,
        kind: ActionKind,
        payload: &serde_json::Value,
    ) -> Result<(), ReplayError>;
}

/// A scripted backend for testing.
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Replays against a scripted list of outcomes and records every call.
    ///
    /// Outcomes are consumed in call order; once the script is exhausted the
    /// fallback outcome applies. An optional per-call delay makes drains
    /// observably slow for concurrency tests.
    pub struct ScriptedBackend {
        outcomes: Mutex<VecDeque<Result<(), ReplayError>>>,
        fallback: Result<(), ReplayError>,
        delay: Option<Duration>,
        calls: Mutex<Vec<(ActionKind, serde_json::Value)>>,
    }

    impl ScriptedBackend {
        /// Every call succeeds.
        pub fn always_ok() -> Self {
            Self::new(Vec::new(), Ok(()))
        }

        /// Every call fails with a network error.
        pub fn always_failing() -> Self {
            Self::new(
                Vec::new(),
                Err(ReplayError::Network("scripted failure".into())),
            )
        }

        /// Consumes `outcomes` in call order, then succeeds.
        pub fn with_outcomes(outcomes: Vec<Result<(), ReplayError>>) -> Self {
            Self::new(outcomes, Ok(()))
        }

        fn new(outcomes: Vec<Result<(), ReplayError>>, fallback: Result<(), ReplayError>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into()),
                fallback,
                delay: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Adds a delay before every replay completes.
        #[must_use]
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        /// Returns every call made so far, in order.
        pub fn calls(&self) -> Vec<(ActionKind, serde_json::Value)> {
            self.calls.lock().unwrap().clone()
        }

        /// Returns the number of replay calls made so far.
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RemoteBackend for ScriptedBackend {
        async fn replay(
            &self,
            kind: ActionKind,
            payload: &serde_json::Value,
        ) -> Result<(), ReplayError> {
            self.calls.lock().unwrap().push((kind, payload.clone()));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let scripted = self.outcomes.lock().unwrap().pop_front();
            scripted.unwrap_or_else(|| self.fallback.clone())
        }
    }
}
