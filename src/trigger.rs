//! Trip query trigger
//!
//! Mediates between reactive origin/destination changes and the GraphQL
//! executor: at most one request is in flight per trigger instance, rejected
//! attempts are dropped (never queued) with a structured notice, and a manual
//! fetch can continue a paginated search with a cursor.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tracing::warn;

use crate::client::GraphqlExecutor;
use crate::error::TripQueryError;
use crate::models::{TripQueryVariables, TripResponse};

/// Diagnostic notice emitted on a guarded no-op fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerNotice {
    /// A fetch was attempted while a previous search is still running
    SearchInProgress,
    /// A fetch was attempted without any variables set
    MissingVariables,
}

impl TriggerNotice {
    /// Human-readable diagnostic message
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::SearchInProgress => "A previous search is still running",
            Self::MissingVariables => "Cannot search without variables",
        }
    }
}

/// Observer for trigger diagnostics
///
/// Hosts provide an implementation to surface the guarded no-op paths in
/// their own UI or logs instead of a shared output stream.
pub trait TriggerNotifier: Send + Sync {
    /// Called on each guarded no-op fetch attempt
    fn notify(&self, notice: TriggerNotice);
}

/// Default notifier emitting tracing warnings
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl TriggerNotifier for TracingNotifier {
    fn notify(&self, notice: TriggerNotice) {
        warn!(?notice, "{}", notice.message());
    }
}

/// Trigger for trip searches against a journey-planning API
///
/// State machine per instance: `Idle` and `InFlight`. A fetch admitted while
/// `Idle` moves to `InFlight` until the executor resolves; any fetch while
/// `InFlight` is a no-op with a [`TriggerNotice::SearchInProgress`] notice.
/// There is no queueing, no cancellation, and no retry.
pub struct TripQueryTrigger {
    executor: Arc<dyn GraphqlExecutor>,
    notifier: Arc<dyn TriggerNotifier>,
    variables: Mutex<Option<TripQueryVariables>>,
    data: Mutex<Option<TripResponse>>,
    last_error: Mutex<Option<String>>,
    loading: AtomicBool,
}

impl TripQueryTrigger {
    /// Create a trigger with optional initial variables and tracing-backed
    /// diagnostics
    #[must_use]
    pub fn new(
        executor: Arc<dyn GraphqlExecutor>,
        variables: Option<TripQueryVariables>,
    ) -> Self {
        Self::with_notifier(executor, variables, Arc::new(TracingNotifier))
    }

    /// Create a trigger with a custom diagnostics observer
    #[must_use]
    pub fn with_notifier(
        executor: Arc<dyn GraphqlExecutor>,
        variables: Option<TripQueryVariables>,
        notifier: Arc<dyn TriggerNotifier>,
    ) -> Self {
        Self {
            executor,
            notifier,
            variables: Mutex::new(variables),
            data: Mutex::new(None),
            last_error: Mutex::new(None),
            loading: AtomicBool::new(false),
        }
    }

    /// Latest successfully fetched result, if any
    #[must_use]
    pub fn data(&self) -> Option<TripResponse> {
        self.data.lock().clone()
    }

    /// True strictly while a request is outstanding
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Message of the most recent failed fetch, cleared on the next success
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().clone()
    }

    /// Current search variables, if any
    #[must_use]
    pub fn variables(&self) -> Option<TripQueryVariables> {
        self.variables.lock().clone()
    }

    /// Fire the initial search if both endpoints are already valid
    ///
    /// Hosts call this once after constructing the trigger with variables;
    /// subsequent changes go through [`Self::set_variables`].
    ///
    /// # Errors
    ///
    /// Propagates executor failures, see [`Self::fetch`].
    pub async fn start(&self) -> Result<(), TripQueryError> {
        let endpoints_valid = self
            .variables
            .lock()
            .as_ref()
            .is_some_and(TripQueryVariables::endpoints_valid);

        if endpoints_valid {
            self.fetch(None).await
        } else {
            Ok(())
        }
    }

    /// Replace the search variables and automatically fetch when the change
    /// warrants it
    ///
    /// The automatic search is edge-triggered on the two observed endpoint
    /// fields: it fires iff `from` or `to` differs from the previous
    /// variables and both are valid afterwards. Changes confined to other
    /// fields (time, modes, ...) never re-trigger.
    ///
    /// # Errors
    ///
    /// Propagates executor failures from the automatic fetch.
    pub async fn set_variables(&self, next: TripQueryVariables) -> Result<(), TripQueryError> {
        let should_fetch = {
            let mut guard = self.variables.lock();
            let endpoints_changed = guard
                .as_ref()
                .is_none_or(|prev| prev.from != next.from || prev.to != next.to);
            let should_fetch = endpoints_changed && next.endpoints_valid();
            *guard = Some(next);
            should_fetch
        };

        if should_fetch {
            self.fetch(None).await
        } else {
            Ok(())
        }
    }

    /// Manually trigger a search
    ///
    /// If `page_cursor` is supplied it is merged into the variables for this
    /// call only, overriding any cursor already present. The call is a no-op
    /// (with a notice, never an error) while another search is running or
    /// when no variables are set.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when the request itself fails. The
    /// in-flight gate is released on both success and failure; the error
    /// message is also retained in [`Self::last_error`].
    pub async fn fetch(&self, page_cursor: Option<&str>) -> Result<(), TripQueryError> {
        if self.loading.load(Ordering::Acquire) {
            self.notifier.notify(TriggerNotice::SearchInProgress);
            return Ok(());
        }

        let variables = {
            let guard = self.variables.lock();
            let Some(current) = guard.as_ref() else {
                self.notifier.notify(TriggerNotice::MissingVariables);
                return Ok(());
            };
            match page_cursor {
                Some(cursor) => current.clone().with_page_cursor(cursor),
                None => current.clone(),
            }
        };

        // Close the admission gate atomically; a concurrent fetch that
        // slipped past the load above loses here.
        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.notifier.notify(TriggerNotice::SearchInProgress);
            return Ok(());
        }

        match self.executor.execute(&variables).await {
            Ok(response) => {
                *self.data.lock() = Some(response);
                *self.last_error.lock() = None;
                self.loading.store(false, Ordering::Release);
                Ok(())
            }
            Err(e) => {
                *self.last_error.lock() = Some(e.to_string());
                self.loading.store(false, Ordering::Release);
                Err(e)
            }
        }
    }
}

impl fmt::Debug for TripQueryTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TripQueryTrigger")
            .field("loading", &self.loading())
            .field("has_data", &self.data.lock().is_some())
            .field("has_variables", &self.variables.lock().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use chrono::{TimeZone, Utc};
    use mockall::mock;
    use tokio::sync::Notify;

    use crate::models::Location;

    use super::*;
    use async_trait::async_trait;

    mock! {
        pub Executor {}

        #[async_trait]
        impl GraphqlExecutor for Executor {
            async fn execute(
                &self,
                variables: &TripQueryVariables,
            ) -> Result<TripResponse, TripQueryError>;
        }
    }

    /// Notifier capturing notices for assertions
    #[derive(Default)]
    struct RecordingNotifier {
        notices: Mutex<Vec<TriggerNotice>>,
    }

    impl RecordingNotifier {
        fn notices(&self) -> Vec<TriggerNotice> {
            self.notices.lock().clone()
        }
    }

    impl TriggerNotifier for RecordingNotifier {
        fn notify(&self, notice: TriggerNotice) {
            self.notices.lock().push(notice);
        }
    }

    /// Executor that counts calls and blocks until released
    struct GatedExecutor {
        calls: AtomicUsize,
        gate: Notify,
    }

    impl GatedExecutor {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl GraphqlExecutor for GatedExecutor {
        async fn execute(
            &self,
            _variables: &TripQueryVariables,
        ) -> Result<TripResponse, TripQueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(TripResponse::empty())
        }
    }

    fn valid_variables() -> TripQueryVariables {
        TripQueryVariables::between(Location::from_place("A"), Location::from_place("B"))
    }

    fn response_with_cursor(cursor: &str) -> TripResponse {
        TripResponse {
            next_page_cursor: Some(cursor.to_string()),
            ..TripResponse::empty()
        }
    }

    #[tokio::test]
    async fn test_start_fires_once_with_valid_endpoints() {
        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .withf(|variables| {
                variables.from == Some(Location::from_place("A"))
                    && variables.to == Some(Location::from_place("B"))
                    && variables.page_cursor.is_none()
            })
            .times(1)
            .returning(|_| Ok(TripResponse::empty()));

        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(valid_variables()));
        trigger.start().await.unwrap();
    }

    #[tokio::test]
    async fn test_start_is_noop_with_invalid_endpoints() {
        let mut executor = MockExecutor::new();
        executor.expect_execute().times(0);

        let variables = TripQueryVariables {
            from: Some(Location::from_place("A")),
            to: Some(Location::default().with_name("name only")),
            ..Default::default()
        };
        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(variables));
        trigger.start().await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_without_variables_is_noop() {
        let mut executor = MockExecutor::new();
        executor.expect_execute().times(0);

        let notifier = Arc::new(RecordingNotifier::default());
        let trigger =
            TripQueryTrigger::with_notifier(Arc::new(executor), None, notifier.clone());

        trigger.fetch(None).await.unwrap();
        assert_eq!(notifier.notices(), vec![TriggerNotice::MissingVariables]);
        assert!(!trigger.loading());
    }

    #[tokio::test]
    async fn test_fetch_while_in_flight_is_dropped() {
        let executor = Arc::new(GatedExecutor::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let trigger = Arc::new(TripQueryTrigger::with_notifier(
            executor.clone(),
            Some(valid_variables()),
            notifier.clone(),
        ));

        let racing = trigger.clone();
        let handle = tokio::spawn(async move { racing.fetch(None).await });

        // Wait for the first fetch to be admitted
        while !trigger.loading() {
            tokio::task::yield_now().await;
        }

        // The second fetch is dropped, not queued
        trigger.fetch(None).await.unwrap();
        assert_eq!(notifier.notices(), vec![TriggerNotice::SearchInProgress]);
        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);

        executor.gate.notify_one();
        handle.await.unwrap().unwrap();

        assert_eq!(executor.calls.load(Ordering::SeqCst), 1);
        assert!(!trigger.loading());
        assert!(trigger.data().is_some());
    }

    #[tokio::test]
    async fn test_fetch_merges_page_cursor() {
        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .withf(|variables| {
                variables.page_cursor.as_deref() == Some("cursor123")
                    && variables.from == Some(Location::from_place("A"))
                    && variables.to == Some(Location::from_place("B"))
            })
            .times(1)
            .returning(|_| Ok(TripResponse::empty()));

        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(valid_variables()));
        trigger.fetch(Some("cursor123")).await.unwrap();

        // The merge is per-call only; stored variables keep no cursor
        assert!(trigger.variables().unwrap().page_cursor.is_none());
    }

    #[tokio::test]
    async fn test_fetch_stores_data_and_resets_loading() {
        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .times(1)
            .returning(|_| Ok(response_with_cursor("next1")));

        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(valid_variables()));
        trigger.fetch(None).await.unwrap();

        assert!(!trigger.loading());
        assert_eq!(
            trigger.data().unwrap().next_page_cursor.as_deref(),
            Some("next1")
        );
        assert!(trigger.last_error().is_none());
    }

    #[tokio::test]
    async fn test_fetch_failure_resets_loading_and_keeps_error() {
        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .times(1)
            .returning(|_| Err(TripQueryError::RequestFailed("HTTP 500".to_string())));

        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(valid_variables()));
        let result = trigger.fetch(None).await;

        assert!(result.is_err());
        assert!(!trigger.loading());
        assert!(trigger.data().is_none());
        assert!(trigger.last_error().unwrap().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_error_cleared_on_next_success() {
        let mut executor = MockExecutor::new();
        let mut fail_first = true;
        executor.expect_execute().times(2).returning(move |_| {
            if fail_first {
                fail_first = false;
                Err(TripQueryError::RequestFailed("HTTP 502".to_string()))
            } else {
                Ok(TripResponse::empty())
            }
        });

        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(valid_variables()));
        assert!(trigger.fetch(None).await.is_err());
        assert!(trigger.last_error().is_some());

        trigger.fetch(None).await.unwrap();
        assert!(trigger.last_error().is_none());
        assert!(trigger.data().is_some());
    }

    #[tokio::test]
    async fn test_set_variables_triggers_on_endpoint_change() {
        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .withf(|variables| variables.page_cursor.is_none())
            .times(1)
            .returning(|_| Ok(TripResponse::empty()));

        let trigger = TripQueryTrigger::new(Arc::new(executor), None);
        trigger.set_variables(valid_variables()).await.unwrap();
        assert_eq!(trigger.variables(), Some(valid_variables()));
    }

    #[tokio::test]
    async fn test_set_variables_ignores_non_endpoint_change() {
        let mut executor = MockExecutor::new();
        executor.expect_execute().times(0);

        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(valid_variables()));

        // Same endpoints, different departure time: no automatic search
        let next = TripQueryVariables {
            date_time: Some(Utc.with_ymd_and_hms(2026, 2, 11, 9, 0, 0).unwrap()),
            ..valid_variables()
        };
        trigger.set_variables(next.clone()).await.unwrap();
        assert_eq!(trigger.variables(), Some(next));
    }

    #[tokio::test]
    async fn test_set_variables_ignores_invalid_endpoints() {
        let mut executor = MockExecutor::new();
        executor.expect_execute().times(0);

        let trigger = TripQueryTrigger::new(Arc::new(executor), Some(valid_variables()));

        let next = TripQueryVariables {
            from: Some(Location::from_place("A")),
            to: Some(Location::default()),
            ..Default::default()
        };
        trigger.set_variables(next).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_variables_retriggers_on_destination_change() {
        let mut executor = MockExecutor::new();
        executor
            .expect_execute()
            .times(2)
            .returning(|_| Ok(TripResponse::empty()));

        let trigger = TripQueryTrigger::new(Arc::new(executor), None);
        trigger.set_variables(valid_variables()).await.unwrap();

        let next = TripQueryVariables::between(
            Location::from_place("A"),
            Location::from_coordinates(59.91, 10.75),
        );
        trigger.set_variables(next).await.unwrap();
    }

    #[test]
    fn test_notice_messages() {
        assert_eq!(
            TriggerNotice::SearchInProgress.message(),
            "A previous search is still running"
        );
        assert_eq!(
            TriggerNotice::MissingVariables.message(),
            "Cannot search without variables"
        );
    }
}
