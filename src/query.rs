use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use tokio_retry::{
    strategy::{jitter, ExponentialBackoff},
    Retry,
};

use crate::error::Error;
use crate::filter::Filter;

/// Identifies one query instance: resource name plus the flattened filter
/// pairs. Two calls with equal resource and parameters resolve to the same
/// cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(resource: &'static str, filter: &impl Filter) -> Self {
        Self {
            resource,
            params: filter.pairs(),
        }
    }
}

/// Caller-side knobs for the managed-query mechanism. Construct with
/// struct-update syntax over `Default` to override selectively.
#[derive(Clone, Debug)]
pub struct QueryOptions {
    /// When false the fetch is skipped and the query reports
    /// [`QueryResult::Pending`].
    pub enabled: bool,
    /// Age under which a cached value is served without refetching.
    pub stale_time: Duration,
    /// How many times a failing fetch is re-invoked before giving up.
    pub retries: usize,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            stale_time: Duration::ZERO,
            retries: 3,
        }
    }
}

/// Status-tagged outcome of a managed query.
#[derive(Debug)]
pub enum QueryResult<T> {
    /// No fetch happened (the query is disabled); no data yet.
    Pending,
    Success(T),
    Error(Error),
}

impl<T> QueryResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, QueryResult::Success(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryResult::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            QueryResult::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn ok(self) -> Option<T> {
        match self {
            QueryResult::Success(data) => Some(data),
            _ => None,
        }
    }
}

/// Boxed future produced by a fetch thunk.
pub type FetchFuture = Pin<Box<dyn Future<Output = Result<Value, Error>> + Send>>;

/// Zero-argument deferred fetch; invoked once per attempt by the runner.
pub type FetchThunk = Box<dyn Fn() -> FetchFuture + Send + Sync>;

/// The managed-query capability: accepts a cache key, a fetch thunk and
/// options, and yields a status-tagged raw JSON result. [`QueryClient`] is
/// the built-in implementation; alternative backends plug in through
/// [`OpenF1::with_runner`](crate::OpenF1::with_runner).
#[async_trait]
pub trait QueryRunner: Send + Sync {
    async fn run(&self, key: QueryKey, fetch: FetchThunk, options: &QueryOptions)
        -> QueryResult<Value>;
}

struct CacheEntry {
    value: Value,
    fetched_at: Instant,
}

/// In-memory managed-query runner: staleness window, retry with jittered
/// exponential backoff, enablement predicate. Entries are replaced
/// wholesale on refetch and never persisted.
#[derive(Default)]
pub struct QueryClient {
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops one cached entry so the next call refetches.
    pub fn invalidate(&self, key: &QueryKey) {
        self.entries.lock().expect("query cache poisoned").remove(key);
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.lock().expect("query cache poisoned").clear();
    }

    fn cached(&self, key: &QueryKey, stale_time: Duration) -> Option<Value> {
        let entries = self.entries.lock().expect("query cache poisoned");
        entries
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < stale_time)
            .map(|entry| entry.value.clone())
    }

    fn store(&self, key: QueryKey, value: Value) {
        let mut entries = self.entries.lock().expect("query cache poisoned");
        entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
            },
        );
    }
}

fn retry_strategy(retries: usize) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(20).map(jitter).take(retries)
}

#[async_trait]
impl QueryRunner for QueryClient {
    async fn run(
        &self,
        key: QueryKey,
        fetch: FetchThunk,
        options: &QueryOptions,
    ) -> QueryResult<Value> {
        if !options.enabled {
            debug!("query {} skipped: disabled", key.resource);
            return QueryResult::Pending;
        }

        if let Some(value) = self.cached(&key, options.stale_time) {
            debug!("query {} served from cache", key.resource);
            return QueryResult::Success(value);
        }

        match Retry::spawn(retry_strategy(options.retries), || fetch()).await {
            Ok(value) => {
                self.store(key, value.clone());
                QueryResult::Success(value)
            }
            Err(e) => QueryResult::Error(e),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::filter::LapFilter;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn key(resource: &'static str) -> QueryKey {
        QueryKey {
            resource,
            params: vec![("driver_number".to_owned(), "1".to_owned())],
        }
    }

    fn ok_thunk(calls: Arc<AtomicUsize>) -> FetchThunk {
        Box::new(move || {
            let calls = calls.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!([{"lap_number": 1}]))
            })
        })
    }

    fn failing_thunk(calls: Arc<AtomicUsize>) -> FetchThunk {
        Box::new(move || {
            let calls = calls.clone();
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::Api {
                    status: 503,
                    message: "service down".to_owned(),
                })
            })
        })
    }

    #[tokio::test]
    async fn serves_from_cache_within_the_stale_window() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions {
            stale_time: Duration::from_secs(60),
            ..Default::default()
        };

        let first = client.run(key("laps"), ok_thunk(calls.clone()), &options).await;
        let second = client.run(key("laps"), ok_thunk(calls.clone()), &options).await;

        assert!(first.is_success());
        assert!(second.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_stale_time_always_refetches() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions::default();

        client.run(key("laps"), ok_thunk(calls.clone()), &options).await;
        client.run(key("laps"), ok_thunk(calls.clone()), &options).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_share_entries() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions {
            stale_time: Duration::from_secs(60),
            ..Default::default()
        };

        client.run(key("laps"), ok_thunk(calls.clone()), &options).await;
        client.run(key("pit"), ok_thunk(calls.clone()), &options).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retries_reinvoke_the_thunk_then_report_the_error() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions {
            retries: 2,
            ..Default::default()
        };

        let result = client
            .run(key("laps"), failing_thunk(calls.clone()), &options)
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.error().unwrap().to_string(), "service down");
    }

    #[tokio::test]
    async fn disabled_queries_skip_the_fetch() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions {
            enabled: false,
            ..Default::default()
        };

        let result = client.run(key("laps"), ok_thunk(calls.clone()), &options).await;

        assert!(matches!(result, QueryResult::Pending));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalidate_forces_a_refetch() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions {
            stale_time: Duration::from_secs(60),
            ..Default::default()
        };

        client.run(key("laps"), ok_thunk(calls.clone()), &options).await;
        client.invalidate(&key("laps"));
        client.run(key("laps"), ok_thunk(calls.clone()), &options).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn equal_filters_make_equal_keys() {
        let a = QueryKey::new(
            "laps",
            &LapFilter {
                driver_number: Some(1),
                lap_number: Some(12),
                ..Default::default()
            },
        );
        let b = QueryKey::new(
            "laps",
            &LapFilter {
                driver_number: Some(1),
                lap_number: Some(12),
                ..Default::default()
            },
        );
        let c = QueryKey::new(
            "laps",
            &LapFilter {
                driver_number: Some(1),
                lap_number: Some(13),
                ..Default::default()
            },
        );

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
