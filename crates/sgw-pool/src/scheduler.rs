//! Refresh scheduler: periodically runs discovery and rebalances the pool.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn, Instrument};

use sgw_store::NodeDiscovery;
use sgw_types::{GatewayError, GatewayResult, RequestContext};

use crate::config::PoolConfig;
use crate::error::{PoolError, PoolResult};
use crate::pool::NodePool;

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Keeps a [`NodePool`] eventually consistent with discovery.
///
/// One background task runs a refresh cycle every `refresh_interval`, the
/// first one immediately. A failed or timed-out discovery is logged and the
/// previous ring stays authoritative. Cycles never overlap: the loop is
/// sequential, and [`RefreshScheduler::refresh_now`] shares a cycle lock with it.
pub struct RefreshScheduler {
    inner: Arc<Inner>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct Inner {
    pool: Arc<NodePool>,
    discovery: Arc<dyn NodeDiscovery>,
    config: PoolConfig,
    cycle: tokio::sync::Mutex<()>,
}

impl RefreshScheduler {
    pub fn new(pool: Arc<NodePool>, discovery: Arc<dyn NodeDiscovery>, config: PoolConfig) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                pool,
                discovery,
                config,
                cycle: tokio::sync::Mutex::new(()),
            }),
            shutdown,
            task: Mutex::new(None),
        }
    }

    pub fn pool(&self) -> &Arc<NodePool> {
        &self.inner.pool
    }

    pub fn config(&self) -> &PoolConfig {
        &self.inner.config
    }

    /// Spawn the periodic refresh task on the current runtime.
    ///
    /// Returns immediately. Fails if called twice or outside a tokio runtime.
    pub fn start(&self) -> PoolResult<()> {
        let mut task = self.task.lock().expect("scheduler lock poisoned");
        if task.is_some() {
            return Err(PoolError::AlreadyStarted);
        }
        let handle = tokio::runtime::Handle::try_current().map_err(|_| PoolError::NoRuntime)?;

        let inner = self.inner.clone();
        let mut stop = self.shutdown.subscribe();
        // tokio intervals reject a zero period.
        let period = inner.config.refresh_interval().max(MIN_REFRESH_INTERVAL);

        *task = Some(handle.spawn(async move {
            info!(interval = ?period, "node refresh scheduler started");
            let mut tick = interval(period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                let stopped = *stop.borrow_and_update();
                if stopped {
                    break;
                }
                tokio::select! {
                    biased;
                    _ = stop.changed() => break,
                    _ = tick.tick() => {
                        // Outcome is already logged by the cycle.
                        let _ = inner.refresh().await;
                    }
                }
            }
            info!("node refresh scheduler stopped");
        }));
        Ok(())
    }

    /// Halt future cycles. Does not wait for an in-flight cycle.
    ///
    /// Safe to call repeatedly and before `start`.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Run one refresh cycle now. Returns the new ring size.
    pub async fn refresh_now(&self) -> GatewayResult<usize> {
        self.inner.refresh().await
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .expect("scheduler lock poisoned")
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }
}

impl Inner {
    async fn refresh(&self) -> GatewayResult<usize> {
        let _cycle = self.cycle.lock().await;

        let timeout = self.config.discovery_timeout();
        let ctx = RequestContext::with_timeout(timeout);
        let span = tracing::info_span!("refresh", correlation_id = %ctx.correlation_id);

        async {
            info!("refreshing pool nodes");
            let discovered = match tokio::time::timeout(timeout, self.discovery.discover_nodes(&ctx)).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::timeout("node discovery", timeout)),
            };

            match discovered {
                Ok(nodes) => {
                    if nodes.is_empty() {
                        warn!("discovery returned no nodes");
                    }
                    let entries = self.pool.rebalance(nodes);
                    info!(entries, "pool nodes refreshed");
                    Ok(entries)
                }
                Err(e) => {
                    error!(error = %e, "could not discover nodes, keeping current ring");
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use sgw_store::{InMemoryNode, NodeHandle, StaticDiscovery};

    use super::*;

    /// Discovery that counts calls and can be switched into failure mode.
    struct FlakyDiscovery {
        nodes: Vec<NodeHandle>,
        failing: AtomicBool,
        delay: Option<Duration>,
        calls: AtomicUsize,
        active: AtomicUsize,
        max_active: AtomicUsize,
    }

    impl FlakyDiscovery {
        fn new(ids: &[&str]) -> Self {
            Self {
                nodes: ids
                    .iter()
                    .map(|id| Arc::new(InMemoryNode::new(*id)) as NodeHandle)
                    .collect(),
                failing: AtomicBool::new(false),
                delay: None,
                calls: AtomicUsize::new(0),
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NodeDiscovery for FlakyDiscovery {
        async fn discover_nodes(&self, _ctx: &RequestContext) -> GatewayResult<Vec<NodeHandle>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(now, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);
            if self.failing.load(Ordering::SeqCst) {
                return Err(GatewayError::internal("docker daemon unreachable"));
            }
            Ok(self.nodes.clone())
        }
    }

    fn config(interval: u64, timeout: u64) -> PoolConfig {
        PoolConfig {
            refresh_interval_secs: interval,
            discovery_timeout_secs: timeout,
        }
    }

    #[tokio::test]
    async fn refresh_now_populates_pool() {
        let pool = Arc::new(NodePool::new());
        let discovery = Arc::new(StaticDiscovery::in_memory(&[
            sgw_store::NodeSpec::new("a"),
            sgw_store::NodeSpec::new("b"),
        ]));
        let scheduler = RefreshScheduler::new(pool.clone(), discovery, PoolConfig::default());

        assert!(pool.lookup("abc123").is_err());
        assert_eq!(scheduler.refresh_now().await.unwrap(), 2);
        assert!(pool.lookup("abc123").is_ok());
    }

    #[tokio::test]
    async fn failed_discovery_keeps_previous_ring() {
        let pool = Arc::new(NodePool::new());
        let discovery = Arc::new(FlakyDiscovery::new(&["a", "b", "c"]));
        let scheduler = RefreshScheduler::new(pool.clone(), discovery.clone(), PoolConfig::default());

        scheduler.refresh_now().await.unwrap();
        let keys = ["abc123", "zzz", "K9", "object42"];
        let before: Vec<String> = keys
            .iter()
            .map(|k| pool.lookup(k).unwrap().id().to_owned())
            .collect();

        discovery.failing.store(true, Ordering::SeqCst);
        let err = scheduler.refresh_now().await.unwrap_err();
        assert!(matches!(err, GatewayError::Internal(_)));

        let after: Vec<String> = keys
            .iter()
            .map(|k| pool.lookup(k).unwrap().id().to_owned())
            .collect();
        assert_eq!(before, after);
        assert_eq!(pool.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_discovery_times_out_without_touching_ring() {
        let pool = Arc::new(NodePool::new());
        pool.rebalance(vec![Arc::new(InMemoryNode::new("old")) as NodeHandle]);

        let mut slow = FlakyDiscovery::new(&["new"]);
        slow.delay = Some(Duration::from_secs(60));
        let scheduler = RefreshScheduler::new(pool.clone(), Arc::new(slow), config(120, 30));

        let err = scheduler.refresh_now().await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(pool.snapshot().node_ids(), vec!["old"]);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_every_interval() {
        let pool = Arc::new(NodePool::new());
        let discovery = Arc::new(FlakyDiscovery::new(&["a"]));
        let scheduler = RefreshScheduler::new(pool.clone(), discovery.clone(), config(120, 30));

        scheduler.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len(), 1);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 2);

        tokio::time::sleep(Duration::from_secs(240)).await;
        assert_eq!(discovery.calls.load(Ordering::SeqCst), 4);
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_never_overlap() {
        let pool = Arc::new(NodePool::new());
        let mut slow = FlakyDiscovery::new(&["a"]);
        // Discovery takes longer than the interval.
        slow.delay = Some(Duration::from_secs(5));
        let discovery = Arc::new(slow);
        let scheduler = Arc::new(RefreshScheduler::new(pool, discovery.clone(), config(1, 30)));

        scheduler.start().unwrap();
        let manual = {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.refresh_now().await })
        };
        tokio::time::sleep(Duration::from_secs(30)).await;
        manual.await.unwrap().unwrap();
        scheduler.stop();

        assert!(discovery.calls.load(Ordering::SeqCst) >= 2);
        assert_eq!(discovery.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_halts_future_cycles() {
        let pool = Arc::new(NodePool::new());
        let discovery = Arc::new(FlakyDiscovery::new(&["a"]));
        let scheduler = RefreshScheduler::new(pool, discovery.clone(), config(10, 5));

        scheduler.start().unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(scheduler.is_running());

        scheduler.stop();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!scheduler.is_running());

        let calls = discovery.calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(discovery.calls.load(Ordering::SeqCst), calls);

        // Idempotent.
        scheduler.stop();
    }

    #[tokio::test]
    async fn start_twice_is_rejected() {
        let scheduler = RefreshScheduler::new(
            Arc::new(NodePool::new()),
            Arc::new(StaticDiscovery::default()),
            PoolConfig::default(),
        );
        scheduler.start().unwrap();
        assert_eq!(scheduler.start(), Err(PoolError::AlreadyStarted));
        scheduler.stop();
    }

    #[test]
    fn start_outside_runtime_is_rejected() {
        let scheduler = RefreshScheduler::new(
            Arc::new(NodePool::new()),
            Arc::new(StaticDiscovery::default()),
            PoolConfig::default(),
        );
        assert_eq!(scheduler.start(), Err(PoolError::NoRuntime));
        scheduler.stop();
    }
}
