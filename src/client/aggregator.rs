//! Multi-source aggregation — load-balanced and fault-tolerant streaming
//! across several A2A agent endpoints.
//!
//! Mirrors the Python reference's `LoadBalancer`/`DistributedStreamingClient`:
//! a [`LoadBalancer`] picks among N candidate endpoints by strategy, and a
//! [`DistributedStreamingClient`] built on top of it can either stream from
//! one endpoint with automatic fallback to another on failure, or fan out
//! to K endpoints concurrently and interleave their chunks into one stream.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use futures::stream::BoxStream;
use rand::Rng;
use tokio::sync::{mpsc, Mutex};

use crate::error::{A2AError, A2AResult};
use crate::types::Task;

use super::a2a_client::A2AClient;

/// How a [`LoadBalancer`] picks the next endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStrategy {
    /// Cycle through endpoints in order.
    RoundRobin,
    /// Pick uniformly at random.
    Random,
    /// Pick the endpoint with the lowest `requests / (1 + last_latency_secs)`.
    LeastBusy,
}

#[derive(Debug, Clone, Default)]
struct SourceMetrics {
    requests: u64,
    errors: u64,
    last_latency_secs: f64,
}

/// Distributes requests across a fixed set of endpoint URLs, tracking
/// per-endpoint request/error/latency metrics used by the `least_busy`
/// strategy.
#[derive(Debug)]
pub struct LoadBalancer {
    server_urls: Vec<String>,
    strategy: BalanceStrategy,
    current_index: AtomicUsize,
    metrics: Mutex<HashMap<String, SourceMetrics>>,
}

impl LoadBalancer {
    /// Create a load balancer over `server_urls` using `strategy`.
    ///
    /// Returns [`A2AError::InvalidParams`] if `server_urls` is empty.
    pub fn new(server_urls: Vec<String>, strategy: BalanceStrategy) -> A2AResult<Self> {
        if server_urls.is_empty() {
            return Err(A2AError::invalid_params(
                "LoadBalancer requires at least one server URL",
            ));
        }
        let metrics = server_urls
            .iter()
            .map(|url| (url.clone(), SourceMetrics::default()))
            .collect();
        Ok(Self {
            server_urls,
            strategy,
            current_index: AtomicUsize::new(0),
            metrics: Mutex::new(metrics),
        })
    }

    /// Number of endpoints this balancer distributes across.
    pub fn server_count(&self) -> usize {
        self.server_urls.len()
    }

    /// All endpoints this balancer distributes across.
    pub fn server_urls(&self) -> &[String] {
        &self.server_urls
    }

    /// Select the next endpoint per the configured strategy.
    pub async fn next_server(&self) -> String {
        match self.strategy {
            BalanceStrategy::RoundRobin => {
                let idx = self.current_index.fetch_add(1, Ordering::Relaxed) % self.server_urls.len();
                self.server_urls[idx].clone()
            }
            BalanceStrategy::Random => {
                let idx = rand::thread_rng().gen_range(0..self.server_urls.len());
                self.server_urls[idx].clone()
            }
            BalanceStrategy::LeastBusy => {
                let metrics = self.metrics.lock().await;
                self.server_urls
                    .iter()
                    .min_by(|a, b| {
                        let score_a = score(metrics.get(*a));
                        let score_b = score(metrics.get(*b));
                        score_a
                            .partial_cmp(&score_b)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                    .cloned()
                    .unwrap_or_else(|| self.server_urls[0].clone())
            }
        }
    }

    /// Record the outcome of a request against `url` for the `least_busy`
    /// strategy's bookkeeping.
    pub async fn record(&self, url: &str, success: bool, latency: Duration) {
        let mut metrics = self.metrics.lock().await;
        if let Some(entry) = metrics.get_mut(url) {
            entry.requests += 1;
            if !success {
                entry.errors += 1;
            }
            entry.last_latency_secs = latency.as_secs_f64();
        }
    }
}

fn score(metrics: Option<&SourceMetrics>) -> f64 {
    match metrics {
        Some(m) => m.requests as f64 / (1.0 + m.last_latency_secs),
        None => 0.0,
    }
}

/// One interleaved frame of a [`DistributedStreamingClient::stream_aggregated`]
/// run, tagged with the endpoint it came from.
#[derive(Debug, Clone)]
pub enum AggregatedEvent {
    /// A content chunk from one source.
    Chunk {
        source: String,
        content: String,
        chunk_index: usize,
        timestamp: u128,
    },
    /// A source failed or timed out and was dropped from the run.
    SourceError { source: String, error: String },
    /// Emitted once, after every source has finished or failed.
    AggregateComplete {
        total_chunks: usize,
        successful_sources: usize,
        total_sources: usize,
    },
}

/// Per-source timeout for the next chunk in an aggregated run — bounds
/// head-of-line blocking when one source stalls.
const PER_SOURCE_CHUNK_TIMEOUT: Duration = Duration::from_secs(5);

/// A client that fans a task out across multiple A2A endpoints, either with
/// fallback (try one, retry another on failure) or full concurrent
/// aggregation (stream from K sources at once).
pub struct DistributedStreamingClient {
    load_balancer: LoadBalancer,
    clients: Mutex<HashMap<String, Arc<A2AClient>>>,
}

impl DistributedStreamingClient {
    /// Build a client around an existing [`LoadBalancer`].
    pub fn new(load_balancer: LoadBalancer) -> Self {
        Self {
            load_balancer,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Convenience constructor: build the [`LoadBalancer`] from endpoint
    /// URLs and a strategy directly.
    pub fn with_server_urls(server_urls: Vec<String>, strategy: BalanceStrategy) -> A2AResult<Self> {
        Ok(Self::new(LoadBalancer::new(server_urls, strategy)?))
    }

    async fn client_for(&self, url: &str) -> Arc<A2AClient> {
        let mut clients = self.clients.lock().await;
        if let Some(existing) = clients.get(url) {
            return Arc::clone(existing);
        }
        let client = Arc::new(A2AClient::from_endpoint(url));
        clients.insert(url.to_string(), Arc::clone(&client));
        client
    }

    /// Stream from one endpoint selected by the load balancer, retrying on a
    /// different not-yet-tried endpoint (up to `max_retries` additional
    /// attempts) if the attempt errors before completing. Each attempt emits
    /// a preamble text chunk naming the endpoint in use.
    pub fn stream_with_fallback(
        self: &Arc<Self>,
        task: Task,
        max_retries: usize,
    ) -> BoxStream<'static, A2AResult<String>> {
        let this = Arc::clone(self);
        Box::pin(async_stream::stream! {
            let mut tried: HashSet<String> = HashSet::new();
            let total_servers = this.load_balancer.server_count();

            for attempt in 0..=max_retries {
                let mut server_url = this.load_balancer.next_server().await;
                let mut spins = 0;
                while tried.contains(&server_url) && tried.len() < total_servers && spins < total_servers {
                    server_url = this.load_balancer.next_server().await;
                    spins += 1;
                }
                tried.insert(server_url.clone());

                yield Ok(format!("[attempt {}] using server: {server_url}", attempt + 1));

                let client = this.client_for(&server_url).await;
                let start = Instant::now();

                match client.stream_task(task.clone()).await {
                    Ok(mut sse) => {
                        let mut completed = false;
                        let mut failed = false;
                        while let Some(next) = sse.next().await {
                            match next {
                                Ok(chunk) => {
                                    let is_last = chunk.is_last();
                                    if let Some(text) = chunk_text(&chunk) {
                                        yield Ok(text);
                                    }
                                    if is_last {
                                        completed = true;
                                        break;
                                    }
                                }
                                Err(e) => {
                                    failed = true;
                                    yield Ok(format!("[error] server {server_url} failed: {e}"));
                                    break;
                                }
                            }
                        }
                        this.load_balancer.record(&server_url, !failed, start.elapsed()).await;
                        if completed {
                            return;
                        }
                    }
                    Err(e) => {
                        this.load_balancer.record(&server_url, false, start.elapsed()).await;
                        yield Ok(format!("[error] server {server_url} failed: {e}"));
                    }
                }

                if attempt == max_retries {
                    yield Err(A2AError::Transport(
                        "maximum retries reached across all endpoints".to_string(),
                    ));
                }
            }
        })
    }

    /// Stream from up to `num_sources` distinct endpoints concurrently,
    /// interleaving their chunks as they arrive. Each source gets a 5 s
    /// timeout to produce its next chunk; a timed-out or erroring source is
    /// dropped from the run rather than blocking the others. Emits
    /// [`AggregatedEvent::AggregateComplete`] once every source has finished.
    pub fn stream_aggregated(
        self: &Arc<Self>,
        task: Task,
        num_sources: usize,
    ) -> BoxStream<'static, AggregatedEvent> {
        let this = Arc::clone(self);
        Box::pin(async_stream::stream! {
            let total_servers = this.load_balancer.server_count();
            let wanted = num_sources.min(total_servers).max(1);

            let mut source_urls = Vec::with_capacity(wanted);
            let spin_cap = (wanted * total_servers + total_servers).max(16);
            let mut spins = 0;
            while source_urls.len() < wanted && spins < spin_cap {
                let url = this.load_balancer.next_server().await;
                if !source_urls.contains(&url) {
                    source_urls.push(url);
                }
                spins += 1;
            }

            let (tx, mut rx) = mpsc::channel::<AggregatedEvent>(256);

            for source_url in &source_urls {
                let tx = tx.clone();
                let client = this.client_for(source_url).await;
                let balancer_url = source_url.clone();
                let this = Arc::clone(&this);
                let task = task.clone();
                tokio::spawn(async move {
                    let start = Instant::now();
                    let mut chunk_index = 0usize;
                    let mut success = true;

                    match client.stream_task(task).await {
                        Ok(mut sse) => loop {
                            match tokio::time::timeout(PER_SOURCE_CHUNK_TIMEOUT, sse.next()).await {
                                Ok(Some(Ok(chunk))) => {
                                    let is_last = chunk.is_last();
                                    if let Some(content) = chunk_text(&chunk) {
                                        let _ = tx
                                            .send(AggregatedEvent::Chunk {
                                                source: balancer_url.clone(),
                                                content,
                                                chunk_index,
                                                timestamp: now_millis(),
                                            })
                                            .await;
                                        chunk_index += 1;
                                    }
                                    if is_last {
                                        break;
                                    }
                                }
                                Ok(Some(Err(e))) => {
                                    success = false;
                                    let _ = tx
                                        .send(AggregatedEvent::SourceError {
                                            source: balancer_url.clone(),
                                            error: e.to_string(),
                                        })
                                        .await;
                                    break;
                                }
                                Ok(None) => break,
                                Err(_timeout) => {
                                    success = false;
                                    let _ = tx
                                        .send(AggregatedEvent::SourceError {
                                            source: balancer_url.clone(),
                                            error: "timed out waiting for next chunk".to_string(),
                                        })
                                        .await;
                                    break;
                                }
                            }
                        },
                        Err(e) => {
                            success = false;
                            let _ = tx
                                .send(AggregatedEvent::SourceError {
                                    source: balancer_url.clone(),
                                    error: e.to_string(),
                                })
                                .await;
                        }
                    }

                    this.load_balancer.record(&balancer_url, success, start.elapsed()).await;
                });
            }
            drop(tx);

            let mut total_chunks = 0usize;
            let mut failed_sources: HashSet<String> = HashSet::new();
            while let Some(event) = rx.recv().await {
                match &event {
                    AggregatedEvent::Chunk { .. } => total_chunks += 1,
                    AggregatedEvent::SourceError { source, .. } => {
                        failed_sources.insert(source.clone());
                    }
                    AggregatedEvent::AggregateComplete { .. } => {}
                }
                yield event;
            }

            yield AggregatedEvent::AggregateComplete {
                total_chunks,
                successful_sources: source_urls.len() - failed_sources.len(),
                total_sources: source_urls.len(),
            };
        })
    }
}

/// Render a [`crate::types::StreamChunk`] down to the plain text an
/// aggregated/fallback consumer cares about.
fn chunk_text(chunk: &crate::types::StreamChunk) -> Option<String> {
    use crate::types::StreamChunk;
    match chunk {
        StreamChunk::MessageChunk { content, .. } => Some(
            content
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| content.to_string()),
        ),
        StreamChunk::TaskChunk { task, .. } => task
            .artifacts
            .last()
            .and_then(|a| a.parts.first())
            .and_then(|p| p.text_value())
            .map(String::from)
            .or_else(|| Some(format!("task {} — {}", task.id, task.status.state))),
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
