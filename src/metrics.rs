//! Request metrics and statistics tracking for the GST forecast service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept per endpoint
const MAX_SAMPLES: usize = 10_000;

/// Metrics collector for request handling
pub struct ServiceMetrics {
    /// Predictions rendered successfully (both variants)
    pub predictions_served: AtomicU64,
    /// Prediction requests answered with an error message
    pub prediction_errors: AtomicU64,
    /// Uploads filtered successfully
    pub uploads_processed: AtomicU64,
    /// Uploads answered with an error message
    pub upload_errors: AtomicU64,
    /// Flagged invoices returned across all uploads
    pub flagged_rows_returned: AtomicU64,
    /// Request latencies by endpoint (in microseconds)
    latencies: RwLock<HashMap<String, Vec<u64>>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            predictions_served: AtomicU64::new(0),
            prediction_errors: AtomicU64::new(0),
            uploads_processed: AtomicU64::new(0),
            upload_errors: AtomicU64::new(0),
            flagged_rows_returned: AtomicU64::new(0),
            latencies: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Record a prediction request on `endpoint`
    pub fn record_prediction(&self, endpoint: &str, elapsed: Duration, succeeded: bool) {
        if succeeded {
            self.predictions_served.fetch_add(1, Ordering::Relaxed);
        } else {
            self.prediction_errors.fetch_add(1, Ordering::Relaxed);
        }
        self.record_latency(endpoint, elapsed);
    }

    /// Record an upload; `flagged` is `None` when the upload failed
    pub fn record_upload(&self, elapsed: Duration, flagged: Option<usize>) {
        match flagged {
            Some(count) => {
                self.uploads_processed.fetch_add(1, Ordering::Relaxed);
                self.flagged_rows_returned
                    .fetch_add(count as u64, Ordering::Relaxed);
            }
            None => {
                self.upload_errors.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.record_latency("fraudulent", elapsed);
    }

    fn record_latency(&self, endpoint: &str, elapsed: Duration) {
        if let Ok(mut latencies) = self.latencies.write() {
            let samples = latencies.entry(endpoint.to_string()).or_default();
            samples.push(elapsed.as_micros() as u64);
            if samples.len() > MAX_SAMPLES {
                samples.drain(0..MAX_SAMPLES / 2);
            }
        }
    }

    /// Latency statistics for one endpoint
    pub fn get_latency_stats(&self, endpoint: &str) -> LatencyStats {
        self.latencies
            .read()
            .ok()
            .and_then(|latencies| latencies.get(endpoint).map(|s| LatencyStats::from_samples(s)))
            .unwrap_or_default()
    }

    /// Latency statistics for every endpoint seen so far
    pub fn get_all_latency_stats(&self) -> HashMap<String, LatencyStats> {
        match self.latencies.read() {
            Ok(latencies) => latencies
                .iter()
                .map(|(endpoint, samples)| (endpoint.clone(), LatencyStats::from_samples(samples)))
                .collect(),
            Err(_) => HashMap::new(),
        }
    }

    /// Requests per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            let total = self.predictions_served.load(Ordering::Relaxed)
                + self.prediction_errors.load(Ordering::Relaxed)
                + self.uploads_processed.load(Ordering::Relaxed)
                + self.upload_errors.load(Ordering::Relaxed);
            total as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let served = self.predictions_served.load(Ordering::Relaxed);
        let failed = self.prediction_errors.load(Ordering::Relaxed);
        let uploads = self.uploads_processed.load(Ordering::Relaxed);
        let upload_errors = self.upload_errors.load(Ordering::Relaxed);
        let flagged = self.flagged_rows_returned.load(Ordering::Relaxed);

        info!(
            predictions_served = served,
            prediction_errors = failed,
            uploads_processed = uploads,
            upload_errors = upload_errors,
            flagged_rows_returned = flagged,
            throughput = format!("{:.2} req/s", self.get_throughput()),
            uptime_secs = self.start_time.elapsed().as_secs(),
            "Service metrics summary"
        );

        let mut stats: Vec<_> = self.get_all_latency_stats().into_iter().collect();
        stats.sort_by(|a, b| a.0.cmp(&b.0));
        for (endpoint, s) in stats {
            info!(
                endpoint = %endpoint,
                count = s.count,
                mean_us = s.mean_us,
                p50_us = s.p50_us,
                p95_us = s.p95_us,
                p99_us = s.p99_us,
                max_us = s.max_us,
                "Endpoint latency"
            );
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

impl LatencyStats {
    fn from_samples(samples: &[u64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let pct = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        Self {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: pct(0.50),
            p95_us: pct(0.95),
            p99_us: pct(0.99),
            max_us: sorted[count - 1],
        }
    }
}

/// Periodically logs a metrics summary
pub struct MetricsReporter {
    metrics: Arc<ServiceMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<ServiceMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs: interval_secs.max(1),
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let period = Duration::from_secs(self.interval_secs);
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
