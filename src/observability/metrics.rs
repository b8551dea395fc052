//! Metrics collection for the Ragcy client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Metrics collector interface.
pub trait MetricsCollector: Send + Sync {
    /// Records a completed request.
    fn record_request(&self, operation: &str, success: bool, duration: Duration);

    /// Records an error by kind.
    fn record_error(&self, error_kind: &str);

    /// Records an upload size in bytes.
    fn record_upload(&self, bytes: u64);

    /// Gets current metrics.
    fn get_metrics(&self) -> RequestMetrics;

    /// Resets all metrics.
    fn reset(&self);
}

/// Request metrics snapshot.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    /// Total requests.
    pub total_requests: u64,
    /// Successful requests.
    pub successful_requests: u64,
    /// Failed requests.
    pub failed_requests: u64,
    /// Total latency in milliseconds.
    pub total_latency_ms: u64,
    /// Total bytes uploaded from local files.
    pub uploaded_bytes: u64,
    /// Requests per operation.
    pub operations: HashMap<String, u64>,
    /// Error counts by kind.
    pub errors: HashMap<String, u64>,
}

impl RequestMetrics {
    /// Calculates average latency in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.total_requests as f64
        }
    }

    /// Calculates success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            100.0
        } else {
            (self.successful_requests as f64 / self.total_requests as f64) * 100.0
        }
    }
}

/// Default metrics collector implementation.
#[derive(Default)]
pub struct DefaultMetricsCollector {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_latency_ms: AtomicU64,
    uploaded_bytes: AtomicU64,
    operations: RwLock<HashMap<String, u64>>,
    errors: RwLock<HashMap<String, u64>>,
}

impl DefaultMetricsCollector {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }
}

fn bump(map: &RwLock<HashMap<String, u64>>, key: &str) {
    if let Ok(mut map) = map.write() {
        *map.entry(key.to_string()).or_insert(0) += 1;
    }
}

fn snapshot(map: &RwLock<HashMap<String, u64>>) -> HashMap<String, u64> {
    map.read().map(|m| m.clone()).unwrap_or_default()
}

impl MetricsCollector for DefaultMetricsCollector {
    fn record_request(&self, operation: &str, success: bool, duration: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }

        let latency_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);

        bump(&self.operations, operation);
    }

    fn record_error(&self, error_kind: &str) {
        bump(&self.errors, error_kind);
    }

    fn record_upload(&self, bytes: u64) {
        self.uploaded_bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    fn get_metrics(&self) -> RequestMetrics {
        RequestMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            uploaded_bytes: self.uploaded_bytes.load(Ordering::Relaxed),
            operations: snapshot(&self.operations),
            errors: snapshot(&self.errors),
        }
    }

    fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_requests.store(0, Ordering::Relaxed);
        self.failed_requests.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
        self.uploaded_bytes.store(0, Ordering::Relaxed);
        if let Ok(mut ops) = self.operations.write() {
            ops.clear();
        }
        if let Ok(mut errors) = self.errors.write() {
            errors.clear();
        }
    }
}

impl std::fmt::Debug for DefaultMetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultMetricsCollector")
            .field("total_requests", &self.total_requests.load(Ordering::Relaxed))
            .finish()
    }
}

/// No-op metrics collector.
#[derive(Debug, Default)]
pub struct NoopMetricsCollector;

impl MetricsCollector for NoopMetricsCollector {
    fn record_request(&self, _operation: &str, _success: bool, _duration: Duration) {}

    fn record_error(&self, _error_kind: &str) {}

    fn record_upload(&self, _bytes: u64) {}

    fn get_metrics(&self) -> RequestMetrics {
        RequestMetrics::default()
    }

    fn reset(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_requests() {
        let collector = DefaultMetricsCollector::new();

        collector.record_request("corpus.list", true, Duration::from_millis(40));
        collector.record_request("corpus.list", false, Duration::from_millis(60));
        collector.record_error("http_status");

        let metrics = collector.get_metrics();
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.operations.get("corpus.list"), Some(&2));
        assert_eq!(metrics.errors.get("http_status"), Some(&1));
        assert!((metrics.average_latency_ms() - 50.0).abs() < f64::EPSILON);
        assert!((metrics.success_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reset() {
        let collector = DefaultMetricsCollector::new();
        collector.record_request("corpus.delete", true, Duration::from_millis(5));
        collector.record_upload(2048);
        collector.reset();

        let metrics = collector.get_metrics();
        assert_eq!(metrics.total_requests, 0);
        assert_eq!(metrics.uploaded_bytes, 0);
        assert!(metrics.operations.is_empty());
    }

    #[test]
    fn test_empty_metrics_defaults() {
        let metrics = RequestMetrics::default();
        assert_eq!(metrics.average_latency_ms(), 0.0);
        assert_eq!(metrics.success_rate(), 100.0);
    }
}
