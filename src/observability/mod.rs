//! Observability module for the Ragcy client.
//!
//! Provides logging and metrics for dispatched requests. Spans and events
//! go through `tracing`; the [`Logger`] and [`MetricsCollector`] seams let
//! applications plug in their own sinks.

mod logging;
mod metrics;

pub use logging::{ConsoleLogger, LogConfig, LogLevel, Logger, NoopLogger};
pub use metrics::{DefaultMetricsCollector, MetricsCollector, NoopMetricsCollector, RequestMetrics};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Observability configuration.
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Logging configuration.
    pub logging: LogConfig,
    /// Enable metrics collection.
    pub enable_metrics: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            logging: LogConfig::default(),
            enable_metrics: true,
        }
    }
}

/// Observability facade for instrumenting requests.
pub struct Observability {
    logger: Arc<dyn Logger>,
    metrics: Arc<dyn MetricsCollector>,
    config: ObservabilityConfig,
}

impl Observability {
    /// Creates a new observability facade.
    pub fn new(config: ObservabilityConfig) -> Self {
        Self {
            logger: Arc::new(ConsoleLogger::new(config.logging.clone())),
            metrics: Arc::new(DefaultMetricsCollector::new()),
            config,
        }
    }

    /// Creates with custom logger and metrics collector.
    pub fn with_components(
        logger: Arc<dyn Logger>,
        metrics: Arc<dyn MetricsCollector>,
        config: ObservabilityConfig,
    ) -> Self {
        Self {
            logger,
            metrics,
            config,
        }
    }

    /// Creates a facade that discards everything.
    pub fn disabled() -> Self {
        Self::with_components(
            Arc::new(NoopLogger),
            Arc::new(NoopMetricsCollector),
            ObservabilityConfig {
                logging: LogConfig::new().level(LogLevel::Off),
                enable_metrics: false,
            },
        )
    }

    /// Returns the logger.
    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Returns the metrics collector.
    pub fn metrics(&self) -> &Arc<dyn MetricsCollector> {
        &self.metrics
    }

    /// Logs an outgoing request, including its body when configured.
    pub fn log_request(&self, operation: &str, body: Option<&[u8]>) {
        let mut context = HashMap::new();
        context.insert("operation".to_string(), operation.to_string());

        if self.config.logging.log_request_bodies {
            if let Some(body) = body {
                context.insert("body".to_string(), self.truncate(body));
            }
        }

        self.logger
            .log(LogLevel::Debug, "Sending request", Some(&context));
    }

    /// Logs a received response, including its body when configured.
    pub fn log_response(&self, operation: &str, status: u16, body: &[u8]) {
        let mut context = HashMap::new();
        context.insert("operation".to_string(), operation.to_string());
        context.insert("status".to_string(), status.to_string());

        if self.config.logging.log_response_bodies {
            context.insert("body".to_string(), self.truncate(body));
        }

        self.logger
            .log(LogLevel::Debug, "Received response", Some(&context));
    }

    /// Records a successful request.
    pub fn record_success(&self, operation: &str, duration: Duration) {
        if self.config.enable_metrics {
            self.metrics.record_request(operation, true, duration);
        }
    }

    /// Records a failed request.
    pub fn record_failure(&self, operation: &str, duration: Duration, error_kind: &str) {
        if self.config.enable_metrics {
            self.metrics.record_request(operation, false, duration);
            self.metrics.record_error(error_kind);
        }
    }

    /// Records the size of an uploaded file.
    pub fn record_upload(&self, bytes: u64) {
        if self.config.enable_metrics {
            self.metrics.record_upload(bytes);
        }
    }

    fn truncate(&self, body: &[u8]) -> String {
        let text = String::from_utf8_lossy(body);
        let max = self.config.logging.max_body_length;
        if text.chars().count() > max {
            let cut: String = text.chars().take(max).collect();
            format!("{}...", cut)
        } else {
            text.into_owned()
        }
    }
}

impl Default for Observability {
    fn default() -> Self {
        Self::new(ObservabilityConfig::default())
    }
}

impl std::fmt::Debug for Observability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observability")
            .field("config", &self.config)
            .finish()
    }
}

/// Request timer for measuring operation duration.
pub struct RequestTimer {
    start: Instant,
    operation: String,
}

impl RequestTimer {
    /// Creates a new request timer.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &str {
        &self.operation
    }
}
