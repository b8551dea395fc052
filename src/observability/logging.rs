//! Logging configuration and utilities.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::EnvFilter;

use crate::errors::RagcyError;

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Trace level.
    Trace = 0,
    /// Debug level.
    Debug = 1,
    /// Info level.
    #[default]
    Info = 2,
    /// Warning level.
    Warn = 3,
    /// Error level.
    Error = 4,
    /// Off (no logging).
    Off = 5,
}

impl LogLevel {
    /// Returns the directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level.
    pub level: LogLevel,
    /// Include timestamps.
    pub include_timestamps: bool,
    /// Log request bodies.
    pub log_request_bodies: bool,
    /// Log response bodies.
    pub log_response_bodies: bool,
    /// Maximum body length to log.
    pub max_body_length: usize,
    /// Redact sensitive data.
    pub redact_sensitive: bool,
    /// Emit JSON lines when installed as the global subscriber.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            include_timestamps: true,
            log_request_bodies: false,
            log_response_bodies: false,
            max_body_length: 1024,
            redact_sensitive: true,
            json: false,
        }
    }
}

impl LogConfig {
    /// Creates a new log configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the log level.
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Enables request and response body logging.
    pub fn log_bodies(mut self) -> Self {
        self.log_request_bodies = true;
        self.log_response_bodies = true;
        self
    }

    /// Disables sensitive data redaction.
    pub fn no_redact(mut self) -> Self {
        self.redact_sensitive = false;
        self
    }

    /// Switches the global subscriber to JSON output.
    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Installs a global `tracing` subscriber using this configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level. Intended to be
    /// called once by the application; a second call returns an error.
    pub fn init(&self) -> Result<(), RagcyError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_directive()));

        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        let result = if self.json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };

        result.map_err(|e| RagcyError::Configuration {
            message: format!("Failed to initialize logging: {}", e),
        })
    }
}

/// Logger interface.
pub trait Logger: Send + Sync {
    /// Logs a message at the specified level.
    fn log(&self, level: LogLevel, message: &str, context: Option<&HashMap<String, String>>);

    /// Logs at debug level.
    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message, None);
    }

    /// Logs at info level.
    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, None);
    }

    /// Logs at warning level.
    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, None);
    }
}

fn redaction_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"Bearer [a-zA-Z0-9._~+/=-]+", "Bearer ***"),
            (r"(?i)api[_-]?key[=:][^\s,}]+", "api_key=***"),
            (r"(?i)authorization[=:][^\s,}]+", "authorization=***"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| {
            Regex::new(pattern).ok().map(|re| (re, replacement))
        })
        .collect()
    })
}

/// Console logger implementation.
pub struct ConsoleLogger {
    config: LogConfig,
}

impl ConsoleLogger {
    /// Creates a new console logger.
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }

    /// Returns the logger configuration.
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Redacts sensitive data from text.
    fn redact(&self, text: &str) -> String {
        if !self.config.redact_sensitive {
            return text.to_string();
        }

        let mut result = text.to_string();
        for (re, replacement) in redaction_patterns() {
            result = re.replace_all(&result, *replacement).to_string();
        }
        result
    }

    fn format(
        &self,
        level: LogLevel,
        message: &str,
        context: Option<&HashMap<String, String>>,
    ) -> Option<String> {
        let level_str = match level {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Off => return None,
        };

        let mut parts = Vec::new();

        if self.config.include_timestamps {
            parts.push(format!("[{}]", chrono::Utc::now().to_rfc3339()));
        }

        parts.push(format!("[{}]", level_str));
        parts.push(self.redact(message));

        if let Some(ctx) = context {
            let redacted: HashMap<&str, String> = ctx
                .iter()
                .map(|(k, v)| {
                    let lowered = k.to_lowercase();
                    let v = if self.config.redact_sensitive
                        && (lowered.contains("key")
                            || lowered.contains("token")
                            || lowered.contains("auth"))
                    {
                        "***".to_string()
                    } else {
                        self.redact(v)
                    };
                    (k.as_str(), v)
                })
                .collect();

            if let Ok(json) = serde_json::to_string(&redacted) {
                parts.push(json);
            }
        }

        Some(parts.join(" "))
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, level: LogLevel, message: &str, context: Option<&HashMap<String, String>>) {
        if level < self.config.level {
            return;
        }

        let Some(output) = self.format(level, message, context) else {
            return;
        };

        match level {
            LogLevel::Error | LogLevel::Warn => eprintln!("{}", output),
            _ => println!("{}", output),
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(LogConfig::default())
    }
}

impl std::fmt::Debug for ConsoleLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleLogger")
            .field("config", &self.config)
            .finish()
    }
}

/// No-op logger that discards all messages.
#[derive(Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _level: LogLevel, _message: &str, _context: Option<&HashMap<String, String>>) {}
}
