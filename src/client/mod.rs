//! Ragcy API client.
//!
//! Provides the main client interface for interacting with the Ragcy API.

mod dispatcher;

pub use dispatcher::{
    is_reserved_header, RequestDescriptor, RequestDispatcher, RequestPayload, RESERVED_HEADERS,
};

use std::sync::Arc;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{RagcyConfig, RagcyConfigBuilder};
use crate::errors::{RagcyError, RagcyResult};
use crate::observability::{
    ConsoleLogger, DefaultMetricsCollector, LogConfig, Logger, MetricsCollector, Observability,
    ObservabilityConfig,
};
use crate::services::{
    CorpusService, DataSourcePackager, DataSourcesService, RequestsService, SessionsService,
};
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main Ragcy client.
///
/// Provides access to corpora, data sources, sessions and requests. The
/// client is cheap to share: every service holds the same dispatcher.
///
/// # Example
///
/// ```rust,no_run
/// use ragcy_client::{DataSourceInput, QueryRequest, RagcyClient};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = RagcyClient::builder()
///         .api_key("rk_your_api_key")
///         .build()?;
///
///     client
///         .data_sources()
///         .add("corpus_123", DataSourceInput::file("handbook.pdf"))
///         .await?;
///
///     let answer = client
///         .corpus()
///         .query(QueryRequest::new("corpus_123", "What is the refund policy?"))
///         .await?;
///     println!("{:?}", answer.data());
///     Ok(())
/// }
/// ```
pub struct RagcyClient {
    config: RagcyConfig,
    corpus_service: CorpusService,
    data_sources_service: DataSourcesService,
    sessions_service: SessionsService,
    requests_service: RequestsService,
    observability: Arc<Observability>,
}

impl RagcyClient {
    /// Creates a new client builder.
    pub fn builder() -> RagcyClientBuilder {
        RagcyClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `RAGCY_API_KEY` and optionally `RAGCY_BASE_URL` and
    /// `RAGCY_TIMEOUT`.
    pub fn from_env() -> RagcyResult<Self> {
        let config = RagcyConfig::from_env()?;
        RagcyClientBuilder::from_config(config).build()
    }

    /// Creates a client from an API key.
    pub fn from_api_key(api_key: impl Into<String>) -> RagcyResult<Self> {
        RagcyClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the corpus service.
    pub fn corpus(&self) -> &CorpusService {
        &self.corpus_service
    }

    /// Returns the data sources service.
    pub fn data_sources(&self) -> &DataSourcesService {
        &self.data_sources_service
    }

    /// Returns the sessions service.
    pub fn sessions(&self) -> &SessionsService {
        &self.sessions_service
    }

    /// Returns the requests service.
    pub fn requests(&self) -> &RequestsService {
        &self.requests_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &RagcyConfig {
        &self.config
    }

    /// Returns the observability facade.
    pub fn observability(&self) -> &Observability {
        &self.observability
    }
}

impl std::fmt::Debug for RagcyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagcyClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Ragcy client.
pub struct RagcyClientBuilder {
    config_builder: RagcyConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
    logger: Option<Arc<dyn Logger>>,
    metrics: Option<Arc<dyn MetricsCollector>>,
    log_config: LogConfig,
    packager: DataSourcePackager,
}

impl RagcyClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: RagcyConfigBuilder::new(),
            transport: None,
            auth: None,
            logger: None,
            metrics: None,
            log_config: LogConfig::default(),
            packager: DataSourcePackager::default(),
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: RagcyConfig) -> Self {
        let mut config_builder = RagcyConfigBuilder::new()
            .api_key(config.api_key())
            .base_url(&config.base_url);

        if let Some(timeout) = config.timeout {
            config_builder = config_builder.timeout(timeout);
        }
        for (name, value) in config.custom_headers {
            config_builder = config_builder.header(name, value);
        }

        Self {
            config_builder,
            ..Self::new()
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the API key from an environment variable.
    pub fn api_key_from_env(mut self, var_name: &str) -> RagcyResult<Self> {
        self.config_builder = self.config_builder.api_key_from_env(var_name)?;
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config_builder = self.config_builder.timeout_secs(secs);
        self
    }

    /// Adds a header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.header(name, value);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets a custom logger.
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets a custom metrics collector.
    pub fn metrics(mut self, metrics: Arc<dyn MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Sets the log configuration.
    pub fn log_config(mut self, config: LogConfig) -> Self {
        self.log_config = config;
        self
    }

    /// Sets the packager used for data source uploads.
    pub fn packager(mut self, packager: DataSourcePackager) -> Self {
        self.packager = packager;
        self
    }

    /// Builds the client.
    pub fn build(self) -> RagcyResult<RagcyClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout).map_err(|e| {
                    RagcyError::Configuration {
                        message: e.to_string(),
                    }
                })?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        let logger: Arc<dyn Logger> = self
            .logger
            .unwrap_or_else(|| Arc::new(ConsoleLogger::new(self.log_config.clone())));
        let metrics: Arc<dyn MetricsCollector> = self
            .metrics
            .unwrap_or_else(|| Arc::new(DefaultMetricsCollector::new()));

        let observability = Arc::new(Observability::with_components(
            logger,
            metrics,
            ObservabilityConfig {
                logging: self.log_config,
                enable_metrics: true,
            },
        ));

        let dispatcher = Arc::new(
            RequestDispatcher::new(transport, auth, Arc::clone(&observability))
                .with_headers(config.custom_headers.clone()),
        );

        Ok(RagcyClient {
            corpus_service: CorpusService::new(Arc::clone(&dispatcher)),
            data_sources_service: DataSourcesService::new(
                Arc::clone(&dispatcher),
                Arc::new(self.packager),
            ),
            sessions_service: SessionsService::new(Arc::clone(&dispatcher)),
            requests_service: RequestsService::new(dispatcher),
            config,
            observability,
        })
    }
}

impl Default for RagcyClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
