//! Client builder

use std::sync::Arc;
use std::time::Duration;

use relaycord_cache::{SharedStateCache, StateCache};
use relaycord_common::ClientConfig;
use relaycord_http::RestClient;

use super::config::{GatewayConfig, ReconnectPolicy};
use super::runner::Client;
use crate::connection::{Connector, WebSocketConnector};
use crate::dispatch::EventCallbacks;
use crate::protocol::IdentifyProperties;

/// Builder for [`Client`]
pub struct ClientBuilder {
    config: GatewayConfig,
    connector: Option<Arc<dyn Connector>>,
    cache: Option<SharedStateCache>,
    http: Option<RestClient>,
    callbacks: EventCallbacks,
}

impl ClientBuilder {
    /// Start a builder for the given gateway token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            config: GatewayConfig::new(token),
            connector: None,
            cache: None,
            http: None,
            callbacks: EventCallbacks::default(),
        }
    }

    /// Apply gateway URL, client name, queue size and reconnect policy from
    /// the loaded configuration
    #[must_use]
    pub fn settings(mut self, settings: &ClientConfig) -> Self {
        if let Some(url) = &settings.gateway.url {
            self.config.url = Some(url.clone());
        }
        self.config.properties = self
            .config
            .properties
            .with_client_name(settings.app.name.clone());
        self.config.event_buffer = settings.gateway.event_buffer;
        self.config.reconnect = ReconnectPolicy::from(&settings.reconnect);
        self
    }

    /// Connect to this URL instead of asking the REST API
    #[must_use]
    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.config.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn properties(mut self, properties: IdentifyProperties) -> Self {
        self.config.properties = properties;
        self
    }

    #[must_use]
    pub fn reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.config.reconnect = policy;
        self
    }

    /// Delay between reconnect attempts, enabling reconnects
    #[must_use]
    pub fn reconnect_after(mut self, delay: Duration) -> Self {
        self.config.reconnect = ReconnectPolicy::immediate().with_delay(delay);
        self
    }

    /// Capacity of the outbound frame queue (at least 1)
    #[must_use]
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.config.event_buffer = capacity.max(1);
        self
    }

    /// Transport to connect with; defaults to [`WebSocketConnector`]
    #[must_use]
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Share an existing cache instead of creating a new one
    #[must_use]
    pub fn cache(mut self, cache: SharedStateCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// REST client for gateway discovery and for callbacks
    #[must_use]
    pub fn http(mut self, http: RestClient) -> Self {
        self.http = Some(http);
        self
    }

    #[must_use]
    pub fn callbacks(mut self, callbacks: EventCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    #[must_use]
    pub fn build(self) -> Client {
        let mut config = self.config;
        config.event_buffer = config.event_buffer.max(1);

        Client::from_parts(
            config,
            self.connector
                .unwrap_or_else(|| Arc::new(WebSocketConnector)),
            self.cache.unwrap_or_else(StateCache::shared),
            self.http,
            self.callbacks,
        )
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("url", &self.config.url)
            .field("reconnect", &self.config.reconnect)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}
