//! Gateway state
//!
//! Shared dependencies of a running gateway.

use std::sync::Arc;

use star_common::AppConfig;
use star_service::StarboardManager;

use crate::dispatch::EventDispatcher;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Starboards of every configured guild
    manager: Arc<StarboardManager>,
    /// Routes inbound events to the manager
    event_dispatcher: Arc<EventDispatcher>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(manager: Arc<StarboardManager>, event_dispatcher: Arc<EventDispatcher>, config: AppConfig) -> Self {
        Self {
            manager,
            event_dispatcher,
            config: Arc::new(config),
        }
    }

    /// Get the starboard manager
    pub fn manager(&self) -> &Arc<StarboardManager> {
        &self.manager
    }

    /// Get the event dispatcher
    pub fn event_dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.event_dispatcher
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("manager", &self.manager)
            .field("event_dispatcher", &self.event_dispatcher)
            .field("config", &"AppConfig")
            .finish()
    }
}
