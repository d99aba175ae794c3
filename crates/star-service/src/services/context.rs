//! Service context - dependency container for starboard services
//!
//! Holds the persistent stores and the host collaborators every starboard
//! shares. Cloning is cheap; all dependencies sit behind `Arc`.

use std::sync::Arc;

use star_core::traits::{
    CapabilityCheck, EntryPoster, EntryRenderer, ReactionStore, SettingsRepository,
};

use super::error::{ServiceError, ServiceResult};
use super::renderer::TextEntryRenderer;

/// Service context containing all dependencies
///
/// Provides access to:
/// - the reaction store and settings repository
/// - the capability check for board channels
/// - the renderer and poster used to publish entries
#[derive(Clone)]
pub struct ServiceContext {
    // Persistence
    reaction_store: Arc<dyn ReactionStore>,
    settings_repo: Arc<dyn SettingsRepository>,

    // Host collaborators
    capability: Arc<dyn CapabilityCheck>,
    renderer: Arc<dyn EntryRenderer>,
    poster: Arc<dyn EntryPoster>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        reaction_store: Arc<dyn ReactionStore>,
        settings_repo: Arc<dyn SettingsRepository>,
        capability: Arc<dyn CapabilityCheck>,
        renderer: Arc<dyn EntryRenderer>,
        poster: Arc<dyn EntryPoster>,
    ) -> Self {
        Self {
            reaction_store,
            settings_repo,
            capability,
            renderer,
            poster,
        }
    }

    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Persistence ===

    /// Get the reaction store
    pub fn reaction_store(&self) -> &dyn ReactionStore {
        self.reaction_store.as_ref()
    }

    /// Get the settings repository
    pub fn settings_repo(&self) -> &dyn SettingsRepository {
        self.settings_repo.as_ref()
    }

    // === Host collaborators ===

    /// Get the capability check
    pub fn capability(&self) -> &dyn CapabilityCheck {
        self.capability.as_ref()
    }

    /// Get the entry renderer
    pub fn renderer(&self) -> &dyn EntryRenderer {
        self.renderer.as_ref()
    }

    /// Get the entry poster
    pub fn poster(&self) -> &dyn EntryPoster {
        self.poster.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("reaction_store", &"dyn ReactionStore")
            .field("settings_repo", &"dyn SettingsRepository")
            .field("collaborators", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
///
/// The renderer defaults to [`TextEntryRenderer`]; everything else is required.
pub struct ServiceContextBuilder {
    reaction_store: Option<Arc<dyn ReactionStore>>,
    settings_repo: Option<Arc<dyn SettingsRepository>>,
    capability: Option<Arc<dyn CapabilityCheck>>,
    renderer: Option<Arc<dyn EntryRenderer>>,
    poster: Option<Arc<dyn EntryPoster>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            reaction_store: None,
            settings_repo: None,
            capability: None,
            renderer: None,
            poster: None,
        }
    }

    pub fn reaction_store(mut self, store: Arc<dyn ReactionStore>) -> Self {
        self.reaction_store = Some(store);
        self
    }

    pub fn settings_repo(mut self, repo: Arc<dyn SettingsRepository>) -> Self {
        self.settings_repo = Some(repo);
        self
    }

    pub fn capability(mut self, capability: Arc<dyn CapabilityCheck>) -> Self {
        self.capability = Some(capability);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn EntryRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn poster(mut self, poster: Arc<dyn EntryPoster>) -> Self {
        self.poster = Some(poster);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.reaction_store
                .ok_or_else(|| ServiceError::validation("reaction_store is required"))?,
            self.settings_repo
                .ok_or_else(|| ServiceError::validation("settings_repo is required"))?,
            self.capability
                .ok_or_else(|| ServiceError::validation("capability is required"))?,
            self.renderer
                .unwrap_or_else(|| Arc::new(TextEntryRenderer::new())),
            self.poster
                .ok_or_else(|| ServiceError::validation("poster is required"))?,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
