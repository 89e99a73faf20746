//! Auth API state and configuration.

use crate::auth::AuthService;

/// Configuration for the auth endpoints, injected at construction.
///
/// The API is disabled by default; the flag is checked once per request by
/// the handlers, never inside the core flow.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    api_enabled: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self { api_enabled: false }
    }

    #[must_use]
    pub fn with_api_enabled(mut self, enabled: bool) -> Self {
        self.api_enabled = enabled;
        self
    }

    #[must_use]
    pub fn api_enabled(&self) -> bool {
        self.api_enabled
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct AuthState {
    config: AuthConfig,
    service: AuthService,
}

impl AuthState {
    #[must_use]
    pub fn new(config: AuthConfig, service: AuthService) -> Self {
        Self { config, service }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn service(&self) -> &AuthService {
        &self.service
    }
}
