//! Client settings: application-wide defaults and their per-thread copies.

use std::time::Duration;

use ferrous_container::{DiResult, Options, Resolver, ResolverContext};
use parking_lot::RwLock;

/// Values a client runs with.
///
/// Registered through the options pattern, so applications adjust them with
/// `configure` before the container is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientDefaults {
    pub api_base_url: String,
    pub http_request_timeout: Duration,
    pub upload_timeout: Duration,
    pub proxy_url: Option<String>,
    pub show_debug: bool,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.twitter.com/1.1".to_string(),
            http_request_timeout: Duration::from_secs(10),
            upload_timeout: Duration::from_secs(60),
            proxy_url: None,
            show_debug: false,
        }
    }
}

impl ClientDefaults {
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.http_request_timeout.is_zero() {
            return Err("http_request_timeout must be greater than 0".to_string());
        }
        if self.upload_timeout.is_zero() {
            return Err("upload_timeout must be greater than 0".to_string());
        }
        if self.api_base_url.is_empty() {
            return Err("api_base_url must not be empty".to_string());
        }
        Ok(())
    }
}

/// Application-wide settings shared by every thread.
///
/// New threads copy the current application settings into their own
/// [`ClientSettings`] when they first ask for it.
#[derive(Debug)]
pub struct SettingsAccessor {
    application: RwLock<ClientDefaults>,
}

impl SettingsAccessor {
    pub fn new(defaults: ClientDefaults) -> Self {
        Self {
            application: RwLock::new(defaults),
        }
    }

    pub(crate) fn from_options(r: &ResolverContext<'_>) -> DiResult<Self> {
        let options = r.get::<Options<ClientDefaults>>()?;
        Ok(Self::new((*options.get()).clone()))
    }

    pub fn application_settings(&self) -> ClientDefaults {
        self.application.read().clone()
    }

    /// Replaces the application settings seen by threads that have not
    /// resolved their settings yet.
    pub fn set_application_settings(&self, settings: ClientDefaults) {
        tracing::debug!(api_base_url = %settings.api_base_url, "application settings replaced");
        *self.application.write() = settings;
    }
}

/// Settings of the current thread.
#[derive(Debug)]
pub struct ClientSettings {
    values: RwLock<ClientDefaults>,
}

impl ClientSettings {
    pub fn new(values: ClientDefaults) -> Self {
        Self {
            values: RwLock::new(values),
        }
    }

    pub fn values(&self) -> ClientDefaults {
        self.values.read().clone()
    }

    pub fn http_request_timeout(&self) -> Duration {
        self.values.read().http_request_timeout
    }

    /// Changes this thread's settings only.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut ClientDefaults),
    {
        f(&mut self.values.write());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ClientDefaults::default().check().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let settings = ClientDefaults {
            http_request_timeout: Duration::ZERO,
            ..ClientDefaults::default()
        };
        assert!(settings.check().unwrap_err().contains("http_request_timeout"));
    }

    #[test]
    fn update_changes_only_the_copy() {
        let accessor = SettingsAccessor::new(ClientDefaults::default());
        let local = ClientSettings::new(accessor.application_settings());
        local.update(|s| s.show_debug = true);

        assert!(local.values().show_debug);
        assert!(!accessor.application_settings().show_debug);
    }
}
