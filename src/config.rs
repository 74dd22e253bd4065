// Configuration Module

use std::fmt;
use std::time::Duration;

use log::{debug, info};

use crate::error::ConfigError;
use crate::origin::{non_blank, origin_of, OriginSource};

/// Request timeout applied to every request, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Name of the variable carrying the API base URL, both at build time and at
/// run time.
pub const API_URL_VAR: &str = "WASATEXT_API_URL";

/// API base URL injected when the crate was compiled, if any.
pub const BUILD_API_URL: Option<&str> = option_env!("WASATEXT_API_URL");

/// Which input the base URL was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    BuildConstant,
    Runtime,
    Origin,
}

impl fmt::Display for BaseUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaseUrlSource::BuildConstant => "build constant",
            BaseUrlSource::Runtime => "runtime override",
            BaseUrlSource::Origin => "host origin",
        };
        f.write_str(s)
    }
}

/// Resolved client settings. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
    source: BaseUrlSource,
}

impl ClientConfig {
    /// Resolve using the compile-time `WASATEXT_API_URL`, then `runtime`,
    /// then the origin of `origin`.
    pub fn from_build(runtime: Option<&str>, origin: &dyn OriginSource) -> Result<Self, ConfigError> {
        Self::resolve(BUILD_API_URL, runtime, origin)
    }

    /// Resolve the base URL from an injected value, a runtime override and the
    /// host origin, in that order of precedence.
    ///
    /// Injected and runtime values are used verbatim. An empty injected value
    /// counts as absent; for the runtime value so does a blank one. The origin
    /// source is only consulted when both are absent.
    pub fn resolve(
        injected: Option<&str>,
        runtime: Option<&str>,
        origin: &dyn OriginSource,
    ) -> Result<Self, ConfigError> {
        let (base_url, source) = if let Some(url) = injected.filter(|s| !s.is_empty()) {
            (url.to_string(), BaseUrlSource::BuildConstant)
        } else if let Some(url) = runtime.and_then(non_blank) {
            (url, BaseUrlSource::Runtime)
        } else {
            let location = origin.location().ok_or(ConfigError::MissingBaseUrl)?;
            debug!("Deriving API base URL from host location {}", location);
            let url = origin_of(&location)?.ok_or(ConfigError::MissingBaseUrl)?;
            (url, BaseUrlSource::Origin)
        };

        info!("API base URL {} (from {})", base_url, source);
        Ok(Self {
            base_url,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            source,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn source(&self) -> BaseUrlSource {
        self.source
    }
}
