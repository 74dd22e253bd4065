// src/origin.rs

// Where the client learns the location it is "served from" when no API URL
// has been configured. A browser would read `window.location`; a native host
// has to be told, so the location comes from one of these sources.

use crate::error::ConfigError;
use url::Url;

/// Environment variable holding the host location for native processes.
pub const ORIGIN_VAR: &str = "WASATEXT_ORIGIN";

/// A provider of the hosting environment's current location.
///
/// The returned string may be any absolute URL; only its origin is used.
pub trait OriginSource {
    fn location(&self) -> Option<String>;

    /// Fall back to `other` when this source has no location.
    fn or<S: OriginSource>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
    {
        Or { first: self, second: other }
    }
}

impl<T: OriginSource + ?Sized> OriginSource for &T {
    fn location(&self) -> Option<String> {
        (**self).location()
    }
}

/// A location known up front (CLI flag, settings file, tests).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLocation(pub String);

impl OriginSource for FixedLocation {
    fn location(&self) -> Option<String> {
        non_blank(&self.0)
    }
}

impl OriginSource for Option<String> {
    fn location(&self) -> Option<String> {
        self.as_deref().and_then(non_blank)
    }
}

/// Reads the location from an environment variable at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLocation {
    var: String,
}

impl EnvLocation {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvLocation {
    fn default() -> Self {
        Self::new(ORIGIN_VAR)
    }
}

impl OriginSource for EnvLocation {
    fn location(&self) -> Option<String> {
        std::env::var(&self.var).ok().as_deref().and_then(non_blank)
    }
}

/// A host with no accessible location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoLocation;

impl OriginSource for NoLocation {
    fn location(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct Or<A, B> {
    first: A,
    second: B,
}

impl<A: OriginSource, B: OriginSource> OriginSource for Or<A, B> {
    fn location(&self) -> Option<String> {
        self.first.location().or_else(|| self.second.location())
    }
}

/// Reduce a location to its origin: scheme, host and port, no path.
///
/// Default ports are dropped, as browsers do. Locations with an opaque
/// origin (`file:`, `data:`, ...) yield `Ok(None)`.
pub fn origin_of(location: &str) -> Result<Option<String>, ConfigError> {
    let url = Url::parse(location.trim()).map_err(|source| ConfigError::InvalidOrigin {
        location: location.to_string(),
        source,
    })?;
    let origin = url.origin();
    if !origin.is_tuple() {
        return Ok(None);
    }
    Ok(Some(origin.ascii_serialization()))
}

pub(crate) fn non_blank(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
