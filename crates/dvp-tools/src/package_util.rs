//! Version numbers baked into the toolchain.

use serde::{Deserialize, Serialize};

/// Version of this toolchain.
pub const VERSION: &str = "2.0.0-internal-001";

/// Version of the virtualization API plugins are built against.
pub const VIRTUALIZATION_API_VERSION: &str = "1.1.0";

/// Minimum engine API version the upload protocol speaks.
pub const ENGINE_API_VERSION: &str = "1.12.0";

/// Returns the leading `major.minor.micro` part of `version`.
///
/// Surrounding whitespace and any pre-release or build suffix are dropped.
/// Returns `None` when the version does not start with three numeric parts.
#[must_use]
pub fn external_version_string(version: &str) -> Option<String> {
    let mut parts = version.trim().splitn(3, '.');
    let major = numeric_prefix(parts.next()?, false)?;
    let minor = numeric_prefix(parts.next()?, false)?;
    let micro = numeric_prefix(parts.next()?, true)?;
    Some(format!("{major}.{minor}.{micro}"))
}

fn numeric_prefix(part: &str, allow_suffix: bool) -> Option<&str> {
    let end = part
        .char_indices()
        .find(|(_, character)| !character.is_ascii_digit())
        .map_or(part.len(), |(index, _)| index);
    if end == 0 || (!allow_suffix && end != part.len()) {
        return None;
    }
    part.get(..end)
}

/// The `APIVersion` object carried by upload artifacts and engine sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiVersion {
    /// Always `APIVersion`.
    #[serde(rename = "type")]
    pub kind: ApiVersionType,
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
    /// Micro version.
    pub micro: u32,
}

/// Type tag of [`ApiVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiVersionType {
    /// The only valid tag.
    #[serde(rename = "APIVersion")]
    ApiVersion,
}

impl ApiVersion {
    /// Parses a `major.minor.micro` version.
    #[must_use]
    pub fn parse(version: &str) -> Option<Self> {
        let external = external_version_string(version)?;
        let mut numbers = external.split('.').map(str::parse::<u32>);
        let major = numbers.next()?.ok()?;
        let minor = numbers.next()?.ok()?;
        let micro = numbers.next()?.ok()?;
        Some(Self {
            kind: ApiVersionType::ApiVersion,
            major,
            minor,
            micro,
        })
    }

    /// Reads the object back from JSON, rejecting anything malformed.
    #[must_use]
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Returns the object as JSON.
    #[must_use]
    pub fn to_json(self) -> serde_json::Value {
        serde_json::json!({
            "type": "APIVersion",
            "major": self.major,
            "minor": self.minor,
            "micro": self.micro,
        })
    }
}

/// Virtualization API version recorded as `buildApi`.
#[must_use]
pub fn build_api_version() -> ApiVersion {
    ApiVersion::parse(VIRTUALIZATION_API_VERSION).unwrap_or(ApiVersion {
        kind: ApiVersionType::ApiVersion,
        major: 1,
        minor: 1,
        micro: 0,
    })
}

/// Engine API version recorded as `engineApi`.
#[must_use]
pub fn engine_api_version() -> ApiVersion {
    ApiVersion::parse(ENGINE_API_VERSION).unwrap_or(ApiVersion {
        kind: ApiVersionType::ApiVersion,
        major: 1,
        minor: 12,
        micro: 0,
    })
}
