//! `dvp upload`: send a built artifact to an engine.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::ToolError;
use crate::engine_client::EngineClient;
use crate::package_util::ApiVersion;

/// Uploads the artifact at `upload_artifact` through `client`.
///
/// The artifact's `engineApi` must be well formed; it selects the API
/// version of the engine session.
///
/// # Errors
///
/// Returns [`ToolError::ReadArtifact`] or [`ToolError::InvalidArtifactJson`]
/// when the artifact cannot be loaded, [`ToolError::InvalidArtifact`] when
/// `engineApi` is missing or malformed, and the client's error when any
/// engine call fails.
pub fn upload<C: EngineClient + ?Sized>(
    client: &C,
    user: &str,
    upload_artifact: &Path,
    password: &str,
) -> Result<(), ToolError> {
    tracing::info!(user, path = %upload_artifact.display(), "uploading plugin");
    let content = fs::read(upload_artifact).map_err(|source| ToolError::ReadArtifact {
        path: upload_artifact.to_path_buf(),
        source,
    })?;
    let artifact: Value = serde_json::from_slice(&content)
        .map_err(|source| ToolError::InvalidArtifactJson { source })?;
    let version = artifact
        .get("engineApi")
        .and_then(ApiVersion::from_json)
        .ok_or(ToolError::InvalidArtifact)?;

    client.create_session(version)?;
    client.login(user, password)?;
    let token = client.request_upload_token()?;
    let file_name = upload_artifact
        .file_name()
        .map_or_else(|| String::from("artifact.json"), |name| name.to_string_lossy().into_owned());
    client.upload(&token, &file_name, content)?;
    tracing::info!(file_name, "plugin uploaded");
    Ok(())
}
