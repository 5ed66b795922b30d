//! HTTP client for the engine's plugin upload API.
//!
//! The engine speaks JSON over HTTP. Every response is an object whose
//! `type` is `OKResult` or `ErrorResult`; anything else is unexpected.
//! A session cookie set by the first call carries through the rest.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, multipart};
use serde_json::{Value, json};
use url::Url;

use crate::ToolError;
use crate::package_util::ApiVersion;

const API_ROOT: &str = "resources/json/delphix/";

/// Operations the upload command needs from the engine.
#[cfg_attr(test, mockall::automock)]
pub trait EngineClient {
    /// Opens a session for the given API version.
    fn create_session(&self, version: ApiVersion) -> Result<(), ToolError>;

    /// Authenticates the session.
    fn login(&self, user: &str, password: &str) -> Result<(), ToolError>;

    /// Requests a one-time token for a file upload.
    fn request_upload_token(&self) -> Result<String, ToolError>;

    /// Uploads `content` as `file_name` using `token`.
    fn upload(&self, token: &str, file_name: &str, content: Vec<u8>) -> Result<(), ToolError>;
}

/// [`EngineClient`] over blocking `reqwest`.
#[derive(Debug)]
pub struct HttpEngineClient {
    base: Url,
    client: Client,
}

impl HttpEngineClient {
    /// Creates a client for the engine at `engine` (a host name or
    /// `host:port`).
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidEngine`] when `engine` does not form a
    /// URL and [`ToolError::Connection`] when the HTTP client cannot be
    /// built.
    pub fn new(engine: &str, timeout: Duration) -> Result<Self, ToolError> {
        let base = Url::parse(&format!("http://{engine}/"))
            .and_then(|root| root.join(API_ROOT))
            .map_err(|source| ToolError::InvalidEngine {
                engine: engine.to_owned(),
                source,
            })?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|source| ToolError::Connection {
                url: base.to_string(),
                source,
            })?;
        Ok(Self { base, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ToolError> {
        self.base
            .join(path)
            .map_err(|source| ToolError::InvalidEngine {
                engine: self.base.to_string(),
                source,
            })
    }

    fn post_json(&self, path: &str, body: &Value) -> Result<Value, ToolError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%url, "posting to engine");
        send(&url, self.client.post(url.clone()).json(body))
    }
}

fn send(url: &Url, request: RequestBuilder) -> Result<Value, ToolError> {
    let connection_error = |source| ToolError::Connection {
        url: url.to_string(),
        source,
    };
    let response = request.send().map_err(connection_error)?;
    let status = response.status().as_u16();
    let body = response.text().map_err(connection_error)?;
    tracing::debug!(%url, status, "engine responded");
    process_response(status, &body)
}

impl EngineClient for HttpEngineClient {
    fn create_session(&self, version: ApiVersion) -> Result<(), ToolError> {
        self.post_json(
            "session",
            &json!({"type": "APISession", "version": version.to_json()}),
        )
        .map(drop)
    }

    fn login(&self, user: &str, password: &str) -> Result<(), ToolError> {
        self.post_json(
            "login",
            &json!({"type": "LoginRequest", "username": user, "password": password}),
        )
        .map(drop)
    }

    fn request_upload_token(&self) -> Result<String, ToolError> {
        let response = self.post_json("toolkit/requestUploadToken", &json!({}))?;
        upload_token(&response)
    }

    fn upload(&self, token: &str, file_name: &str, content: Vec<u8>) -> Result<(), ToolError> {
        let url = self.endpoint("data/upload")?;
        let form = multipart::Form::new()
            .text("token", token.to_owned())
            .part("file", multipart::Part::bytes(content).file_name(file_name.to_owned()));
        tracing::debug!(%url, file_name, "uploading plugin");
        send(&url, self.client.post(url.clone()).multipart(form)).map(drop)
    }
}

/// Interprets an engine response body.
///
/// # Errors
///
/// Returns [`ToolError::HttpPost`] for an `ErrorResult` and
/// [`ToolError::Unexpected`] for anything that is not an `OKResult`.
pub fn process_response(status: u16, body: &str) -> Result<Value, ToolError> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Err(ToolError::Unexpected {
            status,
            response: body.to_owned(),
        });
    };
    match value.get("type").and_then(Value::as_str) {
        Some("OKResult") => Ok(value),
        Some("ErrorResult") => Err(ToolError::HttpPost {
            status,
            error: value.get("error").cloned().unwrap_or(Value::Null),
        }),
        _ => Err(ToolError::Unexpected {
            status,
            response: serde_json::to_string_pretty(&value).unwrap_or_else(|_| body.to_owned()),
        }),
    }
}

fn upload_token(response: &Value) -> Result<String, ToolError> {
    response
        .pointer("/result/token")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| ToolError::Unexpected {
            status: 200,
            response: response.to_string(),
        })
}
