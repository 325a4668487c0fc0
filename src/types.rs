//! Request and response types shared by the store and the HTTP API

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body of `POST /api/save`
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SaveRequest {
    /// Target filename inside the data directory
    pub filename: Option<String>,
    /// Base64 payload, optionally prefixed with a data-URI header
    pub content: Option<String>,
    /// JSON value written verbatim; takes precedence over `content`
    #[schema(value_type = Option<Object>)]
    pub raw_json: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SaveResponse {
    /// Always "success"
    pub status: String,
    /// Absolute path of the written file
    pub path: String,
}

/// Body of `POST /api/save-config`
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SaveConfigRequest {
    #[schema(value_type = Option<Object>)]
    pub config: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LoadParams {
    /// Name of a `.json` file in the data directory
    pub file: Option<String>,
}

/// One saved drawing as reported by `GET /api/list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FileEntry {
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time, seconds since the Unix epoch
    pub modified: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListResponse {
    pub files: Vec<FileEntry>,
}

/// Payload of a save, after validation
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// JSON value serialized as the file's text
    RawJson(serde_json::Value),
    /// Base64 text, possibly carrying a `data:<mime>;base64,` header
    Base64(String),
}

impl SaveRequest {
    /// Split into a filename and payload, rejecting missing fields.
    ///
    /// Empty strings and `null` count as absent.
    pub fn into_parts(self) -> crate::Result<(String, Payload)> {
        let filename = self
            .filename
            .filter(|f| !f.is_empty())
            .ok_or_else(|| crate::Error::BadRequest("Missing filename".into()))?;

        let payload = match (self.raw_json, self.content) {
            (Some(value), _) if !value.is_null() => Payload::RawJson(value),
            (_, Some(content)) if !content.is_empty() => Payload::Base64(content),
            _ => {
                return Err(crate::Error::BadRequest(
                    "Missing content or raw_json".into(),
                ))
            }
        };

        Ok((filename, payload))
    }
}
