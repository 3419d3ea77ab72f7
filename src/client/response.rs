//! Response body parsing.
//!
//! The parsing strategy follows the declared `content-type`: JSON when it
//! says so, raw text otherwise.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;

/// A parsed response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Parses `text` according to `content_type`.
    ///
    /// An empty body is returned as empty text whatever the declared type.
    pub fn parse(content_type: Option<&str>, text: String) -> Result<Self, ApiError> {
        if text.is_empty() || !is_json(content_type) {
            return Ok(ResponseBody::Text(text));
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(ResponseBody::Json(value)),
            Err(source) => Err(ApiError::Serialization { raw: text, source }),
        }
    }

    /// Decodes the body into a typed value.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ResponseBody::Json(value) => {
                let raw = value.to_string();
                serde_json::from_value(value)
                    .map_err(|source| ApiError::Serialization { raw, source })
            }
            ResponseBody::Text(raw) => match serde_json::from_str(&raw) {
                Ok(parsed) => Ok(parsed),
                Err(source) => Err(ApiError::Serialization { raw, source }),
            },
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// The `message` (or else `error`) string field of a JSON body.
    pub fn message(&self) -> Option<String> {
        let value = self.as_json()?;
        ["message", "error"]
            .iter()
            .find_map(|field| value.get(*field).and_then(Value::as_str))
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    }
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}
