//! Response decoding.
//!
//! Successful responses are JSON objects; the interesting value usually sits
//! under a single field. Failed responses carry an error envelope.

use crate::error::{Error, Result};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error payload returned by the API on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Human readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Stream error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// HTTP status as reported in the body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    /// Exception name, e.g. `InputException`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
    /// Server side processing time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Link to documentation about the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<String>,
}

impl ErrorEnvelope {
    fn is_populated(&self) -> bool {
        self.detail.is_some() || self.exception.is_some() || self.code.is_some()
    }

    /// Convert into [`Error::RemoteError`], falling back to the response status.
    #[must_use]
    pub fn into_error(self, status: u16) -> Error {
        let message = self
            .detail
            .or_else(|| self.exception.clone())
            .unwrap_or_else(|| format!("request failed with status {status}"));

        Error::RemoteError {
            status: self.status_code.unwrap_or(status),
            code: self.code,
            exception: self.exception,
            message,
        }
    }
}

/// Pass successful responses through; turn failures into [`Error::RemoteError`].
///
/// # Errors
///
/// Returns [`Error::RemoteError`] for non-2xx responses, or a transport error
/// if the failure body cannot be read.
pub async fn deserialize_error(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.map_err(Error::from)?;
    Err(decode_error(status, &body))
}

/// Decode `field` from a successful response body.
///
/// # Errors
///
/// Returns [`Error::RemoteError`] for non-2xx responses and
/// [`Error::ParseError`] if the body is not JSON or lacks the field.
pub async fn deserialize<T>(response: Response, field: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let response = deserialize_error(response).await?;
    let body = response.bytes().await.map_err(Error::from)?;
    decode_field(&body, field)
}

/// Build the error for a failed response body.
#[must_use]
pub fn decode_error(status: StatusCode, body: &str) -> Error {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if envelope.is_populated() => envelope.into_error(status.as_u16()),
        _ => {
            let trimmed = body.trim();
            let message = if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            };
            Error::RemoteError {
                status: status.as_u16(),
                code: None,
                exception: None,
                message,
            }
        }
    }
}

/// Decode `field` from a JSON object.
///
/// # Errors
///
/// Returns [`Error::ParseError`] if the body is not JSON, the field is
/// missing, or it does not decode into `T`.
pub fn decode_field<T>(body: &[u8], field: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let mut value: Value = serde_json::from_slice(body)
        .map_err(|err| Error::ParseError(format!("Response is not valid JSON: {err}")))?;

    let inner = value
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| Error::ParseError(format!("Missing `{field}` in response")))?;

    serde_json::from_value(inner)
        .map_err(|err| Error::ParseError(format!("Invalid `{field}` in response: {err}")))
}
