//! Authenticated request builders.
//!
//! Every request carries the API key as a query parameter and the caller's
//! token in the `Authorization` header. Builders only describe requests;
//! sending them is left to an [`HttpTransport`](crate::client::HttpTransport).

use crate::auth::Token;
use crate::client::USER_AGENT;
use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Request, RequestBuilder};
use std::path::Path;
use url::Url;

/// Multipart field carrying the uploaded content.
pub const FILE_FIELD: &str = "file";

/// Content type used for uploaded parts.
pub const OCTET_STREAM: &str = "application/octet-stream";

const AUTH_TYPE: &str = "jwt";

/// Build an authenticated `GET` request.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the request cannot be assembled.
pub fn build_get(
    http: &Client,
    url: Url,
    api_key: &str,
    token: &Token,
    params: &[(String, String)],
) -> Result<Request> {
    authorized(http.request(Method::GET, url), api_key, token)
        .query(params)
        .build()
        .map_err(build_error)
}

/// Build an authenticated `DELETE` request.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the request cannot be assembled.
pub fn build_delete(
    http: &Client,
    url: Url,
    api_key: &str,
    token: &Token,
    params: &[(String, String)],
) -> Result<Request> {
    authorized(http.request(Method::DELETE, url), api_key, token)
        .query(params)
        .build()
        .map_err(build_error)
}

/// Build an authenticated multipart `POST` request.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the request cannot be assembled.
pub fn build_multipart_post(
    http: &Client,
    url: Url,
    api_key: &str,
    token: &Token,
    form: Form,
) -> Result<Request> {
    authorized(http.request(Method::POST, url), api_key, token)
        .multipart(form)
        .build()
        .map_err(build_error)
}

/// Multipart form holding a single [`FILE_FIELD`] part.
#[must_use]
pub fn file_form(part: Part) -> Form {
    Form::new().part(FILE_FIELD, part)
}

/// Part for an in-memory buffer.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the content type is rejected.
pub fn bytes_part(file_name: &str, content: Bytes) -> Result<Part> {
    let length = content.len() as u64;
    Part::stream_with_length(content, length)
        .file_name(file_name.to_string())
        .mime_str(OCTET_STREAM)
        .map_err(build_error)
}

/// Part streaming a file from disk.
///
/// The file is opened eagerly so that a missing or unreadable file is reported
/// before anything is sent; its contents are read while the body is streamed.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the file cannot be opened.
pub fn file_part(path: &Path) -> Result<Part> {
    let file = std::fs::File::open(path).map_err(|err| {
        Error::InvalidArgument(format!("Cannot open `{}`: {err}", path.display()))
    })?;
    let length = file
        .metadata()
        .map_err(|err| {
            Error::InvalidArgument(format!("Cannot stat `{}`: {err}", path.display()))
        })?
        .len();

    let file_name = path
        .file_name()
        .map_or_else(|| FILE_FIELD.to_string(), |name| name.to_string_lossy().into_owned());

    Part::stream_with_length(tokio::fs::File::from_std(file), length)
        .file_name(file_name)
        .mime_str(OCTET_STREAM)
        .map_err(build_error)
}

fn authorized(builder: RequestBuilder, api_key: &str, token: &Token) -> RequestBuilder {
    builder
        .query(&[("api_key", api_key)])
        .header("Authorization", token.expose())
        .header("Stream-Auth-Type", AUTH_TYPE)
        .header("X-Stream-Client", USER_AGENT)
        .header("Accept", "application/json")
}

fn build_error(err: reqwest::Error) -> Error {
    Error::ConfigError(format!("Failed to build request: {err}"))
}
