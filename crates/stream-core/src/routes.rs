//! Endpoint URL construction.

use crate::error::{Error, Result};
use url::Url;

/// Versioned API prefix, relative to the base URL.
pub const API_PATH: &str = "api/v1.0/";

/// Images resource, relative to [`API_PATH`].
pub const IMAGES_PATH: &str = "images/";

/// Build `<base>/api/v1.0/images/`.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the base URL cannot carry a path.
pub fn build_images_url(base: &Url) -> Result<Url> {
    build_api_url(base, IMAGES_PATH)
}

/// Join a resource path onto the versioned API root of `base`.
///
/// # Errors
///
/// Returns [`Error::ConfigError`] if the base URL cannot carry a path or the
/// joined URL is malformed.
pub fn build_api_url(base: &Url, resource: &str) -> Result<Url> {
    if base.cannot_be_a_base() {
        return Err(Error::ConfigError(format!(
            "Base URL `{base}` cannot be used as an API root"
        )));
    }

    let mut root = base.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }

    root.join(API_PATH)
        .and_then(|api| api.join(resource))
        .map_err(|err| Error::ConfigError(format!("Invalid endpoint `{resource}`: {err}")))
}
