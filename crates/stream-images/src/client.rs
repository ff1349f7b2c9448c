//! Asynchronous images client implementation.

use crate::models::ProcessOptions;
use crate::Result;
use bytes::Bytes;
use reqwest::{Client, Request, Response};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use stream_core::client::{ClientConfig, HttpTransport, ReqwestTransport};
use stream_core::config::StreamClientConfig;
use stream_core::request::{self, FILE_FIELD};
use stream_core::routes::build_images_url;
use stream_core::serialization::{deserialize, deserialize_error};
use stream_core::{Error, Token};
use tracing::{debug, info, warn};
use url::Url;
use validator::Validate;

/// Future returned by every images operation.
///
/// It owns everything it needs, so it can be awaited in place or handed to
/// `tokio::spawn`. Remote, transport and decoding failures surface here.
pub type Pending<T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'static>>;

/// Builder for [`ImagesClient`].
#[derive(Clone)]
pub struct ImagesClientBuilder {
    config: StreamClientConfig,
    http_config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl ImagesClientBuilder {
    /// Create a builder from a [`StreamClientConfig`].
    #[must_use]
    pub fn new(config: StreamClientConfig) -> Self {
        let http_config = ClientConfig::from_stream_config(&config);
        Self {
            config,
            http_config,
            transport: None,
        }
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Send requests through a custom transport instead of the pooled
    /// reqwest client.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration is invalid or the
    /// images endpoint cannot be derived from the base URL.
    pub fn build(self) -> Result<ImagesClient> {
        self.config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        let base_url = self.config.base_url()?;
        build_images_url(&base_url)?;

        let (http, transport): (Client, Arc<dyn HttpTransport>) = match self.transport {
            Some(transport) => (self.http_config.build_http_client()?, transport),
            None => {
                let transport = ReqwestTransport::from_config(&self.http_config)?;
                (transport.http().clone(), Arc::new(transport))
            }
        };

        Ok(ImagesClient {
            api_key: self.config.api_key,
            base_url,
            http,
            transport,
        })
    }
}

/// Asynchronous images client.
///
/// Cheap to clone; clones share the underlying transport. The client keeps no
/// per-call state, so any number of operations may run concurrently.
#[derive(Clone)]
pub struct ImagesClient {
    api_key: String,
    base_url: Url,
    http: Client,
    transport: Arc<dyn HttpTransport>,
}

impl ImagesClient {
    /// Construct a client directly from the configuration.
    ///
    /// # Errors
    ///
    /// See [`ImagesClientBuilder::build`].
    pub fn new(config: StreamClientConfig) -> Result<Self> {
        ImagesClientBuilder::new(config).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: StreamClientConfig) -> ImagesClientBuilder {
        ImagesClientBuilder::new(config)
    }

    /// Return the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Return the images endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the base URL cannot carry the path.
    pub fn images_url(&self) -> Result<Url> {
        build_images_url(&self.base_url)
    }

    /// Upload an in-memory image.
    ///
    /// Resolves to the URL of the stored image.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`Error::InvalidArgument`] when `content` or
    /// `file_name` is empty; nothing is sent in that case.
    pub fn upload_bytes(
        &self,
        token: &Token,
        file_name: &str,
        content: impl Into<Bytes>,
    ) -> Result<Pending<Url>> {
        let content = content.into();
        if content.is_empty() {
            return Err(Error::InvalidArgument("No data to upload".to_string()));
        }
        if file_name.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "No file name for upload".to_string(),
            ));
        }

        let url = self.images_url()?;
        let size = content.len();
        let part = request::bytes_part(file_name, content)?;
        let request = request::build_multipart_post(
            &self.http,
            url,
            &self.api_key,
            token,
            request::file_form(part),
        )?;

        info!(operation = "upload", file_name, size, "Sending images request");
        Ok(self.dispatch("upload", request, |response| {
            deserialize::<Url>(response, FILE_FIELD)
        }))
    }

    /// Upload an image stored on disk.
    ///
    /// The file is streamed rather than read into memory. Resolves to the URL
    /// of the stored image.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`Error::InvalidArgument`] when the path does
    /// not name an existing, readable file.
    pub fn upload_file(&self, token: &Token, path: impl AsRef<Path>) -> Result<Pending<Url>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InvalidArgument(format!(
                "No file to upload: `{}` does not exist",
                path.display()
            )));
        }

        let url = self.images_url()?;
        let part = request::file_part(path)?;
        let request = request::build_multipart_post(
            &self.http,
            url,
            &self.api_key,
            token,
            request::file_form(part),
        )?;

        info!(operation = "upload", path = %path.display(), "Sending images request");
        Ok(self.dispatch("upload", request, |response| {
            deserialize::<Url>(response, FILE_FIELD)
        }))
    }

    /// Delete a previously uploaded image.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`Error::InvalidArgument`] when `target` is not
    /// an absolute http(s) URL.
    pub fn delete(&self, token: &Token, target: &Url) -> Result<Pending<()>> {
        check_target(target, "delete")?;

        let url = self.images_url()?;
        let params = [("url".to_string(), target.to_string())];
        let request = request::build_delete(&self.http, url, &self.api_key, token, &params)?;

        info!(operation = "delete", target = %target, "Sending images request");
        Ok(self.dispatch("delete", request, |response| async move {
            deserialize_error(response).await.map(|_| ())
        }))
    }

    /// Transform a previously uploaded image.
    ///
    /// Resolves to the URL of the processed image.
    ///
    /// # Errors
    ///
    /// Fails immediately with [`Error::InvalidArgument`] when `target` is not
    /// an absolute http(s) URL or the options are inconsistent.
    pub fn process(
        &self,
        token: &Token,
        target: &Url,
        options: &ProcessOptions,
    ) -> Result<Pending<Url>> {
        check_target(target, "process")?;
        options.validate()?;

        let url = self.images_url()?;
        let mut params = options.to_pairs();
        params.push(("url".to_string(), target.to_string()));
        let request = request::build_get(&self.http, url, &self.api_key, token, &params)?;

        info!(operation = "process", target = %target, params = params.len(), "Sending images request");
        Ok(self.dispatch("process", request, |response| {
            deserialize::<Url>(response, FILE_FIELD)
        }))
    }

    fn dispatch<T, F, Fut>(&self, operation: &'static str, request: Request, decode: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce(Response) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let transport = Arc::clone(&self.transport);

        Box::pin(async move {
            let result = match transport.execute(request).await {
                Ok(response) => {
                    debug!(operation, status = response.status().as_u16(), "Images response received");
                    decode(response).await
                }
                Err(err) => Err(err),
            };

            if let Err(err) = &result {
                if err.should_log() {
                    warn!(operation, code = err.error_code(), error = %err, "Images request failed");
                } else {
                    debug!(operation, code = err.error_code(), error = %err, "Images request failed");
                }
            }

            result
        })
    }
}

fn check_target(target: &Url, action: &str) -> Result<()> {
    if target.cannot_be_a_base() || !matches!(target.scheme(), "http" | "https") {
        return Err(Error::InvalidArgument(format!(
            "No image to {action}: `{target}` is not an http(s) URL"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ImagesClient {
        let config = StreamClientConfig::new("key")
            .unwrap()
            .with_base_url(server.uri());
        ImagesClient::new(config).unwrap()
    }

    #[test]
    fn client_exposes_endpoints() {
        let config = StreamClientConfig::new("key")
            .unwrap()
            .with_base_url("http://localhost:8080");
        let client = ImagesClient::new(config).unwrap();
        assert_eq!(client.api_key(), "key");
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
        assert_eq!(
            client.images_url().unwrap().as_str(),
            "http://localhost:8080/api/v1.0/images/"
        );
    }

    #[test]
    fn build_rejects_unusable_base_url() {
        let config = StreamClientConfig::new("key")
            .unwrap()
            .with_base_url("mailto:images@example.com");
        let err = ImagesClient::new(config).err().unwrap();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn check_target_requires_http_url() {
        assert!(check_target(&Url::parse("https://cdn/a.png").unwrap(), "delete").is_ok());
        assert!(check_target(&Url::parse("file:///tmp/a.png").unwrap(), "delete").is_err());
        assert!(check_target(&Url::parse("data:text/plain,hi").unwrap(), "delete").is_err());
    }

    #[tokio::test]
    async fn upload_bytes_resolves_file_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/images/"))
            .and(query_param("api_key", "key"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"file": "https://cdn.example.com/cat.png"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let url = client
            .upload_bytes(&Token::new("token"), "cat.png", b"png-bytes".to_vec())
            .unwrap()
            .await
            .unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/cat.png");
    }

    #[tokio::test]
    async fn delete_maps_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1.0/images/"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "detail": "image not found",
                "code": 16,
                "exception": "DoesNotExistException",
                "status_code": 404
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let target = Url::parse("https://cdn.example.com/gone.png").unwrap();
        let err = client
            .delete(&Token::new("token"), &target)
            .unwrap()
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::RemoteError {
                status: 404,
                code: Some(16),
                exception: Some("DoesNotExistException".to_string()),
                message: "image not found".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1.0/images/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let target = Url::parse("https://cdn.example.com/cat.png").unwrap();
        let err = client
            .process(&Token::new("token"), &target, &ProcessOptions::new())
            .unwrap()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ParseError(_)));
    }
}
