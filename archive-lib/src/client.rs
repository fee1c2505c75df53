//! Main ArchiveClient

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use log::warn;
use reqwest::Client;
use reqwest::RequestBuilder;
use reqwest::header::ACCEPT;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;

/// Client for the archive REST API.
///
/// Clones share one connection pool and token provider. Bulk endpoints are exposed through
/// [`BulkApi`](crate::api::BulkApi) and list endpoints through
/// [`ListApi`](crate::api::ListApi).
///
/// # Example
///
/// ```ignore
/// use archive_lib::{ArchiveClient, auth::StaticTokenProvider};
///
/// let client = ArchiveClient::builder()
///     .url("https://archive.example.edu")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .timeout(Duration::from_secs(30))
///     .build()?;
///
/// let deleted = client.bulk_delete(&tenant, &ids).await?;
/// ```
#[derive(Clone)]
pub struct ArchiveClient {
    inner: Arc<ArchiveClientInner>,
}

struct ArchiveClientInner {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ArchiveClient {
    /// Starts a builder; `url` and `token_provider` are required.
    pub fn builder() -> ArchiveClientBuilder<Missing, Missing> {
        ArchiveClientBuilder::new()
    }

    /// The URL every endpoint path is appended to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the per-request timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.inner.timeout
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url.trim_end_matches('/'), path)
    }

    /// Sends a GET request and parses the JSON response.
    pub(crate) async fn get_json<R>(&self, path: &str) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let request = self.inner.http_client.get(self.url(path));
        let body = self.execute("GET", path, request).await?;
        Ok(parse_json(&body)?)
    }

    /// Sends a POST request with a JSON body and parses the JSON response.
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, Error>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let request = self.inner.http_client.post(self.url(path)).json(body);
        let body = self.execute("POST", path, request).await?;
        Ok(parse_json(&body)?)
    }

    /// Sends a POST request with a JSON body, ignoring any response body.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        let request = self.inner.http_client.post(self.url(path)).json(body);
        self.execute("POST", path, request).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<String, Error> {
        let token = self
            .inner
            .token_provider
            .get_token(&self.inner.base_url)
            .await?;

        let mut request = request
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        debug!("{} {}", method, path);
        let response = request.send().await.map_err(|e| self.network_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.network_error(e))?;

        if status.is_success() {
            Ok(body)
        } else {
            let error = ApiError::from_body(status.as_u16(), &body);
            warn!("{} {} failed: {}", method, path, error);
            Err(Error::Api(error))
        }
    }

    fn network_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

impl std::fmt::Debug for ArchiveClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveClient")
            .field("base_url", &self.inner.base_url)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

/// Parses a JSON body. An empty body parses as JSON `null`.
fn parse_json<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|e| ApiError::parse_with_body(e.to_string(), body))
}

// =============================================================================
// Builder
// =============================================================================

/// Builder slot that has not been filled yet.
pub struct Missing;

/// Builder slot holding a value.
pub struct Set<T>(T);

/// Optional transport settings.
#[derive(Default)]
struct ClientOptions {
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

/// Builds an [`ArchiveClient`].
///
/// `build` only exists once both `url` and `token_provider` were given, so
/// a client without a base URL or credentials does not compile.
pub struct ArchiveClientBuilder<Url, Provider> {
    url: Url,
    token_provider: Provider,
    options: ClientOptions,
}

impl ArchiveClientBuilder<Missing, Missing> {
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            options: ClientOptions::default(),
        }
    }
}

impl Default for ArchiveClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> ArchiveClientBuilder<Missing, P> {
    /// Base URL of the API, e.g. `https://archive.example.edu`.
    pub fn url(self, url: impl Into<String>) -> ArchiveClientBuilder<Set<String>, P> {
        ArchiveClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            options: self.options,
        }
    }
}

impl<U> ArchiveClientBuilder<U, Missing> {
    /// Where bearer tokens come from.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> ArchiveClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        let provider: Arc<dyn TokenProvider> = Arc::new(provider);
        ArchiveClientBuilder {
            url: self.url,
            token_provider: Set(provider),
            options: self.options,
        }
    }
}

impl<U, P> ArchiveClientBuilder<U, P> {
    /// Upper bound for each request, response body included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Upper bound for opening a connection. Ignored with
    /// [`http_client`](Self::http_client).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = Some(timeout);
        self
    }

    /// Reuses an existing reqwest client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.options.http_client = Some(client);
        self
    }
}

impl ArchiveClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Fails if the URL is not an absolute http(s) URL or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<ArchiveClient, ApiError> {
        let Set(base_url) = self.url;
        let invalid = |reason: String| ApiError::InvalidUrl(format!("{}: {}", base_url, reason));
        let parsed = url::Url::parse(&base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("unsupported scheme".to_string()));
        }

        let ClientOptions {
            timeout,
            connect_timeout,
            http_client,
        } = self.options;
        let http_client = match http_client {
            Some(client) => client,
            None => connect_timeout
                .into_iter()
                .fold(Client::builder(), |builder, t| builder.connect_timeout(t))
                .build()?,
        };

        Ok(ArchiveClient {
            inner: Arc::new(ArchiveClientInner {
                base_url,
                token_provider: self.token_provider.0,
                http_client,
                timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    #[test]
    fn test_build_rejects_bad_urls() {
        let err = ArchiveClient::builder()
            .url("not a url")
            .token_provider(StaticTokenProvider::new("t"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));

        let err = ArchiveClient::builder()
            .token_provider(StaticTokenProvider::new("t"))
            .url("ftp://archive.example.edu")
            .build()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_url_joins_path() {
        let client = ArchiveClient::builder()
            .url("https://archive.example.edu/")
            .token_provider(StaticTokenProvider::new("t"))
            .build()
            .unwrap();
        assert_eq!(client.url("/api/users"), "https://archive.example.edu/api/users");
    }

    #[test]
    fn test_parse_empty_body_as_unit() {
        assert!(parse_json::<()>("").is_ok());
        assert!(parse_json::<()>("  \n").is_ok());
        let err = parse_json::<u32>("{oops").unwrap_err();
        assert!(matches!(err, ApiError::Parse { body: Some(_), .. }));
    }
}
