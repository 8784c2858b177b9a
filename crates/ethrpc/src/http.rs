//! The HTTP primitive both transports are built on.

use {
    crate::{Error, TransportError},
    reqwest::{
        Certificate,
        Client,
        RequestBuilder,
        header::{self, HeaderMap, HeaderName, HeaderValue},
    },
    std::{
        fmt::{self, Debug, Formatter},
        time::Duration,
    },
    url::Url,
};

/// Sends a request body and returns the response body.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// POSTs `body` with a JSON content type.
    async fn post_json(&self, url: &Url, body: String) -> Result<String, TransportError>;

    async fn get(&self, url: &Url) -> Result<String, TransportError>;
}

#[derive(Clone, Debug, Default)]
pub struct HttpOptions {
    /// Extra headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// Accept self signed and otherwise invalid certificates.
    pub ssl_allow_self_signed: bool,
    /// PEM encoded certificates. When non-empty these are the only trusted
    /// roots.
    pub ssl_pinned_certificates: Vec<String>,
    pub timeout: Option<Duration>,
}

#[derive(Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(options: &HttpOptions) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| Error::Config(format!("invalid header name {name:?}: {err}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|err| Error::Config(format!("invalid value for header {name}: {err}")))?;
            headers.insert(name, value);
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(options.ssl_allow_self_signed);
        if !options.ssl_pinned_certificates.is_empty() {
            builder = builder.tls_built_in_root_certs(false);
            for pem in &options.ssl_pinned_certificates {
                let certificate = Certificate::from_pem(pem.as_bytes())
                    .map_err(|err| Error::Config(format!("invalid pinned certificate: {err}")))?;
                builder = builder.add_root_certificate(certificate);
            }
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|err| Error::Config(format!("failed to build http client: {err}")))?;
        Ok(Self { client })
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn execute(&self, url: &Url, request: RequestBuilder) -> Result<String, TransportError> {
        let request = match observe::request_id::current() {
            Some(id) => request.header("X-REQUEST-ID", id),
            None => request,
        };
        let response = request.send().await.map_err(|err: reqwest::Error| {
            tracing::warn!(%url, %err, "failed to send request");
            TransportError::Http(err.to_string())
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|err: reqwest::Error| {
            tracing::warn!(%url, %err, "failed to get response body");
            TransportError::Http(err.to_string())
        })?;
        // Log the raw text before decoding to get more information on
        // responses that aren't valid json.
        tracing::trace!(%url, body = %text.trim(), "received response");
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

impl Debug for ReqwestClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestClient").finish()
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn post_json(&self, url: &Url, body: String) -> Result<String, TransportError> {
        tracing::trace!(%url, %body, "executing request");
        let request = self
            .client
            .post(url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);
        self.execute(url, request).await
    }

    async fn get(&self, url: &Url) -> Result<String, TransportError> {
        let request = self.client.get(url.clone());
        self.execute(url, request).await
    }
}
