use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use typed_builder::TypedBuilder;
use url::Url;

use crate::credentials::Credentials;
use crate::error::SascarError;
use crate::params::Parameters;
use crate::requests::{SoapRequest, DEFAULT_ENDPOINT};
use crate::responses::parse_response;
use crate::SascarResult;

/// Default user agent sent with every request.
pub const USER_AGENT: &str = "SascarIntegracaoAPI/1.0";

/// Retry behaviour for transport errors and retryable HTTP statuses.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum amount of retries after the initial attempt
    pub max_retries: u32,
    /// Base delay before a retry, doubled on every further retry
    pub backoff_factor: Duration,
    /// Statuses that trigger a retry
    pub retry_statuses: Vec<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: Duration::from_millis(100),
            retry_statuses: vec![
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusCode::BAD_GATEWAY,
                StatusCode::SERVICE_UNAVAILABLE,
                StatusCode::GATEWAY_TIMEOUT,
            ],
        }
    }
}

impl RetryPolicy {
    /// Returns whether a response status should be retried.
    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// The delay before the given retry (zero-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.backoff_factor * 2u32.saturating_pow(retry)
    }
}

/// The internal builder for constructing a `SascarClient`
#[derive(TypedBuilder)]
#[builder(build_method(into = SascarClient))]
pub struct InternalSascarClient {
    /// Credentials sent with every operation
    credentials: Credentials,
    /// Full URL of the SasIntegra service endpoint
    #[builder(default = Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"), setter(transform = |endpoint: &str| {
        Url::parse(endpoint).expect("Failed to parse URL")
    }))]
    endpoint: Url,
    /// Retry behaviour for failed requests
    #[builder(default)]
    retry: RetryPolicy,
    /// Allow unsafe SSL certificates
    #[builder(default = false)]
    allow_insecure: bool,
    /// Timeout for the request
    #[builder(default = Duration::from_secs(30))]
    timeout: Duration,
    /// User agent sent with every request
    #[builder(default = USER_AGENT.to_string(), setter(transform = |user_agent: &str| user_agent.to_string()))]
    user_agent: String,
}

/// The web client to consume Sascar's SasIntegra web service
pub struct SascarClient {
    /// Full URL of the SasIntegra service endpoint
    endpoint: Url,
    /// Credentials sent with every operation
    credentials: Credentials,
    /// Retry behaviour for failed requests
    retry: RetryPolicy,
    /// The client
    client: reqwest::Client,
}

impl From<InternalSascarClient> for SascarClient {
    fn from(client: InternalSascarClient) -> Self {
        let req_client = reqwest::Client::builder()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .danger_accept_invalid_certs(client.allow_insecure)
            .timeout(client.timeout)
            .user_agent(client.user_agent)
            .build()
            .expect("Failed to build client");

        SascarClient {
            endpoint: client.endpoint,
            credentials: client.credentials,
            retry: client.retry,
            client: req_client,
        }
    }
}

impl SascarClient {
    /// Creates a builder for the client
    pub fn builder() -> InternalSascarClientBuilder {
        InternalSascarClient::builder()
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub(crate) fn username(&self) -> &str {
        &self.credentials.username
    }

    /// The `usuario`/`senha` parameter pair expected by almost every
    /// operation, in the position the service expects them.
    pub(crate) fn auth_params(&self) -> Parameters {
        Parameters::new()
            .param("usuario", self.credentials.username.as_str())
            .param("senha", self.credentials.password.as_str())
    }

    /// Performs an operation call and returns the raw response body.
    #[instrument(skip_all, fields(operation = %operation))]
    pub async fn call_raw(&self, operation: &str, parameters: Parameters) -> SascarResult<String> {
        let body = SoapRequest::new(operation, parameters).to_xml();
        let mut retry = 0u32;

        loop {
            let result = self
                .client
                .post(self.endpoint.clone())
                .header(CONTENT_TYPE, "text/xml; charset=utf-8")
                .header("SOAPAction", "\"\"")
                .body(body.clone())
                .send()
                .await;

            match result {
                Ok(response) if response.status().is_success() => {
                    let text = response.text().await?;
                    debug!(bytes = text.len(), "received response");
                    return Ok(text);
                }
                Ok(response)
                    if retry < self.retry.max_retries
                        && self.retry.is_retryable(response.status()) =>
                {
                    warn!(status = %response.status(), retry, "retrying after status");
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    // faults come back as HTTP 500 with an envelope in the body
                    return match parse_response(&text) {
                        Err(fault @ SascarError::Fault { .. }) => Err(fault),
                        _ => Err(SascarError::HttpStatus { status }),
                    };
                }
                Err(error) if retry < self.retry.max_retries => {
                    warn!(error = %error, retry, "retrying after transport error");
                }
                Err(error) => return Err(error.into()),
            }

            tokio::time::sleep(self.retry.backoff(retry)).await;
            retry += 1;
        }
    }

    /// Performs an operation call and converts the response into generic
    /// record values.
    pub async fn call(&self, operation: &str, parameters: Parameters) -> SascarResult<Vec<Value>> {
        let text = self.call_raw(operation, parameters).await?;
        parse_response(&text)
    }

    /// Performs an operation call and deserializes each record into `T`.
    ///
    /// **NOTE:** The vendor schema is not under this crate's control, so
    /// deserialization might fail for structural reasons. In that case, use
    /// `call()` instead.
    pub async fn call_as<T>(&self, operation: &str, parameters: Parameters) -> SascarResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.call(operation, parameters)
            .await?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(SascarError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{RetryPolicy, SascarClient};
    use crate::credentials::Credentials;
    use crate::requests::DEFAULT_ENDPOINT;
    use reqwest::StatusCode;
    use std::time::Duration;

    fn client() -> SascarClient {
        SascarClient::builder()
            .credentials(Credentials::new("user", "pass").unwrap())
            .build()
    }

    #[test]
    fn builder_defaults_to_production_endpoint() {
        assert_eq!(client().endpoint().as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn auth_params_come_first() {
        let parameters = client().auth_params().param("quantidade", "0");
        let pairs: Vec<(&str, &str)> = parameters.iter().collect();
        assert_eq!(
            pairs,
            vec![("usuario", "user"), ("senha", "pass"), ("quantidade", "0")]
        );
    }

    #[test]
    fn retry_policy_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert!(policy.is_retryable(StatusCode::SERVICE_UNAVAILABLE));
        assert!(policy.is_retryable(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!policy.is_retryable(StatusCode::NOT_FOUND));
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
    }
}
