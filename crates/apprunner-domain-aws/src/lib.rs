// # App Runner HTTPS Client
//
// This crate provides the `AppRunnerApi` implementation that talks to the
// AWS App Runner API.
//
// ## Protocol
//
// - AWS JSON 1.0: every operation is `POST /` with
//   `Content-Type: application/x-amz-json-1.0` and
//   `X-Amz-Target: AppRunner.<Operation>`
// - Requests are signed with AWS Signature Version 4 (service `apprunner`)
// - Errors carry `__type` (`...#ResourceNotFoundException`) and `message`
//
// ## Constraints
//
// - One HTTP request per trait call; no retries and no polling
//   (waiting is owned by the state poller in `apprunner-domain-core`)
// - Remote error codes are preserved so callers can recognize
//   `ResourceNotFoundException`
// - Credentials NEVER appear in logs or `Debug` output
//
// ## API Reference
//
// - AssociateCustomDomain: https://docs.aws.amazon.com/apprunner/latest/api/API_AssociateCustomDomain.html
// - DescribeCustomDomains: https://docs.aws.amazon.com/apprunner/latest/api/API_DescribeCustomDomains.html
// - DisassociateCustomDomain: https://docs.aws.amazon.com/apprunner/latest/api/API_DisassociateCustomDomain.html

mod sigv4;

use apprunner_domain_core::config::ProviderConfig;
use apprunner_domain_core::traits::AppRunnerApi;
use apprunner_domain_core::types::{
    AssociateCustomDomainInput, AssociateCustomDomainOutput, DescribeCustomDomainsInput,
    DescribeCustomDomainsPage, DisassociateCustomDomainInput,
};
use apprunner_domain_core::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};
use std::time::Duration;

use sigv4::SigV4Signer;

/// Service name used in the SigV4 credential scope
const SIGNING_SERVICE: &str = "apprunner";

/// `X-Amz-Target` prefix of every App Runner operation
const TARGET_PREFIX: &str = "AppRunner";

/// AWS JSON 1.0 content type
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Client name used in provider errors
const CLIENT_NAME: &str = "apprunner";

/// App Runner API client
///
/// Stateless apart from the HTTP connection pool; safe to share between tasks.
pub struct AppRunnerClient {
    /// HTTP client for API requests
    client: reqwest::Client,

    /// Request URL (`https://apprunner.<region>.amazonaws.com` unless overridden)
    endpoint: reqwest::Url,

    /// Value of the signed `Host` header
    host: String,

    /// Session token for temporary credentials
    /// ⚠️ NEVER log this value
    session_token: Option<String>,

    signer: SigV4Signer,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for AppRunnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRunnerClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("session_token", &self.session_token.as_ref().map(|_| "<REDACTED>"))
            .field("signer", &self.signer)
            .finish()
    }
}

impl AppRunnerClient {
    /// Create a client from a validated configuration
    ///
    /// # Errors
    ///
    /// - `Error::Config`: The configuration is invalid or the endpoint isn't a URL
    /// - `Error::Http`: The HTTP client couldn't be built
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint(&config.region));

        let endpoint = reqwest::Url::parse(&endpoint)
            .map_err(|e| Error::config(format!("Invalid endpoint '{endpoint}': {e}")))?;

        let host = host_header(&endpoint)
            .ok_or_else(|| Error::config(format!("Endpoint '{endpoint}' has no host")))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        let credentials = &config.credentials;

        Ok(Self {
            client,
            endpoint,
            host,
            session_token: credentials.session_token.clone(),
            signer: SigV4Signer::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                config.region.clone(),
                SIGNING_SERVICE,
            ),
        })
    }

    /// The URL requests are sent to
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Invoke one App Runner operation
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /
    /// Content-Type: application/x-amz-json-1.0
    /// X-Amz-Target: AppRunner.<operation>
    /// Authorization: AWS4-HMAC-SHA256 Credential=...
    /// ```
    async fn call<I, O>(&self, operation: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let payload = serde_json::to_vec(input)?;
        let amz_date = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

        let mut headers = vec![
            ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ("Host".to_string(), self.host.clone()),
            ("X-Amz-Date".to_string(), amz_date.clone()),
            (
                "X-Amz-Target".to_string(),
                format!("{TARGET_PREFIX}.{operation}"),
            ),
        ];
        if let Some(ref token) = self.session_token {
            headers.push(("X-Amz-Security-Token".to_string(), token.clone()));
        }

        let authorization = self.signer.authorization(
            "POST",
            self.endpoint.path(),
            "",
            &headers,
            &payload,
            &amz_date,
        );

        tracing::debug!("Calling {}.{} at {}", TARGET_PREFIX, operation, self.endpoint);

        // reqwest derives Host from the URL
        let request = headers
            .iter()
            .filter(|(name, _)| name != "Host")
            .fold(self.client.post(self.endpoint.clone()), |request, (name, value)| {
                request.header(name.as_str(), value.as_str())
            })
            .header("Authorization", authorization)
            .body(payload);

        let response = request
            .send()
            .await
            .map_err(|e| Error::http(format!("{operation} request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read {operation} response: {e}")))?;

        if !status.is_success() {
            let err = error_from_response(status.as_u16(), &body);
            tracing::debug!("{}.{} failed: {}", TARGET_PREFIX, operation, err);
            return Err(err);
        }

        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait]
impl AppRunnerApi for AppRunnerClient {
    async fn associate_custom_domain(
        &self,
        input: &AssociateCustomDomainInput,
    ) -> Result<AssociateCustomDomainOutput> {
        tracing::info!(
            "Associating custom domain {} with {}",
            input.domain_name,
            input.service_arn
        );
        self.call("AssociateCustomDomain", input).await
    }

    async fn disassociate_custom_domain(&self, input: &DisassociateCustomDomainInput) -> Result<()> {
        tracing::info!(
            "Disassociating custom domain {} from {}",
            input.domain_name,
            input.service_arn
        );
        let _: IgnoredAny = self.call("DisassociateCustomDomain", input).await?;
        Ok(())
    }

    async fn describe_custom_domains(
        &self,
        input: &DescribeCustomDomainsInput,
    ) -> Result<DescribeCustomDomainsPage> {
        self.call("DescribeCustomDomains", input).await
    }

    fn api_name(&self) -> &'static str {
        CLIENT_NAME
    }
}

/// Regional App Runner endpoint
fn default_endpoint(region: &str) -> String {
    format!("https://apprunner.{region}.amazonaws.com")
}

/// `host[:port]` as sent in the `Host` header
fn host_header(url: &reqwest::Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Error body of an AWS JSON 1.0 response
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    message: Option<String>,
    #[serde(rename = "Message")]
    capitalized_message: Option<String>,
}

/// Map a non-success response to an error
///
/// Responses with an error type become `Error::Api` with the bare code
/// (`com.amazonaws.apprunner#ResourceNotFoundException` becomes
/// `ResourceNotFoundException`). Anything else is mapped on the status code.
fn error_from_response(status: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();

    if let Some(ErrorResponse {
        error_type: Some(error_type),
        message,
        capitalized_message,
    }) = parsed
    {
        let message = message.or(capitalized_message).unwrap_or_default();
        return Error::api(error_code(&error_type), message);
    }

    match status {
        401 | 403 => Error::provider(
            CLIENT_NAME,
            format!("Authentication failed: invalid credentials or insufficient permissions. Status: {status}"),
        ),
        429 => Error::provider(
            CLIENT_NAME,
            format!("Rate limit exceeded. Please retry later. Status: {status}"),
        ),
        500..=599 => Error::provider(
            CLIENT_NAME,
            format!("App Runner server error (transient): {status} - {body}"),
        ),
        _ => Error::provider(CLIENT_NAME, format!("Unexpected response: {status} - {body}")),
    }
}

/// Strip the namespace and any trailing URI from an `__type` value
fn error_code(error_type: &str) -> String {
    let code = error_type.rsplit('#').next().unwrap_or(error_type);
    code.split(':').next().unwrap_or(code).to_string()
}
