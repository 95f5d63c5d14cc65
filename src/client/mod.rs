//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use url::Url;

use crate::domain::{
    AccountReference, DispatchResult, OutboundMessage, Password, Username, ValidationError,
};

const DEFAULT_BASE_URL: &str = "https://api.esendex.com/";
const MESSAGE_DISPATCHER_PATH: &str = "/v1.0/messagedispatcher";
const XML_CONTENT_TYPE: &str = "application/xml";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_xml<'a>(
        &'a self,
        url: &'a Url,
        credentials: &'a Credentials,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_xml<'a>(
        &'a self,
        url: &'a Url,
        credentials: &'a Credentials,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url.clone())
                .basic_auth(
                    credentials.username.as_str(),
                    Some(credentials.password.as_str()),
                )
                .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
                .header(reqwest::header::ACCEPT, XML_CONTENT_TYPE)
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Esendex login used for HTTP Basic authentication on every request.
pub struct Credentials {
    username: Username,
    password: Password,
}

impl Credentials {
    /// Create credentials, validating that both parts are non-empty.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            username: Username::new(username)?,
            password: Password::new(password)?,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`EsendexClient`] and [`AccountClient`].
///
/// A batch either succeeds or fails as a whole; there is no partial result.
pub enum EsendexError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, request encoding).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The server answered with anything other than `200 OK`.
    #[error("unexpected HTTP status: {status} (expected 200)")]
    UnexpectedStatus { status: u16, body: Option<String> },

    /// Response body could not be parsed as the expected XML document.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`EsendexClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct EsendexClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl EsendexClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL (`https://api.esendex.com/` by default).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build an [`EsendexClient`].
    pub fn build(self) -> Result<EsendexClient, EsendexError> {
        parse_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| EsendexError::Transport(Box::new(err)))?;

        Ok(EsendexClient {
            credentials: self.credentials,
            base_url: self.base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn parse_base_url(input: &str) -> Result<Url, ValidationError> {
    Url::parse(input).map_err(|_| ValidationError::InvalidUrl {
        input: input.to_owned(),
    })
}

#[derive(Clone)]
/// High-level Esendex client holding credentials and the HTTP connection pool.
///
/// Dispatching happens through an account-scoped [`AccountClient`], obtained
/// with [`EsendexClient::account`].
pub struct EsendexClient {
    credentials: Credentials,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl EsendexClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`EsendexClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> EsendexClientBuilder {
        EsendexClientBuilder::new(credentials)
    }

    /// Scope this client to one Esendex account.
    ///
    /// The returned client shares the underlying connection pool.
    pub fn account(&self, reference: AccountReference) -> AccountClient {
        AccountClient {
            client: self.clone(),
            reference,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, EsendexError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|err| EsendexError::Transport(Box::new(err)))
    }
}

#[derive(Clone)]
/// Client bound to a single account reference; dispatches message batches.
pub struct AccountClient {
    client: EsendexClient,
    reference: AccountReference,
}

impl AccountClient {
    pub fn reference(&self) -> &AccountReference {
        &self.reference
    }

    /// Dispatch a batch of messages for immediate delivery.
    ///
    /// Messages are sent verbatim; an empty batch is still posted.
    ///
    /// Errors:
    /// - [`EsendexError::Transport`] if the request cannot be built or sent,
    /// - [`EsendexError::UnexpectedStatus`] for any status other than `200`,
    /// - [`EsendexError::Parse`] if the response is not a `messageheaders` document.
    pub async fn send(
        &self,
        messages: Vec<OutboundMessage>,
    ) -> Result<DispatchResult, EsendexError> {
        self.dispatch(None, &messages).await
    }

    /// Dispatch a batch of messages, asking Esendex to hold them until `send_at`.
    ///
    /// Behaves exactly like [`AccountClient::send`] apart from the `sendat` element.
    pub async fn send_at<Tz>(
        &self,
        send_at: DateTime<Tz>,
        messages: Vec<OutboundMessage>,
    ) -> Result<DispatchResult, EsendexError>
    where
        Tz: chrono::TimeZone,
    {
        let send_at = send_at.fixed_offset();
        self.dispatch(Some(&send_at), &messages).await
    }

    async fn dispatch(
        &self,
        send_at: Option<&DateTime<FixedOffset>>,
        messages: &[OutboundMessage],
    ) -> Result<DispatchResult, EsendexError> {
        let url = self.client.endpoint(MESSAGE_DISPATCHER_PATH)?;
        let body = crate::transport::encode_dispatch_request(&self.reference, send_at, messages)
            .map_err(|err| EsendexError::Transport(Box::new(err)))?;

        tracing::debug!(
            endpoint = %url,
            account_reference = self.reference.as_str(),
            message_count = messages.len(),
            scheduled = send_at.is_some(),
            "dispatching message batch"
        );

        let response = self
            .client
            .http
            .post_xml(&url, &self.client.credentials, body)
            .await
            .map_err(EsendexError::Transport)?;

        if response.status != 200 {
            tracing::warn!(
                endpoint = %url,
                status = response.status,
                "message dispatch rejected"
            );
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(EsendexError::UnexpectedStatus {
                status: response.status,
                body,
            });
        }

        let parsed = crate::transport::decode_dispatch_response(&response.body)
            .map_err(|err| EsendexError::Parse(Box::new(err)))?;

        tracing::debug!(
            batch_id = %parsed.batch_id,
            accepted = parsed.messages.len(),
            "message batch dispatched"
        );

        Ok(parsed)
    }
}
