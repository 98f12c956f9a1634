//! Clients for the remote prediction and chat services.
//!
//! Each call is a single request: no retries, no timeout, no queuing. A
//! non-2xx answer becomes [`ServiceError::Application`] carrying the body's
//! `error` field when there is one.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::core::upload::EcgImage;
use crate::error::{ServiceError, ServiceKind, SetupError};
use crate::models::chat::{ChatReply, ChatRequest};
use crate::models::health::{ChatHealthBody, ModelHealthBody};
use crate::models::{ClinicalInputs, PredictionResult, ServiceHealth};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClinicalPredictor: Send + Sync {
    async fn predict(&self, inputs: &ClinicalInputs) -> Result<PredictionResult, ServiceError>;

    /// Never fails; an unreachable or broken service reads as offline.
    async fn health(&self) -> ServiceHealth;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EcgPredictor: Send + Sync {
    async fn predict(&self, image: &EcgImage) -> Result<PredictionResult, ServiceError>;

    async fn health(&self) -> ServiceHealth;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatService: Send + Sync {
    async fn send(&self, message: &str) -> Result<ChatReply, ServiceError>;

    async fn health(&self) -> ServiceHealth;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct EcgRequest<'a> {
    image: &'a str,
}

/// Base URL plus shared HTTP client for one service.
#[derive(Debug, Clone)]
struct Endpoint {
    service: ServiceKind,
    base: Url,
    http: Client,
}

impl Endpoint {
    fn new(service: ServiceKind, base_url: &str, http: Client) -> Result<Self, SetupError> {
        let invalid = |source| SetupError::InvalidBaseUrl {
            service,
            url: base_url.to_string(),
            source,
        };
        let base = Url::parse(base_url).map_err(invalid)?;
        if base.cannot_be_a_base() {
            return Err(invalid(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }
        Ok(Self {
            service,
            base,
            http,
        })
    }

    fn url(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }

    fn send_error(&self, err: reqwest::Error) -> ServiceError {
        if err.is_connect() {
            ServiceError::Unreachable {
                service: self.service,
                source: err,
            }
        } else {
            ServiceError::Request {
                service: self.service,
                source: err,
            }
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        self.read(response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ServiceError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.send_error(e))?;
        self.read(response).await
    }

    async fn read<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| self.service.fallback_message().to_string());
            return Err(ServiceError::Application {
                service: self.service,
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|source| ServiceError::Decode {
            service: self.service,
            source,
        })
    }

    async fn probe<B>(&self) -> ServiceHealth
    where
        B: DeserializeOwned + Into<ServiceHealth>,
    {
        match self.get_json::<B>("/health").await {
            Ok(body) => body.into(),
            Err(err) => {
                warn!(service = %self.service, error = %err, "Health check failed");
                ServiceHealth::offline()
            }
        }
    }
}

/// `POST /predict` on the clinical model service.
#[derive(Debug, Clone)]
pub struct ClinicalClient {
    endpoint: Endpoint,
}

impl ClinicalClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, SetupError> {
        Ok(Self {
            endpoint: Endpoint::new(ServiceKind::Clinical, base_url, http)?,
        })
    }
}

#[async_trait]
impl ClinicalPredictor for ClinicalClient {
    #[instrument(skip_all, fields(service = "clinical"))]
    async fn predict(&self, inputs: &ClinicalInputs) -> Result<PredictionResult, ServiceError> {
        debug!(?inputs, "Sending prediction data");
        match self
            .endpoint
            .post_json::<_, PredictionResult>("/predict", inputs)
            .await
        {
            Ok(result) => {
                info!(risk = %result.risk, confidence = result.confidence, "Received prediction result");
                Ok(result)
            }
            Err(err) => {
                error!(error = %err, "Prediction error");
                Err(err)
            }
        }
    }

    async fn health(&self) -> ServiceHealth {
        self.endpoint.probe::<ModelHealthBody>().await
    }
}

/// `POST /predict-ecg` on the ECG image model service.
#[derive(Debug, Clone)]
pub struct EcgClient {
    endpoint: Endpoint,
}

impl EcgClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, SetupError> {
        Ok(Self {
            endpoint: Endpoint::new(ServiceKind::Ecg, base_url, http)?,
        })
    }
}

#[async_trait]
impl EcgPredictor for EcgClient {
    #[instrument(skip_all, fields(service = "ecg", bytes = image.data_url().len()))]
    async fn predict(&self, image: &EcgImage) -> Result<PredictionResult, ServiceError> {
        info!("Submitting ECG image for prediction");
        let body = EcgRequest {
            image: image.data_url(),
        };
        match self
            .endpoint
            .post_json::<_, PredictionResult>("/predict-ecg", &body)
            .await
        {
            Ok(result) => {
                info!(risk = %result.risk, confidence = result.confidence, "ECG prediction result received");
                Ok(result)
            }
            Err(err) => {
                error!(error = %err, "ECG prediction error");
                Err(err)
            }
        }
    }

    async fn health(&self) -> ServiceHealth {
        self.endpoint.probe::<ModelHealthBody>().await
    }
}

/// `POST /chat` on the assistant service.
#[derive(Debug, Clone)]
pub struct ChatClient {
    endpoint: Endpoint,
}

impl ChatClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, SetupError> {
        Ok(Self {
            endpoint: Endpoint::new(ServiceKind::Chat, base_url, http)?,
        })
    }
}

#[async_trait]
impl ChatService for ChatClient {
    #[instrument(skip_all, fields(service = "chat"))]
    async fn send(&self, message: &str) -> Result<ChatReply, ServiceError> {
        debug!(text = message, "Sending chat message");
        match self
            .endpoint
            .post_json::<_, ChatReply>("/chat", &ChatRequest { message })
            .await
        {
            Ok(reply) => {
                info!(source = ?reply.source, "Received chatbot response");
                Ok(reply)
            }
            Err(err) => {
                error!(error = %err, "Chatbot error");
                Err(err)
            }
        }
    }

    async fn health(&self) -> ServiceHealth {
        self.endpoint.probe::<ChatHealthBody>().await
    }
}
