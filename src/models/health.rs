use serde::{Deserialize, Serialize};

/// Outcome of a one-shot health probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub is_healthy: bool,
    /// Whether the service's own backend (model or AI API) is available, as
    /// opposed to running in a degraded mode.
    pub api_available: bool,
}

impl ServiceHealth {
    pub fn offline() -> Self {
        Self::default()
    }
}

/// `/health` body of the prediction services.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelHealthBody {
    pub status: String,
    #[serde(default)]
    pub model_loaded: Option<bool>,
}

impl From<ModelHealthBody> for ServiceHealth {
    fn from(body: ModelHealthBody) -> Self {
        // A missing `model_loaded` counts as not loaded.
        let loaded = body.model_loaded == Some(true);
        Self {
            is_healthy: body.status == "healthy" && loaded,
            api_available: loaded,
        }
    }
}

/// `/health` body of the chat service.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatHealthBody {
    pub status: String,
    #[serde(default)]
    pub api_status: Option<String>,
}

impl From<ChatHealthBody> for ServiceHealth {
    fn from(body: ChatHealthBody) -> Self {
        Self {
            is_healthy: body.status == "healthy",
            api_available: body.api_status.as_deref() == Some("available"),
        }
    }
}
