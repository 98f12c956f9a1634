//! Data carried between the workflows and the remote services.

pub mod assessment;
pub mod chat;
pub mod health;

pub use assessment::{
    ActivityLevel, ClinicalField, ClinicalInputs, FieldErrors, PredictionResult, RiskLevel, YesNo,
};
pub use chat::{ChatMessage, ChatReply, ChatSource, Role};
pub use health::ServiceHealth;
