//! Chat assistant session.
//!
//! The user's message is committed to the transcript before the request is
//! sent; the assistant's answer is appended only when the request succeeds.

use tracing::debug;

use crate::error::ServiceError;
use crate::models::{ChatMessage, ChatReply, ChatSource, ServiceHealth};
use crate::workflow::notify::Notification;

pub const GREETING: &str =
    "Ask me anything about Gestational Diabetes Mellitus. I'm here to help!";
pub const WEB_FALLBACK_BADGE: &str = "Using web information (AI API unavailable)";
pub const OFFLINE_WARNING: &str = "Chat service is currently offline. Please try again later.";

#[derive(Debug)]
pub enum ChatEvent {
    Open,
    Close,
    HealthProbed(ServiceHealth),
    InputChanged(String),
    Submit,
    ReplyReceived(Result<ChatReply, ServiceError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEffect {
    ProbeHealth,
    Send(String),
    Notify(Notification),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSession {
    open: bool,
    probe_requested: bool,
    health: Option<ServiceHealth>,
    input: String,
    transcript: Vec<ChatMessage>,
    awaiting_response: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// `None` until the probe has answered.
    pub fn health(&self) -> Option<ServiceHealth> {
        self.health
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    /// Known to be down. An unanswered probe does not block input.
    pub fn is_offline(&self) -> bool {
        matches!(self.health, Some(h) if !h.is_healthy)
    }

    /// Healthy, but answering from web lookups instead of the AI API.
    pub fn is_web_fallback(&self) -> bool {
        matches!(self.health, Some(h) if h.is_healthy && !h.api_available)
    }

    pub fn input_disabled(&self) -> bool {
        self.awaiting_response || self.is_offline()
    }

    pub fn can_send(&self) -> bool {
        self.open && !self.input_disabled() && !self.input.trim().is_empty()
    }

    pub fn update(&mut self, event: ChatEvent) -> Option<ChatEffect> {
        match event {
            ChatEvent::Open => {
                self.open = true;
                if self.probe_requested {
                    return None;
                }
                self.probe_requested = true;
                Some(ChatEffect::ProbeHealth)
            }
            ChatEvent::Close => {
                self.open = false;
                None
            }
            ChatEvent::HealthProbed(health) => {
                // First answer sticks until the session is rebuilt.
                if self.health.is_none() {
                    self.health = Some(health);
                }
                None
            }
            ChatEvent::InputChanged(text) => {
                if !self.input_disabled() {
                    self.input = text;
                }
                None
            }
            ChatEvent::Submit => {
                if !self.open || self.input_disabled() {
                    return None;
                }
                let message = self.input.trim().to_string();
                if message.is_empty() {
                    return None;
                }
                self.transcript.push(ChatMessage::user(message.clone()));
                self.input.clear();
                self.awaiting_response = true;
                Some(ChatEffect::Send(message))
            }
            ChatEvent::ReplyReceived(outcome) => {
                if !self.awaiting_response {
                    return None;
                }
                self.awaiting_response = false;
                match outcome {
                    Ok(reply) if reply.response.is_empty() => {
                        debug!("Empty assistant reply dropped");
                        None
                    }
                    Ok(reply) => {
                        let source = self.tag_source();
                        debug!(server = ?reply.source, tagged = ?source, "Tagging assistant reply");
                        self.transcript
                            .push(ChatMessage::assistant(reply.response, source));
                        None
                    }
                    Err(err) => Some(ChatEffect::Notify(Notification::for_failure(&err))),
                }
            }
        }
    }

    /// Source comes from the probe taken when the session opened, not from
    /// the reply.
    fn tag_source(&self) -> ChatSource {
        match self.health {
            Some(health) if health.api_available => ChatSource::Api,
            _ => ChatSource::Web,
        }
    }
}
