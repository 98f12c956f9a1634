use std::fmt::Write as _;

use crate::models::{ChatSource, Role};
use crate::workflow::chat::{ChatSession, GREETING, OFFLINE_WARNING, WEB_FALLBACK_BADGE};

/// Transcript view with the service status banner.
pub fn render_chat(session: &ChatSession) -> String {
    let mut out = String::new();
    let status = match session.health() {
        None => "connecting",
        Some(h) if !h.is_healthy => "offline",
        Some(_) => "online",
    };
    let _ = writeln!(out, "GDM Assistant ({})", status);
    if session.is_web_fallback() {
        let _ = writeln!(out, "{}", WEB_FALLBACK_BADGE);
    }
    let _ = writeln!(out);

    if session.transcript().is_empty() {
        let _ = writeln!(out, "{}", GREETING);
    }
    for message in session.transcript() {
        match message.role {
            Role::User => {
                let _ = writeln!(out, "you> {}", message.content);
            }
            Role::Assistant => {
                if message.source == Some(ChatSource::Web) {
                    let _ = writeln!(out, "assistant [Web information]> {}", message.content);
                } else {
                    let _ = writeln!(out, "assistant> {}", message.content);
                }
            }
        }
    }
    if session.is_awaiting_response() {
        let _ = writeln!(out, "assistant> ...");
    }
    if session.is_offline() {
        let _ = writeln!(out, "{}", OFFLINE_WARNING);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatReply, ServiceHealth};
    use crate::workflow::ChatEvent;

    fn session(health: ServiceHealth) -> ChatSession {
        let mut session = ChatSession::new();
        session.update(ChatEvent::Open);
        session.update(ChatEvent::HealthProbed(health));
        session
    }

    #[test]
    fn fresh_session_greets() {
        let text = render_chat(&ChatSession::new());
        assert!(text.contains(GREETING));
        assert!(text.contains("(connecting)"));
    }

    #[test]
    fn web_answers_are_labelled() {
        let mut session = session(ServiceHealth {
            is_healthy: true,
            api_available: false,
        });
        session.update(ChatEvent::InputChanged("What is GDM?".into()));
        session.update(ChatEvent::Submit);
        session.update(ChatEvent::ReplyReceived(Ok(ChatReply {
            response: "Diabetes first seen in pregnancy.".into(),
            source: None,
        })));

        let text = render_chat(&session);
        assert!(text.contains(WEB_FALLBACK_BADGE));
        assert!(text.contains("you> What is GDM?"));
        assert!(text.contains("assistant [Web information]> Diabetes first seen in pregnancy."));
        assert!(!text.contains(GREETING));
    }

    #[test]
    fn offline_shows_warning() {
        let text = render_chat(&session(ServiceHealth::offline()));
        assert!(text.contains(OFFLINE_WARNING));
        assert!(text.contains("(offline)"));
    }
}
