//! Process-wide application: configuration, service clients and the
//! notification sink, built once at start-up and kept for the whole run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::AppConfig;
use crate::core::ai::{
    ChatClient, ChatService, ClinicalClient, ClinicalPredictor, EcgClient, EcgPredictor,
};
use crate::core::report::{self, Report};
use crate::core::upload;
use crate::error::{ReportError, SetupError};
use crate::models::ServiceHealth;
use crate::workflow::{
    ChatEffect, ChatEvent, ChatSession, ClinicalEffect, ClinicalEvent, ClinicalWorkflow,
    EcgEffect, EcgEvent, EcgWorkflow, Notifier,
};

/// Health of all three services, probed concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthSummary {
    pub clinical: ServiceHealth,
    pub ecg: ServiceHealth,
    pub chat: ServiceHealth,
}

pub struct App {
    config: AppConfig,
    clinical: Arc<dyn ClinicalPredictor>,
    ecg: Arc<dyn EcgPredictor>,
    chat: Arc<dyn ChatService>,
    notifier: Arc<dyn Notifier>,
}

impl App {
    /// Build the HTTP clients named in `config`. One connection pool is
    /// shared by all three.
    pub fn from_config(config: AppConfig, notifier: Arc<dyn Notifier>) -> Result<Self, SetupError> {
        let http = reqwest::Client::new();
        let services = &config.services;
        let clinical = ClinicalClient::new(&services.clinical_url, http.clone())?;
        let ecg = EcgClient::new(&services.ecg_url, http.clone())?;
        let chat = ChatClient::new(&services.chat_url, http)?;

        info!(
            clinical = %services.clinical_url,
            ecg = %services.ecg_url,
            chat = %services.chat_url,
            "Service clients ready"
        );

        Ok(Self::with_services(
            config,
            Arc::new(clinical),
            Arc::new(ecg),
            Arc::new(chat),
            notifier,
        ))
    }

    pub fn with_services(
        config: AppConfig,
        clinical: Arc<dyn ClinicalPredictor>,
        ecg: Arc<dyn EcgPredictor>,
        chat: Arc<dyn ChatService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            clinical,
            ecg,
            chat,
            notifier,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Apply `event` and run whatever effects follow until the workflow
    /// settles.
    pub async fn drive_clinical(&self, workflow: &mut ClinicalWorkflow, event: ClinicalEvent) {
        let mut next = workflow.update(event);
        while let Some(effect) = next {
            next = match effect {
                ClinicalEffect::Predict(inputs) => {
                    let outcome = self.clinical.predict(&inputs).await;
                    workflow.update(ClinicalEvent::PredictionReceived(outcome))
                }
                ClinicalEffect::Notify(notification) => {
                    self.notifier.notify(notification);
                    None
                }
            };
        }
    }

    pub async fn drive_ecg(&self, workflow: &mut EcgWorkflow, event: EcgEvent) {
        let mut next = workflow.update(event);
        while let Some(effect) = next {
            next = match effect {
                EcgEffect::ReadImage { token, file } => {
                    let result = upload::read_as_data_url(file).await;
                    workflow.update(EcgEvent::ImageRead { token, result })
                }
                EcgEffect::Predict(image) => {
                    let result = self.ecg.predict(&image).await;
                    workflow.update(EcgEvent::PredictionReceived {
                        result,
                        tested_on: chrono::Local::now().date_naive(),
                    })
                }
                EcgEffect::Notify(notification) => {
                    self.notifier.notify(notification);
                    None
                }
            };
        }
    }

    pub async fn drive_chat(&self, session: &mut ChatSession, event: ChatEvent) {
        let mut next = session.update(event);
        while let Some(effect) = next {
            next = match effect {
                ChatEffect::ProbeHealth => {
                    let health = self.chat.health().await;
                    session.update(ChatEvent::HealthProbed(health))
                }
                ChatEffect::Send(message) => {
                    let outcome = self.chat.send(&message).await;
                    session.update(ChatEvent::ReplyReceived(outcome))
                }
                ChatEffect::Notify(notification) => {
                    self.notifier.notify(notification);
                    None
                }
            };
        }
    }

    pub async fn probe_all(&self) -> HealthSummary {
        let (clinical, ecg, chat) =
            futures::join!(self.clinical.health(), self.ecg.health(), self.chat.health());
        HealthSummary { clinical, ecg, chat }
    }

    /// Write `report` to the configured directory after the configured
    /// delay.
    pub async fn export_report(&self, report: &Report) -> Result<PathBuf, ReportError> {
        let settings = &self.config.report;
        report::export(
            report,
            &PathBuf::from(&settings.output_dir),
            Duration::from_millis(settings.generation_delay_ms),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ai::{MockChatService, MockClinicalPredictor, MockEcgPredictor};
    use crate::core::upload::SelectedFile;
    use crate::error::{ServiceError, ServiceKind};
    use crate::models::{ChatReply, ChatSource, ClinicalField, PredictionResult, RiskLevel};
    use crate::workflow::notify::MockNotifier;
    use crate::workflow::Notification;
    use mockall::predicate::eq;

    fn prediction(risk: RiskLevel) -> PredictionResult {
        PredictionResult {
            prediction: "GDM".into(),
            is_diabetic: risk != RiskLevel::Low,
            confidence: 82.0,
            risk,
            raw_prediction: 0.82,
        }
    }

    struct Mocks {
        clinical: MockClinicalPredictor,
        ecg: MockEcgPredictor,
        chat: MockChatService,
        notifier: MockNotifier,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                clinical: MockClinicalPredictor::new(),
                ecg: MockEcgPredictor::new(),
                chat: MockChatService::new(),
                notifier: MockNotifier::new(),
            }
        }

        fn app(self) -> App {
            let mut config = AppConfig::default();
            config.report.generation_delay_ms = 0;
            App::with_services(
                config,
                Arc::new(self.clinical),
                Arc::new(self.ecg),
                Arc::new(self.chat),
                Arc::new(self.notifier),
            )
        }
    }

    #[tokio::test]
    async fn clinical_submission_reaches_result() {
        let mut mocks = Mocks::new();
        mocks
            .clinical
            .expect_predict()
            .withf(|inputs| inputs.age == "33" && inputs.glucose_levels == "170")
            .times(1)
            .returning(|_| Ok(prediction(RiskLevel::High)));
        mocks.notifier.expect_notify().never();
        let app = mocks.app();

        let mut workflow = ClinicalWorkflow::new();
        for (field, value) in [
            (ClinicalField::Age, "33"),
            (ClinicalField::Bmi, "30"),
            (ClinicalField::GlucoseLevels, "170"),
        ] {
            app.drive_clinical(&mut workflow, ClinicalEvent::FieldChanged(field, value.into()))
                .await;
        }
        app.drive_clinical(&mut workflow, ClinicalEvent::Submit).await;

        assert_eq!(workflow.result().map(|r| r.risk), Some(RiskLevel::High));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_network() {
        let mut mocks = Mocks::new();
        mocks.clinical.expect_predict().never();
        mocks.notifier.expect_notify().never();
        let app = mocks.app();

        let mut workflow = ClinicalWorkflow::new();
        app.drive_clinical(&mut workflow, ClinicalEvent::Submit).await;

        assert!(!workflow.errors().is_empty());
    }

    #[tokio::test]
    async fn failed_prediction_notifies_exactly_once() {
        let mut mocks = Mocks::new();
        mocks.clinical.expect_predict().times(1).returning(|_| {
            Err(ServiceError::Application {
                service: ServiceKind::Clinical,
                status: 400,
                message: "Missing required feature: bmi".into(),
            })
        });
        mocks
            .notifier
            .expect_notify()
            .with(eq(Notification::error("Error getting prediction. Please try again.")))
            .times(1)
            .return_const(());
        let app = mocks.app();

        let mut workflow = ClinicalWorkflow::new();
        for (field, value) in [
            (ClinicalField::Age, "33"),
            (ClinicalField::Bmi, "30"),
            (ClinicalField::GlucoseLevels, "170"),
        ] {
            workflow.update(ClinicalEvent::FieldChanged(field, value.into()));
        }
        app.drive_clinical(&mut workflow, ClinicalEvent::Submit).await;

        assert!(workflow.result().is_none());
        assert!(!workflow.is_disabled());
    }

    #[tokio::test]
    async fn ecg_selection_is_read_then_submitted() {
        let mut mocks = Mocks::new();
        mocks
            .ecg
            .expect_predict()
            .withf(|image| image.data_url().starts_with("data:image/jpeg;base64,"))
            .times(1)
            .returning(|_| Ok(prediction(RiskLevel::Moderate)));
        mocks.notifier.expect_notify().never();
        let app = mocks.app();

        let mut workflow = EcgWorkflow::new();
        let file = SelectedFile::new("ecg.jpg", "image/jpeg", vec![0xff, 0xd8, 0xff]);
        app.drive_ecg(&mut workflow, EcgEvent::FileSelected(file)).await;
        assert!(workflow.can_submit());

        app.drive_ecg(&mut workflow, EcgEvent::Submit).await;
        assert_eq!(workflow.result().map(|r| r.risk), Some(RiskLevel::Moderate));
    }

    #[tokio::test]
    async fn chat_round_trip_tags_source_from_probe() {
        let mut mocks = Mocks::new();
        mocks.chat.expect_health().times(1).returning(|| ServiceHealth {
            is_healthy: true,
            api_available: false,
        });
        mocks
            .chat
            .expect_send()
            .withf(|message| message == "What is GDM?")
            .times(1)
            .returning(|_| {
                Ok(ChatReply {
                    response: "Gestational diabetes.".into(),
                    source: Some(ChatSource::Api),
                })
            });
        mocks.notifier.expect_notify().never();
        let app = mocks.app();

        let mut session = ChatSession::new();
        app.drive_chat(&mut session, ChatEvent::Open).await;
        app.drive_chat(&mut session, ChatEvent::InputChanged("What is GDM?".into()))
            .await;
        app.drive_chat(&mut session, ChatEvent::Submit).await;

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].source, Some(ChatSource::Web));
    }

    #[tokio::test]
    async fn probes_every_service() {
        let mut mocks = Mocks::new();
        mocks.clinical.expect_health().returning(|| ServiceHealth {
            is_healthy: true,
            api_available: true,
        });
        mocks.ecg.expect_health().returning(ServiceHealth::offline);
        mocks.chat.expect_health().returning(|| ServiceHealth {
            is_healthy: true,
            api_available: false,
        });
        let app = mocks.app();

        let summary = app.probe_all().await;
        assert!(summary.clinical.api_available);
        assert!(!summary.ecg.is_healthy);
        assert!(summary.chat.is_healthy && !summary.chat.api_available);
    }

    #[tokio::test]
    async fn exports_into_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut mocks = Mocks::new();
        mocks.notifier.expect_notify().never();
        let mut app = mocks.app();
        app.config.report.output_dir = dir.path().display().to_string();

        let inputs = crate::models::ClinicalInputs::default();
        let report = Report::clinical(&inputs, &prediction(RiskLevel::Low));
        let path = app.export_report(&report).await.unwrap();

        assert_eq!(path, dir.path().join(report::REPORT_FILE_NAME));
    }
}
