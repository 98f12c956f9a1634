//! Clinical form: edit fields, submit once, show the result.

use tracing::{debug, info};

use crate::core::report::Report;
use crate::error::ServiceError;
use crate::models::{ClinicalField, ClinicalInputs, FieldErrors, PredictionResult};
use crate::workflow::notify::Notification;

#[derive(Debug)]
pub enum ClinicalEvent {
    FieldChanged(ClinicalField, String),
    Submit,
    PredictionReceived(Result<PredictionResult, ServiceError>),
    ReturnToForm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClinicalEffect {
    Predict(ClinicalInputs),
    Notify(Notification),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClinicalPhase {
    Editing,
    /// A request is in flight; the whole form is disabled.
    Submitting,
    Complete {
        inputs: ClinicalInputs,
        result: PredictionResult,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalWorkflow {
    form: ClinicalInputs,
    errors: FieldErrors,
    phase: ClinicalPhase,
}

impl Default for ClinicalWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ClinicalWorkflow {
    pub fn new() -> Self {
        Self {
            form: ClinicalInputs::default(),
            errors: FieldErrors::default(),
            phase: ClinicalPhase::Editing,
        }
    }

    pub fn form(&self) -> &ClinicalInputs {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn phase(&self) -> &ClinicalPhase {
        &self.phase
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self.phase, ClinicalPhase::Submitting)
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.phase {
            ClinicalPhase::Complete { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<Report> {
        match &self.phase {
            ClinicalPhase::Complete { inputs, result } => Some(Report::clinical(inputs, result)),
            _ => None,
        }
    }

    pub fn update(&mut self, event: ClinicalEvent) -> Option<ClinicalEffect> {
        match event {
            ClinicalEvent::FieldChanged(field, value) => {
                if self.phase != ClinicalPhase::Editing {
                    return None;
                }
                match self.form.set(field, &value) {
                    Ok(()) => self.errors.remove(field),
                    Err(message) => self.errors.insert(field, message),
                }
                None
            }
            ClinicalEvent::Submit => {
                if self.phase != ClinicalPhase::Editing {
                    debug!("Submit ignored while form is not editable");
                    return None;
                }
                // Rejected choices keep their old value; their errors still block.
                let mut errors = self.form.check().err().unwrap_or_default();
                for (field, message) in self.errors.iter() {
                    if field.choices().is_some() {
                        errors.insert(field, message);
                    }
                }
                if !errors.is_empty() {
                    debug!(invalid = errors.len(), "Clinical form rejected");
                    self.errors = errors;
                    return None;
                }
                self.errors = FieldErrors::default();
                self.phase = ClinicalPhase::Submitting;
                info!("Submitting clinical form");
                Some(ClinicalEffect::Predict(self.form.clone()))
            }
            ClinicalEvent::PredictionReceived(outcome) => {
                if self.phase != ClinicalPhase::Submitting {
                    return None;
                }
                match outcome {
                    Ok(result) => {
                        self.phase = ClinicalPhase::Complete {
                            inputs: self.form.clone(),
                            result,
                        };
                        None
                    }
                    Err(err) => {
                        self.phase = ClinicalPhase::Editing;
                        Some(ClinicalEffect::Notify(Notification::for_failure(&err)))
                    }
                }
            }
            ClinicalEvent::ReturnToForm => {
                if matches!(self.phase, ClinicalPhase::Complete { .. }) {
                    *self = Self::new();
                }
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceKind;
    use crate::models::RiskLevel;

    fn filled() -> ClinicalWorkflow {
        let mut workflow = ClinicalWorkflow::new();
        for (field, value) in [
            (ClinicalField::Age, "29"),
            (ClinicalField::Bmi, "24.1"),
            (ClinicalField::GlucoseLevels, "131"),
        ] {
            assert_eq!(workflow.update(ClinicalEvent::FieldChanged(field, value.into())), None);
        }
        workflow
    }

    fn result() -> PredictionResult {
        PredictionResult {
            prediction: "No GDM".into(),
            is_diabetic: false,
            confidence: 88.0,
            risk: RiskLevel::Low,
            raw_prediction: 0.12,
        }
    }

    #[test]
    fn empty_required_fields_block_submission() {
        let mut workflow = ClinicalWorkflow::new();

        assert_eq!(workflow.update(ClinicalEvent::Submit), None);
        assert_eq!(workflow.phase(), &ClinicalPhase::Editing);
        assert_eq!(workflow.errors().get(ClinicalField::Age), Some("Age is required"));
    }

    #[test]
    fn valid_form_submits_full_payload_once() {
        let mut workflow = filled();

        let effect = workflow.update(ClinicalEvent::Submit);
        assert_eq!(effect, Some(ClinicalEffect::Predict(workflow.form().clone())));
        assert!(workflow.is_disabled());

        assert_eq!(workflow.update(ClinicalEvent::Submit), None);
    }

    #[test]
    fn fields_are_frozen_while_submitting() {
        let mut workflow = filled();
        workflow.update(ClinicalEvent::Submit);

        workflow.update(ClinicalEvent::FieldChanged(ClinicalField::Age, "40".into()));
        assert_eq!(workflow.form().age, "29");
    }

    #[test]
    fn success_stores_result_and_submitted_inputs() {
        let mut workflow = filled();
        workflow.update(ClinicalEvent::Submit);

        assert_eq!(workflow.update(ClinicalEvent::PredictionReceived(Ok(result()))), None);
        assert_eq!(workflow.result(), Some(&result()));
        assert!(workflow.report().unwrap().render().contains("- Age: 29"));
    }

    #[test]
    fn failure_notifies_once_and_reenables_form() {
        let mut workflow = filled();
        workflow.update(ClinicalEvent::Submit);

        let effect = workflow.update(ClinicalEvent::PredictionReceived(Err(
            ServiceError::Application {
                service: ServiceKind::Clinical,
                status: 500,
                message: "boom".into(),
            },
        )));

        assert_eq!(
            effect,
            Some(ClinicalEffect::Notify(Notification::error(
                "Error getting prediction. Please try again."
            )))
        );
        assert_eq!(workflow.phase(), &ClinicalPhase::Editing);
        assert_eq!(workflow.form().age, "29");
    }

    #[test]
    fn invalid_choice_shows_inline_error_until_corrected() {
        let mut workflow = filled();

        workflow.update(ClinicalEvent::FieldChanged(ClinicalField::Pcos, "sometimes".into()));
        assert!(workflow.errors().get(ClinicalField::Pcos).is_some());

        workflow.update(ClinicalEvent::FieldChanged(ClinicalField::Pcos, "yes".into()));
        assert!(workflow.errors().get(ClinicalField::Pcos).is_none());
    }

    #[test]
    fn rejected_choice_blocks_submission() {
        let mut workflow = filled();
        workflow.update(ClinicalEvent::FieldChanged(ClinicalField::Pcos, "sometimes".into()));

        assert_eq!(workflow.update(ClinicalEvent::Submit), None);
        assert_eq!(workflow.phase(), &ClinicalPhase::Editing);
        assert!(workflow.errors().get(ClinicalField::Pcos).is_some());

        workflow.update(ClinicalEvent::FieldChanged(ClinicalField::Pcos, "yes".into()));
        assert!(matches!(
            workflow.update(ClinicalEvent::Submit),
            Some(ClinicalEffect::Predict(ref inputs)) if inputs.value(ClinicalField::Pcos) == "yes"
        ));
    }

    #[test]
    fn return_to_form_starts_over() {
        let mut workflow = filled();
        workflow.update(ClinicalEvent::Submit);
        workflow.update(ClinicalEvent::PredictionReceived(Ok(result())));

        workflow.update(ClinicalEvent::ReturnToForm);
        assert_eq!(workflow, ClinicalWorkflow::new());
    }

    #[test]
    fn late_response_without_request_is_ignored() {
        let mut workflow = filled();
        assert_eq!(workflow.update(ClinicalEvent::PredictionReceived(Ok(result()))), None);
        assert_eq!(workflow.phase(), &ClinicalPhase::Editing);
    }
}
