//! ECG upload: pick one image, wait for it to be read, submit it.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::report::Report;
use crate::core::upload::{self, EcgImage, SelectedFile};
use crate::error::{ServiceError, UploadError};
use crate::models::PredictionResult;
use crate::workflow::notify::Notification;

pub const NO_IMAGE_MESSAGE: &str = "Please select an ECG image to upload";

#[derive(Debug)]
pub enum EcgEvent {
    FileSelected(SelectedFile),
    /// Completion of a [`EcgEffect::ReadImage`]; `token` ties it to the
    /// selection that asked for it.
    ImageRead {
        token: u64,
        result: Result<EcgImage, UploadError>,
    },
    ChangeImage,
    Submit,
    PredictionReceived {
        result: Result<PredictionResult, ServiceError>,
        tested_on: NaiveDate,
    },
    UploadAnother,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EcgEffect {
    ReadImage { token: u64, file: SelectedFile },
    Predict(EcgImage),
    Notify(Notification),
}

/// The accepted file and, once read, its data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub summary: String,
    pub preview: Option<EcgImage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EcgPhase {
    Selecting,
    Submitting,
    Complete {
        file_name: String,
        tested_on: NaiveDate,
        result: PredictionResult,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EcgWorkflow {
    selection: Option<Selection>,
    error: Option<String>,
    phase: EcgPhase,
    token: u64,
}

impl Default for EcgWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl EcgWorkflow {
    pub fn new() -> Self {
        Self {
            selection: None,
            error: None,
            phase: EcgPhase::Selecting,
            token: 0,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Inline validation message under the file picker.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> &EcgPhase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, EcgPhase::Submitting)
    }

    /// True once an image has been accepted and fully read.
    pub fn can_submit(&self) -> bool {
        self.phase == EcgPhase::Selecting
            && self
                .selection
                .as_ref()
                .map_or(false, |s| s.preview.is_some())
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        match &self.phase {
            EcgPhase::Complete { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<Report> {
        match &self.phase {
            EcgPhase::Complete {
                file_name,
                tested_on,
                result,
            } => Some(Report::ecg(file_name, *tested_on, result)),
            _ => None,
        }
    }

    pub fn update(&mut self, event: EcgEvent) -> Option<EcgEffect> {
        match event {
            EcgEvent::FileSelected(file) => {
                if self.phase != EcgPhase::Selecting {
                    return None;
                }
                self.error = None;
                self.token += 1;
                match upload::validate(&file) {
                    Err(err) => {
                        debug!(file = %file.name, error = %err, "ECG image rejected");
                        self.error = Some(err.to_string());
                        self.selection = None;
                        None
                    }
                    Ok(_) => {
                        self.selection = Some(Selection {
                            name: file.name.clone(),
                            summary: file.summary(),
                            preview: None,
                        });
                        Some(EcgEffect::ReadImage {
                            token: self.token,
                            file,
                        })
                    }
                }
            }
            EcgEvent::ImageRead { token, result } => {
                if token != self.token {
                    return None;
                }
                let Some(selection) = self.selection.as_mut() else {
                    return None;
                };
                match result {
                    Ok(image) => selection.preview = Some(image),
                    Err(err) => {
                        self.error = Some(err.to_string());
                        self.selection = None;
                    }
                }
                None
            }
            EcgEvent::ChangeImage => {
                if self.phase == EcgPhase::Selecting {
                    self.token += 1;
                    self.selection = None;
                }
                None
            }
            EcgEvent::Submit => {
                if self.phase != EcgPhase::Selecting {
                    return None;
                }
                let preview = self.selection.as_ref().and_then(|s| s.preview.clone());
                match preview {
                    Some(image) => {
                        self.phase = EcgPhase::Submitting;
                        info!("Submitting ECG image");
                        Some(EcgEffect::Predict(image))
                    }
                    None => Some(EcgEffect::Notify(Notification::error(NO_IMAGE_MESSAGE))),
                }
            }
            EcgEvent::PredictionReceived { result, tested_on } => {
                if self.phase != EcgPhase::Submitting {
                    return None;
                }
                match result {
                    Ok(result) => {
                        let file_name = self
                            .selection
                            .as_ref()
                            .map(|s| s.name.clone())
                            .unwrap_or_default();
                        self.phase = EcgPhase::Complete {
                            file_name,
                            tested_on,
                            result,
                        };
                        None
                    }
                    Err(err) => {
                        self.phase = EcgPhase::Selecting;
                        Some(EcgEffect::Notify(Notification::for_failure(&err)))
                    }
                }
            }
            EcgEvent::UploadAnother => {
                if matches!(self.phase, EcgPhase::Complete { .. }) {
                    *self = Self::new();
                }
                None
            }
        }
    }
}
