use std::fmt::Write as _;

use crate::models::ClinicalField;
use crate::workflow::{ClinicalPhase, ClinicalWorkflow, EcgPhase, EcgWorkflow};

/// One line per field, with its inline error when there is one.
pub fn render_clinical_form(workflow: &ClinicalWorkflow) -> String {
    let mut out = String::new();
    let form = workflow.form();
    for field in ClinicalField::ALL {
        let value = form.value(field);
        let shown = if value.is_empty() { "<empty>" } else { value.as_str() };
        let _ = match field.choices() {
            Some(choices) => writeln!(out, "{:<40} {} ({})", field.label(), shown, choices.join("/")),
            None => writeln!(out, "{:<40} {}", field.label(), shown),
        };
        if let Some(error) = workflow.errors().get(field) {
            let _ = writeln!(out, "    ! {}", error);
        }
    }
    let status = match workflow.phase() {
        ClinicalPhase::Editing => "Calculate Risk",
        ClinicalPhase::Submitting => "Calculating...",
        ClinicalPhase::Complete { .. } => "Assessment complete",
    };
    let _ = writeln!(out);
    let _ = writeln!(out, "[{}]", status);
    out
}

pub fn render_ecg_upload(workflow: &EcgWorkflow) -> String {
    let mut out = String::new();
    match workflow.selection() {
        Some(selection) => {
            let _ = writeln!(out, "Selected: {}", selection.summary);
            let preview = if selection.preview.is_some() { "ready" } else { "loading..." };
            let _ = writeln!(out, "Preview: {}", preview);
        }
        None => {
            let _ = writeln!(out, "Choose an ECG image (JPEG, PNG or BMP, max 10MB)");
        }
    }
    if let Some(error) = workflow.error() {
        let _ = writeln!(out, "    ! {}", error);
    }
    let status = match workflow.phase() {
        EcgPhase::Selecting if workflow.can_submit() => "Analyze ECG",
        EcgPhase::Selecting => "Analyze ECG (disabled)",
        EcgPhase::Submitting => "Analyzing...",
        EcgPhase::Complete { .. } => "Analysis complete",
    };
    let _ = writeln!(out, "[{}]", status);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::upload::SelectedFile;
    use crate::workflow::{ClinicalEvent, EcgEvent};

    #[test]
    fn empty_form_shows_required_errors_after_submit() {
        let mut workflow = ClinicalWorkflow::new();
        workflow.update(ClinicalEvent::Submit);

        let text = render_clinical_form(&workflow);
        assert!(text.contains("    ! Age is required"));
        assert!(text.contains("[Calculate Risk]"));
        assert!(text.contains("(low/medium/high)"));
    }

    #[test]
    fn pending_read_disables_analysis() {
        let mut workflow = EcgWorkflow::new();
        workflow.update(EcgEvent::FileSelected(SelectedFile::new(
            "ecg.png",
            "image/png",
            vec![0; 2048],
        )));

        let text = render_ecg_upload(&workflow);
        assert!(text.contains("Selected: ecg.png (2.00 KB)"));
        assert!(text.contains("Preview: loading..."));
        assert!(text.contains("[Analyze ECG (disabled)]"));
    }

    #[test]
    fn rejected_file_shows_inline_error() {
        let mut workflow = EcgWorkflow::new();
        workflow.update(EcgEvent::FileSelected(SelectedFile::new(
            "notes.txt",
            "text/plain",
            vec![0; 8],
        )));

        let text = render_ecg_upload(&workflow);
        assert!(text.contains("! Please select a valid image file (JPEG, PNG, or BMP)"));
    }
}
