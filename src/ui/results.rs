use std::fmt::Write as _;

use crate::core::recommendations::{bundle, interpretation, presentation, Assessment, Severity};
use crate::models::PredictionResult;

const BAR_WIDTH: usize = 20;

/// `[##########----------] 50%`. The number is shown exactly as received.
pub fn confidence_bar(confidence: f64) -> String {
    let filled = ((confidence.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        confidence
    )
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Green => "[green]",
        Severity::Amber => "[amber]",
        Severity::Red => "[red]",
    }
}

pub fn render_result(assessment: Assessment, result: &PredictionResult) -> String {
    let shown = presentation(result.risk);
    let advice = bundle(assessment, result.risk);

    let mut out = String::new();
    let _ = writeln!(out, "Your GDM Risk Assessment");
    let _ = writeln!(out, "{} {} Risk", severity_tag(shown.severity), result.risk.title());
    let _ = writeln!(out, "{}", shown.message);
    let _ = writeln!(out);
    let _ = writeln!(out, "Confidence Score");
    let _ = writeln!(out, "{}", confidence_bar(result.confidence));

    for (title, items) in [
        ("Diet Recommendations", advice.diet),
        ("Exercise Recommendations", advice.exercise),
        ("Lifestyle Changes", advice.lifestyle),
    ] {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", title);
        for item in items {
            let _ = writeln!(out, "  * {}", item);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", interpretation(assessment, result.risk));
    out
}
