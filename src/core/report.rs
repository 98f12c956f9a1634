//! Plain text assessment report.

use chrono::NaiveDate;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::core::recommendations::{bundle, Assessment, RecommendationBundle};
use crate::error::ReportError;
use crate::models::{ClinicalField, ClinicalInputs, PredictionResult, RiskLevel};

pub const REPORT_FILE_NAME: &str = "GDM_Risk_Assessment_Report.txt";

pub const DISCLAIMER: &str = "DISCLAIMER: This assessment is for educational purposes only and is not a substitute for professional medical advice.\nPlease consult with your healthcare provider for personalized medical guidance.";

#[derive(Debug, Clone)]
pub struct Report {
    heading: &'static str,
    details: Vec<(String, String)>,
    risk: RiskLevel,
    confidence: f64,
    recommendations: &'static RecommendationBundle,
}

impl Report {
    /// Report over the fifteen clinical inputs that produced `result`.
    pub fn clinical(inputs: &ClinicalInputs, result: &PredictionResult) -> Self {
        let details = ClinicalField::ALL
            .into_iter()
            .map(|field| (field.label().to_string(), inputs.value(field)))
            .collect();
        Self {
            heading: "Personal Information",
            details,
            risk: result.risk,
            confidence: result.confidence,
            recommendations: bundle(Assessment::Clinical, result.risk),
        }
    }

    pub fn ecg(file_name: &str, tested_on: NaiveDate, result: &PredictionResult) -> Self {
        let details = vec![
            ("Test Date".to_string(), tested_on.format("%Y-%m-%d").to_string()),
            ("ECG Image".to_string(), file_name.to_string()),
            ("ECG Result".to_string(), result.prediction.clone()),
        ];
        Self {
            heading: "ECG Details",
            details,
            risk: result.risk,
            confidence: result.confidence,
            recommendations: bundle(Assessment::Ecg, result.risk),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "GDM Risk Assessment Report")?;
        writeln!(out)?;
        writeln!(out, "{}:", self.heading)?;
        for (label, value) in &self.details {
            writeln!(out, "- {}: {}", label, value)?;
        }
        writeln!(out)?;
        writeln!(out, "Assessment Result:")?;
        writeln!(out, "- Risk Level: {}", self.risk.to_string().to_uppercase())?;
        writeln!(out, "- Confidence Score: {}%", self.confidence)?;
        writeln!(out)?;
        writeln!(out, "Recommendations:")?;

        let sections = [
            ("Diet", self.recommendations.diet),
            ("Exercise", self.recommendations.exercise),
            ("Lifestyle Changes", self.recommendations.lifestyle),
        ];
        for (n, (title, items)) in sections.iter().enumerate() {
            writeln!(out, "{}. {}:", n + 1, title)?;
            for item in items.iter() {
                writeln!(out, "   - {}", item)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "{}", DISCLAIMER)
    }
}

/// Write the report into `dir` after the cosmetic `delay`. Only this task
/// waits; the caller decides whether to spawn it.
pub async fn export(report: &Report, dir: &Path, delay: Duration) -> Result<PathBuf, ReportError> {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let path = dir.join(REPORT_FILE_NAME);
    tokio::fs::write(&path, report.render())
        .await
        .map_err(|source| ReportError::Write {
            path: path.display().to_string(),
            source,
        })?;

    info!(path = %path.display(), "Report written");
    Ok(path)
}
