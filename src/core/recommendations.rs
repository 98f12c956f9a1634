//! Static presentation tables keyed by risk tier.

use crate::models::RiskLevel;

/// Which prediction produced a result. The two assessments share risk tiers
/// but carry different advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Assessment {
    Clinical,
    Ecg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Green,
    Amber,
    Red,
}

/// Advice lists shown for one risk tier.
#[derive(Debug, PartialEq, Eq)]
pub struct RecommendationBundle {
    pub diet: &'static [&'static str],
    pub exercise: &'static [&'static str],
    pub lifestyle: &'static [&'static str],
}

impl RecommendationBundle {
    pub fn items(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.diet
            .iter()
            .chain(self.exercise.iter())
            .chain(self.lifestyle.iter())
            .copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskPresentation {
    pub severity: Severity,
    pub message: &'static str,
}

pub fn presentation(risk: RiskLevel) -> RiskPresentation {
    match risk {
        RiskLevel::Low => RiskPresentation {
            severity: Severity::Green,
            message: "Your risk profile suggests a low probability of developing GDM.",
        },
        RiskLevel::Moderate => RiskPresentation {
            severity: Severity::Amber,
            message: "Your risk profile suggests a moderate probability of developing GDM.",
        },
        RiskLevel::High => RiskPresentation {
            severity: Severity::Red,
            message: "Your risk profile suggests a high probability of developing GDM.",
        },
    }
}

/// Paragraph explaining what the tier means for this assessment.
pub fn interpretation(assessment: Assessment, risk: RiskLevel) -> &'static str {
    match (assessment, risk) {
        (Assessment::Clinical, RiskLevel::Low) => "A low risk result suggests that you have few risk factors for GDM. However, regular prenatal care is still important.",
        (Assessment::Clinical, RiskLevel::Moderate) => "A moderate risk result indicates that you have some risk factors for GDM. Closer monitoring may be beneficial.",
        (Assessment::Clinical, RiskLevel::High) => "A high risk result means you have multiple risk factors for GDM. We recommend discussing these results with your healthcare provider.",
        (Assessment::Ecg, RiskLevel::Low) => "A low risk result suggests that your ECG shows patterns typical of individuals without diabetes.",
        (Assessment::Ecg, RiskLevel::Moderate) => "A moderate risk result suggests some ECG patterns that may be associated with pre-diabetic or early diabetic changes.",
        (Assessment::Ecg, RiskLevel::High) => "A high risk result indicates ECG patterns strongly associated with diabetes-related cardiac changes.",
    }
}

pub fn bundle(assessment: Assessment, risk: RiskLevel) -> &'static RecommendationBundle {
    match (assessment, risk) {
        (Assessment::Clinical, RiskLevel::Low) => &CLINICAL_LOW,
        (Assessment::Clinical, RiskLevel::Moderate) => &CLINICAL_MODERATE,
        (Assessment::Clinical, RiskLevel::High) => &CLINICAL_HIGH,
        (Assessment::Ecg, RiskLevel::Low) => &ECG_LOW,
        (Assessment::Ecg, RiskLevel::Moderate) => &ECG_MODERATE,
        (Assessment::Ecg, RiskLevel::High) => &ECG_HIGH,
    }
}

static CLINICAL_LOW: RecommendationBundle = RecommendationBundle {
    diet: &[
        "Focus on a balanced diet with plenty of fruits, vegetables, and whole grains",
        "Limit processed foods and added sugars",
        "Stay hydrated with water as your primary beverage",
    ],
    exercise: &[
        "Maintain your current exercise routine of 150 minutes per week",
        "Include a mix of cardio and light strength training",
        "Consider prenatal yoga or swimming as low-impact options",
    ],
    lifestyle: &[
        "Continue regular prenatal check-ups",
        "Monitor weight gain according to your healthcare provider's recommendations",
        "Ensure adequate sleep of 7-8 hours per night",
    ],
};

static CLINICAL_MODERATE: RecommendationBundle = RecommendationBundle {
    diet: &[
        "Follow a meal plan with controlled carbohydrate intake",
        "Eat smaller, more frequent meals throughout the day",
        "Choose complex carbohydrates with low glycemic index",
        "Include protein with each meal to stabilize blood sugar",
    ],
    exercise: &[
        "Aim for 30 minutes of moderate activity daily",
        "Take short walks after meals to help regulate blood sugar",
        "Consider prenatal exercise classes under professional guidance",
    ],
    lifestyle: &[
        "Monitor blood glucose levels as recommended by your healthcare provider",
        "Practice stress-reduction techniques like meditation",
        "Keep a food and activity journal to identify patterns",
        "Schedule more frequent prenatal check-ups",
    ],
};

static CLINICAL_HIGH: RecommendationBundle = RecommendationBundle {
    diet: &[
        "Work with a registered dietitian to create a specialized meal plan",
        "Carefully monitor carbohydrate intake and distribute evenly throughout the day",
        "Focus on high-fiber foods to help manage blood sugar",
        "Eliminate sugary beverages and desserts",
        "Time meals and snacks consistently to avoid blood sugar spikes",
    ],
    exercise: &[
        "Consult with your healthcare provider before starting any exercise program",
        "Incorporate moderate activity as approved by your doctor",
        "Take short walks after each meal to help lower post-meal glucose levels",
        "Consider aquatic exercises for low-impact movement",
    ],
    lifestyle: &[
        "Monitor blood glucose levels multiple times daily",
        "Attend all recommended medical appointments and screenings",
        "Connect with a diabetes educator for personalized support",
        "Join a support group for women with gestational diabetes",
        "Prepare for possible insulin therapy if recommended by your doctor",
    ],
};

static ECG_LOW: RecommendationBundle = RecommendationBundle {
    diet: &[
        "Focus on a balanced diet with plenty of fruits, vegetables, and whole grains",
        "Limit processed foods and added sugars",
        "Stay hydrated with water as your primary beverage",
    ],
    exercise: &[
        "Maintain your current exercise routine of 150 minutes per week",
        "Include a mix of cardio and light strength training",
        "Consider activities like swimming or cycling that are gentle on joints",
    ],
    lifestyle: &[
        "Continue regular health check-ups",
        "Monitor weight according to your healthcare provider's recommendations",
        "Ensure adequate sleep of 7-8 hours per night",
    ],
};

static ECG_MODERATE: RecommendationBundle = RecommendationBundle {
    diet: &[
        "Follow a meal plan with controlled carbohydrate intake",
        "Eat smaller, more frequent meals throughout the day",
        "Choose complex carbohydrates with low glycemic index",
        "Include protein with each meal to stabilize blood sugar",
    ],
    exercise: &[
        "Aim for 30 minutes of moderate activity daily",
        "Take short walks after meals to help regulate blood sugar",
        "Consider heart-friendly exercises under professional guidance",
    ],
    lifestyle: &[
        "Monitor blood glucose levels periodically",
        "Practice stress-reduction techniques like meditation",
        "Keep a food and activity journal to identify patterns",
        "Schedule more frequent cardiac check-ups",
    ],
};

static ECG_HIGH: RecommendationBundle = RecommendationBundle {
    diet: &[
        "Work with a registered dietitian to create a specialized meal plan",
        "Carefully monitor carbohydrate intake and distribute evenly throughout the day",
        "Focus on high-fiber foods to help manage blood sugar",
        "Eliminate sugary beverages and desserts",
        "Time meals and snacks consistently to avoid blood sugar spikes",
    ],
    exercise: &[
        "Consult with your healthcare provider before starting any exercise program",
        "Incorporate moderate activity as approved by your doctor",
        "Take short walks after each meal to help lower post-meal glucose levels",
        "Consider cardiac rehabilitation programs if recommended",
    ],
    lifestyle: &[
        "Monitor blood glucose levels regularly",
        "Attend all recommended medical appointments and screenings",
        "Connect with a diabetes educator for personalized support",
        "Join a support group for patients with cardiac and diabetic conditions",
        "Prepare for possible medication therapy if recommended by your doctor",
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(RiskLevel::Low, Severity::Green, "low")]
    #[test_case(RiskLevel::Moderate, Severity::Amber, "moderate")]
    #[test_case(RiskLevel::High, Severity::Red, "high")]
    fn each_tier_has_its_own_message(risk: RiskLevel, severity: Severity, word: &str) {
        let shown = presentation(risk);
        assert_eq!(shown.severity, severity);
        assert_eq!(
            shown.message,
            format!("Your risk profile suggests a {} probability of developing GDM.", word)
        );
    }

    #[test]
    fn bundles_are_distinct_per_tier_and_assessment() {
        for assessment in [Assessment::Clinical, Assessment::Ecg] {
            for (i, a) in RiskLevel::ALL.into_iter().enumerate() {
                for b in RiskLevel::ALL.into_iter().skip(i + 1) {
                    assert_ne!(bundle(assessment, a), bundle(assessment, b));
                }
            }
        }
        for risk in RiskLevel::ALL {
            assert_ne!(bundle(Assessment::Clinical, risk), bundle(Assessment::Ecg, risk));
        }
    }

    #[test]
    fn clinical_bundles_are_pregnancy_specific() {
        let high = bundle(Assessment::Clinical, RiskLevel::High);
        assert!(high
            .lifestyle
            .contains(&"Join a support group for women with gestational diabetes"));

        let ecg_high = bundle(Assessment::Ecg, RiskLevel::High);
        assert!(ecg_high
            .exercise
            .contains(&"Consider cardiac rehabilitation programs if recommended"));
    }

    #[test]
    fn every_bundle_fills_all_three_lists() {
        for assessment in [Assessment::Clinical, Assessment::Ecg] {
            for risk in RiskLevel::ALL {
                let b = bundle(assessment, risk);
                assert!(!b.diet.is_empty() && !b.exercise.is_empty() && !b.lifestyle.is_empty());
                assert_eq!(
                    b.items().count(),
                    b.diet.len() + b.exercise.len() + b.lifestyle.len()
                );
            }
        }
    }
}
