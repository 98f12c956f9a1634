use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

/// Answer to the yes/no questions of the clinical form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YesNo {
    Yes,
    #[default]
    No,
}

impl YesNo {
    pub const CHOICES: [&'static str; 2] = ["yes", "no"];
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        })
    }
}

impl FromStr for YesNo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(YesNo::Yes),
            "no" => Ok(YesNo::No),
            other => Err(format!("`{}` is not one of yes, no", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ActivityLevel {
    pub const CHOICES: [&'static str; 3] = ["low", "medium", "high"];
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActivityLevel::Low => "low",
            ActivityLevel::Medium => "medium",
            ActivityLevel::High => "high",
        })
    }
}

impl FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(ActivityLevel::Low),
            "medium" => Ok(ActivityLevel::Medium),
            "high" => Ok(ActivityLevel::High),
            other => Err(format!("`{}` is not one of low, medium, high", other)),
        }
    }
}

/// The fifteen inputs of the clinical form, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClinicalField {
    Age,
    PregnancyCount,
    PreviousGestationPeriod,
    Bmi,
    Hdl,
    FamilyHistory,
    PrenatalLoss,
    BirthDefects,
    Pcos,
    SystolicBp,
    DiastolicBp,
    GlucoseLevels,
    Hemoglobin,
    PhysicalActivity,
    Prediabetes,
}

impl ClinicalField {
    pub const ALL: [ClinicalField; 15] = [
        ClinicalField::Age,
        ClinicalField::PregnancyCount,
        ClinicalField::PreviousGestationPeriod,
        ClinicalField::Bmi,
        ClinicalField::Hdl,
        ClinicalField::FamilyHistory,
        ClinicalField::PrenatalLoss,
        ClinicalField::BirthDefects,
        ClinicalField::Pcos,
        ClinicalField::SystolicBp,
        ClinicalField::DiastolicBp,
        ClinicalField::GlucoseLevels,
        ClinicalField::Hemoglobin,
        ClinicalField::PhysicalActivity,
        ClinicalField::Prediabetes,
    ];

    /// Name on the wire.
    pub fn key(self) -> &'static str {
        match self {
            ClinicalField::Age => "age",
            ClinicalField::PregnancyCount => "pregnancyCount",
            ClinicalField::PreviousGestationPeriod => "previousGestationPeriod",
            ClinicalField::Bmi => "bmi",
            ClinicalField::Hdl => "hdl",
            ClinicalField::FamilyHistory => "familyHistory",
            ClinicalField::PrenatalLoss => "prenatalLoss",
            ClinicalField::BirthDefects => "birthDefects",
            ClinicalField::Pcos => "pcos",
            ClinicalField::SystolicBp => "systolicBP",
            ClinicalField::DiastolicBp => "diastolicBP",
            ClinicalField::GlucoseLevels => "glucoseLevels",
            ClinicalField::Hemoglobin => "hemoglobin",
            ClinicalField::PhysicalActivity => "physicalActivity",
            ClinicalField::Prediabetes => "prediabetes",
        }
    }

    /// Name of the struct member, as reported by the validator.
    fn ident(self) -> &'static str {
        match self {
            ClinicalField::Age => "age",
            ClinicalField::PregnancyCount => "pregnancy_count",
            ClinicalField::PreviousGestationPeriod => "previous_gestation_period",
            ClinicalField::Bmi => "bmi",
            ClinicalField::Hdl => "hdl",
            ClinicalField::FamilyHistory => "family_history",
            ClinicalField::PrenatalLoss => "prenatal_loss",
            ClinicalField::BirthDefects => "birth_defects",
            ClinicalField::Pcos => "pcos",
            ClinicalField::SystolicBp => "systolic_bp",
            ClinicalField::DiastolicBp => "diastolic_bp",
            ClinicalField::GlucoseLevels => "glucose_levels",
            ClinicalField::Hemoglobin => "hemoglobin",
            ClinicalField::PhysicalActivity => "physical_activity",
            ClinicalField::Prediabetes => "prediabetes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClinicalField::Age => "Age",
            ClinicalField::PregnancyCount => "Number of Pregnancies",
            ClinicalField::PreviousGestationPeriod => "Gestation Period in Previous Pregnancy",
            ClinicalField::Bmi => "BMI (Body Mass Index)",
            ClinicalField::Hdl => "HDL Cholesterol",
            ClinicalField::FamilyHistory => "Family History of Diabetes",
            ClinicalField::PrenatalLoss => "History of Unexplained Prenatal Loss",
            ClinicalField::BirthDefects => "Previous Large Child or Birth Defects",
            ClinicalField::Pcos => "PCOS (Polycystic Ovary Syndrome)",
            ClinicalField::SystolicBp => "Systolic Blood Pressure",
            ClinicalField::DiastolicBp => "Diastolic Blood Pressure",
            ClinicalField::GlucoseLevels => "Glucose Levels (OGTT)",
            ClinicalField::Hemoglobin => "Hemoglobin",
            ClinicalField::PhysicalActivity => "Physical Activity Level",
            ClinicalField::Prediabetes => "Prediabetes Diagnosis",
        }
    }

    /// Allowed values for selection fields, `None` for free entry fields.
    pub fn choices(self) -> Option<&'static [&'static str]> {
        match self {
            ClinicalField::FamilyHistory
            | ClinicalField::PrenatalLoss
            | ClinicalField::BirthDefects
            | ClinicalField::Pcos
            | ClinicalField::Prediabetes => Some(&YesNo::CHOICES),
            ClinicalField::PhysicalActivity => Some(&ActivityLevel::CHOICES),
            _ => None,
        }
    }

    /// Accepts both the wire name and the snake case member name.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key || field.ident() == key)
    }
}

impl fmt::Display for ClinicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ClinicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s.trim()).ok_or_else(|| format!("unknown clinical field `{}`", s))
    }
}

/// Payload of the clinical prediction request. Numeric answers travel as the
/// strings the user typed; only presence is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalInputs {
    #[validate(length(min = 1, message = "Age is required"))]
    pub age: String,
    #[validate(length(min = 1, message = "Number of pregnancies is required"))]
    pub pregnancy_count: String,
    #[validate(length(min = 1, message = "Previous gestation period is required"))]
    pub previous_gestation_period: String,
    #[validate(length(min = 1, message = "BMI is required"))]
    pub bmi: String,
    #[validate(length(min = 1, message = "HDL is required"))]
    pub hdl: String,
    pub family_history: YesNo,
    pub prenatal_loss: YesNo,
    pub birth_defects: YesNo,
    pub pcos: YesNo,
    #[serde(rename = "systolicBP")]
    #[validate(length(min = 1, message = "Systolic blood pressure is required"))]
    pub systolic_bp: String,
    #[serde(rename = "diastolicBP")]
    #[validate(length(min = 1, message = "Diastolic blood pressure is required"))]
    pub diastolic_bp: String,
    #[validate(length(min = 1, message = "Glucose levels are required"))]
    pub glucose_levels: String,
    #[validate(length(min = 1, message = "Hemoglobin is required"))]
    pub hemoglobin: String,
    pub physical_activity: ActivityLevel,
    pub prediabetes: YesNo,
}

impl Default for ClinicalInputs {
    /// Measurements the user must supply start empty; the rest start at
    /// typical values.
    fn default() -> Self {
        Self {
            age: String::new(),
            pregnancy_count: "1".into(),
            previous_gestation_period: "0".into(),
            bmi: String::new(),
            hdl: "50".into(),
            family_history: YesNo::No,
            prenatal_loss: YesNo::No,
            birth_defects: YesNo::No,
            pcos: YesNo::No,
            systolic_bp: "120".into(),
            diastolic_bp: "80".into(),
            glucose_levels: String::new(),
            hemoglobin: "13".into(),
            physical_activity: ActivityLevel::Medium,
            prediabetes: YesNo::No,
        }
    }
}

impl ClinicalInputs {
    pub fn value(&self, field: ClinicalField) -> String {
        match field {
            ClinicalField::Age => self.age.clone(),
            ClinicalField::PregnancyCount => self.pregnancy_count.clone(),
            ClinicalField::PreviousGestationPeriod => self.previous_gestation_period.clone(),
            ClinicalField::Bmi => self.bmi.clone(),
            ClinicalField::Hdl => self.hdl.clone(),
            ClinicalField::FamilyHistory => self.family_history.to_string(),
            ClinicalField::PrenatalLoss => self.prenatal_loss.to_string(),
            ClinicalField::BirthDefects => self.birth_defects.to_string(),
            ClinicalField::Pcos => self.pcos.to_string(),
            ClinicalField::SystolicBp => self.systolic_bp.clone(),
            ClinicalField::DiastolicBp => self.diastolic_bp.clone(),
            ClinicalField::GlucoseLevels => self.glucose_levels.clone(),
            ClinicalField::Hemoglobin => self.hemoglobin.clone(),
            ClinicalField::PhysicalActivity => self.physical_activity.to_string(),
            ClinicalField::Prediabetes => self.prediabetes.to_string(),
        }
    }

    /// Store a raw value. Selection fields reject anything outside their
    /// choice set.
    pub fn set(&mut self, field: ClinicalField, value: &str) -> Result<(), String> {
        match field {
            ClinicalField::Age => self.age = value.to_string(),
            ClinicalField::PregnancyCount => self.pregnancy_count = value.to_string(),
            ClinicalField::PreviousGestationPeriod => {
                self.previous_gestation_period = value.to_string()
            }
            ClinicalField::Bmi => self.bmi = value.to_string(),
            ClinicalField::Hdl => self.hdl = value.to_string(),
            ClinicalField::FamilyHistory => self.family_history = value.parse()?,
            ClinicalField::PrenatalLoss => self.prenatal_loss = value.parse()?,
            ClinicalField::BirthDefects => self.birth_defects = value.parse()?,
            ClinicalField::Pcos => self.pcos = value.parse()?,
            ClinicalField::SystolicBp => self.systolic_bp = value.to_string(),
            ClinicalField::DiastolicBp => self.diastolic_bp = value.to_string(),
            ClinicalField::GlucoseLevels => self.glucose_levels = value.to_string(),
            ClinicalField::Hemoglobin => self.hemoglobin = value.to_string(),
            ClinicalField::PhysicalActivity => self.physical_activity = value.parse()?,
            ClinicalField::Prediabetes => self.prediabetes = value.parse()?,
        }
        Ok(())
    }

    /// Run the form schema, collecting one message per failing field.
    pub fn check(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }
}

/// Inline validation messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<ClinicalField, String>);

impl FieldErrors {
    pub fn get(&self, field: ClinicalField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: ClinicalField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: ClinicalField) {
        self.0.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClinicalField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = BTreeMap::new();
        for (name, errs) in errors.field_errors() {
            let Some(field) = ClinicalField::from_key(name) else {
                continue;
            };
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| format!("{} is required", field.label()));
            out.insert(field, message);
        }
        FieldErrors(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Moderate, RiskLevel::High];

    /// "Low", "Moderate", "High".
    pub fn title(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        })
    }
}

/// Classification returned by either prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub prediction: String,
    pub is_diabetic: bool,
    /// Percentage in `[0, 100]`, shown exactly as received.
    pub confidence: f64,
    pub risk: RiskLevel,
    pub raw_prediction: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn complete_inputs() -> ClinicalInputs {
        ClinicalInputs {
            age: "31".into(),
            bmi: "27.4".into(),
            glucose_levels: "148".into(),
            ..ClinicalInputs::default()
        }
    }

    #[test]
    fn defaults_leave_required_measurements_empty() {
        let errors = ClinicalInputs::default().check().unwrap_err();

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get(ClinicalField::Age), Some("Age is required"));
        assert_eq!(errors.get(ClinicalField::Bmi), Some("BMI is required"));
        assert_eq!(
            errors.get(ClinicalField::GlucoseLevels),
            Some("Glucose levels are required")
        );
    }

    #[test]
    fn complete_form_passes() {
        assert!(complete_inputs().check().is_ok());
    }

    #[test_case(ClinicalField::Age)]
    #[test_case(ClinicalField::PregnancyCount)]
    #[test_case(ClinicalField::PreviousGestationPeriod)]
    #[test_case(ClinicalField::Bmi)]
    #[test_case(ClinicalField::Hdl)]
    #[test_case(ClinicalField::SystolicBp)]
    #[test_case(ClinicalField::DiastolicBp)]
    #[test_case(ClinicalField::GlucoseLevels)]
    #[test_case(ClinicalField::Hemoglobin)]
    fn empty_measurement_blocks_submission(field: ClinicalField) {
        let mut inputs = complete_inputs();
        inputs.set(field, "").unwrap();

        let errors = inputs.check().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(field).is_some());
    }

    #[test_case(ClinicalField::FamilyHistory, "maybe")]
    #[test_case(ClinicalField::Pcos, "")]
    #[test_case(ClinicalField::PhysicalActivity, "extreme")]
    fn selection_fields_reject_values_outside_choices(field: ClinicalField, value: &str) {
        let mut inputs = complete_inputs();
        let before = inputs.clone();

        assert!(inputs.set(field, value).is_err());
        assert_eq!(inputs, before);
    }

    #[test]
    fn serializes_every_field_as_string_with_wire_names() {
        let mut inputs = complete_inputs();
        inputs.set(ClinicalField::FamilyHistory, "yes").unwrap();
        inputs.set(ClinicalField::PhysicalActivity, "high").unwrap();

        let value = serde_json::to_value(&inputs).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 15);
        for field in ClinicalField::ALL {
            let wire = object.get(field.key()).unwrap();
            assert_eq!(wire.as_str().unwrap(), inputs.value(field));
        }
        assert_eq!(object["systolicBP"], "120");
        assert_eq!(object["familyHistory"], "yes");
        assert_eq!(object["physicalActivity"], "high");
    }

    #[test]
    fn field_lookup_accepts_wire_and_member_names() {
        assert_eq!(ClinicalField::from_key("systolicBP"), Some(ClinicalField::SystolicBp));
        assert_eq!(ClinicalField::from_key("systolic_bp"), Some(ClinicalField::SystolicBp));
        assert_eq!(ClinicalField::from_key("insulin"), None);
    }

    #[test]
    fn decodes_prediction_result() {
        let body = r#"{"prediction":"GDM","isDiabetic":true,"confidence":82,"risk":"high","rawPrediction":0.82}"#;
        let result: PredictionResult = serde_json::from_str(body).unwrap();

        assert_eq!(result.risk, RiskLevel::High);
        assert!(result.is_diabetic);
        assert_eq!(result.confidence, 82.0);
    }
}
