//! Request and response types for a diagnosis call.
//!
//! All of these are value objects that live for one request.

use serde::{Deserialize, Serialize};

/// Default language tag for requests that don't name one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Parameters accompanying an uploaded crop image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisRequest {
    /// Crop the image shows, if the farmer said
    pub crop_type: Option<String>,

    /// Free-form location. Accepted but not used downstream.
    pub location: Option<String>,

    /// Observed symptoms in the order given. Accepted but not used downstream.
    pub symptoms: Vec<String>,

    /// Response language tag
    pub language: String,
}

impl Default for DiagnosisRequest {
    fn default() -> Self {
        Self {
            crop_type: None,
            location: None,
            symptoms: Vec::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl DiagnosisRequest {
    /// Crop type with blank values treated as absent.
    pub fn crop_type(&self) -> Option<&str> {
        self.crop_type
            .as_deref()
            .map(str::trim)
            .filter(|crop| !crop.is_empty())
    }
}

/// How badly the crop is affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Moderate,
    High,
}

/// An organic treatment recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganicTreatment {
    pub name: String,
    pub description: String,
    pub method: String,
    pub frequency: String,
}

/// A chemical treatment recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemicalTreatment {
    pub name: String,
    pub description: String,
    pub method: String,
    pub precautions: Vec<String>,
}

/// The fixed-shape diagnosis record returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisResponse {
    /// Canonical (English) disease name
    pub disease_name: String,

    /// Disease name in the requested language
    pub disease_name_local: String,

    /// Confidence in percent (0-100)
    pub confidence: f64,

    pub severity: Severity,

    /// Plant parts showing symptoms
    pub affected_parts: Vec<String>,

    /// Free-text description from the model
    pub description: String,

    pub causes: Vec<String>,

    pub organic_treatments: Vec<OrganicTreatment>,

    pub chemical_treatments: Vec<ChemicalTreatment>,

    pub preventive_measures: Vec<String>,

    /// `DIAG-YYYYMMDDHHMMSS`
    pub diagnosis_id: String,

    /// ISO-8601 instant the diagnosis was produced
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_english() {
        let request = DiagnosisRequest::default();
        assert_eq!(request.language, "en");
        assert!(request.symptoms.is_empty());
    }

    #[test]
    fn test_request_deserializes_partial_json() {
        let request: DiagnosisRequest =
            serde_json::from_str(r#"{"crop_type": "rice", "symptoms": ["spots", "wilting"]}"#)
                .unwrap();
        assert_eq!(request.crop_type(), Some("rice"));
        assert_eq!(request.symptoms, vec!["spots", "wilting"]);
        assert_eq!(request.language, "en");
    }

    #[test]
    fn test_blank_crop_type_is_absent() {
        let request = DiagnosisRequest {
            crop_type: Some("   ".to_string()),
            ..DiagnosisRequest::default()
        };
        assert_eq!(request.crop_type(), None);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Moderate).unwrap(),
            "\"moderate\""
        );
        let parsed: Severity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Severity::High);
    }
}
