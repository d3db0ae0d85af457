//! Turns raw model text into a [`DiagnosisResponse`].
//!
//! PLACEHOLDER: this does not extract anything from the model's answer.
//! Apart from `description`, `disease_name_local`, `diagnosis_id` and
//! `timestamp`, every field is a fixed constant. Real extraction would need a
//! schema-constrained provider request rather than parsing free text here.

use chrono::{DateTime, Local};

use crate::prompt::Language;
use crate::types::{ChemicalTreatment, DiagnosisResponse, OrganicTreatment, Severity};

/// Maximum number of characters of model text kept in `description`.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

const PLACEHOLDER_DISEASE: &str = "Detected Disease";
const PLACEHOLDER_DISEASE_HI: &str = "पहचानी गई बीमारी";

/// Shape a model reply using the current local time.
pub fn shape_response(raw: &str, language: &str) -> DiagnosisResponse {
    shape_response_at(raw, language, Local::now())
}

/// Shape a model reply as of `now`.
pub fn shape_response_at(raw: &str, language: &str, now: DateTime<Local>) -> DiagnosisResponse {
    let disease_name_local = match Language::from_tag(language) {
        Language::Hindi => PLACEHOLDER_DISEASE_HI,
        Language::English => PLACEHOLDER_DISEASE,
    };

    DiagnosisResponse {
        disease_name: PLACEHOLDER_DISEASE.to_string(),
        disease_name_local: disease_name_local.to_string(),
        confidence: 85.0,
        severity: Severity::Moderate,
        affected_parts: vec!["leaves".to_string()],
        description: truncate_chars(raw, DESCRIPTION_MAX_CHARS),
        causes: vec!["Fungal infection".to_string(), "High humidity".to_string()],
        organic_treatments: vec![OrganicTreatment {
            name: "Neem Oil Spray".to_string(),
            description: "Natural fungicide".to_string(),
            method: "Spray on affected areas".to_string(),
            frequency: "Every 7 days".to_string(),
        }],
        chemical_treatments: vec![ChemicalTreatment {
            name: "Fungicide".to_string(),
            description: "Chemical treatment".to_string(),
            method: "Follow label instructions".to_string(),
            precautions: vec!["Wear protective gear".to_string()],
        }],
        preventive_measures: vec!["Proper drainage".to_string(), "Crop rotation".to_string()],
        diagnosis_id: diagnosis_id(now),
        timestamp: now.to_rfc3339(),
    }
}

/// `DIAG-` followed by the 14-digit local timestamp.
pub fn diagnosis_id(now: DateTime<Local>) -> String {
    format!("DIAG-{}", now.format("%Y%m%d%H%M%S"))
}

// Counts chars, not bytes, so Devanagari text is never split mid-codepoint
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
