//! Locale-specific diagnosis prompts.
//!
//! Only two templates exist: Hindi for the `"hi"` tag and English for every
//! other tag. No other locales are translated.

use serde::Serialize;

/// Prompt locale resolved from a request language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Hindi,
}

impl Language {
    /// Resolve a language tag. `"hi"` is Hindi; anything else falls back to English.
    pub fn from_tag(tag: &str) -> Self {
        if tag == "hi" {
            Language::Hindi
        } else {
            Language::English
        }
    }
}

/// System and user instructions for one diagnosis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisPrompt {
    /// Role instruction, sent on a separate channel where the provider has one
    pub system: String,
    /// Task instruction listing the required diagnosis fields
    pub user: String,
}

impl DiagnosisPrompt {
    /// Build the prompt pair for a crop type and language tag.
    ///
    /// The crop type is interpolated as given; it is not checked against the
    /// crop catalog.
    pub fn build(crop_type: Option<&str>, language: &str) -> Self {
        match Language::from_tag(language) {
            Language::Hindi => Self::hindi(crop_type.unwrap_or("अज्ञात")),
            Language::English => Self::english(crop_type.unwrap_or("Unknown")),
        }
    }

    /// Single message for providers without a system channel.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }

    fn english(crop: &str) -> Self {
        Self {
            system: "You are an expert agricultural scientist specializing in crop disease \
                     identification. Analyze the crop image and provide detailed diagnosis."
                .to_string(),
            user: format!(
                "Analyze this crop image and provide detailed diagnosis in JSON format.\n\
                 \n\
                 Crop type: {crop}\n\
                 \n\
                 Please provide:\n\
                 1. Disease name (in English and local language)\n\
                 2. Confidence level (0-100%)\n\
                 3. Severity (low, moderate, high)\n\
                 4. Affected parts (leaves, stem, fruit, etc.)\n\
                 5. Detailed description\n\
                 6. Causes\n\
                 7. Organic treatments (name, description, method)\n\
                 8. Chemical treatments (name, description, method, precautions)\n\
                 9. Preventive measures"
            ),
        }
    }

    fn hindi(crop: &str) -> Self {
        Self {
            system: "आप एक विशेषज्ञ कृषि वैज्ञानिक हैं जो फसलों की बीमारियों की पहचान में \
                     विशेषज्ञ हैं। फसल की तस्वीर का विश्लेषण करें और विस्तृत निदान प्रदान करें।"
                .to_string(),
            user: format!(
                "इस फसल की तस्वीर का विश्लेषण करें और निम्नलिखित विवरण JSON प्रारूप में प्रदान करें:\n\
                 \n\
                 फसल प्रकार: {crop}\n\
                 \n\
                 कृपया निम्नलिखित जानकारी प्रदान करें:\n\
                 1. बीमारी का नाम (अंग्रेजी और हिंदी दोनों में)\n\
                 2. निदान में आत्मविश्वास (0-100%)\n\
                 3. गंभीरता (low, moderate, high)\n\
                 4. प्रभावित भाग (पत्तियां, तना, फल, आदि)\n\
                 5. विस्तृत विवरण\n\
                 6. कारण\n\
                 7. जैविक उपचार (नाम, विवरण, विधि)\n\
                 8. रासायनिक उपचार (नाम, विवरण, विधि, सावधानियां)\n\
                 9. रोकथाम के उपाय"
            ),
        }
    }
}
