//! Static list of supported crops.

use serde::Serialize;

/// A supported crop with English and Hindi display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crop {
    pub id: &'static str,
    pub name: &'static str,
    pub name_hi: &'static str,
}

static CROPS: [Crop; 5] = [
    Crop {
        id: "rice",
        name: "Rice",
        name_hi: "धान",
    },
    Crop {
        id: "wheat",
        name: "Wheat",
        name_hi: "गेहूं",
    },
    Crop {
        id: "tomato",
        name: "Tomato",
        name_hi: "टमाटर",
    },
    Crop {
        id: "potato",
        name: "Potato",
        name_hi: "आलू",
    },
    Crop {
        id: "cotton",
        name: "Cotton",
        name_hi: "कपास",
    },
];

/// All supported crops, in display order.
pub fn supported_crops() -> &'static [Crop] {
    &CROPS
}

/// Payload of the crop catalog endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CropCatalog {
    pub crops: &'static [Crop],
}

impl CropCatalog {
    pub fn new() -> Self {
        Self {
            crops: supported_crops(),
        }
    }
}

impl Default for CropCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_crops_with_expected_ids() {
        let ids: Vec<&str> = supported_crops().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["rice", "wheat", "tomato", "potato", "cotton"]);
    }

    #[test]
    fn test_catalog_json_shape() {
        let json = serde_json::to_value(CropCatalog::new()).unwrap();
        let crops = json["crops"].as_array().unwrap();
        assert_eq!(crops.len(), 5);
        assert_eq!(crops[0]["id"], "rice");
        assert_eq!(crops[0]["name"], "Rice");
        assert_eq!(crops[0]["name_hi"], "धान");
    }
}
